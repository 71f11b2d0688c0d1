//! Numeric constants shared by the fetch, projection and layout stages.

/// Meters per degree of latitude used by the flat-earth bounding box.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default query radius around the resolved place, in meters.
pub const DEFAULT_RADIUS_M: f64 = 29_000.0;

/// Width of the reference poster in points (12 inches at 72 pt/in).
/// Stroke widths and font sizes are expressed against this width.
pub const REFERENCE_WIDTH_PT: f32 = 864.0;

/// Stroke width of waterway lines, in points.
pub const WATER_LINE_WIDTH_PT: f32 = 0.5;

/// Fraction of the surface height covered by each edge fade.
pub const GRADIENT_FADE_FRACTION: f32 = 0.25;

/// Attribution printed at the bottom of every poster.
pub const DEFAULT_ATTRIBUTION: &str = "\u{a9} OpenStreetMap contributors";

/// Overpass query timeout in seconds, embedded in the query header.
pub const OVERPASS_QUERY_TIMEOUT_SECS: u64 = 180;

/// Public Overpass mirrors, tried in this order.
pub const DEFAULT_OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://maps.mail.ru/osm/tools/overpass/api/interpreter",
];

/// Nominatim search endpoint used for place resolution.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim rejects requests without an identifying User-Agent.
pub const DEFAULT_USER_AGENT: &str = "mapposter/0.1.0";
