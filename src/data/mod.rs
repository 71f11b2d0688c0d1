pub mod classify;
pub mod overpass;

// Re-export main types
pub use classify::{classify, ClassifiedRegion, Classification, Geometry, GeometryCategory};
pub use overpass::{build_query, RawElement, RegionPayload};
