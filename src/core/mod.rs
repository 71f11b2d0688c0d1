pub mod config;
pub mod constants;
pub mod geo;
pub mod projection;

// Re-export main types
pub use config::{NetworkConfig, PosterConfig, PosterFormat, TypographyConfig};
pub use geo::{LatLng, LatLngBounds, Point};
pub use projection::{make_projector, Projection};
