//! # mapposter
//!
//! Turns a place name into a stylized map poster.
//!
//! The pipeline resolves the place to coordinates, pulls raw OpenStreetMap
//! geometry for the surrounding region from the first responsive Overpass
//! mirror, classifies it into roads, water and parks, projects it onto a
//! flat surface and draws it in a fixed layer order under a theme.

pub mod core;
pub mod data;
pub mod export;
pub mod pipeline;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod sources;
pub mod theme;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{PosterConfig, PosterFormat},
    geo::{LatLng, LatLngBounds, Point},
    projection::{make_projector, Projection},
};

pub use data::{
    classify::{classify, ClassifiedRegion, Geometry, GeometryCategory},
    overpass::{RawElement, RegionPayload},
};

pub use sources::{
    fetcher::RegionDataFetcher,
    geocoder::{PlaceResolver, ResolvedPlace},
    transport::{HttpResponse, HttpTransport, ReqwestTransport, ScriptedTransport},
};

pub use rendering::{
    canvas::{Canvas, RecordingCanvas},
    renderer::{LayeredRenderer, RenderLayer},
    typography::PosterText,
};

#[cfg(feature = "raster")]
pub use rendering::canvas::PixmapCanvas;

pub use pipeline::{
    FeatureCounts, PipelineStatus, PosterPipeline, PosterRequest, PosterSummary, Silent,
    StatusSink,
};

pub use theme::{available_themes, color::Color, LoadedTheme, Theme};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the poster pipeline can report
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("place not found: {query}")]
    PlaceNotFound { query: String },

    #[error("place resolution request failed: {0}")]
    ResolutionRequestFailed(String),

    #[error("all {attempted} region data endpoints failed, last error: {last}")]
    AllEndpointsUnavailable {
        attempted: usize,
        #[source]
        last: Box<Error>,
    },

    #[error("endpoint {endpoint} answered HTTP {status}")]
    EndpointStatus { endpoint: String, status: u16 },

    #[error("malformed region payload: {0}")]
    MalformedRegionPayload(String),

    #[error("theme load failed: {0}")]
    ThemeLoadFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("superseded by a newer poster request")]
    Superseded,

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "raster")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
