//! Prelude module for common mapposter types and traits
//!
//! `use mapposter::prelude::*;` brings in everything needed to run the
//! pipeline and render a poster.

pub use crate::core::{
    config::{NetworkConfig, PosterConfig, PosterFormat, TypographyConfig},
    geo::{LatLng, LatLngBounds, Point},
    projection::{make_projector, Projection},
};

pub use crate::data::{
    classify::{classify, ClassifiedRegion, Geometry, GeometryCategory},
    overpass::{RawElement, RegionPayload},
};

pub use crate::sources::{
    fetcher::RegionDataFetcher,
    geocoder::{PlaceResolver, ResolvedPlace},
    transport::{HttpResponse, HttpTransport, ReqwestTransport, ScriptedTransport},
};

pub use crate::rendering::{
    canvas::{Canvas, DrawOp, RecordingCanvas, TextAlign, TextStyle},
    renderer::{LayeredRenderer, RenderLayer},
    style::road_style,
    typography::PosterText,
};

#[cfg(feature = "raster")]
pub use crate::rendering::canvas::PixmapCanvas;

pub use crate::pipeline::{
    FeatureCounts, PipelineStatus, PosterPipeline, PosterRequest, PosterSummary, Silent,
    StatusSink,
};

pub use crate::theme::{available_themes, Color, LoadedTheme, Theme};

pub use crate::export::{place_slug, poster_filename};

#[cfg(feature = "raster")]
pub use crate::export::save_png;

pub use crate::{Error as PosterError, Result};

pub use std::sync::Arc;
