pub mod canvas;
pub mod renderer;
pub mod style;
pub mod typography;

// Re-export main types
#[cfg(feature = "raster")]
pub use canvas::PixmapCanvas;
pub use canvas::{Canvas, DrawOp, RecordingCanvas, TextAlign, TextStyle};
pub use renderer::{LayeredRenderer, RenderLayer};
pub use style::{road_style, RoadClass, RoadStyle};
pub use typography::{spaced_title, PosterText};
