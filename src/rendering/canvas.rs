//! Drawing surfaces.
//!
//! The renderer only talks to the `Canvas` trait. `RecordingCanvas` keeps a
//! list of draw operations; `PixmapCanvas` rasterizes with tiny-skia and
//! draws text with ab_glyph.

use crate::core::geo::Point;
use crate::rendering::renderer::RenderLayer;
use crate::theme::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

/// A mutable drawing surface, origin top-left, y down
pub trait Canvas {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Called before each layer is drawn.
    fn begin_layer(&mut self, _layer: RenderLayer) {}

    fn clear(&mut self, color: Color);

    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f32);

    /// Fills the full-width band between `y0` and `y1`, blending from `from`
    /// at `y0` to `to` at `y1`.
    fn fill_vertical_gradient(&mut self, y0: f32, y1: f32, from: Color, to: Color);

    /// Draws one line of text, vertically centered on `anchor.y`.
    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Layer(RenderLayer),
    Clear(Color),
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    StrokePolyline {
        points: Vec<Point>,
        color: Color,
        width: f32,
    },
    VerticalGradient {
        y0: f32,
        y1: f32,
        from: Color,
        to: Color,
    },
    Text {
        text: String,
        anchor: Point,
        style: TextStyle,
    },
}

/// Canvas that records draw calls instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Layers in the order they were started
    pub fn layers(&self) -> Vec<RenderLayer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Draw operations issued while `layer` was current
    pub fn ops_in(&self, layer: RenderLayer) -> Vec<&DrawOp> {
        let mut current = None;
        let mut ops = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::Layer(l) => current = Some(*l),
                other if current == Some(layer) => ops.push(other),
                _ => {}
            }
        }
        ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn begin_layer(&mut self, layer: RenderLayer) {
        self.ops.push(DrawOp::Layer(layer));
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        self.ops.push(DrawOp::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f32) {
        self.ops.push(DrawOp::StrokePolyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_vertical_gradient(&mut self, y0: f32, y1: f32, from: Color, to: Color) {
        self.ops.push(DrawOp::VerticalGradient { y0, y1, from, to });
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            anchor,
            style: style.clone(),
        });
    }
}

#[cfg(feature = "raster")]
pub use raster::{bundled_font, PixmapCanvas};

#[cfg(feature = "raster")]
mod raster {
    use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
    use std::path::Path;
    use tiny_skia::{
        FillRule, GradientStop, LineCap, LineJoin, LinearGradient, Paint, PathBuilder, Pixmap,
        PremultipliedColorU8, Rect, SpreadMode, Stroke, Transform,
    };

    use super::{Canvas, TextAlign, TextStyle};
    use crate::core::geo::Point;
    use crate::theme::Color;
    use crate::{Error, Result};

    /// DejaVu Sans, used whenever no other font is configured
    const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

    /// The font every `PixmapCanvas` starts with.
    pub fn bundled_font() -> Result<FontArc> {
        FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| Error::Render(format!("bundled font is unreadable: {}", e)))
    }

    fn skia_color(color: Color) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }

    fn solid_paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        paint
    }

    fn build_path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if close {
            pb.close();
        }
        pb.finish()
    }

    /// Raster surface backed by a tiny-skia pixmap
    pub struct PixmapCanvas {
        pixmap: Pixmap,
        font: Option<FontArc>,
        warned_missing_font: bool,
    }

    impl PixmapCanvas {
        pub fn new(width: u32, height: u32) -> Result<Self> {
            let pixmap = Pixmap::new(width, height).ok_or_else(|| {
                Error::Render(format!("cannot allocate a {}x{} surface", width, height))
            })?;
            Ok(Self {
                pixmap,
                font: Some(bundled_font()?),
                warned_missing_font: false,
            })
        }

        pub fn with_font(mut self, font: FontArc) -> Self {
            self.font = Some(font);
            self
        }

        /// Drops the font; text calls become no-ops.
        pub fn without_font(mut self) -> Self {
            self.font = None;
            self
        }

        /// Loads a TTF/OTF font for all text on this canvas.
        pub fn with_font_file(self, path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let bytes = std::fs::read(path)?;
            let font = FontArc::try_from_vec(bytes)
                .map_err(|e| Error::Render(format!("invalid font {}: {}", path.display(), e)))?;
            Ok(self.with_font(font))
        }

        pub fn pixmap(&self) -> &Pixmap {
            &self.pixmap
        }

        /// Straight-alpha color of one pixel
        pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
            let c = self.pixmap.pixel(x, y)?.demultiply();
            Some(Color::new(c.red(), c.green(), c.blue(), c.alpha()))
        }

        pub fn to_rgba_image(&self) -> image::RgbaImage {
            image::RgbaImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
                let c = self.pixel(x, y).unwrap_or(Color::TRANSPARENT);
                image::Rgba([c.r, c.g, c.b, c.a])
            })
        }

        /// Source-over blend of `color` at `coverage` into one pixel
        fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
            let (w, h) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
            if x < 0 || y < 0 || x >= w || y >= h {
                return;
            }
            let idx = (y * w + x) as usize;
            let dst = self.pixmap.pixels()[idx];

            let sa = color.opacity() * coverage.clamp(0.0, 1.0);
            let keep = 1.0 - sa;
            let channel = |src: u8, dst: u8| (src as f32 * sa + dst as f32 * keep).round() as u8;

            let blended = PremultipliedColorU8::from_rgba(
                channel(color.r, dst.red()),
                channel(color.g, dst.green()),
                channel(color.b, dst.blue()),
                channel(255, dst.alpha()),
            );
            if let Some(px) = blended {
                self.pixmap.pixels_mut()[idx] = px;
            }
        }
    }

    impl Canvas for PixmapCanvas {
        fn width(&self) -> f32 {
            self.pixmap.width() as f32
        }

        fn height(&self) -> f32 {
            self.pixmap.height() as f32
        }

        fn clear(&mut self, color: Color) {
            self.pixmap.fill(skia_color(color));
        }

        fn fill_polygon(&mut self, points: &[Point], color: Color) {
            if points.len() < 3 {
                return;
            }
            if let Some(path) = build_path(points, true) {
                self.pixmap.fill_path(
                    &path,
                    &solid_paint(color),
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }

        fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f32) {
            if points.len() < 2 {
                return;
            }
            let stroke = Stroke {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            if let Some(path) = build_path(points, false) {
                self.pixmap.stroke_path(
                    &path,
                    &solid_paint(color),
                    &stroke,
                    Transform::identity(),
                    None,
                );
            }
        }

        fn fill_vertical_gradient(&mut self, y0: f32, y1: f32, from: Color, to: Color) {
            let Some(shader) = LinearGradient::new(
                tiny_skia::Point::from_xy(0.0, y0),
                tiny_skia::Point::from_xy(0.0, y1),
                vec![
                    GradientStop::new(0.0, skia_color(from)),
                    GradientStop::new(1.0, skia_color(to)),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            ) else {
                return;
            };
            let Some(rect) = Rect::from_ltrb(0.0, y0.min(y1), self.width(), y0.max(y1)) else {
                return;
            };

            let mut paint = Paint::default();
            paint.shader = shader;
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }

        fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
            let Some(font) = self.font.clone() else {
                if !self.warned_missing_font {
                    log::warn!("no font configured, skipping poster text");
                    self.warned_missing_font = true;
                }
                return;
            };

            let scale = PxScale::from(style.size);
            let scaled = font.as_scaled(scale);

            let mut advance = 0.0f32;
            let mut previous = None;
            let mut placed = Vec::with_capacity(text.len());
            for c in text.chars() {
                let id = scaled.glyph_id(c);
                if let Some(prev) = previous {
                    advance += scaled.kern(prev, id);
                }
                placed.push((id, advance));
                advance += scaled.h_advance(id);
                previous = Some(id);
            }

            let left = match style.align {
                TextAlign::Left => anchor.x as f32,
                TextAlign::Center => anchor.x as f32 - advance / 2.0,
                TextAlign::Right => anchor.x as f32 - advance,
            };
            let baseline = anchor.y as f32 + (scaled.ascent() + scaled.descent()) / 2.0;

            for (id, offset) in placed {
                let glyph = id.with_scale_and_position(scale, point(left + offset, baseline));
                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        self.blend(
                            bounds.min.x as i32 + gx as i32,
                            bounds.min.y as i32 + gy as i32,
                            style.color,
                            coverage,
                        );
                    });
                }
            }
        }
    }

}
