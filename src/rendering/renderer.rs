use std::fmt;

use crate::core::constants::{GRADIENT_FADE_FRACTION, REFERENCE_WIDTH_PT, WATER_LINE_WIDTH_PT};
use crate::core::geo::{LatLng, Point};
use crate::data::classify::{ClassifiedRegion, Geometry};
use crate::rendering::canvas::Canvas;
use crate::rendering::style::road_style;
use crate::rendering::typography::{self, PosterText};
use crate::theme::{Color, Theme};

/// Poster layers, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    WaterPolygons,
    WaterLines,
    Parks,
    Roads,
    Gradient,
    Typography,
}

impl RenderLayer {
    pub const ORDER: [RenderLayer; 6] = [
        RenderLayer::WaterPolygons,
        RenderLayer::WaterLines,
        RenderLayer::Parks,
        RenderLayer::Roads,
        RenderLayer::Gradient,
        RenderLayer::Typography,
    ];
}

impl fmt::Display for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderLayer::WaterPolygons => write!(f, "water polygons"),
            RenderLayer::WaterLines => write!(f, "water lines"),
            RenderLayer::Parks => write!(f, "parks"),
            RenderLayer::Roads => write!(f, "roads"),
            RenderLayer::Gradient => write!(f, "gradient"),
            RenderLayer::Typography => write!(f, "typography"),
        }
    }
}

/// Draws a classified region onto a canvas in the fixed layer order.
///
/// The theme is borrowed for the duration of a render; nothing is cached
/// between calls.
pub struct LayeredRenderer<'a> {
    theme: &'a Theme,
}

impl<'a> LayeredRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Clears `canvas` to the theme background and draws every layer.
    /// The typography layer stays empty when `text` is `None`.
    pub fn render<C, P>(
        &self,
        canvas: &mut C,
        region: &ClassifiedRegion,
        text: Option<&PosterText>,
        project: P,
    ) where
        C: Canvas + ?Sized,
        P: Fn(&LatLng) -> Point,
    {
        let scale = canvas.width() / REFERENCE_WIDTH_PT;
        let theme = self.theme;

        canvas.clear(theme.background);

        for layer in RenderLayer::ORDER {
            canvas.begin_layer(layer);
            match layer {
                RenderLayer::WaterPolygons => {
                    for polygon in &region.water_polygons {
                        fill(canvas, polygon, theme.water, &project);
                    }
                }
                RenderLayer::WaterLines => {
                    for line in &region.water_lines {
                        stroke(canvas, line, theme.water, WATER_LINE_WIDTH_PT * scale, &project);
                    }
                }
                RenderLayer::Parks => {
                    for park in &region.parks {
                        fill(canvas, park, theme.parks, &project);
                    }
                }
                RenderLayer::Roads => {
                    for road in &region.roads {
                        let style = road_style(&road.subtype, &theme.roads);
                        stroke(canvas, road, style.color, style.width_pt * scale, &project);
                    }
                }
                RenderLayer::Gradient => draw_edge_fades(canvas, theme.gradient),
                RenderLayer::Typography => {
                    if let Some(text) = text {
                        draw_text(canvas, text, theme);
                    }
                }
            }
        }

        log::debug!(
            "rendered {} features onto {}x{} canvas",
            region.len(),
            canvas.width(),
            canvas.height()
        );
    }
}

fn fill<C, P>(canvas: &mut C, geometry: &Geometry, color: Color, project: &P)
where
    C: Canvas + ?Sized,
    P: Fn(&LatLng) -> Point,
{
    if geometry.points.len() < 3 {
        return;
    }
    let points: Vec<Point> = geometry.points.iter().map(project).collect();
    canvas.fill_polygon(&points, color);
}

fn stroke<C, P>(canvas: &mut C, geometry: &Geometry, color: Color, width: f32, project: &P)
where
    C: Canvas + ?Sized,
    P: Fn(&LatLng) -> Point,
{
    if geometry.points.len() < 2 {
        return;
    }
    let points: Vec<Point> = geometry.points.iter().map(project).collect();
    canvas.stroke_polyline(&points, color, width);
}

fn draw_edge_fades<C: Canvas + ?Sized>(canvas: &mut C, color: Color) {
    let height = canvas.height();
    let fade = height * GRADIENT_FADE_FRACTION;
    let clear = color.with_opacity(0.0);

    canvas.fill_vertical_gradient(0.0, fade, color, clear);
    canvas.fill_vertical_gradient(height - fade, height, clear, color);
}

fn draw_text<C: Canvas + ?Sized>(canvas: &mut C, text: &PosterText, theme: &Theme) {
    let layout = typography::layout(text, theme, canvas.width(), canvas.height());

    if let Some((title, rest)) = layout.blocks.split_first() {
        canvas.draw_text(&title.text, title.anchor, &title.style);
        canvas.stroke_polyline(&[layout.rule.from, layout.rule.to], theme.text, layout.rule.width);
        for block in rest {
            canvas.draw_text(&block.text, block.anchor, &block.style);
        }
    }
}
