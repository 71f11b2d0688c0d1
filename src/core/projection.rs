//! Geographic to planar projection for a bounded square region.
//!
//! The vertical axis goes through a true Mercator transform so shapes near
//! the center keep their angles; the horizontal axis is linear in longitude.
//! Only meant for city-scale radii: the bounding box comes from a flat-earth
//! approximation and loses meaning at continental scale.

use super::geo::{LatLng, LatLngBounds, Point};

/// Immutable mapping from a geographic region onto a `width × height` surface
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    bounds: LatLngBounds,
    min_y: f64,
    max_y: f64,
    width: f64,
    height: f64,
}

impl Projection {
    pub fn new(center: LatLng, radius_m: f64, width: f64, height: f64) -> Self {
        let bounds = LatLngBounds::around(center, radius_m);
        let min_y = bounds.south_west.mercator_y();
        let max_y = bounds.north_east.mercator_y();

        Self {
            bounds,
            min_y,
            max_y,
            width,
            height,
        }
    }

    /// Geographic extent covered by the surface
    pub fn bounds(&self) -> &LatLngBounds {
        &self.bounds
    }

    /// Projects a coordinate to surface pixels. North is toward `y = 0`.
    pub fn project(&self, point: &LatLng) -> Point {
        let min_lng = self.bounds.south_west.lng;
        let max_lng = self.bounds.north_east.lng;

        let x = (point.lng - min_lng) / (max_lng - min_lng) * self.width;
        let y = self.height
            - (point.mercator_y() - self.min_y) / (self.max_y - self.min_y) * self.height;

        Point::new(x, y)
    }
}

/// Builds a projector closure for one render.
pub fn make_projector(
    center: LatLng,
    radius_m: f64,
    width: f64,
    height: f64,
) -> impl Fn(&LatLng) -> Point {
    let projection = Projection::new(center, radius_m, width, height);
    move |point| projection.project(point)
}
