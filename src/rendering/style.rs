use crate::theme::{Color, RoadPalette};

/// Visual road classes. Related OSM subtypes collapse into one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Motorway,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Other,
}

impl RoadClass {
    /// Total over every string; unknown subtypes map to `Other`.
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype {
            "motorway" | "motorway_link" => Self::Motorway,
            "trunk" | "trunk_link" | "primary" | "primary_link" => Self::Primary,
            "secondary" | "secondary_link" => Self::Secondary,
            "tertiary" | "tertiary_link" => Self::Tertiary,
            "residential" | "living_street" | "unclassified" => Self::Residential,
            _ => Self::Other,
        }
    }

    /// Stroke width on the reference poster, in points
    pub fn width_pt(&self) -> f32 {
        match self {
            Self::Motorway => 1.2,
            Self::Primary => 1.0,
            Self::Secondary => 0.8,
            Self::Tertiary => 0.6,
            Self::Residential | Self::Other => 0.4,
        }
    }

    pub fn color(&self, palette: &RoadPalette) -> Color {
        match self {
            Self::Motorway => palette.motorway,
            Self::Primary => palette.primary,
            Self::Secondary => palette.secondary,
            Self::Tertiary => palette.tertiary,
            Self::Residential => palette.residential,
            Self::Other => palette.default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadStyle {
    pub color: Color,
    pub width_pt: f32,
}

pub fn road_style(subtype: &str, palette: &RoadPalette) -> RoadStyle {
    let class = RoadClass::from_subtype(subtype);
    RoadStyle {
        color: class.color(palette),
        width_pt: class.width_pt(),
    }
}
