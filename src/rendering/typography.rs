//! Poster text layout.
//!
//! Vertical positions are fractions of the surface height measured from the
//! bottom edge. Sizes are in points on the reference poster width and scale
//! with the surface like stroke widths do.

use crate::core::constants::REFERENCE_WIDTH_PT;
use crate::core::geo::{LatLng, Point};
use crate::rendering::canvas::{TextAlign, TextStyle};
use crate::theme::Theme;

const TITLE_Y: f32 = 0.14;
const TITLE_PT: f32 = 60.0;
/// Titles longer than this many letters shrink proportionally
const TITLE_FIT_LETTERS: usize = 10;
const TITLE_MIN_PT: f32 = 24.0;

const RULE_Y: f32 = 0.125;
const RULE_X: (f32, f32) = (0.4, 0.6);
const RULE_PT: f32 = 1.0;

const REGION_Y: f32 = 0.10;
const REGION_PT: f32 = 22.0;

const COORDS_Y: f32 = 0.07;
const COORDS_PT: f32 = 14.0;
const COORDS_OPACITY: f32 = 0.7;

const ATTRIBUTION_X: f32 = 0.98;
const ATTRIBUTION_Y: f32 = 0.02;
const ATTRIBUTION_PT: f32 = 8.0;
const ATTRIBUTION_OPACITY: f32 = 0.5;

/// What the poster says about itself
#[derive(Debug, Clone, PartialEq)]
pub struct PosterText {
    pub place: String,
    pub region: String,
    pub location: LatLng,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub anchor: Point,
    pub style: TextStyle,
}

/// The short horizontal rule between title and region label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub from: Point,
    pub to: Point,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PosterLayout {
    pub blocks: Vec<TextBlock>,
    pub rule: Rule,
}

/// Upper-cases `name` and separates its letters with two spaces.
///
/// `spaced_title("Rome")` is `"R  O  M  E"`.
pub fn spaced_title(name: &str) -> String {
    name.trim()
        .to_uppercase()
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join("  ")
}

/// Title size in points, shrunk for long names but never below the floor.
pub fn title_size_pt(name: &str) -> f32 {
    let letters = name.trim().chars().count();
    if letters <= TITLE_FIT_LETTERS {
        TITLE_PT
    } else {
        (TITLE_PT * TITLE_FIT_LETTERS as f32 / letters as f32).max(TITLE_MIN_PT)
    }
}

pub fn layout(text: &PosterText, theme: &Theme, width: f32, height: f32) -> PosterLayout {
    let scale = width / REFERENCE_WIDTH_PT;
    let from_bottom = |f: f32| (height * (1.0 - f)) as f64;
    let center_x = (width / 2.0) as f64;

    let style = |pt: f32, opacity: f32, align: TextAlign| TextStyle {
        size: pt * scale,
        color: theme.text.with_opacity(opacity),
        align,
    };

    let mut blocks = vec![TextBlock {
        text: spaced_title(&text.place),
        anchor: Point::new(center_x, from_bottom(TITLE_Y)),
        style: style(title_size_pt(&text.place), 1.0, TextAlign::Center),
    }];

    let region = text.region.trim();
    if !region.is_empty() {
        blocks.push(TextBlock {
            text: region.to_uppercase(),
            anchor: Point::new(center_x, from_bottom(REGION_Y)),
            style: style(REGION_PT, 1.0, TextAlign::Center),
        });
    }

    blocks.push(TextBlock {
        text: text.location.to_string(),
        anchor: Point::new(center_x, from_bottom(COORDS_Y)),
        style: style(COORDS_PT, COORDS_OPACITY, TextAlign::Center),
    });

    if !text.attribution.is_empty() {
        blocks.push(TextBlock {
            text: text.attribution.clone(),
            anchor: Point::new((width * ATTRIBUTION_X) as f64, from_bottom(ATTRIBUTION_Y)),
            style: style(ATTRIBUTION_PT, ATTRIBUTION_OPACITY, TextAlign::Right),
        });
    }

    let rule_y = from_bottom(RULE_Y);
    PosterLayout {
        blocks,
        rule: Rule {
            from: Point::new((width * RULE_X.0) as f64, rule_y),
            to: Point::new((width * RULE_X.1) as f64, rule_y),
            width: RULE_PT * scale,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PosterText {
        PosterText {
            place: "Tokyo".to_string(),
            region: "Japan".to_string(),
            location: LatLng::new(35.6762, 139.6503),
            attribution: "\u{a9} OpenStreetMap contributors".to_string(),
        }
    }

    #[test]
    fn test_spaced_title() {
        assert_eq!(spaced_title("Rome"), "R  O  M  E");
        assert_eq!(spaced_title(" köln "), "K  Ö  L  N");
        assert_eq!(spaced_title(""), "");
    }

    #[test]
    fn test_long_titles_shrink() {
        assert_eq!(title_size_pt("Paris"), 60.0);
        assert_eq!(title_size_pt("Copenhagen"), 60.0);
        assert_eq!(title_size_pt("Rio de Janeiro"), 60.0 * 10.0 / 14.0);
        assert_eq!(
            title_size_pt("Llanfairpwllgwyngyllgogerychwyrndrobwllllantysiliogogogoch"),
            24.0
        );
    }

    #[test]
    fn test_layout_positions() {
        let theme = Theme::default();
        let layout = layout(&sample(), &theme, 1200.0, 1600.0);

        let texts: Vec<&str> = layout.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "T  O  K  Y  O",
                "JAPAN",
                "35.6762° N / 139.6503° E",
                "\u{a9} OpenStreetMap contributors",
            ]
        );

        // Title sits above the region line, which sits above the coordinates
        let ys: Vec<f64> = layout.blocks.iter().map(|b| b.anchor.y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
        assert!((ys[0] - 1600.0 * 0.86).abs() < 1e-3);

        let attribution = &layout.blocks[3];
        assert_eq!(attribution.style.align, TextAlign::Right);
        assert!((attribution.anchor.x - 1176.0).abs() < 1e-3);
        assert_eq!(attribution.style.color, theme.text.with_opacity(0.5));

        assert!(layout.rule.from.y > ys[0] && layout.rule.from.y < ys[1]);
        assert!((layout.rule.to.x - layout.rule.from.x - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_sizes_scale_with_width() {
        let theme = Theme::default();
        let small = layout(&sample(), &theme, 864.0, 1152.0);
        let large = layout(&sample(), &theme, 3456.0, 4608.0);
        assert_eq!(small.blocks[0].style.size, 60.0);
        assert_eq!(large.blocks[0].style.size, 240.0);
        assert_eq!(large.rule.width, 4.0);
    }

    #[test]
    fn test_empty_region_and_attribution_omitted() {
        let text = PosterText {
            region: "  ".to_string(),
            attribution: String::new(),
            ..sample()
        };
        let layout = layout(&text, &Theme::default(), 1200.0, 1600.0);
        assert_eq!(layout.blocks.len(), 2);
    }
}
