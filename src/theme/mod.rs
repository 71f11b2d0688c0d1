//! Poster themes
//!
//! A theme is plain configuration handed to the renderer. Theme files are
//! JSON objects with a fixed set of hex color keys; anything wrong with a
//! file (missing, unreadable, a key absent or malformed) makes the loader
//! fall back to the complete default theme. Fields are never merged.

pub mod color;

use serde::Deserialize;
use std::path::Path;

pub use color::Color;

use crate::{Error, Result};

/// Colors for each road class the renderer distinguishes
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPalette {
    pub motorway: Color,
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub residential: Color,
    pub default: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Identifier used in output file names
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub background: Color,
    pub text: Color,
    /// Color the top and bottom edge fades start from
    pub gradient: Color,
    pub water: Color,
    pub parks: Color,
    pub roads: RoadPalette,
}

/// On-disk layout; every color key is required
#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    description: Option<String>,
    bg: Color,
    text: Color,
    gradient_color: Color,
    water: Color,
    parks: Color,
    road_motorway: Color,
    road_primary: Color,
    road_secondary: Color,
    road_tertiary: Color,
    road_residential: Color,
    road_default: Color,
}

impl ThemeFile {
    fn into_theme(self, name: &str) -> Theme {
        Theme {
            name: name.to_string(),
            label: self.name,
            description: self.description,
            background: self.bg,
            text: self.text,
            gradient: self.gradient_color,
            water: self.water,
            parks: self.parks,
            roads: RoadPalette {
                motorway: self.road_motorway,
                primary: self.road_primary,
                secondary: self.road_secondary,
                tertiary: self.road_tertiary,
                residential: self.road_residential,
                default: self.road_default,
            },
        }
    }
}

/// Result of a fallible theme load. `failure` holds the `ThemeLoadFailed`
/// error when `theme` is the fallback.
#[derive(Debug)]
pub struct LoadedTheme {
    pub theme: Theme,
    pub failure: Option<Error>,
}

impl LoadedTheme {
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

impl Theme {
    /// Parses a theme JSON document. `name` identifies the theme in file names.
    pub fn from_json(text: &str, name: &str) -> Result<Self> {
        let file: ThemeFile = serde_json::from_str(text)
            .map_err(|e| Error::ThemeLoadFailed(format!("theme '{}': {}", name, e)))?;
        Ok(file.into_theme(name))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ThemeLoadFailed(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text, &name)
    }

    /// Loads `path`, or the default theme if anything goes wrong.
    pub fn load_or_default(path: impl AsRef<Path>) -> LoadedTheme {
        Self::recover(Self::from_file(path))
    }

    /// Resolves `<dir>/<name>.json`, then the built-in preset of that name,
    /// then the default theme.
    pub fn load_named(dir: impl AsRef<Path>, name: &str) -> LoadedTheme {
        let path = dir.as_ref().join(format!("{}.json", name));
        if !path.exists() {
            if let Some(theme) = Self::builtin(name) {
                log::debug!("using built-in theme '{}'", name);
                return LoadedTheme {
                    theme,
                    failure: None,
                };
            }
        }
        Self::load_or_default(path)
    }

    fn recover(result: Result<Self>) -> LoadedTheme {
        match result {
            Ok(theme) => {
                log::info!("loaded theme '{}'", theme.name);
                LoadedTheme {
                    theme,
                    failure: None,
                }
            }
            Err(e) => {
                log::warn!("{}; falling back to the default theme", e);
                LoadedTheme {
                    theme: Self::default(),
                    failure: Some(e),
                }
            }
        }
    }

    /// Built-in presets by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "feature_based" => Some(Self::feature_based()),
            "noir" => Some(Self::noir()),
            "blueprint" => Some(Self::blueprint()),
            _ => None,
        }
    }

    pub fn builtin_names() -> [&'static str; 3] {
        ["feature_based", "noir", "blueprint"]
    }

    /// Default theme: grayscale, road weight carried by darkness
    pub fn feature_based() -> Self {
        Self {
            name: "feature_based".to_string(),
            label: Some("Feature-Based Shading".to_string()),
            description: Some("Roads shaded by class on a white ground".to_string()),
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            text: Color::rgb(0x00, 0x00, 0x00),
            gradient: Color::rgb(0xFF, 0xFF, 0xFF),
            water: Color::rgb(0xC0, 0xC0, 0xC0),
            parks: Color::rgb(0xF0, 0xF0, 0xF0),
            roads: RoadPalette {
                motorway: Color::rgb(0x0A, 0x0A, 0x0A),
                primary: Color::rgb(0x1A, 0x1A, 0x1A),
                secondary: Color::rgb(0x2A, 0x2A, 0x2A),
                tertiary: Color::rgb(0x3A, 0x3A, 0x3A),
                residential: Color::rgb(0x4A, 0x4A, 0x4A),
                default: Color::rgb(0x3A, 0x3A, 0x3A),
            },
        }
    }

    pub fn noir() -> Self {
        Self {
            name: "noir".to_string(),
            label: Some("Noir".to_string()),
            description: Some("White streets on black".to_string()),
            background: Color::rgb(0x00, 0x00, 0x00),
            text: Color::rgb(0xFF, 0xFF, 0xFF),
            gradient: Color::rgb(0x00, 0x00, 0x00),
            water: Color::rgb(0x0A, 0x0A, 0x0A),
            parks: Color::rgb(0x11, 0x11, 0x11),
            roads: RoadPalette {
                motorway: Color::rgb(0xFF, 0xFF, 0xFF),
                primary: Color::rgb(0xE0, 0xE0, 0xE0),
                secondary: Color::rgb(0xB0, 0xB0, 0xB0),
                tertiary: Color::rgb(0x90, 0x90, 0x90),
                residential: Color::rgb(0x70, 0x70, 0x70),
                default: Color::rgb(0x80, 0x80, 0x80),
            },
        }
    }

    pub fn blueprint() -> Self {
        Self {
            name: "blueprint".to_string(),
            label: Some("Blueprint".to_string()),
            description: Some("Architectural blueprint".to_string()),
            background: Color::rgb(0x1A, 0x3A, 0x5C),
            text: Color::rgb(0xE8, 0xF4, 0xFF),
            gradient: Color::rgb(0x1A, 0x3A, 0x5C),
            water: Color::rgb(0x0F, 0x28, 0x40),
            parks: Color::rgb(0x1E, 0x45, 0x70),
            roads: RoadPalette {
                motorway: Color::rgb(0xE8, 0xF4, 0xFF),
                primary: Color::rgb(0xC5, 0xDC, 0xF0),
                secondary: Color::rgb(0x9F, 0xC5, 0xE8),
                tertiary: Color::rgb(0x7B, 0xAE, 0xD4),
                residential: Color::rgb(0x5A, 0x96, 0xC0),
                default: Color::rgb(0x7B, 0xAE, 0xD4),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::feature_based()
    }
}

/// Names of the `*.json` themes in `dir`, sorted
pub fn available_themes(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDNIGHT: &str = r##"{
        "name": "Midnight Blue",
        "description": "Deep navy",
        "bg": "#0A1628",
        "text": "#D4AF37",
        "gradient_color": "#0A1628",
        "water": "#061020",
        "parks": "#0F2235",
        "road_motorway": "#D4AF37",
        "road_primary": "#C09A30",
        "road_secondary": "#A88A2A",
        "road_tertiary": "#907A25",
        "road_residential": "#786A20",
        "road_default": "#907A25"
    }"##;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mapposter-theme-{}-{}",
            tag,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_theme() {
        let theme = Theme::from_json(MIDNIGHT, "midnight_blue").unwrap();
        assert_eq!(theme.name, "midnight_blue");
        assert_eq!(theme.label.as_deref(), Some("Midnight Blue"));
        assert_eq!(theme.background, Color::rgb(0x0A, 0x16, 0x28));
        assert_eq!(theme.roads.default, Color::rgb(0x90, 0x7A, 0x25));
    }

    #[test]
    fn test_missing_key_falls_back_entirely() {
        let without_water = MIDNIGHT.replace("\"water\": \"#061020\",", "");
        let err = Theme::from_json(&without_water, "broken").unwrap_err();
        assert!(matches!(err, Error::ThemeLoadFailed(ref m) if m.contains("water")));

        let dir = scratch_dir("missing-key");
        let path = dir.join("broken.json");
        std::fs::write(&path, without_water).unwrap();

        let loaded = Theme::load_or_default(&path);
        assert!(loaded.is_fallback());
        assert!(matches!(loaded.failure, Some(Error::ThemeLoadFailed(_))));
        // No partial merge: every field comes from the default
        assert_eq!(loaded.theme, Theme::default());
    }

    #[test]
    fn test_bad_color_falls_back() {
        let bad = MIDNIGHT.replace(r##""text": "#D4AF37""##, r#""text": "gold""#);
        assert!(Theme::from_json(&bad, "bad").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let loaded = Theme::load_or_default("/definitely/not/here.json");
        assert!(loaded.is_fallback());
        assert_eq!(loaded.theme.name, "feature_based");
    }

    #[test]
    fn test_named_lookup_order() {
        let dir = scratch_dir("named");
        std::fs::write(dir.join("midnight_blue.json"), MIDNIGHT).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let file_theme = Theme::load_named(&dir, "midnight_blue");
        assert!(!file_theme.is_fallback());
        assert_eq!(file_theme.theme.text, Color::rgb(0xD4, 0xAF, 0x37));

        let preset = Theme::load_named(&dir, "noir");
        assert!(!preset.is_fallback());
        assert_eq!(preset.theme, Theme::noir());

        let unknown = Theme::load_named(&dir, "vaporwave");
        assert!(unknown.is_fallback());

        assert_eq!(available_themes(&dir).unwrap(), vec!["midnight_blue"]);
    }

    #[test]
    fn test_builtins_resolve() {
        for name in Theme::builtin_names() {
            assert_eq!(Theme::builtin(name).map(|t| t.name), Some(name.to_string()));
        }
        assert!(Theme::builtin("sepia").is_none());
    }
}
