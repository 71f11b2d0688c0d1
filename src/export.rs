//! Output naming and PNG export.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

#[cfg(feature = "raster")]
use crate::rendering::canvas::PixmapCanvas;
#[cfg(feature = "raster")]
use crate::Result;

/// Lower-cased place name with whitespace runs collapsed to `_`.
/// Path separators become `-` so the slug is always a single file name.
pub fn place_slug(place: &str) -> String {
    place
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .replace(['/', '\\'], "-")
}

/// `<place_slug>_<theme>_<timestamp>.png`, e.g.
/// `new_york_noir_2026-10-16T09-05-00.png`
pub fn poster_filename(place: &str, theme: &str, timestamp: NaiveDateTime) -> String {
    let stamp: String = timestamp
        .format("%Y-%m-%dT%H:%M:%S%.f")
        .to_string()
        .replace([':', '.'], "-")
        .chars()
        .take(19)
        .collect();
    format!("{}_{}_{}.png", place_slug(place), theme, stamp)
}

/// Full output path for a poster rendered now, stamped in UTC
pub fn output_path(dir: impl AsRef<Path>, place: &str, theme: &str) -> PathBuf {
    dir.as_ref()
        .join(poster_filename(place, theme, chrono::Utc::now().naive_utc()))
}

/// Encodes the canvas as PNG at `path`, creating parent directories.
#[cfg(feature = "raster")]
pub fn save_png(canvas: &PixmapCanvas, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    canvas
        .to_rgba_image()
        .save_with_format(path, image::ImageFormat::Png)?;
    log::info!("saved poster to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_place_slug() {
        assert_eq!(place_slug("New York"), "new_york");
        assert_eq!(place_slug("  San   Francisco \t Bay "), "san_francisco_bay");
        assert_eq!(place_slug("Zürich"), "zürich");
        assert_eq!(place_slug("AC/DC"), "ac-dc");
    }

    #[test]
    fn test_poster_filename() {
        assert_eq!(
            poster_filename("New York", "noir", at(9, 5, 0, 250)),
            "new_york_noir_2026-03-07T09-05-00.png"
        );
        assert_eq!(
            poster_filename("Oslo", "feature_based", at(23, 59, 59, 0)),
            "oslo_feature_based_2026-03-07T23-59-59.png"
        );
    }

    #[test]
    fn test_output_path_uses_utc() {
        let path = output_path("posters", "Oslo", "noir");
        assert_eq!(path.parent(), Some(Path::new("posters")));

        let name = path.file_name().unwrap().to_str().unwrap();
        let stamp = name
            .strip_prefix("oslo_noir_")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        let stamped = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H-%M-%S").unwrap();
        let drift = chrono::Utc::now().naive_utc() - stamped;
        assert!(drift.num_seconds().abs() < 60, "stamp {} is not UTC", stamp);
    }

    #[cfg(feature = "raster")]
    #[test]
    fn test_save_png_writes_decodable_file() {
        use crate::rendering::canvas::Canvas;
        use crate::theme::Color;

        let dir = std::env::temp_dir().join(format!("mapposter-export-{}", std::process::id()));
        let path = dir.join("nested").join("poster.png");

        let mut canvas = PixmapCanvas::new(8, 6).unwrap();
        canvas.clear(Color::rgb(0x1A, 0x3A, 0x5C));
        save_png(&canvas, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(3, 3).0, [0x1A, 0x3A, 0x5C, 0xFF]);
    }
}
