//! Configuration system for poster generation
//!
//! `PosterConfig` groups the knobs for output size, network access and
//! typography. Every field has a default, so a config file only needs the
//! values it wants to change. Sizes come from `PosterFormat` presets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::constants::{
    DEFAULT_ATTRIBUTION, DEFAULT_GEOCODER_URL, DEFAULT_OVERPASS_ENDPOINTS, DEFAULT_RADIUS_M,
    DEFAULT_USER_AGENT,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosterFormat {
    /// 12 × 16 in at 100 dpi, quick to render
    Preview,
    /// 12 × 16 in at 300 dpi
    Print,
    Custom { width: u32, height: u32 },
}

impl PosterFormat {
    /// Surface size in pixels
    pub fn resolve(&self) -> (u32, u32) {
        match self {
            Self::Preview => (1200, 1600),
            Self::Print => (3600, 4800),
            Self::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for PosterFormat {
    fn default() -> Self {
        Self::Preview
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    pub format: PosterFormat,
    /// Query radius around the resolved place, in meters
    pub radius_m: f64,
    pub network: NetworkConfig,
    pub typography: TypographyConfig,
    /// Directory holding `<theme>.json` files
    pub themes_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            format: PosterFormat::default(),
            radius_m: DEFAULT_RADIUS_M,
            network: NetworkConfig::default(),
            typography: TypographyConfig::default(),
            themes_dir: PathBuf::from("themes"),
            output_dir: PathBuf::from("posters"),
        }
    }
}

impl PosterConfig {
    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded poster config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_m
            )));
        }
        let (width, height) = self.format.resolve();
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "poster size must be non-zero, got {}x{}",
                width, height
            )));
        }
        self.network.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Overpass mirrors, tried strictly in this order
    pub overpass_endpoints: Vec<String>,
    pub geocoder_url: String,
    pub user_agent: String,
    /// Per-request timeout enforced by the HTTP client, also sent to Overpass
    /// as the query's `[timeout:]`
    pub timeout_secs: u64,
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overpass_endpoints.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one overpass endpoint is required".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::InvalidConfig("user agent must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            overpass_endpoints: DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    /// TTF/OTF used for all poster text. Without one, text layers are skipped.
    pub font_path: Option<PathBuf>,
    pub attribution: String,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            attribution: DEFAULT_ATTRIBUTION.to_string(),
        }
    }
}
