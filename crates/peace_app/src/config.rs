use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::Deserialize;

/// Startup configuration, read from a TOML file.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// runnable setup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second the runner sleeps down to; 0 disables the cap.
    pub fps_cap: u32,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
    /// Directory holding `shaders/`.  The built-in sources are used when unset.
    pub asset_dir: Option<PathBuf>,
    /// Stop after this many frames (headless runs).
    pub max_frames: Option<u64>,
    pub camera: CameraConfig,
    pub day: DayConfig,
    pub shadow: ShadowConfig,
    pub world: WorldConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "PEACE Engine".to_string(),
            width: 1280,
            height: 720,
            fps_cap: 60,
            log_level: "info".to_string(),
            asset_dir: None,
            max_frames: Some(600),
            camera: CameraConfig::default(),
            day: DayConfig::default(),
            shadow: ShadowConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 4.0, 15.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            speed: 5.0,
            mouse_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DayConfig {
    /// Minutes past midnight at startup.
    pub start_minutes: f32,
    /// Real seconds per in-game day.
    pub day_duration_seconds: f32,
    pub orbit_radius: f32,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            start_minutes: 480.0,
            day_duration_seconds: 120.0,
            orbit_radius: WorldConfig::default().floor_scale * 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub resolution: u32,
    /// Half-width of the orthographic shadow volume.
    pub extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: peace_renderer::passes::DEFAULT_SHADOW_RESOLUTION,
            extent: 110.0,
            near: 1.0,
            far: 250.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-width of the ground quad.
    pub floor_scale: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { floor_scale: 100.0 }
    }
}

impl AppConfig {
    /// Reads `path`.  A missing file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("in config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parsing TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.width, self.height);
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            bail!("camera clip range {}..{} is invalid", self.camera.near, self.camera.far);
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_tables_override_only_given_fields() {
        let cfg = AppConfig::from_toml(
            r#"
            width = 800
            [day]
            start_minutes = 720.0
            [shadow]
            resolution = 1024
            "#,
        )
        .unwrap();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 720);
        assert_eq!(cfg.day.start_minutes, 720.0);
        assert_eq!(cfg.day.day_duration_seconds, 120.0);
        assert_eq!(cfg.shadow.resolution, 1024);
        assert_eq!(cfg.shadow.extent, ShadowConfig::default().extent);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_toml("width = 0").is_err());
        assert!(AppConfig::from_toml("log_level = \"loud\"").is_err());
        assert!(AppConfig::from_toml("[camera]\nnear = 10.0\nfar = 1.0").is_err());
        assert!(AppConfig::from_toml("width = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load("/definitely/not/here/peace.toml").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }
}
