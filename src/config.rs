/// Viewer configuration
///
/// Settings are read once at startup from a JSON file and passed down
/// explicitly; nothing here is global. The file is optional: a missing file
/// means defaults, a broken one is reported and ignored.
///
/// Location:
/// - `$MULTI_VIEWER_CONFIG` when set
/// - otherwise `<config dir>/multi-viewer/config.json`
///   (e.g. ~/.config/multi-viewer/config.json on Linux)
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::diff::DiffPolicy;
use crate::error::Result;
use crate::io::listing::ListingMode;
use crate::state::data::{
    Interpolation, SelectionBox, ZoomSettings, ENLARGE_SLIDER_MAX, ENLARGE_SLIDER_MIN,
    MAX_BOX_SIDE,
};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "MULTI_VIEWER_CONFIG";

/// Reference screen height for font scaling
const BASE_SCREEN_HEIGHT: f32 = 1080.0;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Pre-filled answer for the folder count prompt
    pub pane_count: Option<usize>,

    /// Initial selection box in display pixels
    pub select_box: SelectionBox,

    /// Initial magnification (1.0 to 4.0)
    pub enlarge_ratio: f32,

    /// Initial magnifier interpolation
    pub interpolation: Interpolation,

    /// How the shared file list is built
    pub listing_mode: ListingMode,

    /// Diff mode handling of images whose size differs from the reference
    pub diff_policy: DiffPolicy,

    /// UI font size on a 1080 px tall screen
    pub font_size: f32,

    /// Height of the screen the viewer runs on, for font scaling
    pub screen_height: Option<u32>,

    /// Pane size assumed until the first cursor event reports the real one
    pub fallback_viewport: (u32, u32),
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pane_count: None,
            select_box: SelectionBox::default(),
            enlarge_ratio: 2.0,
            interpolation: Interpolation::Nearest,
            listing_mode: ListingMode::Reference,
            diff_policy: DiffPolicy::SkipMismatched,
            font_size: 16.0,
            screen_height: None,
            fallback_viewport: (640, 480),
        }
    }
}

impl ViewerConfig {
    /// Where the config file is looked up
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir()?;
        path.push("multi-viewer");
        path.push("config.json");
        Some(path)
    }

    /// Load the config, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("⚙️  Loaded config from {}", path.display());
                if let Ok(json) = config.to_json() {
                    log::debug!("Effective config: {}", json);
                }
                config
            }
            Err(e) => {
                log::warn!("⚠️  Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Initial zoom settings, with out-of-range values pulled back in
    pub fn zoom_settings(&self) -> ZoomSettings {
        let min = f32::from(ENLARGE_SLIDER_MIN) / 10.0;
        let max = f32::from(ENLARGE_SLIDER_MAX) / 10.0;
        let enlarge_ratio = if self.enlarge_ratio.is_finite() {
            self.enlarge_ratio.clamp(min, max)
        } else {
            ZoomSettings::default().enlarge_ratio
        };

        ZoomSettings {
            select_box: SelectionBox {
                width: self.select_box.width.clamp(1, MAX_BOX_SIDE),
                height: self.select_box.height.clamp(1, MAX_BOX_SIDE),
            },
            enlarge_ratio,
            interpolation: self.interpolation,
        }
    }
}

/// Font metrics computed once at startup and handed to the views
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiMetrics {
    pub font_size: f32,
}

impl UiMetrics {
    pub const MIN_FONT: f32 = 10.0;
    pub const MAX_FONT: f32 = 32.0;

    pub fn from_config(config: &ViewerConfig) -> Self {
        let scale = config
            .screen_height
            .map_or(1.0, |h| h as f32 / BASE_SCREEN_HEIGHT);
        Self {
            font_size: (config.font_size * scale).clamp(Self::MIN_FONT, Self::MAX_FONT),
        }
    }

    /// Slightly larger size for headings
    pub fn heading(&self) -> f32 {
        self.font_size * 1.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{ "enlarge_ratio": 3.0, "listing_mode": "intersection", "diff_policy": "abort" }"#).unwrap();
        assert_eq!(config.enlarge_ratio, 3.0);
        assert_eq!(config.listing_mode, ListingMode::Intersection);
        assert_eq!(config.diff_policy, DiffPolicy::Abort);
        assert_eq!(config.select_box, SelectionBox::default());
        assert_eq!(config.interpolation, Interpolation::Nearest);
    }

    #[test]
    fn test_serialization() {
        let config = ViewerConfig {
            pane_count: Some(4),
            interpolation: Interpolation::Smooth,
            ..ViewerConfig::default()
        };
        let json = config.to_json().unwrap();
        let restored = ViewerConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "select_box": { "width": 64, "height": 48 } }"#).unwrap();

        let config = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.select_box, SelectionBox { width: 64, height: 48 });

        std::fs::write(&path, "not json").unwrap();
        assert!(ViewerConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_zoom_settings_clamped() {
        let config = ViewerConfig {
            enlarge_ratio: 9.0,
            select_box: SelectionBox { width: 0, height: 50_000 },
            ..ViewerConfig::default()
        };
        let settings = config.zoom_settings();
        assert_eq!(settings.enlarge_ratio, 4.0);
        assert_eq!(settings.select_box, SelectionBox { width: 1, height: MAX_BOX_SIDE });
    }

    #[test]
    fn test_font_scales_with_screen() {
        let mut config = ViewerConfig::default();
        assert_eq!(UiMetrics::from_config(&config).font_size, 16.0);

        config.screen_height = Some(2160);
        assert_eq!(UiMetrics::from_config(&config).font_size, 32.0);

        config.screen_height = Some(400);
        assert_eq!(UiMetrics::from_config(&config).font_size, UiMetrics::MIN_FONT);
    }
}
