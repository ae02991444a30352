use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::Theme;
use crate::merge::MergePolicy;
use crate::render::badge::BadgeStyle;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "gutter.toml";

/// Top-level gutter configuration, matching `gutter.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GutterConfig {
    #[serde(default)]
    pub merge: MergeSection,
    #[serde(default)]
    pub badge: BadgeSection,
    #[serde(default)]
    pub markers: MarkersSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSection {
    #[serde(default)]
    pub policy: MergePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeSection {
    pub padding: u32,
    pub corner_radius: u32,
    /// Point size of the label font; the editor font is not consulted.
    pub font_size: u32,
    pub spacer_width: u32,
    pub theme: Theme,
}

impl Default for BadgeSection {
    fn default() -> Self {
        let style = BadgeStyle::default();
        Self {
            padding: style.padding,
            corner_radius: style.corner_radius,
            font_size: style.font_size,
            spacer_width: style.spacer_width,
            theme: Theme::Light,
        }
    }
}

impl BadgeSection {
    pub fn style(&self) -> BadgeStyle {
        BadgeStyle {
            padding: self.padding,
            corner_radius: self.corner_radius,
            font_size: self.font_size,
            spacer_width: self.spacer_width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersSection {
    /// Markers scoring at or below this are not shown. A straight-line
    /// method scores 1 under both cyclomatic and NPath.
    pub suppress_at_or_below: u64,
}

impl Default for MarkersSection {
    fn default() -> Self {
        Self {
            suppress_at_or_below: 1,
        }
    }
}

impl GutterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.badge.font_size == 0 {
            return Err(ConfigError::Invalid(
                "badge.font_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
