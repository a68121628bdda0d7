//! Tunables for every effect on the page
//!
//! Defaults reproduce the stock Studio Nivo look. A page (or the replay CLI)
//! may override any subset of fields with a JSON object; missing fields keep
//! their defaults and unknown fields are rejected.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::FxError;

/// Full effect configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxConfig {
    pub theme: ThemeConfig,
    pub reveal: RevealConfig,
    pub skills: SkillsConfig,
    pub navbar: NavbarConfig,
    pub blobs: BlobConfig,
    pub hero: HeroConfig,
}

impl FxConfig {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, FxError> {
        let config: Self = serde_json::from_str(json)?;
        debug!(?config, "Parsed effect config");
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Theme persistence and the toggle icon spin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key in the preference store
    pub storage_key: String,
    /// How long the toggle icon stays rotated before resetting
    pub spin_ms: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            spin_ms: 300,
        }
    }
}

/// Section fade-in on first visibility
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub offset_px: f64,
    pub duration_s: f64,
    /// Visible fraction that counts as "in view"
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            offset_px: 30.0,
            duration_s: 0.8,
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
        }
    }
}

/// Staggered skill-tag reveal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillsConfig {
    pub offset_px: f64,
    pub duration_s: f64,
    /// Extra delay per tag position
    pub stagger_s: f64,
    pub threshold: f64,
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            offset_px: 20.0,
            duration_s: 0.5,
            stagger_s: 0.1,
            threshold: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavbarConfig {
    /// Scrolling down past this offset hides the navbar
    pub hide_after_px: f64,
    pub shadow: String,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            hide_after_px: 100.0,
            shadow: "0 2px 20px var(--shadow)".to_string(),
        }
    }
}

/// Decorative blob animator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlobConfig {
    pub repulsion_radius: f64,
    pub repulsion_damping: f64,
    pub pulse_radius: f64,
    pub pulse_scale: f64,
    pub pulse_ms: u32,
    pub pulse_easing: String,
    pub foreground_rate: f64,
    pub mid_rate: f64,
    pub background_rate: f64,
    /// Parallax stops updating past this many viewport heights
    pub parallax_viewports: f64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            repulsion_radius: 120.0,
            repulsion_damping: 0.3,
            pulse_radius: 200.0,
            pulse_scale: 1.08,
            pulse_ms: 340,
            pulse_easing: "cubic-bezier(.22,.9,.35,1)".to_string(),
            foreground_rate: 0.12,
            mid_rate: 0.08,
            background_rate: -0.06,
            parallax_viewports: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    pub rate: f64,
    /// Scroll distance over which the hero fades out completely
    pub fade_px: f64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            rate: 0.3,
            fade_px: 600.0,
        }
    }
}
