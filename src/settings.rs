//! Viewer Settings
//!
//! Tunable constants for motion, asset resolution and the camera. Every
//! section implements [`Default`] with the values the viewer ships with, and
//! every field is optional when loading from JSON.
//!
//! ```rust,ignore
//! let settings = ViewerSettings::from_json_str(r#"{ "motion": { "speed": 250.0 } }"#)?;
//! assert_eq!(settings.motion.jump_speed, 1000.0);
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Top-level configuration for a viewer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Window title used by the application runner.
    pub title: String,
    pub motion: MotionSettings,
    pub assets: AssetSettings,
    pub camera: CameraSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "Marionette".to_string(),
            motion: MotionSettings::default(),
            assets: AssetSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl ViewerSettings {
    /// Parses settings from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded viewer settings from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let motion = &self.motion;
        if !(motion.speed.is_finite() && motion.speed >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "motion.speed must be a non-negative number, got {}",
                motion.speed
            )));
        }
        if !(motion.jump_speed.is_finite() && motion.jump_speed >= 0.0) {
            return Err(Error::InvalidSettings(format!(
                "motion.jump_speed must be a non-negative number, got {}",
                motion.jump_speed
            )));
        }
        if !(motion.gravity.is_finite() && motion.gravity > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "motion.gravity must be positive, got {}",
                motion.gravity
            )));
        }
        if !self.assets.catalog.contains(&self.assets.initial) {
            return Err(Error::InvalidSettings(format!(
                "initial asset '{}' is not in the catalog",
                self.assets.initial
            )));
        }
        Ok(())
    }
}

/// Horizontal speed and jump arc constants, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Units per second while a direction key is held.
    pub speed: f32,
    /// Initial upward velocity of a jump, units per second.
    pub jump_speed: f32,
    /// Downward acceleration while airborne, units per second squared.
    pub gravity: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            speed: 100.0,
            jump_speed: 1000.0,
            gravity: 3000.0,
        }
    }
}

/// Where packaged actors live and which of them the panel offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory that asset names are resolved against.
    pub base_path: PathBuf,
    /// File extension appended to asset names, without the dot.
    pub extension: String,
    /// Names selectable from the control panel.
    pub catalog: Vec<String>,
    /// Asset loaded at startup.
    pub initial: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("models"),
            extension: "glb".to_string(),
            catalog: vec!["Walking".to_string(), "Jump".to_string()],
            initial: "Walking".to_string(),
        }
    }
}

impl AssetSettings {
    /// Relative URI of a named asset: `<name>.<extension>`.
    #[must_use]
    pub fn uri_for(&self, name: &str) -> String {
        format!("{name}.{}", self.extension)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.catalog.iter().any(|entry| entry == name)
    }
}

/// Perspective camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 1.0,
            far: 2000.0,
            position: Vec3::new(100.0, 200.0, 300.0),
            target: Vec3::new(0.0, 100.0, 0.0),
        }
    }
}
