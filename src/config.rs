//! Tunables for the XR core and gallery mounting.
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Controller and picking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrConfig {
    /// Visual length of the laser line in world units
    pub laser_length: f32,
    /// Laser tint while the trigger is released (0xRRGGBB)
    pub idle_color: u32,
    /// Laser tint while the trigger is held (0xRRGGBB)
    pub pressed_color: u32,
    /// Picking range; `None` picks at any distance
    pub max_ray_distance: Option<f32>,
}

impl Default for XrConfig {
    fn default() -> Self {
        Self {
            laser_length: 10.0,
            idle_color: 0x00ff00,
            pressed_color: 0xff00ff,
            max_ray_distance: None,
        }
    }
}

/// Room dimensions and panel placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub room_size: f32,
    pub panels_per_wall: usize,
    /// Height of panel centers above the floor
    pub panel_height: f32,
    /// Gap between a wall plane and the panels hung on it
    pub wall_inset: f32,
    /// Width, height and depth of the invisible pick box
    pub hitbox_size: [f32; 3],
    /// Pick box offset in front of the panel plane
    pub hitbox_offset: f32,
    /// How far the info panel floats from its artwork toward the room center
    pub info_panel_distance: f32,
    /// How far the info panel sits below its artwork
    pub info_panel_drop: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            room_size: 20.0,
            panels_per_wall: 4,
            panel_height: 5.0,
            wall_inset: 0.3,
            hitbox_size: [2.0, 2.6, 0.1],
            hitbox_offset: 0.11,
            info_panel_distance: 3.0,
            info_panel_drop: 0.5,
        }
    }
}

impl GalleryConfig {
    pub fn hitbox_size(&self) -> Vec3 {
        Vec3::from_array(self.hitbox_size)
    }

    /// Distance between neighbouring panel centers on one wall
    pub fn spacing(&self) -> f32 {
        self.room_size / (self.panels_per_wall + 1) as f32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub xr: XrConfig,
    pub gallery: GalleryConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.xr.laser_length) {
            return Err(ConfigError::Invalid(format!(
                "xr.laser_length must be positive, got {}",
                self.xr.laser_length
            )));
        }
        if let Some(max) = self.xr.max_ray_distance {
            if !is_positive(max) {
                return Err(ConfigError::Invalid(format!(
                    "xr.max_ray_distance must be positive, got {}",
                    max
                )));
            }
        }
        if !is_positive(self.gallery.room_size) {
            return Err(ConfigError::Invalid(format!(
                "gallery.room_size must be positive, got {}",
                self.gallery.room_size
            )));
        }
        if self.gallery.panels_per_wall == 0 {
            return Err(ConfigError::Invalid("gallery.panels_per_wall must be at least 1".into()));
        }
        if self.gallery.hitbox_size.iter().any(|v| !is_positive(*v)) {
            return Err(ConfigError::Invalid(format!(
                "gallery.hitbox_size must be positive, got {:?}",
                self.gallery.hitbox_size
            )));
        }
        Ok(())
    }
}

/// Finite and strictly greater than zero
fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
