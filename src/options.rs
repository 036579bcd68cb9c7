// options.rs — immutable view configuration (tessellation, zoom bounds, inertia)

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Longitude segments of the sphere strip.
    pub h_div: u32,
    /// Latitude segments of the sphere strip.
    pub v_div: u32,
    pub z_min: f32,
    pub z_max: f32,
    /// Per-tick velocity attenuation while coasting, in (0, 1).
    pub att: f32,
    /// Pseudo-perspective strength; also scales drag sensitivity by `1 + p_rate`.
    pub p_rate: f32,
    pub sensitivity: f32,
    /// Upper bound for the panorama texture width; height is half of it.
    pub max_texture_size: u32,
    /// Velocity `(vx, vy, vz)` the camera starts with, in pixels per millisecond.
    pub initial_velocity: [f32; 3],
    /// RGB of the 1x1 texture shown until the panorama has loaded.
    pub placeholder_color: [u8; 3],
}

impl Default for ViewOptions {
    fn default() -> Self {
        let h_div = 32;
        Self {
            h_div,
            v_div: h_div * 2,
            z_min: -5.0,
            z_max: 5.0,
            att: 0.98,
            p_rate: 1.0,
            sensitivity: 1.0,
            max_texture_size: 4096,
            initial_velocity: [0.0, 0.0, 0.0],
            placeholder_color: [63, 63, 63],
        }
    }
}

impl ViewOptions {
    /// Multiplier applied to every pointer delta before it becomes rotation or zoom.
    pub fn rate(&self) -> f32 {
        self.sensitivity * (1.0 + self.p_rate)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options: ViewOptions = serde_json::from_str(&text)?;
        options.validate()?;
        log::info!("loaded view options from {}", path.display());
        Ok(options)
    }

    /// Check every range, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.h_div < 1 {
            errors.push(format!("h_div must be >= 1 (got {})", self.h_div));
        }
        if self.v_div < 1 {
            errors.push(format!("v_div must be >= 1 (got {})", self.v_div));
        }
        if !(self.z_min <= self.z_max) {
            errors.push(format!(
                "z_min must not exceed z_max (got {} > {})",
                self.z_min, self.z_max
            ));
        }
        if !(self.att > 0.0 && self.att < 1.0) {
            errors.push(format!("att must be in (0, 1) (got {})", self.att));
        }
        if !(self.p_rate >= 0.0) {
            errors.push(format!("p_rate must be >= 0 (got {})", self.p_rate));
        }
        if !(self.sensitivity > 0.0) {
            errors.push(format!("sensitivity must be > 0 (got {})", self.sensitivity));
        }
        if self.max_texture_size < 2 {
            errors.push(format!(
                "max_texture_size must be >= 2 (got {})",
                self.max_texture_size
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
