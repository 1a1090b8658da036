//! Style configuration for the particle flow layer.
//!
//! These knobs are handed to the external animation engine untouched; this
//! module only defines the schema, defaults, and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WindError, WindResult};

/// Style bundle for the velocity layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityStyle {
    /// Velocity at the low end of the color scale (m/s)
    #[serde(default)]
    pub min_velocity: f64,

    /// Velocity at the high end of the color scale (m/s)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,

    /// Scale factor applied to particle motion
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,

    /// Frames a particle lives before being recycled
    #[serde(default = "default_particle_age")]
    pub particle_age: u32,

    /// Particle count as a fraction of the canvas area
    #[serde(default = "default_particle_multiplier")]
    pub particle_multiplier: f64,

    /// Stroke width of particle trails in pixels
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Color scale breakpoints from min to max velocity
    #[serde(default = "default_color_scale")]
    pub color_scale: Vec<String>,

    /// Show the speed readout under the cursor
    #[serde(default = "default_display_values")]
    pub display_values: bool,

    /// Unit label for the speed readout
    #[serde(default = "default_speed_unit")]
    pub speed_unit: String,
}

fn default_max_velocity() -> f64 {
    15.0
}

fn default_velocity_scale() -> f64 {
    0.005
}

fn default_particle_age() -> u32 {
    90
}

fn default_particle_multiplier() -> f64 {
    1.0 / 300.0
}

fn default_line_width() -> f64 {
    1.0
}

fn default_color_scale() -> Vec<String> {
    [
        "rgb(36,104,180)",
        "rgb(60,157,194)",
        "rgb(128,205,193)",
        "rgb(151,218,168)",
        "rgb(198,231,181)",
        "rgb(238,247,217)",
        "rgb(255,238,159)",
        "rgb(252,217,125)",
        "rgb(255,182,100)",
        "rgb(252,150,75)",
        "rgb(250,112,52)",
        "rgb(245,64,32)",
        "rgb(237,45,28)",
        "rgb(220,24,32)",
        "rgb(180,0,35)",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_display_values() -> bool {
    true
}

fn default_speed_unit() -> String {
    "m/s".to_string()
}

impl Default for VelocityStyle {
    fn default() -> Self {
        Self {
            min_velocity: 0.0,
            max_velocity: default_max_velocity(),
            velocity_scale: default_velocity_scale(),
            particle_age: default_particle_age(),
            particle_multiplier: default_particle_multiplier(),
            line_width: default_line_width(),
            color_scale: default_color_scale(),
            display_values: default_display_values(),
            speed_unit: default_speed_unit(),
        }
    }
}

impl VelocityStyle {
    /// Load a style bundle from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> WindResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WindError::InvalidStyle(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse a style bundle from a JSON string.
    pub fn from_json(json: &str) -> WindResult<Self> {
        let style: VelocityStyle =
            serde_json::from_str(json).map_err(|e| WindError::InvalidStyle(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Reject configurations the animation engine cannot render.
    pub fn validate(&self) -> WindResult<()> {
        if self.max_velocity <= self.min_velocity {
            return Err(WindError::InvalidStyle(format!(
                "max_velocity ({}) must exceed min_velocity ({})",
                self.max_velocity, self.min_velocity
            )));
        }
        if self.particle_age == 0 {
            return Err(WindError::InvalidStyle(
                "particle_age must be positive".to_string(),
            ));
        }
        if self.particle_multiplier <= 0.0 {
            return Err(WindError::InvalidStyle(
                "particle_multiplier must be positive".to_string(),
            ));
        }
        if self.line_width <= 0.0 {
            return Err(WindError::InvalidStyle(
                "line_width must be positive".to_string(),
            ));
        }
        if self.color_scale.is_empty() {
            return Err(WindError::InvalidStyle(
                "color_scale must contain at least one color".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_validates() {
        assert!(VelocityStyle::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let style = VelocityStyle::from_json(r#"{"max_velocity": 25.0}"#).unwrap();
        assert_eq!(style.max_velocity, 25.0);
        assert_eq!(style.particle_age, 90);
        assert_eq!(style.color_scale.len(), 15);
        assert_eq!(style.speed_unit, "m/s");
    }

    #[test]
    fn test_inverted_velocity_bounds_rejected() {
        let result = VelocityStyle::from_json(r#"{"min_velocity": 20.0, "max_velocity": 10.0}"#);
        assert!(matches!(result, Err(WindError::InvalidStyle(_))));
    }

    #[test]
    fn test_empty_color_scale_rejected() {
        let result = VelocityStyle::from_json(r#"{"color_scale": []}"#);
        assert!(matches!(result, Err(WindError::InvalidStyle(_))));
    }

    #[test]
    fn test_zero_particle_age_rejected() {
        let result = VelocityStyle::from_json(r#"{"particle_age": 0}"#);
        assert!(matches!(result, Err(WindError::InvalidStyle(_))));
    }
}
