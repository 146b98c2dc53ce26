/*
 * Simulation Configuration Module
 *
 * This module defines the Config struct that contains all the tunable
 * parameters for the flocking simulation: perception radii, behavior
 * weights, wander parameters, clamps and world bounds. A Config is
 * immutable for the duration of a run; the Simulator validates it once
 * at construction and rejects out-of-domain values.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`Config::validate`]. Construction of a
/// [`Simulator`](crate::Simulator) fails fast on the first violation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and non-negative, got {value}")]
    OutOfDomain { name: &'static str, value: f32 },
    #[error("max_bound must be finite and positive, got {0}")]
    NonPositiveBound(f32),
}

// Parameters for the simulation, fixed per run
// A config file must spell out every parameter; a missing or unknown field
// is a hard deserialization error, not a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub radius_cohesion: f32,
    pub radius_separation: f32,
    pub radius_alignment: f32,
    pub radius_avoid: f32,

    pub weight_cohesion: f32,
    pub weight_separation: f32,
    pub weight_alignment: f32,
    pub weight_avoid: f32,

    // Wander behavior
    pub wander_weight: f32,
    pub wander_radius: f32,
    pub wander_jitter: f32,
    pub wander_distance: f32,

    pub max_acceleration: f32,
    pub max_velocity: f32,

    /// Edge length of the world cube; each coordinate wraps inside
    /// `[-max_bound / 2, max_bound / 2]`.
    pub max_bound: f32,

    /// Half-angle of the forward perception cone, in degrees.
    pub max_field_of_view_angle: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius_cohesion: 10.0,
            radius_separation: 5.0,
            radius_alignment: 10.0,
            radius_avoid: 20.0,
            weight_cohesion: 1.0,
            weight_separation: 1.5,
            weight_alignment: 1.0,
            weight_avoid: 2.0,
            wander_weight: 1.0,
            wander_radius: 2.0,
            wander_jitter: 16.0,
            wander_distance: 4.0,
            max_acceleration: 6.0,
            max_velocity: 8.0,
            max_bound: 100.0,
            max_field_of_view_angle: 90.0,
        }
    }
}

impl Config {
    /// Check every parameter against its domain: radii, weights, clamps and
    /// the FOV angle must be finite and non-negative, `max_bound` strictly
    /// positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("radius_cohesion", self.radius_cohesion),
            ("radius_separation", self.radius_separation),
            ("radius_alignment", self.radius_alignment),
            ("radius_avoid", self.radius_avoid),
            ("weight_cohesion", self.weight_cohesion),
            ("weight_separation", self.weight_separation),
            ("weight_alignment", self.weight_alignment),
            ("weight_avoid", self.weight_avoid),
            ("wander_weight", self.wander_weight),
            ("wander_radius", self.wander_radius),
            ("wander_jitter", self.wander_jitter),
            ("wander_distance", self.wander_distance),
            ("max_acceleration", self.max_acceleration),
            ("max_velocity", self.max_velocity),
            ("max_field_of_view_angle", self.max_field_of_view_angle),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfDomain { name, value });
            }
        }

        if !self.max_bound.is_finite() || self.max_bound <= 0.0 {
            return Err(ConfigError::NonPositiveBound(self.max_bound));
        }

        Ok(())
    }

    /// Half the world edge; positions live in `[-half_bound(), half_bound()]`.
    pub fn half_bound(&self) -> f32 {
        self.max_bound / 2.0
    }

    /// Largest perception radius across all behaviors. Used to size the
    /// spatial grid cells.
    pub fn max_radius(&self) -> f32 {
        self.radius_cohesion
            .max(self.radius_separation)
            .max(self.radius_alignment)
            .max(self.radius_avoid)
    }
}
