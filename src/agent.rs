/*
 * Agent Module
 *
 * This module defines the Agent struct shared by prey and predators.
 * An agent carries its observable pose (position, velocity, acceleration,
 * heading) plus the private wander state that keeps wander motion
 * temporally coherent across ticks. The per-tick integration step lives
 * here: clamp acceleration, integrate velocity and position, wrap the
 * world bounds, update the heading.
 */

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Stable identity for an agent. Ids are handed out sequentially by the
/// world so a seeded run is reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Prey flock with the full behavior set, or predator restricted to wander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    Prey,
    Predator,
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Steering output of the last tick, after clamping. Recomputed fresh
    /// every tick, never carried over.
    pub acceleration: Vec3,
    /// Unit direction the agent faces. Follows the velocity whenever the
    /// velocity is nonzero, otherwise keeps its previous value.
    pub heading: Vec3,
    /// Last wander target on the local unit circle. Scaled by the wander
    /// radius only when the behavior uses it.
    pub(crate) wander_target: Vec3,
}

impl Agent {
    /// Create an agent at rest at `position`, facing `+Z`.
    pub fn new(id: AgentId, kind: AgentKind, position: Vec3) -> Self {
        Self {
            id,
            kind,
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            heading: Vec3::Z,
            // Start straight ahead on the unit circle; the first tick's
            // jitter perturbs it from there.
            wander_target: Vec3::Z,
        }
    }

    /// Advance this agent by one tick given the combined steering output.
    ///
    /// Clamps the acceleration magnitude, integrates velocity (clamped) and
    /// position, wraps each coordinate into the world cube, and re-derives
    /// the heading from the velocity.
    pub fn integrate(&mut self, acceleration: Vec3, dt: f32, config: &Config) {
        // Never exceed the max values; direction is preserved
        self.acceleration = acceleration.clamp_length_max(config.max_acceleration);

        self.velocity = (self.velocity + self.acceleration * dt).clamp_length_max(config.max_velocity);

        self.position += self.velocity * dt;

        // Wrap around if out of bounds
        self.wrap_around(-config.half_bound(), config.half_bound());

        if let Some(direction) = self.velocity.try_normalize() {
            self.heading = direction;
        }
    }

    // Keep the agent inside the world cube, donut-style: leaving through one
    // face teleports to the opposite face. Each coordinate wraps
    // independently.
    fn wrap_around(&mut self, min: f32, max: f32) {
        self.position.x = wrap_component(self.position.x, min, max);
        self.position.y = wrap_component(self.position.y, min, max);
        self.position.z = wrap_component(self.position.z, min, max);
    }
}

/// Hard teleport at the boundary: above `max` jumps to `min`, below `min`
/// jumps to `max`, values inside the range pass through untouched.
pub fn wrap_component(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        min
    } else if value < min {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_agent(position: Vec3) -> Agent {
        Agent::new(AgentId(0), AgentKind::Prey, position)
    }

    #[test]
    fn wrap_is_boundary_exact() {
        let eps = 0.001;
        assert_eq!(wrap_component(50.0 + eps, -50.0, 50.0), -50.0);
        assert_eq!(wrap_component(-50.0 - eps, -50.0, 50.0), 50.0);
        // Values inside the range, including the bounds themselves, pass through
        assert_eq!(wrap_component(50.0, -50.0, 50.0), 50.0);
        assert_eq!(wrap_component(-50.0, -50.0, 50.0), -50.0);
        assert_eq!(wrap_component(12.5, -50.0, 50.0), 12.5);
    }

    #[test]
    fn wrap_is_idempotent() {
        for v in [-73.0, -50.0, -12.0, 0.0, 49.9, 50.0, 61.0] {
            let once = wrap_component(v, -50.0, 50.0);
            assert_eq!(wrap_component(once, -50.0, 50.0), once);
        }
    }

    #[test]
    fn integrate_clamps_acceleration_and_velocity() {
        let config = Config::default();
        let mut agent = test_agent(Vec3::ZERO);
        agent.integrate(Vec3::X * 1.0e4, 1.0, &config);

        assert!(agent.acceleration.length() <= config.max_acceleration + 1.0e-4);
        assert!(agent.velocity.length() <= config.max_velocity + 1.0e-4);
        // Direction survives the clamp
        assert!(agent.acceleration.x > 0.0);
    }

    #[test]
    fn integrate_wraps_position() {
        let config = Config::default();
        let mut agent = test_agent(Vec3::new(config.half_bound() - 0.01, 0.0, 0.0));
        // Push hard along +X for several ticks until the boundary is crossed
        for _ in 0..10 {
            agent.integrate(Vec3::X * config.max_acceleration, 0.5, &config);
        }
        let half = config.half_bound();
        assert!(agent.position.x >= -half && agent.position.x <= half);
    }

    #[test]
    fn heading_follows_velocity() {
        let config = Config::default();
        let mut agent = test_agent(Vec3::ZERO);
        agent.integrate(Vec3::new(3.0, 0.0, 0.0), 1.0, &config);
        assert!((agent.heading - Vec3::X).length() < 1.0e-6);
    }

    #[test]
    fn heading_unchanged_at_zero_velocity() {
        let config = Config::default();
        let mut agent = test_agent(Vec3::ZERO);
        agent.heading = Vec3::X;
        agent.integrate(Vec3::ZERO, 1.0, &config);
        assert_eq!(agent.heading, Vec3::X);
    }

    #[test]
    fn new_agent_is_at_rest() {
        let agent = test_agent(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(agent.velocity, Vec3::ZERO);
        assert_eq!(agent.acceleration, Vec3::ZERO);
        assert_eq!(agent.heading, Vec3::Z);
    }
}
