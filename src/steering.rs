/*
 * Steering Behaviors Module
 *
 * This module implements the five steering behaviors and their weighted
 * composition:
 * 1. Cohesion: steer towards the center of mass of in-view neighbors
 * 2. Separation: steer away from close neighbors, inverse-square weighted
 * 3. Alignment: match the average velocity of in-view neighbors
 * 4. Wander: smooth pseudo-random roaming via a jittered circle target
 * 5. Avoid: flee from predators inside the avoidance radius
 *
 * All behaviors are pure functions from the subject's state and a
 * pre-filtered neighbor list to an unweighted steering vector. Wander also
 * returns the updated circle target so the caller can persist it.
 */

use glam::{Mat3, Vec3};
use rand::Rng;

use crate::agent::{Agent, AgentKind};
use crate::config::Config;
use crate::world::Neighborhood;

/// Combined steering output for one agent for one tick.
pub struct Steering {
    /// Weighted sum of the behavior contributions, not yet clamped.
    pub acceleration: Vec3,
    /// Wander circle target to carry into the next tick.
    pub wander_target: Vec3,
}

/// Compose the behavior set for the agent's kind. Prey combine all five
/// behaviors as a weighted sum; predators roam on wander alone.
pub fn combine(
    subject: &Agent,
    neighborhood: &Neighborhood,
    config: &Config,
    dt: f32,
    rng: &mut impl Rng,
) -> Steering {
    let (wander_steer, wander_target) = wander(subject, config, dt, rng);

    let acceleration = match subject.kind {
        AgentKind::Prey => {
            config.weight_cohesion * cohesion(subject, &neighborhood.cohesion, config)
                + config.weight_separation
                    * separation(subject, &neighborhood.separation, config)
                + config.weight_alignment * alignment(subject, &neighborhood.alignment, config)
                + config.wander_weight * wander_steer
                + config.weight_avoid * avoid_enemies(subject, &neighborhood.predators, config)
        }
        AgentKind::Predator => config.wander_weight * wander_steer,
    };

    Steering {
        acceleration,
        wander_target,
    }
}

/// Steer towards the center of mass of the in-view neighbors. Neighbors
/// outside the field of view are left out of the average entirely.
pub fn cohesion(subject: &Agent, neighbors: &[&Agent], config: &Config) -> Vec3 {
    let mut center = Vec3::ZERO;
    let mut count = 0;

    for other in neighbors {
        if in_field_of_view(subject, other.position, config) {
            center += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }

    center /= count as f32;
    (center - subject.position).normalize_or_zero()
}

/// Steer away from each in-view neighbor, closer neighbors dominating via
/// inverse-square weighting.
pub fn separation(subject: &Agent, neighbors: &[&Agent], config: &Config) -> Vec3 {
    let mut steer = Vec3::ZERO;

    for other in neighbors {
        if !in_field_of_view(subject, other.position, config) {
            continue;
        }
        if let Some(push) = separation_contribution(subject.position, other.position) {
            steer += push;
        }
    }

    steer.normalize_or_zero()
}

// Inverse-square push away from a single neighbor. None when the neighbor
// is coincident with the subject: there is no direction to push along.
fn separation_contribution(subject: Vec3, other: Vec3) -> Option<Vec3> {
    let towards_me = subject - other;
    let distance = towards_me.length();
    if distance == 0.0 {
        return None;
    }
    Some(towards_me / distance / (distance * distance))
}

/// Match the direction and speed of the in-view neighbors: average their
/// velocities and keep the direction.
pub fn alignment(subject: &Agent, neighbors: &[&Agent], config: &Config) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for other in neighbors {
        if in_field_of_view(subject, other.position, config) {
            sum += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vec3::ZERO;
    }

    (sum / count as f32).normalize_or_zero()
}

/// Smooth roaming: perturb the carried unit-circle point with binomial
/// jitter in the local XZ plane, reproject it onto the unit circle, scale it
/// to the wander radius, push the circle `wander_distance` ahead of the
/// agent, and steer at the resulting world-space point.
///
/// Returns the steering vector and the updated unit-circle point; the
/// caller stores the point back on the agent so wander stays temporally
/// coherent instead of being per-frame noise.
pub fn wander(
    subject: &Agent,
    config: &Config,
    dt: f32,
    rng: &mut impl Rng,
) -> (Vec3, Vec3) {
    let jitter = config.wander_jitter * dt;

    let perturbed = subject.wander_target
        + Vec3::new(
            random_binomial(rng) * jitter,
            0.0,
            random_binomial(rng) * jitter,
        );

    // Reproject onto the unit circle
    let target = perturbed.try_normalize().unwrap_or(Vec3::Z);

    // Scale to the wander circle, position the circle in front of the
    // agent, then lift the target from the agent's local frame into world
    // space
    let local = target * config.wander_radius + Vec3::new(0.0, 0.0, config.wander_distance);
    let world = subject.position + heading_basis(subject.heading) * local;

    ((world - subject.position).normalize_or_zero(), target)
}

/// Flee from every predator in range. Zero vector when none are near.
pub fn avoid_enemies(subject: &Agent, predators: &[&Agent], config: &Config) -> Vec3 {
    if predators.is_empty() {
        return Vec3::ZERO;
    }

    let mut flee_sum = Vec3::ZERO;
    for predator in predators {
        flee_sum += flee(subject, predator.position, config);
    }

    flee_sum.normalize_or_zero()
}

// Desired-minus-current evasion steering away from `target`
fn flee(subject: &Agent, target: Vec3, config: &Config) -> Vec3 {
    let desired = (subject.position - target).normalize_or_zero() * config.max_velocity;
    desired - subject.velocity
}

/// Angular test against the forward perception cone: a point is in view iff
/// the angle between the subject's velocity and the offset to the point is
/// at most `max_field_of_view_angle` degrees.
///
/// Policy for the undefined cases: a subject with zero velocity has no
/// facing to measure against and treats every direction as in view, and a
/// point coincident with the subject is in view.
pub fn in_field_of_view(subject: &Agent, point: Vec3, config: &Config) -> bool {
    let to_point = point - subject.position;
    if subject.velocity == Vec3::ZERO || to_point == Vec3::ZERO {
        return true;
    }
    subject.velocity.angle_between(to_point).to_degrees() <= config.max_field_of_view_angle
}

/// Difference of two independent uniform draws on [0, 1]; zero-centered
/// jitter that favors small offsets.
pub(crate) fn random_binomial(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..=1.0) - rng.gen_range(0.0..=1.0)
}

// Orthonormal frame with the heading as the forward (+Z) axis and world +Y
// as the up reference; near-vertical headings fall back to +Z as the
// reference so the frame stays well-formed.
fn heading_basis(heading: Vec3) -> Mat3 {
    let forward = heading.try_normalize().unwrap_or(Vec3::Z);
    let reference = if forward.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    let right = reference.cross(forward).normalize();
    let up = forward.cross(right);
    Mat3::from_cols(right, up, forward)
}
