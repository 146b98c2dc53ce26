/*
 * World Module
 *
 * This module defines the SpatialWorld struct that owns the authoritative
 * agent collection and answers radius-bounded neighbor queries. The
 * reference query path is an O(n) linear scan; the uniform spatial grid
 * can narrow the candidate set, and both paths apply the same exact
 * distance filter so they always agree. Spawning of the initial flock
 * also lives here.
 */

use glam::Vec3;
use rand::Rng;
use tracing::info;

use crate::agent::{Agent, AgentId, AgentKind};
use crate::config::Config;
use crate::spatial_grid::SpatialGrid;

/// Owns the live set of prey and predators. All mutation happens through
/// the Simulator's per-tick pass.
#[derive(Debug, Default)]
pub struct SpatialWorld {
    agents: Vec<Agent>,
    next_id: u32,
}

impl SpatialWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent at rest at `position` and return its id.
    pub fn spawn(&mut self, kind: AgentKind, position: Vec3) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.push(Agent::new(id, kind, position));
        id
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agent_mut(&mut self, index: usize) -> &mut Agent {
        &mut self.agents[index]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    /// Every flock member (prey) other than the subject whose distance to
    /// the subject is strictly less than `radius`. Order is unspecified.
    pub fn neighbors(&self, subject: &Agent, radius: f32) -> Vec<&Agent> {
        flock_within(self.agents.iter(), subject, radius)
    }

    /// Every predator within strict `radius` of the subject. The subject is
    /// excluded by id, so a predator never sees itself.
    pub fn predators_near(&self, subject: &Agent, radius: f32) -> Vec<&Agent> {
        predators_within(self.agents.iter(), subject, radius)
    }
}

fn flock_within<'a>(
    pool: impl IntoIterator<Item = &'a Agent>,
    subject: &Agent,
    radius: f32,
) -> Vec<&'a Agent> {
    pool.into_iter()
        .filter(|other| other.kind == AgentKind::Prey && other.id != subject.id)
        .filter(|other| subject.position.distance(other.position) < radius)
        .collect()
}

fn predators_within<'a>(
    pool: impl IntoIterator<Item = &'a Agent>,
    subject: &Agent,
    radius: f32,
) -> Vec<&'a Agent> {
    pool.into_iter()
        .filter(|other| other.kind == AgentKind::Predator && other.id != subject.id)
        .filter(|other| subject.position.distance(other.position) < radius)
        .collect()
}

/// The pre-filtered neighbor lists one agent needs for a single tick, one
/// list per behavior radius.
pub struct Neighborhood<'a> {
    pub cohesion: Vec<&'a Agent>,
    pub separation: Vec<&'a Agent>,
    pub alignment: Vec<&'a Agent>,
    pub predators: Vec<&'a Agent>,
}

impl<'a> Neighborhood<'a> {
    /// Gather all four lists for `subject` against `agents`, which may be
    /// the live collection or a tick-start snapshot. With a grid, agents
    /// are drawn from the candidate cells first; the exact radius filter is
    /// identical either way.
    pub fn gather(
        agents: &'a [Agent],
        grid: Option<&SpatialGrid>,
        subject: &Agent,
        config: &Config,
    ) -> Self {
        match grid {
            None => Self {
                cohesion: flock_within(agents, subject, config.radius_cohesion),
                separation: flock_within(agents, subject, config.radius_separation),
                alignment: flock_within(agents, subject, config.radius_alignment),
                predators: predators_within(agents, subject, config.radius_avoid),
            },
            Some(grid) => {
                let mut candidates = grid.candidates(subject.position, config.max_radius());
                // Index order keeps float accumulation order identical to the
                // linear scan, so both paths produce the same bits
                candidates.sort_unstable();
                let pool: Vec<&Agent> = candidates.into_iter().map(|index| &agents[index]).collect();
                Self {
                    cohesion: flock_within(pool.iter().copied(), subject, config.radius_cohesion),
                    separation: flock_within(
                        pool.iter().copied(),
                        subject,
                        config.radius_separation,
                    ),
                    alignment: flock_within(pool.iter().copied(), subject, config.radius_alignment),
                    predators: predators_within(
                        pool.iter().copied(),
                        subject,
                        config.radius_avoid,
                    ),
                }
            }
        }
    }
}

/// Place the initial population: `n_prey` prey and `n_predators` predators,
/// uniformly sampled in the horizontal plane within the world bounds, at
/// rest.
pub fn spawn_flock(
    world: &mut SpatialWorld,
    config: &Config,
    n_prey: usize,
    n_predators: usize,
    rng: &mut impl Rng,
) {
    let half = config.half_bound();
    for _ in 0..n_prey {
        world.spawn(AgentKind::Prey, ground_position(half, rng));
    }
    for _ in 0..n_predators {
        world.spawn(AgentKind::Predator, ground_position(half, rng));
    }

    info!(prey = n_prey, predators = n_predators, "spawned flock");
}

// Uniform sample in the horizontal plane, matching the demo spawn policy
fn ground_position(half: f32, rng: &mut impl Rng) -> Vec3 {
    Vec3::new(rng.gen_range(-half..half), 0.0, rng.gen_range(-half..half))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_with(positions: &[(AgentKind, Vec3)]) -> SpatialWorld {
        let mut world = SpatialWorld::new();
        for &(kind, position) in positions {
            world.spawn(kind, position);
        }
        world
    }

    #[test]
    fn neighbors_excludes_subject_and_respects_strict_radius() {
        let world = world_with(&[
            (AgentKind::Prey, Vec3::ZERO),
            (AgentKind::Prey, Vec3::new(3.0, 0.0, 0.0)),
            (AgentKind::Prey, Vec3::new(5.0, 0.0, 0.0)),
            (AgentKind::Prey, Vec3::new(7.0, 0.0, 0.0)),
        ]);
        let subject = &world.agents()[0];

        // Strictly-less-than: the agent at exactly 5.0 does not qualify
        let found = world.neighbors(subject, 5.0);
        let ids: Vec<AgentId> = found.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![AgentId(1)]);
    }

    #[test]
    fn neighbors_returns_flock_members_only() {
        let world = world_with(&[
            (AgentKind::Prey, Vec3::ZERO),
            (AgentKind::Predator, Vec3::new(1.0, 0.0, 0.0)),
            (AgentKind::Prey, Vec3::new(2.0, 0.0, 0.0)),
        ]);
        let subject = &world.agents()[0];

        let found = world.neighbors(subject, 10.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, AgentKind::Prey);
    }

    #[test]
    fn predators_near_excludes_the_querying_predator() {
        let world = world_with(&[
            (AgentKind::Predator, Vec3::ZERO),
            (AgentKind::Predator, Vec3::new(1.0, 0.0, 0.0)),
            (AgentKind::Prey, Vec3::new(1.0, 0.0, 0.0)),
        ]);
        let subject = &world.agents()[0];

        let found = world.predators_near(subject, 10.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, AgentId(1));
    }

    #[test]
    fn spawn_flock_places_agents_at_rest_in_plane() {
        let config = Config::default();
        let mut world = SpatialWorld::new();
        let mut rng = StdRng::seed_from_u64(7);
        spawn_flock(&mut world, &config, 30, 4, &mut rng);

        assert_eq!(world.len(), 34);
        let predators = world
            .agents()
            .iter()
            .filter(|a| a.kind == AgentKind::Predator)
            .count();
        assert_eq!(predators, 4);

        let half = config.half_bound();
        for agent in world.agents() {
            assert_eq!(agent.velocity, Vec3::ZERO);
            assert_eq!(agent.position.y, 0.0);
            assert!(agent.position.x >= -half && agent.position.x < half);
            assert!(agent.position.z >= -half && agent.position.z < half);
        }
    }

    #[test]
    fn gather_with_grid_matches_linear_scan() {
        let config = Config::default();
        let mut world = SpatialWorld::new();
        let mut rng = StdRng::seed_from_u64(99);
        spawn_flock(&mut world, &config, 120, 8, &mut rng);

        let mut grid = SpatialGrid::new(config.max_radius(), config.max_bound);
        let positions: Vec<Vec3> = world.agents().iter().map(|a| a.position).collect();
        grid.rebuild(&positions);

        for subject in world.agents() {
            let linear = Neighborhood::gather(world.agents(), None, subject, &config);
            let gridded = Neighborhood::gather(world.agents(), Some(&grid), subject, &config);

            let ids = |list: &[&Agent]| {
                let mut v: Vec<AgentId> = list.iter().map(|a| a.id).collect();
                v.sort_unstable();
                v
            };
            assert_eq!(ids(&linear.cohesion), ids(&gridded.cohesion));
            assert_eq!(ids(&linear.separation), ids(&gridded.separation));
            assert_eq!(ids(&linear.alignment), ids(&gridded.alignment));
            assert_eq!(ids(&linear.predators), ids(&gridded.predators));
        }
    }
}
