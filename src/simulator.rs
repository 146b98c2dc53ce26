/*
 * Simulator Module
 *
 * This module drives the per-tick update: gather each agent's neighborhood,
 * combine the steering behaviors into one acceleration, then clamp,
 * integrate, wrap and re-head every agent. The default update mode
 * snapshots all agent state at tick start so neighbor queries are
 * independent of iteration order; the sequential mode reads the live,
 * partially updated collection and is kept as an explicit opt-in.
 */

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::agent::Agent;
use crate::config::{Config, ConfigError};
use crate::spatial_grid::SpatialGrid;
use crate::steering;
use crate::world::{Neighborhood, SpatialWorld};

/// Which state neighbor queries observe during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Compute-all-then-apply-all: queries read a tick-start snapshot, so
    /// results do not depend on agent iteration order.
    #[default]
    Simultaneous,
    /// Queries read the live collection; agents processed earlier in the
    /// tick are observed at their already-updated poses. Order-dependent.
    Sequential,
}

pub struct Simulator {
    config: Config,
    mode: UpdateMode,
    rng: StdRng,
    grid: Option<SpatialGrid>,
    tick_count: u64,
}

impl Simulator {
    /// Validate the config and build a simulator with a seeded RNG. An
    /// out-of-domain parameter aborts construction.
    pub fn new(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            mode: UpdateMode::default(),
            rng: StdRng::seed_from_u64(seed),
            grid: None,
            tick_count: 0,
        })
    }

    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable the uniform-grid fast path for neighbor queries. The grid is
    /// only consulted in simultaneous mode; sequential mode always scans
    /// the live collection so its ordering semantics stay exact.
    pub fn with_spatial_grid(mut self) -> Self {
        self.grid = Some(SpatialGrid::new(
            self.config.max_radius(),
            self.config.max_bound,
        ));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    /// Advance the whole world by `dt` seconds, updating every agent
    /// exactly once.
    pub fn tick(&mut self, world: &mut SpatialWorld, dt: f32) {
        match self.mode {
            UpdateMode::Simultaneous => self.tick_simultaneous(world, dt),
            UpdateMode::Sequential => self.tick_sequential(world, dt),
        }
        self.tick_count += 1;
        trace!(tick = self.tick_count, agents = world.len(), "tick complete");
    }

    fn tick_simultaneous(&mut self, world: &mut SpatialWorld, dt: f32) {
        let snapshot: Vec<Agent> = world.agents().to_vec();

        if let Some(grid) = self.grid.as_mut() {
            let positions: Vec<Vec3> = snapshot.iter().map(|agent| agent.position).collect();
            grid.rebuild(&positions);
        }

        for index in 0..snapshot.len() {
            let subject = &snapshot[index];
            let neighborhood =
                Neighborhood::gather(&snapshot, self.grid.as_ref(), subject, &self.config);
            let steering =
                steering::combine(subject, &neighborhood, &self.config, dt, &mut self.rng);

            let agent = world.agent_mut(index);
            agent.wander_target = steering.wander_target;
            agent.integrate(steering.acceleration, dt, &self.config);
        }
    }

    fn tick_sequential(&mut self, world: &mut SpatialWorld, dt: f32) {
        for index in 0..world.len() {
            let steering = {
                let agents = world.agents();
                let subject = &agents[index];
                let neighborhood = Neighborhood::gather(agents, None, subject, &self.config);
                steering::combine(subject, &neighborhood, &self.config, dt, &mut self.rng)
            };

            let agent = world.agent_mut(index);
            agent.wander_target = steering.wander_target;
            agent.integrate(steering.acceleration, dt, &self.config);
        }
    }
}
