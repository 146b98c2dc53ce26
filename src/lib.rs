/*
 * Prey/Predator Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the flocking simulation core.
 * The simulation combines five steering behaviors (cohesion, separation,
 * alignment, wander, predator avoidance) into per-agent accelerations and
 * integrates them with a fixed-timestep, wrap-around world.
 */

// Re-export key components for easier access
pub use agent::{Agent, AgentId, AgentKind};
pub use config::{Config, ConfigError};
pub use simulator::{Simulator, UpdateMode};
pub use spatial_grid::SpatialGrid;
pub use world::{spawn_flock, Neighborhood, SpatialWorld};

// Define modules
pub mod agent;
pub mod config;
pub mod simulator;
pub mod spatial_grid;
pub mod steering;
pub mod world;
