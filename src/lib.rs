//! Combat and AI simulation core for a tile-grid action game.
//!
//! The crate owns entity state machines, deferred ability casts, area and
//! projectile damage resolution, A* pathfinding, enemy AI and boss phases.
//! Rendering, input decoding and persistence live in the embedding layer,
//! which drives [`sim::Simulation::tick`] once per frame and reads back
//! snapshots and events.

pub mod clock;
pub mod components;
pub mod config;
pub mod constants;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod pathfinding;
pub mod sim;
pub mod snapshot;
pub mod spawn;
pub mod systems;

pub use components::{
    AbilityKind, Behavior, Body, BossState, BuffKind, Combatant, EnemyAi, LifecycleState,
    PlayerControlled, Team,
};
pub use config::{CastDeathPolicy, SimConfig};
pub use events::{EventQueue, GameEvent};
pub use sim::{PlayerIntent, Simulation};
