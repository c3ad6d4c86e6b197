//! Simulation constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod abilities;
mod ai;
mod combat;
mod map;

pub use abilities::*;
pub use ai::*;
pub use combat::*;
pub use map::*;
