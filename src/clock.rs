//! Simulation clock.
//!
//! All timed behavior in the core (casts, cooldowns, buffs, invincibility)
//! is expressed as elapsed-time comparisons against this clock. Nothing in
//! the simulation sleeps or waits; the owner advances time once per tick.

/// Monotonic simulation time in seconds. Decoupled from wall-clock time so
/// tests can drive it explicitly.
#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    /// Current simulation time in seconds
    pub time: f32,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Advance the clock by a frame delta.
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "Cannot go backwards in time: dt = {}", dt);
        self.time += dt;
    }

    /// Advance time to the given timestamp.
    pub fn advance_to(&mut self, time: f32) {
        debug_assert!(
            time >= self.time,
            "Cannot go backwards in time: {} -> {}",
            self.time,
            time
        );
        self.time = time;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
