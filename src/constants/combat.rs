//! Combat tuning constants.

/// Flat damage added to every hit on top of the attenuated amount.
pub const GLOBAL_FLAT_DAMAGE: f32 = 2.0;

/// How long an entity ignores all incoming damage after being hit.
pub const INVINCIBILITY_DURATION: f32 = 0.5;

/// Blink cadence for the hit-feedback signal while invincible.
pub const INVINCIBILITY_BLINK_INTERVAL: f32 = 0.1;
