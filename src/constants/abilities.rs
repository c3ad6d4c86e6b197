//! Default ability tunables.
//!
//! Per-entity values live on the `Combatant` component so bosses and phase
//! escalation can mutate them; these are the spawn-time defaults.

/// Area attack.
pub const AOE_BASE_RADIUS: f32 = 48.0;
pub const AOE_MULTIPLIER: f32 = 1.0;
pub const AOE_CAST_TIME: f32 = 1.0;
pub const AOE_COOLDOWN: f32 = 4.0;
/// Visual lifetime of the lingering ring after damage has been applied.
pub const AOE_LIFETIME: f32 = 0.5;

/// Projectile attack.
pub const PROJECTILE_RADIUS: f32 = 6.0;
pub const PROJECTILE_SPEED: f32 = 8.0;
pub const PROJECTILE_MULTIPLIER: f32 = 1.5;
pub const PROJECTILE_CAST_TIME: f32 = 0.5;
pub const PROJECTILE_COOLDOWN: f32 = 1.0;

/// Boss ability overrides, applied at spawn.
pub const BOSS_AOE_RADIUS: f32 = 64.0;
pub const BOSS_AOE_COOLDOWN: f32 = 2.0;
pub const BOSS_PROJECTILE_RADIUS: f32 = 8.0;
pub const BOSS_PROJECTILE_COOLDOWN: f32 = 2.0;

/// Self-buff.
pub const BUFF_SPEED_BONUS: f32 = 2.0;
pub const BUFF_DAMAGE_BONUS: f32 = 3.0;
pub const BUFF_BASE_DURATION: f32 = 5.0;
pub const BUFF_CAST_TIME: f32 = 1.0;
pub const BUFF_COOLDOWN: f32 = 15.0;
