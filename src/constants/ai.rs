//! AI cadence and targeting constants.

/// Seconds between regular enemy attack decisions.
pub const ENEMY_DECISION_DELAY: f32 = 1.0;

/// Seconds between boss attack decisions (bosses react faster).
pub const BOSS_DECISION_DELAY: f32 = 0.5;

/// Minimum seconds between path recomputations, further throttled by
/// "did my tile or the goal tile change".
pub const PATH_UPDATE_INTERVAL: f32 = 0.25;

/// Chebyshev radius of the ring ranged enemies try to hold around the
/// target's tile.
pub const RANGED_RING_RADIUS: i32 = 4;

/// Minimum world-space distance at which a path cell counts as reached.
/// The effective threshold is `max(PATH_SNAP_DISTANCE, speed)`.
pub const PATH_SNAP_DISTANCE: f32 = 2.0;

/// Boss swaps to melee behavior when within this Chebyshev tile distance of
/// the player.
pub const BOSS_MELEE_SWAP_RADIUS: i32 = 3;
