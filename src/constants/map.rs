//! Map and grid constants.

/// Edge length of one grid tile in world units (pixels).
pub const TILE_SIZE: f32 = 32.0;

/// Square footprint edge lengths, slightly smaller than a tile so bodies
/// can slide through single-tile gaps.
pub const PLAYER_SIZE: f32 = 28.0;
pub const ENEMY_SIZE: f32 = 28.0;
/// The boss occupies roughly a 2x2 tile footprint.
pub const BOSS_SIZE: f32 = 56.0;
