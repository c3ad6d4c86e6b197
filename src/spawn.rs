//! Entity spawning.
//!
//! Archetype bundles are assembled here from the config's stat blocks so the
//! rest of the crate never constructs combatants by hand. Difficulty scaling
//! multiplies enemy core stats at spawn; the boss additionally scales with
//! the stage level and carries its own ability tunables.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{
    Behavior, Body, BossState, Combatant, EnemyAi, PlayerControlled, Team,
};
use crate::config::StatBlock;
use crate::constants::*;
use crate::grid::tile_center;

fn combatant_from(stats: &StatBlock, team: Team, multiplier: f32) -> Combatant {
    let mut c = Combatant::new(
        team,
        stats.health * multiplier,
        stats.attack * multiplier,
        stats.defense * multiplier,
        stats.speed,
    );
    c.flat_damage = stats.flat_damage;
    c
}

fn body_at(tile: (i32, i32), size: f32) -> Body {
    let mut body = Body::new(Vec2::ZERO, size);
    body.set_center(tile_center(tile));
    body
}

pub fn spawn_player(world: &mut World, stats: &StatBlock, tile: (i32, i32)) -> Entity {
    world.spawn((
        combatant_from(stats, Team::Player, 1.0),
        body_at(tile, PLAYER_SIZE),
        PlayerControlled,
    ))
}

pub fn spawn_enemy(
    world: &mut World,
    stats: &StatBlock,
    tile: (i32, i32),
    behavior: Behavior,
    stat_multiplier: f32,
) -> Entity {
    world.spawn((
        combatant_from(stats, Team::Enemy, stat_multiplier),
        body_at(tile, ENEMY_SIZE),
        EnemyAi::new(behavior, ENEMY_DECISION_DELAY),
    ))
}

/// Spawn the boss for the given stage. Stats scale linearly with stage;
/// behavior starts ranged and swaps continuously with proximity.
pub fn spawn_boss(world: &mut World, stats: &StatBlock, tile: (i32, i32), stage: u32) -> Entity {
    let scaled = StatBlock {
        health: stats.health + 50.0 * stage as f32,
        attack: stats.attack + 5.0 * stage as f32,
        ..*stats
    };
    let mut combatant = combatant_from(&scaled, Team::Enemy, 1.0);
    combatant.area_radius = BOSS_AOE_RADIUS;
    combatant.area_cooldown = BOSS_AOE_COOLDOWN;
    combatant.projectile_radius = BOSS_PROJECTILE_RADIUS;
    combatant.projectile_cooldown = BOSS_PROJECTILE_COOLDOWN;
    world.spawn((
        combatant,
        body_at(tile, BOSS_SIZE),
        EnemyAi::new(Behavior::Ranged, BOSS_DECISION_DELAY),
        BossState::new(),
    ))
}
