//! Boss phase escalation.
//!
//! Health-ratio thresholds are checked every tick before action selection.
//! Each phase flag guards independently: a single large hit can push the
//! ratio straight past 0.5 to below 0.2, entering both phases in one tick.
//! Flags never reset, so escalation survives any later health change.

use hecs::World;
use log::info;

use crate::components::{BossState, Combatant};
use crate::events::{EventQueue, GameEvent};

const PHASE2_HEALTH_RATIO: f32 = 0.5;
const PHASE3_HEALTH_RATIO: f32 = 0.2;

const PHASE2_SPEED_BONUS: f32 = 1.0;
const PHASE2_PROJECTILE_CAST_TIME: f32 = 0.25;

const PHASE3_ATTACK_MULTIPLIER: f32 = 1.5;
const PHASE3_AREA_RADIUS_BONUS: f32 = 8.0;
const PHASE3_PROJECTILE_RADIUS_BONUS: f32 = 2.0;
const PHASE3_PROJECTILE_SPEED_BONUS: f32 = 3.0;
const PHASE3_PROJECTILE_COOLDOWN: f32 = 1.0;

/// Check phase thresholds for every boss and apply one-time escalations.
pub fn update_boss_phases(world: &mut World, events: &mut EventQueue) {
    for (entity, (combatant, boss)) in world.query_mut::<(&mut Combatant, &mut BossState)>() {
        if !combatant.is_alive() {
            continue;
        }
        let ratio = combatant.health / combatant.max_health;

        if !boss.phase2_entered && ratio <= PHASE2_HEALTH_RATIO {
            boss.phase2_entered = true;
            boss.phase = boss.phase.max(2);
            combatant.speed += PHASE2_SPEED_BONUS;
            combatant.projectile_cast_time = PHASE2_PROJECTILE_CAST_TIME;
            info!("boss {:?} entered phase 2", entity);
            events.push(GameEvent::BossPhaseChanged {
                boss: entity,
                phase: 2,
            });
        }

        if !boss.phase3_entered && ratio <= PHASE3_HEALTH_RATIO {
            boss.phase3_entered = true;
            boss.phase = 3;
            combatant.attack *= PHASE3_ATTACK_MULTIPLIER;
            combatant.area_radius += PHASE3_AREA_RADIUS_BONUS;
            combatant.projectile_radius += PHASE3_PROJECTILE_RADIUS_BONUS;
            combatant.projectile_speed += PHASE3_PROJECTILE_SPEED_BONUS;
            combatant.projectile_cooldown = PHASE3_PROJECTILE_COOLDOWN;
            combatant.projectile_cast_time = 0.0;
            info!("boss {:?} entered phase 3", entity);
            events.push(GameEvent::BossPhaseChanged {
                boss: entity,
                phase: 3,
            });
        }
    }
}
