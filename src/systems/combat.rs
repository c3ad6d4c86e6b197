//! Cast completion and area damage resolution.
//!
//! `tick_entities` drives every combatant's per-tick bookkeeping and resolves
//! whatever casts come due this tick. Damage applied here is visible to
//! entities processed later in the same tick.

use hecs::{Entity, World};
use log::debug;

use crate::components::{
    AbilityKind, AreaAttack, Body, BuffKind, CastEffect, Combatant, PlayerControlled,
};
use crate::config::CastDeathPolicy;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::circle_rect_overlap;

/// Advance every combatant one tick and resolve casts that came due.
pub fn tick_entities(world: &mut World, now: f32, policy: CastDeathPolicy, events: &mut EventQueue) {
    puffin::profile_function!();

    let mut fired: Vec<(Entity, CastEffect)> = Vec::new();
    for (entity, combatant) in world.query_mut::<&mut Combatant>() {
        if let Some(effect) = combatant.tick(now, policy) {
            fired.push((entity, effect));
        }
    }

    for (entity, effect) in fired {
        match effect {
            CastEffect::Area(area) => {
                events.push(GameEvent::CastCompleted {
                    entity,
                    kind: AbilityKind::Area,
                });
                apply_area_damage(world, &area, now, events);
            }
            CastEffect::Projectile => {
                // The armed projectile launches in the projectile system.
                events.push(GameEvent::CastCompleted {
                    entity,
                    kind: AbilityKind::Projectile,
                });
            }
            CastEffect::Buff {
                speed,
                damage,
                duration,
            } => {
                events.push(GameEvent::CastCompleted {
                    entity,
                    kind: AbilityKind::Buff,
                });
                if let Ok(mut combatant) = world.get::<&mut Combatant>(entity) {
                    combatant.apply_buff(BuffKind::Speed, speed, duration, now);
                    combatant.apply_buff(BuffKind::Damage, damage, duration, now);
                    events.push(GameEvent::BuffApplied { entity });
                }
            }
        }
    }
}

/// Apply an area attack's damage exactly once, to every live target matching
/// its filter whose bounding rectangle touches the circle (boundary
/// inclusive).
pub fn apply_area_damage(world: &mut World, area: &AreaAttack, now: f32, events: &mut EventQueue) {
    let mut hits: Vec<Entity> = Vec::new();
    for (entity, (combatant, body)) in world.query::<(&Combatant, &Body)>().iter() {
        if entity == area.caster || !combatant.is_alive() {
            continue;
        }
        if !area.filter.matches(combatant.team) {
            continue;
        }
        if circle_rect_overlap(area.center, area.radius, &body.rect()) {
            hits.push(entity);
        }
    }

    for target in hits {
        let died = {
            let mut combatant = match world.get::<&mut Combatant>(target) {
                Ok(c) => c,
                Err(_) => continue,
            };
            combatant.take_damage(area.damage, &area.attacker, now);
            events.push(GameEvent::DamageDealt {
                target,
                amount: area.damage,
            });
            !combatant.is_alive()
        };
        if died {
            let position = world
                .get::<&Body>(target)
                .map(|b| b.center())
                .unwrap_or_default();
            debug!("entity {:?} killed by area attack", target);
            events.push(GameEvent::EntityDied {
                entity: target,
                position,
            });
        }
    }
}

/// Despawn area effects whose visual lifetime has elapsed.
pub fn expire_area_effects(world: &mut World, now: f32) {
    let expired: Vec<Entity> = world
        .query::<&AreaAttack>()
        .iter()
        .filter(|(_, area)| area.is_expired(now))
        .map(|(e, _)| e)
        .collect();
    for entity in expired {
        let _ = world.despawn(entity);
    }
}

/// Despawn dead combatants. The player body is kept so the embedding layer
/// can present a defeat state; under the fire-after-death policy, dead
/// casters also linger until their pending cast resolves.
pub fn remove_dead(world: &mut World, policy: CastDeathPolicy) {
    let dead: Vec<Entity> = world
        .query::<&Combatant>()
        .without::<&PlayerControlled>()
        .iter()
        .filter(|(_, c)| {
            !c.is_alive()
                && !(policy == CastDeathPolicy::FireAfterDeath && c.has_pending_cast())
        })
        .map(|(e, _)| e)
        .collect();
    for entity in dead {
        let _ = world.despawn(entity);
    }
}
