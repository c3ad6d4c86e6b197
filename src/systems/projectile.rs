//! Projectile launch, flight, and collision.
//!
//! Wall collision is checked before target collision each tick, so a
//! projectile clipping a wall never damages anything, even with a target in
//! range the same tick. A projectile damages at most one target, then
//! deactivates.

use glam::Vec2;
use hecs::{Entity, World};
use log::debug;

use crate::components::{Body, Combatant, Projectile, TargetFilter};
use crate::constants::TILE_SIZE;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{circle_rect_overlap, Rect};
use crate::grid::Grid;

/// Drain armed pending-projectile slots into live world entities.
pub fn launch_projectiles(world: &mut World, events: &mut EventQueue) {
    let mut launched: Vec<Projectile> = Vec::new();
    for (entity, combatant) in world.query_mut::<&mut Combatant>() {
        if let Some(projectile) = combatant.take_projectile() {
            launched.push(projectile);
            events.push(GameEvent::ProjectileLaunched { caster: entity });
        }
    }
    for projectile in launched {
        world.spawn((projectile,));
    }
}

/// Circle-vs-wall test over every blocked tile the circle's bounding box
/// spans, so a corner graze counts the same as a head-on hit.
fn hits_wall(grid: &Grid, pos: Vec2, radius: f32) -> bool {
    let min_tx = ((pos.x - radius) / TILE_SIZE).floor() as i32;
    let max_tx = ((pos.x + radius) / TILE_SIZE).floor() as i32;
    let min_ty = ((pos.y - radius) / TILE_SIZE).floor() as i32;
    let max_ty = ((pos.y + radius) / TILE_SIZE).floor() as i32;

    for ty in min_ty..=max_ty {
        for tx in min_tx..=max_tx {
            if grid.is_walkable(tx, ty) {
                continue;
            }
            let wall = Rect::new(
                tx as f32 * TILE_SIZE,
                ty as f32 * TILE_SIZE,
                TILE_SIZE,
                TILE_SIZE,
            );
            if circle_rect_overlap(pos, radius, &wall) {
                return true;
            }
        }
    }
    false
}

/// Advance every active projectile one tick and resolve collisions.
pub fn update_projectiles(world: &mut World, grid: &Grid, now: f32, events: &mut EventQueue) {
    puffin::profile_function!();

    struct Hit {
        projectile: Entity,
        target: Option<Entity>,
        position: Vec2,
    }

    let mut hits: Vec<Hit> = Vec::new();
    {
        let mut targets = world.query::<(&Combatant, &Body)>();
        let targets: Vec<(Entity, (&Combatant, &Body))> = targets.iter().collect();

        for (entity, projectile) in world.query::<&mut Projectile>().iter() {
            if !projectile.active {
                continue;
            }
            projectile.pos += projectile.dir * projectile.speed;

            if hits_wall(grid, projectile.pos, projectile.radius) {
                projectile.active = false;
                hits.push(Hit {
                    projectile: entity,
                    target: None,
                    position: projectile.pos,
                });
                continue;
            }

            let filter = TargetFilter::hostile_to(projectile.caster_team);
            let target = targets.iter().find(|(target, (combatant, body))| {
                *target != projectile.caster
                    && combatant.is_alive()
                    && filter.matches(combatant.team)
                    && circle_rect_overlap(projectile.pos, projectile.radius, &body.rect())
            });
            if let Some((target, _)) = target {
                projectile.active = false;
                hits.push(Hit {
                    projectile: entity,
                    target: Some(*target),
                    position: projectile.pos,
                });
            }
        }
    }

    for hit in &hits {
        let Some(target) = hit.target else {
            events.push(GameEvent::ProjectileHit {
                target: None,
                position: hit.position,
            });
            continue;
        };
        let (damage, attacker) = match world.get::<&Projectile>(hit.projectile) {
            Ok(p) => (p.damage, p.attacker),
            Err(_) => continue,
        };
        let died = {
            let mut combatant = match world.get::<&mut Combatant>(target) {
                Ok(c) => c,
                Err(_) => continue,
            };
            combatant.take_damage(damage, &attacker, now);
            !combatant.is_alive()
        };
        events.push(GameEvent::ProjectileHit {
            target: Some(target),
            position: hit.position,
        });
        events.push(GameEvent::DamageDealt {
            target,
            amount: damage,
        });
        if died {
            let position = world
                .get::<&Body>(target)
                .map(|b| b.center())
                .unwrap_or_default();
            debug!("entity {:?} killed by projectile", target);
            events.push(GameEvent::EntityDied {
                entity: target,
                position,
            });
        }
    }

    // Spent projectiles despawn the tick they deactivate.
    let spent: Vec<Entity> = world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| !p.active)
        .map(|(e, _)| e)
        .collect();
    for entity in spent {
        let _ = world.despawn(entity);
    }
}
