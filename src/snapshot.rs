//! Read-only render snapshots.
//!
//! The embedding layer pulls these once per tick instead of querying the
//! world directly. Everything is plain serializable data so a headless run
//! can log frames as JSON.

use serde::Serialize;

use crate::components::{AbilityKind, AreaAttack, Body, Combatant, Projectile};

#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub id: u64,
    pub team: crate::components::Team,
    pub state: crate::components::LifecycleState,
    pub pos: [f32; 2],
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    /// Blink signal for hit feedback; false means "skip drawing this frame".
    pub visible: bool,
    pub area_cooldown: f32,
    pub projectile_cooldown: f32,
    pub buff_cooldown: f32,
    pub speed_buffed: bool,
    pub damage_buffed: bool,
}

impl EntitySnapshot {
    pub fn capture(id: hecs::Entity, combatant: &Combatant, body: &Body, now: f32) -> Self {
        Self {
            id: id.to_bits().get(),
            team: combatant.team,
            state: combatant.state,
            pos: [body.pos.x, body.pos.y],
            size: body.size,
            health: combatant.health,
            max_health: combatant.max_health,
            visible: combatant.is_visible(now),
            area_cooldown: combatant.cooldown_remaining(AbilityKind::Area, now),
            projectile_cooldown: combatant.cooldown_remaining(AbilityKind::Projectile, now),
            buff_cooldown: combatant.cooldown_remaining(AbilityKind::Buff, now),
            speed_buffed: combatant.speed_bonus() > 0.0,
            damage_buffed: combatant.damage_bonus() > 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaEffectSnapshot {
    pub center: [f32; 2],
    pub radius: f32,
    /// Grows from 0 to `radius` over the visual lifetime.
    pub inner_radius: f32,
}

impl AreaEffectSnapshot {
    pub fn capture(area: &AreaAttack, now: f32) -> Self {
        Self {
            center: [area.center.x, area.center.y],
            radius: area.radius,
            inner_radius: area.inner_radius(now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileSnapshot {
    pub pos: [f32; 2],
    pub radius: f32,
}

impl ProjectileSnapshot {
    pub fn capture(projectile: &Projectile) -> Self {
        Self {
            pos: [projectile.pos.x, projectile.pos.y],
            radius: projectile.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Team;
    use glam::Vec2;

    #[test]
    fn entity_snapshot_serializes_to_json() {
        let mut world = hecs::World::new();
        let id = world.spawn(());
        let combatant = Combatant::new(Team::Player, 100.0, 20.0, 10.0, 5.0);
        let body = Body::new(Vec2::new(64.0, 96.0), 28.0);

        let snap = EntitySnapshot::capture(id, &combatant, &body, 0.0);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"team\":\"Player\""));
        assert!(json.contains("\"health\":100.0"));
    }

    #[test]
    fn area_snapshot_inner_radius_grows() {
        let mut world = hecs::World::new();
        let caster = world.spawn(());
        let mut c = Combatant::new(Team::Player, 100.0, 20.0, 10.0, 5.0);
        let area = c.use_area(caster, Vec2::new(100.0, 100.0), 0.0).unwrap();

        // The ring stays hollow until the cast resolves, then fills in.
        let early = AreaEffectSnapshot::capture(&area, c.area_cast_time);
        let late = AreaEffectSnapshot::capture(&area, c.area_cast_time + area.lifetime);
        assert_eq!(early.inner_radius, 0.0);
        assert_eq!(late.inner_radius, area.radius);
    }
}
