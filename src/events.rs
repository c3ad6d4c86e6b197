//! Simulation event queue.
//!
//! Systems push events as they mutate the world; the embedding layer drains
//! them once per tick for sound, UI, and logging. Draining is destructive
//! and ordering matches emission order within a tick.

use glam::Vec2;
use hecs::Entity;

use crate::components::AbilityKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    CastStarted {
        entity: Entity,
        kind: AbilityKind,
    },
    CastCompleted {
        entity: Entity,
        kind: AbilityKind,
    },
    DamageDealt {
        target: Entity,
        amount: f32,
    },
    EntityDied {
        entity: Entity,
        position: Vec2,
    },
    ProjectileLaunched {
        caster: Entity,
    },
    /// `target` is `None` when the projectile ended on a wall.
    ProjectileHit {
        target: Option<Entity>,
        position: Vec2,
    },
    BuffApplied {
        entity: Entity,
    },
    BossPhaseChanged {
        boss: Entity,
        phase: u8,
    },
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_preserving_order() {
        let mut world = hecs::World::new();
        let e = world.spawn(());

        let mut queue = EventQueue::new();
        queue.push(GameEvent::CastStarted {
            entity: e,
            kind: AbilityKind::Area,
        });
        queue.push(GameEvent::DamageDealt {
            target: e,
            amount: 12.0,
        });

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], GameEvent::CastStarted { .. }));
        assert!(matches!(drained[1], GameEvent::DamageDealt { .. }));
        assert!(queue.is_empty());
    }
}
