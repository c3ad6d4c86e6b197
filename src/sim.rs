//! Fixed-tick simulation owner.
//!
//! `Simulation` owns the world, grid, clock, event queue and RNG, and runs
//! one cooperative step per call to `tick`. Within a tick, cast resolution
//! runs first, then the player's intents, then boss phase checks and AI,
//! then projectiles and cleanup. Damage applied early in a tick is visible
//! to entities processed later in the same tick.

use glam::Vec2;
use hecs::{Entity, World};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::GameClock;
use crate::components::{
    AbilityKind, AreaAttack, Behavior, Body, Combatant, LifecycleState, Projectile,
};
use crate::config::{CastDeathPolicy, SimConfig};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Rect;
use crate::grid::Grid;
use crate::snapshot::{AreaEffectSnapshot, EntitySnapshot, ProjectileSnapshot};
use crate::spawn;
use crate::systems;

/// Per-tick player input. Movement components are in {-1, 0, 1}; cast flags
/// are edge-triggered by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerIntent {
    pub movement: Vec2,
    pub cast_area: bool,
    pub cast_projectile: bool,
    /// Aim direction for a projectile cast; ignored otherwise.
    pub aim: Vec2,
    pub cast_buff: bool,
}

pub struct Simulation {
    pub world: World,
    grid: Grid,
    walls: Vec<Rect>,
    clock: GameClock,
    events: EventQueue,
    rng: StdRng,
    policy: CastDeathPolicy,
    config: SimConfig,
    player: Option<Entity>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let grid = Grid::from_layout(&config.layout);
        let walls = grid.wall_rects();
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            grid,
            walls,
            clock: GameClock::new(),
            events: EventQueue::new(),
            rng,
            policy: config.cast_death_policy,
            config,
            player: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn time(&self) -> f32 {
        self.clock.time
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn player_alive(&self) -> bool {
        self.player.is_some_and(|p| {
            self.world
                .get::<&Combatant>(p)
                .map(|c| c.is_alive())
                .unwrap_or(false)
        })
    }

    pub fn spawn_player(&mut self, tile: (i32, i32)) -> Entity {
        let stats = self.config.player;
        let entity = spawn::spawn_player(&mut self.world, &stats, tile);
        self.player = Some(entity);
        entity
    }

    pub fn spawn_enemy(&mut self, tile: (i32, i32), behavior: Behavior) -> Entity {
        let stats = self.config.enemy;
        let multiplier = self.config.stat_multiplier;
        spawn::spawn_enemy(&mut self.world, &stats, tile, behavior, multiplier)
    }

    pub fn spawn_boss(&mut self, tile: (i32, i32), stage: u32) -> Entity {
        let stats = self.config.boss;
        spawn::spawn_boss(&mut self.world, &stats, tile, stage)
    }

    /// Count of live enemy-team combatants, for wave/stage progression.
    pub fn live_enemies(&self) -> usize {
        self.world
            .query::<&Combatant>()
            .iter()
            .filter(|(_, c)| c.team == crate::components::Team::Enemy && c.is_alive())
            .count()
    }

    /// Advance the simulation by one fixed step and return the tick's events.
    pub fn tick(&mut self, intent: &PlayerIntent, dt: f32) -> Vec<GameEvent> {
        puffin::profile_function!();

        self.clock.advance(dt);
        let now = self.clock.time;

        systems::combat::tick_entities(&mut self.world, now, self.policy, &mut self.events);
        self.apply_player_intent(intent, now);
        systems::boss::update_boss_phases(&mut self.world, &mut self.events);
        systems::ai::run_ai(
            &mut self.world,
            &self.grid,
            &self.walls,
            now,
            dt,
            &mut self.rng,
            &mut self.events,
        );
        systems::projectile::launch_projectiles(&mut self.world, &mut self.events);
        systems::projectile::update_projectiles(&mut self.world, &self.grid, now, &mut self.events);
        systems::combat::expire_area_effects(&mut self.world, now);
        systems::combat::remove_dead(&mut self.world, self.policy);

        self.events.drain()
    }

    fn apply_player_intent(&mut self, intent: &PlayerIntent, now: f32) {
        let Some(player) = self.player else {
            return;
        };
        let mut spawned_area: Option<AreaAttack> = None;
        {
            let Ok((combatant, body)) = self
                .world
                .query_one_mut::<(&mut Combatant, &mut Body)>(player)
            else {
                return;
            };
            if !combatant.is_alive() {
                return;
            }

            if intent.movement != Vec2::ZERO {
                systems::movement::move_with_collision(
                    &self.grid,
                    combatant,
                    body,
                    intent.movement,
                );
            } else if combatant.state == LifecycleState::Moving {
                combatant.state = LifecycleState::Idle;
            }

            if intent.cast_area {
                if let Some(area) = combatant.use_area(player, body.center(), now) {
                    debug!("player area cast at {:?}", area.center);
                    spawned_area = Some(area);
                    self.events.push(GameEvent::CastStarted {
                        entity: player,
                        kind: AbilityKind::Area,
                    });
                }
            } else if intent.cast_projectile {
                if combatant.use_projectile(player, body.center(), intent.aim, now) {
                    self.events.push(GameEvent::CastStarted {
                        entity: player,
                        kind: AbilityKind::Projectile,
                    });
                }
            } else if intent.cast_buff && combatant.use_buff(now) {
                self.events.push(GameEvent::CastStarted {
                    entity: player,
                    kind: AbilityKind::Buff,
                });
            }
        }
        if let Some(area) = spawned_area {
            self.world.spawn((area,));
        }
    }

    /// Per-entity render snapshots for this tick.
    pub fn entity_snapshots(&self) -> Vec<EntitySnapshot> {
        let now = self.clock.time;
        self.world
            .query::<(&Combatant, &Body)>()
            .iter()
            .map(|(entity, (combatant, body))| {
                EntitySnapshot::capture(entity, combatant, body, now)
            })
            .collect()
    }

    /// Live area effects, for drawing the expanding rings.
    pub fn area_snapshots(&self) -> Vec<AreaEffectSnapshot> {
        let now = self.clock.time;
        self.world
            .query::<&AreaAttack>()
            .iter()
            .map(|(_, area)| AreaEffectSnapshot::capture(area, now))
            .collect()
    }

    /// Live projectiles, for drawing.
    pub fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.world
            .query::<&Projectile>()
            .iter()
            .map(|(_, p)| ProjectileSnapshot::capture(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Team;

    const DT: f32 = 1.0 / 60.0;

    fn seeded_sim() -> Simulation {
        let mut config = SimConfig::default();
        config.random_seed = Some(99);
        Simulation::new(config)
    }

    fn idle() -> PlayerIntent {
        PlayerIntent::default()
    }

    #[test]
    fn player_area_cast_damages_adjacent_enemy() {
        let mut sim = seeded_sim();
        sim.spawn_player((2, 2));
        let enemy = sim.spawn_enemy((3, 2), Behavior::Melee);

        let cast = PlayerIntent {
            cast_area: true,
            ..Default::default()
        };
        sim.tick(&cast, DT);
        assert_eq!(
            sim.world.get::<&Combatant>(enemy).unwrap().health,
            40.0,
            "no damage during the cast window"
        );

        // Run past the cast time; damage lands when the cast completes.
        let mut damaged = false;
        for _ in 0..70 {
            let events = sim.tick(&idle(), DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::DamageDealt { target, .. } if *target == enemy))
            {
                damaged = true;
                break;
            }
        }
        assert!(damaged);
        assert!(sim.world.get::<&Combatant>(enemy).unwrap().health < 40.0);
    }

    #[test]
    fn area_ring_visible_when_cast_completes() {
        let mut sim = seeded_sim();
        sim.spawn_player((2, 2));
        sim.tick(
            &PlayerIntent {
                cast_area: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(sim.area_snapshots().len(), 1, "telegraph during the cast");

        for _ in 0..70 {
            let events = sim.tick(&idle(), DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::CastCompleted { .. }))
            {
                assert_eq!(
                    sim.area_snapshots().len(),
                    1,
                    "ring must persist through the tick the damage lands"
                );
                // The visual lifetime runs from the hit, not from cast start.
                for _ in 0..40 {
                    sim.tick(&idle(), DT);
                }
                assert!(sim.area_snapshots().is_empty());
                return;
            }
        }
        panic!("area cast never completed");
    }

    #[test]
    fn melee_enemy_closes_in_and_attacks_player() {
        let mut sim = seeded_sim();
        let player = sim.spawn_player((8, 5));
        sim.spawn_enemy((2, 2), Behavior::Melee);

        let mut player_hit = false;
        for _ in 0..1200 {
            let events = sim.tick(&idle(), DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::DamageDealt { target, .. } if *target == player))
            {
                player_hit = true;
                break;
            }
        }
        assert!(player_hit, "enemy never reached and hit the player");
    }

    #[test]
    fn dead_enemies_are_reaped() {
        let mut sim = seeded_sim();
        sim.spawn_player((2, 2));
        let enemy = sim.spawn_enemy((3, 2), Behavior::Melee);
        {
            let mut c = sim.world.get::<&mut Combatant>(enemy).unwrap();
            c.health = 1.0;
        }

        sim.tick(
            &PlayerIntent {
                cast_area: true,
                ..Default::default()
            },
            DT,
        );
        for _ in 0..70 {
            sim.tick(&idle(), DT);
        }
        assert!(!sim.world.contains(enemy));
        assert_eq!(sim.live_enemies(), 0);
    }

    #[test]
    fn dead_player_is_kept_for_defeat_state() {
        let mut sim = seeded_sim();
        let player = sim.spawn_player((2, 2));
        {
            let mut c = sim.world.get::<&mut Combatant>(player).unwrap();
            c.die();
        }
        sim.tick(&idle(), DT);
        assert!(sim.world.contains(player));
        assert!(!sim.player_alive());
    }

    #[test]
    fn boss_fight_escalates_phases_under_sustained_damage() {
        let mut sim = seeded_sim();
        sim.spawn_player((2, 2));
        let boss = sim.spawn_boss((12, 7), 0);

        let mut phases_seen = Vec::new();
        for tick in 0..600 {
            // Chip the boss down steadily from outside the simulation.
            if tick % 10 == 0 {
                if let Ok(mut c) = sim.world.get::<&mut Combatant>(boss) {
                    c.health = (c.health - 5.0).max(1.0);
                }
            }
            for event in sim.tick(&idle(), DT) {
                if let GameEvent::BossPhaseChanged { phase, .. } = event {
                    phases_seen.push(phase);
                }
            }
        }
        assert_eq!(phases_seen, vec![2, 3]);
    }

    #[test]
    fn fixed_seed_runs_are_deterministic() {
        let run = |seed: u64| {
            let mut config = SimConfig::default();
            config.random_seed = Some(seed);
            let mut sim = Simulation::new(config);
            sim.spawn_player((2, 2));
            sim.spawn_boss((12, 7), 1);
            sim.spawn_enemy((12, 2), Behavior::Ranged);
            for _ in 0..300 {
                sim.tick(&idle(), DT);
            }
            let mut snaps = sim.entity_snapshots();
            snaps.sort_by_key(|s| s.id);
            snaps
                .iter()
                .map(|s| (s.id, s.pos[0].to_bits(), s.pos[1].to_bits(), s.health.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn enemy_team_spawns_are_counted() {
        let mut sim = seeded_sim();
        sim.spawn_player((2, 2));
        sim.spawn_enemy((5, 5), Behavior::Ranged);
        sim.spawn_boss((12, 7), 0);
        assert_eq!(sim.live_enemies(), 2);
        assert_eq!(
            sim.entity_snapshots()
                .iter()
                .filter(|s| s.team == Team::Enemy)
                .count(),
            2
        );
    }
}
