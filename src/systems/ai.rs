//! Enemy decision making and path following.
//!
//! Each enemy runs two independent cadences: an action cadence (attack
//! decisions, slower) and a path cadence (goal selection and repathing,
//! faster, further throttled by goal changes). Movement along the current
//! path happens every tick.
//!
//! Melee enemies attack with their area ability from the 8 tiles adjacent to
//! the target; ranged enemies attack with projectiles from a Chebyshev ring
//! around the target, and only with a clear line of sight. The boss swaps
//! between the two behaviors continuously based on proximity, and from phase
//! 2 onward mixes projectile and area casts at random when both are ready.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    AbilityKind, AreaAttack, Behavior, Body, BossState, Combatant, EnemyAi, LifecycleState,
    PlayerControlled,
};
use crate::constants::{BOSS_MELEE_SWAP_RADIUS, PATH_SNAP_DISTANCE, RANGED_RING_RADIUS};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{segment_intersects_rect, Rect};
use crate::grid::{tile_center, world_to_tile, Grid};
use crate::pathfinding::find_path;

fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// The 3x3-minus-center zone around the target's tile.
pub fn in_melee_zone(tile: (i32, i32), target_tile: (i32, i32)) -> bool {
    tile != target_tile && chebyshev(tile, target_tile) <= 1
}

/// Exact ring membership at the configured Chebyshev radius.
pub fn on_ranged_ring(tile: (i32, i32), target_tile: (i32, i32)) -> bool {
    chebyshev(tile, target_tile) == RANGED_RING_RADIUS
}

/// True when no wall rectangle clips the segment between the two points.
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    walls
        .iter()
        .all(|wall| !segment_intersects_rect(from, to, wall))
}

/// What an enemy chose to do on its action cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiAction {
    None,
    CastArea { origin: Vec2 },
    CastProjectile { dir: Vec2 },
}

/// Attack decision for one enemy. Pure except for invalidating the cached
/// goal tile when line of sight fails, which forces a repath instead of
/// shooting blind.
#[allow(clippy::too_many_arguments)]
pub fn decide_action(
    combatant: &Combatant,
    ai: &mut EnemyAi,
    boss_phase: Option<u8>,
    self_center: Vec2,
    self_tile: (i32, i32),
    player_center: Vec2,
    player_tile: (i32, i32),
    walls: &[Rect],
    now: f32,
    rng: &mut impl Rng,
) -> AiAction {
    match ai.behavior {
        Behavior::Melee => {
            if in_melee_zone(self_tile, player_tile) && combatant.can_use_area(now) {
                return AiAction::CastArea {
                    origin: self_center,
                };
            }
            AiAction::None
        }
        Behavior::Ranged => {
            if !on_ranged_ring(self_tile, player_tile) {
                return AiAction::None;
            }
            if !has_line_of_sight(self_center, player_center, walls) {
                ai.last_goal_tile = None;
                return AiAction::None;
            }

            let projectile_ready = combatant.can_use_projectile(now);
            if boss_phase.is_some_and(|p| p >= 2) {
                let area_ready = combatant.can_use_area(now);
                return match (projectile_ready, area_ready) {
                    // Even odds when both are ready; area casts land on the
                    // player's live position rather than the boss's own.
                    (true, true) => {
                        if rng.gen_bool(0.5) {
                            AiAction::CastProjectile {
                                dir: player_center - self_center,
                            }
                        } else {
                            AiAction::CastArea {
                                origin: player_center,
                            }
                        }
                    }
                    (true, false) => AiAction::CastProjectile {
                        dir: player_center - self_center,
                    },
                    (false, true) => AiAction::CastArea {
                        origin: player_center,
                    },
                    (false, false) => AiAction::None,
                };
            }

            if projectile_ready {
                return AiAction::CastProjectile {
                    dir: player_center - self_center,
                };
            }
            AiAction::None
        }
    }
}

/// Nearest walkable tile of the behavior's attack zone, preferring
/// ranged-zone tiles with line of sight and breaking ties by Manhattan
/// distance to the enemy's current tile.
pub fn select_goal_tile(
    grid: &Grid,
    walls: &[Rect],
    behavior: Behavior,
    self_tile: (i32, i32),
    player_tile: (i32, i32),
    player_center: Vec2,
) -> Option<(i32, i32)> {
    let mut candidates: Vec<(i32, i32)> = Vec::new();
    match behavior {
        Behavior::Melee => {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    candidates.push((player_tile.0 + dx, player_tile.1 + dy));
                }
            }
        }
        Behavior::Ranged => {
            let r = RANGED_RING_RADIUS;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx.abs().max(dy.abs()) == r {
                        candidates.push((player_tile.0 + dx, player_tile.1 + dy));
                    }
                }
            }
        }
    }
    candidates.retain(|&(tx, ty)| grid.is_walkable(tx, ty));
    if candidates.is_empty() {
        return None;
    }

    if behavior == Behavior::Ranged {
        let visible: Vec<(i32, i32)> = candidates
            .iter()
            .copied()
            .filter(|&tile| has_line_of_sight(tile_center(tile), player_center, walls))
            .collect();
        if !visible.is_empty() {
            candidates = visible;
        }
    }

    candidates
        .into_iter()
        .min_by_key(|&tile| manhattan(self_tile, tile))
}

/// Run every enemy's AI for one tick: behavior swap (boss), attack decision,
/// repathing, and path following.
#[allow(clippy::too_many_arguments)]
pub fn run_ai(
    world: &mut World,
    grid: &Grid,
    walls: &[Rect],
    now: f32,
    dt: f32,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    let player = world
        .query::<(&Combatant, &Body)>()
        .with::<&PlayerControlled>()
        .iter()
        .find(|(_, (combatant, _))| combatant.is_alive())
        .map(|(_, (_, body))| body.center());
    let Some(player_center) = player else {
        return;
    };
    let player_tile = world_to_tile(player_center);

    let mut spawned_areas: Vec<AreaAttack> = Vec::new();

    for (entity, (combatant, body, ai, boss)) in
        world.query_mut::<(&mut Combatant, &mut Body, &mut EnemyAi, Option<&BossState>)>()
    {
        if !combatant.is_alive() {
            continue;
        }

        let center = body.center();
        let tile = world_to_tile(center);
        if ai.current_tile != Some(tile) {
            ai.last_tile = ai.current_tile;
            ai.current_tile = Some(tile);
        }

        // Continuous proximity override, re-evaluated every tick.
        if boss.is_some() {
            ai.behavior = if chebyshev(tile, player_tile) <= BOSS_MELEE_SWAP_RADIUS {
                Behavior::Melee
            } else {
                Behavior::Ranged
            };
        }

        ai.path_update_timer += dt;

        if combatant.state == LifecycleState::Casting {
            continue;
        }

        if now - ai.last_decision_time >= ai.decision_delay {
            ai.last_decision_time = now;
            let action = decide_action(
                combatant,
                ai,
                boss.map(|b| b.phase),
                center,
                tile,
                player_center,
                player_tile,
                walls,
                now,
                rng,
            );
            match action {
                AiAction::CastArea { origin } => {
                    if let Some(area) = combatant.use_area(entity, origin, now) {
                        spawned_areas.push(area);
                        events.push(GameEvent::CastStarted {
                            entity,
                            kind: AbilityKind::Area,
                        });
                    }
                    continue;
                }
                AiAction::CastProjectile { dir } => {
                    if combatant.use_projectile(entity, center, dir, now) {
                        events.push(GameEvent::CastStarted {
                            entity,
                            kind: AbilityKind::Projectile,
                        });
                    }
                    continue;
                }
                AiAction::None => {}
            }
        }

        // Repath on the path cadence, or immediately when the goal moved or
        // the current path is exhausted.
        if let Some(goal) = select_goal_tile(grid, walls, ai.behavior, tile, player_tile, player_center)
        {
            let goal_changed = ai.last_goal_tile != Some(goal);
            let path_done = ai.path_index >= ai.path.len();
            if (goal_changed || path_done) && ai.path_update_timer >= ai.path_update_interval {
                ai.path_update_timer = 0.0;
                ai.last_goal_tile = Some(goal);
                let mut path = find_path(grid, tile, goal);
                // A path whose second cell is the tile we just left would
                // oscillate; skip straight past it.
                if path.len() >= 2 && ai.last_tile == Some(path[1]) {
                    path.remove(1);
                }
                ai.path_index = 1.min(path.len());
                ai.path = path;
            }
        }

        let mut moving = false;
        if let Some(&next) = ai.path.get(ai.path_index) {
            let target = tile_center(next);
            let delta = target - center;
            let threshold = PATH_SNAP_DISTANCE.max(combatant.speed + combatant.speed_bonus());
            if delta.length() <= threshold {
                body.set_center(target);
                ai.path_index += 1;
            } else {
                combatant.move_dir(body, delta.normalize());
            }
            moving = true;
        }
        if !moving && combatant.state == LifecycleState::Moving {
            combatant.state = LifecycleState::Idle;
        }
    }

    for area in spawned_areas {
        world.spawn((area,));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Team;
    use crate::constants::{ENEMY_DECISION_DELAY, TILE_SIZE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn enemy() -> Combatant {
        Combatant::new(Team::Enemy, 40.0, 10.0, 5.0, 5.0)
    }

    #[test]
    fn melee_zone_excludes_center_and_far_tiles() {
        assert!(in_melee_zone((4, 5), (5, 5)));
        assert!(in_melee_zone((6, 6), (5, 5)));
        assert!(!in_melee_zone((5, 5), (5, 5)));
        assert!(!in_melee_zone((3, 5), (5, 5)));
    }

    #[test]
    fn ranged_ring_is_exact_membership() {
        assert!(on_ranged_ring((9, 5), (5, 5)));
        assert!(on_ranged_ring((9, 9), (5, 5)));
        assert!(!on_ranged_ring((8, 5), (5, 5)));
        assert!(!on_ranged_ring((10, 5), (5, 5)));
    }

    #[test]
    fn line_of_sight_blocked_by_wall_rect() {
        let walls = vec![Rect::new(50.0, 0.0, 32.0, 100.0)];
        assert!(!has_line_of_sight(
            Vec2::new(0.0, 50.0),
            Vec2::new(100.0, 50.0),
            &walls
        ));
        assert!(has_line_of_sight(
            Vec2::new(0.0, 150.0),
            Vec2::new(100.0, 150.0),
            &walls
        ));
    }

    #[test]
    fn melee_decision_waits_for_cooldown_then_fires_at_boundary() {
        let mut ai = EnemyAi::new(Behavior::Melee, ENEMY_DECISION_DELAY);
        let mut c = enemy();
        c.area_cooldown = 2.0;
        c.area_last_used = 0.0;
        let mut r = rng();

        // In the melee zone the whole time.
        let self_tile = (4, 5);
        let player_tile = (5, 5);
        let self_center = tile_center(self_tile);
        let player_center = tile_center(player_tile);

        let early = decide_action(
            &c, &mut ai, None, self_center, self_tile, player_center, player_tile, &[], 1.0, &mut r,
        );
        assert_eq!(early, AiAction::None);

        let at_boundary = decide_action(
            &c, &mut ai, None, self_center, self_tile, player_center, player_tile, &[], 2.0, &mut r,
        );
        assert!(matches!(at_boundary, AiAction::CastArea { .. }));
    }

    #[test]
    fn ranged_without_los_invalidates_goal_instead_of_attacking() {
        let mut ai = EnemyAi::new(Behavior::Ranged, ENEMY_DECISION_DELAY);
        ai.last_goal_tile = Some((9, 5));
        let c = enemy();
        let mut r = rng();

        let self_tile = (9, 5);
        let player_tile = (5, 5);
        let wall = Rect::new(7.0 * TILE_SIZE, 0.0, TILE_SIZE, 20.0 * TILE_SIZE);

        let action = decide_action(
            &c,
            &mut ai,
            None,
            tile_center(self_tile),
            self_tile,
            tile_center(player_tile),
            player_tile,
            &[wall],
            10.0,
            &mut r,
        );
        assert_eq!(action, AiAction::None);
        assert_eq!(ai.last_goal_tile, None);
    }

    #[test]
    fn boss_phase_two_mixes_projectile_and_area() {
        let mut ai = EnemyAi::new(Behavior::Ranged, 0.5);
        let mut c = enemy();
        c.area_last_used = f32::NEG_INFINITY;
        c.projectile_last_used = f32::NEG_INFINITY;
        let mut r = rng();

        let self_tile = (9, 5);
        let player_tile = (5, 5);
        let player_center = tile_center(player_tile);

        let mut saw_area = false;
        let mut saw_projectile = false;
        for _ in 0..32 {
            let action = decide_action(
                &c,
                &mut ai,
                Some(2),
                tile_center(self_tile),
                self_tile,
                player_center,
                player_tile,
                &[],
                10.0,
                &mut r,
            );
            match action {
                AiAction::CastArea { origin } => {
                    saw_area = true;
                    // Area casts retarget the live player position.
                    assert_eq!(origin, player_center);
                }
                AiAction::CastProjectile { .. } => saw_projectile = true,
                AiAction::None => panic!("both abilities ready; expected a cast"),
            }
        }
        assert!(saw_area && saw_projectile);
    }

    #[test]
    fn goal_selection_prefers_visible_ring_tiles() {
        // Full-height wall at x=9 splits the room; player sits east of it.
        let mut rows = Vec::new();
        rows.push("1111111111111111".to_string());
        for _ in 0..13 {
            rows.push("1000000001000001".to_string());
        }
        rows.push("1111111111111111".to_string());
        let grid = Grid::from_layout(&rows);
        let walls = grid.wall_rects();

        let player_tile = (11, 7);
        let goal = select_goal_tile(
            &grid,
            &walls,
            Behavior::Ranged,
            (1, 7),
            player_tile,
            tile_center(player_tile),
        )
        .expect("ring has walkable tiles");

        // Ring tiles west of the wall are closer to the enemy but lack line
        // of sight; the chosen goal must sit east of the wall.
        assert!(goal.0 > 9);
        assert!(on_ranged_ring(goal, player_tile));
    }

    #[test]
    fn goal_selection_breaks_ties_by_manhattan_distance() {
        let grid = Grid::from_layout(&[
            "1111111111".to_string(),
            "1000000001".to_string(),
            "1000000001".to_string(),
            "1000000001".to_string(),
            "1000000001".to_string(),
            "1111111111".to_string(),
        ]);
        let walls = grid.wall_rects();
        let player_tile = (5, 2);
        let goal = select_goal_tile(
            &grid,
            &walls,
            Behavior::Melee,
            (2, 2),
            player_tile,
            tile_center(player_tile),
        )
        .unwrap();
        assert_eq!(goal, (4, 2));
    }
}
