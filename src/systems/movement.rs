//! Wall-aware movement for externally-driven entities.
//!
//! AI entities follow A* paths over walkable tiles and never need collision
//! checks; the player moves freely and gets axis-separated sliding so a
//! diagonal push into a wall still makes progress along the open axis.

use glam::Vec2;

use crate::components::{Body, Combatant, LifecycleState};
use crate::constants::TILE_SIZE;
use crate::geometry::Rect;
use crate::grid::Grid;

/// Wall rectangles the body currently overlaps. `Rect::intersects` is strict,
/// so a body flush against a wall face does not count as inside it.
fn overlapping_walls(grid: &Grid, body: &Body) -> Vec<Rect> {
    let rect = body.rect();
    let min_tx = (rect.left() / TILE_SIZE).floor() as i32;
    let min_ty = (rect.top() / TILE_SIZE).floor() as i32;
    let max_tx = (rect.right() / TILE_SIZE).floor() as i32;
    let max_ty = (rect.bottom() / TILE_SIZE).floor() as i32;

    let mut walls = Vec::new();
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
            if wall.intersects(&rect) {
                walls.push(wall);
            }
        }
    }
    walls
}

/// Move `body` by the combatant's speed along `direction`, sliding along
/// walls axis by axis. A step into a wall clamps flush against the wall face
/// rather than reverting, so a partial step still closes the remaining gap.
/// No-op while casting or dead.
pub fn move_with_collision(grid: &Grid, combatant: &mut Combatant, body: &mut Body, direction: Vec2) {
    if matches!(
        combatant.state,
        LifecycleState::Casting | LifecycleState::Dead
    ) {
        return;
    }
    if direction == Vec2::ZERO {
        return;
    }

    let mut dir = direction;
    if dir.x != 0.0 && dir.y != 0.0 {
        dir = dir.normalize();
    }
    let step = dir * (combatant.speed + combatant.speed_bonus());

    body.pos.x += step.x;
    for wall in overlapping_walls(grid, body) {
        if step.x > 0.0 {
            body.pos.x = body.pos.x.min(wall.left() - body.size);
        } else if step.x < 0.0 {
            body.pos.x = body.pos.x.max(wall.right());
        }
    }
    body.pos.y += step.y;
    for wall in overlapping_walls(grid, body) {
        if step.y > 0.0 {
            body.pos.y = body.pos.y.min(wall.top() - body.size);
        } else if step.y < 0.0 {
            body.pos.y = body.pos.y.max(wall.bottom());
        }
    }

    combatant.state = LifecycleState::Moving;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Team;

    fn walled_grid() -> Grid {
        // 5x5 room with a solid border.
        Grid::from_layout(&[
            "11111".to_string(),
            "10001".to_string(),
            "10001".to_string(),
            "10001".to_string(),
            "11111".to_string(),
        ])
    }

    fn combatant() -> Combatant {
        Combatant::new(Team::Player, 100.0, 20.0, 10.0, 5.0)
    }

    #[test]
    fn open_floor_moves_full_step() {
        let grid = walled_grid();
        let mut c = combatant();
        let mut body = Body::new(Vec2::new(40.0, 40.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(1.0, 0.0));
        assert_eq!(body.pos, Vec2::new(45.0, 40.0));
        assert_eq!(c.state, LifecycleState::Moving);
    }

    #[test]
    fn diagonal_into_wall_slides_along_open_axis() {
        let grid = walled_grid();
        let mut c = combatant();
        // Flush against the left wall (x = 32), room to move down.
        let mut body = Body::new(Vec2::new(32.0, 40.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(-1.0, 1.0));
        assert_eq!(body.pos.x, 32.0);
        assert!(body.pos.y > 40.0);
    }

    #[test]
    fn fully_blocked_push_stays_put() {
        let grid = walled_grid();
        let mut c = combatant();
        c.speed = 50.0;
        let mut body = Body::new(Vec2::new(32.0, 32.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(-1.0, -1.0));
        assert_eq!(body.pos, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn blocked_step_clamps_flush_to_wall_face() {
        let grid = walled_grid();
        let mut c = combatant();
        // 3px short of the left wall; a 5px step ends flush, not reverted.
        let mut body = Body::new(Vec2::new(35.0, 40.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(-1.0, 0.0));
        assert_eq!(body.pos.x, 32.0);

        // Same toward the right wall: the body's far edge lands on the face.
        let mut body = Body::new(Vec2::new(109.0, 40.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(1.0, 0.0));
        assert_eq!(body.pos.x, 112.0);
    }

    #[test]
    fn no_movement_while_casting() {
        let grid = walled_grid();
        let mut c = combatant();
        c.state = LifecycleState::Casting;
        let mut body = Body::new(Vec2::new(40.0, 40.0), 16.0);
        move_with_collision(&grid, &mut c, &mut body, Vec2::new(1.0, 0.0));
        assert_eq!(body.pos, Vec2::new(40.0, 40.0));
    }
}
