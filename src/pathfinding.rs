//! A* pathfinding over the walkability grid.
//!
//! Eight-directional movement with integer costs (10 orthogonal, 14
//! diagonal). Diagonal steps are rejected when either orthogonal neighbor
//! forming the corner is blocked, so paths never cut through wall corners.
//! The search is a pure function of the grid and the two endpoints.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::Grid;

const ORTHOGONAL_COST: i32 = 10;
const DIAGONAL_COST: i32 = 14;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct Node {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredNode {
    node: Node,
    f_score: i32,
    h_score: i32,
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior.
// Equal f-scores break ties toward the lower heuristic, which keeps the
// search pushing toward the goal and makes the returned path deterministic.
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then(other.h_score.cmp(&self.h_score))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Octile distance heuristic: diagonal steps cost 14, the remainder 10.
fn heuristic(from: (i32, i32), to: (i32, i32)) -> i32 {
    let dx = (from.0 - to.0).abs();
    let dy = (from.1 - to.1).abs();
    DIAGONAL_COST * dx.min(dy) + ORTHOGONAL_COST * (dx - dy).abs()
}

/// Find the cheapest path from `start` to `goal`.
///
/// Returns the ordered cell sequence from start to goal inclusive, or an
/// empty vector if the goal is unreachable.
pub fn find_path(grid: &Grid, start: (i32, i32), goal: (i32, i32)) -> Vec<(i32, i32)> {
    puffin::profile_function!();

    if !grid.is_walkable(goal.0, goal.1) {
        return Vec::new();
    }

    let start_node = Node {
        x: start.0,
        y: start.1,
    };
    let goal_node = Node {
        x: goal.0,
        y: goal.1,
    };

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Node, Node> = HashMap::new();
    let mut g_score: HashMap<Node, i32> = HashMap::new();

    g_score.insert(start_node, 0);
    open_set.push(ScoredNode {
        node: start_node,
        f_score: heuristic(start, goal),
        h_score: heuristic(start, goal),
    });

    while let Some(current) = open_set.pop() {
        if current.node == goal_node {
            return reconstruct_path(&came_from, current.node);
        }

        let current_g = *g_score.get(&current.node).unwrap_or(&i32::MAX);

        for (dx, dy) in DIRECTIONS {
            let nx = current.node.x + dx;
            let ny = current.node.y + dy;

            if !grid.is_walkable(nx, ny) {
                continue;
            }

            // No corner-cutting: a diagonal step needs both orthogonal
            // neighbors open.
            if dx != 0
                && dy != 0
                && (!grid.is_walkable(current.node.x + dx, current.node.y)
                    || !grid.is_walkable(current.node.x, current.node.y + dy))
            {
                continue;
            }

            let move_cost = if dx != 0 && dy != 0 {
                DIAGONAL_COST
            } else {
                ORTHOGONAL_COST
            };
            let neighbor = Node { x: nx, y: ny };
            let tentative_g = current_g + move_cost;
            let neighbor_g = *g_score.get(&neighbor).unwrap_or(&i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.node);
                g_score.insert(neighbor, tentative_g);
                let h = heuristic((nx, ny), goal);
                open_set.push(ScoredNode {
                    node: neighbor,
                    f_score: tentative_g + h,
                    h_score: h,
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct_path(came_from: &HashMap<Node, Node>, mut current: Node) -> Vec<(i32, i32)> {
    let mut path = vec![(current.x, current.y)];

    while let Some(&prev) = came_from.get(&current) {
        path.push((prev.x, prev.y));
        current = prev;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_cost(path: &[(i32, i32)]) -> i32 {
        path.windows(2)
            .map(|w| {
                let dx = (w[1].0 - w[0].0).abs();
                let dy = (w[1].1 - w[0].1).abs();
                if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    ORTHOGONAL_COST
                }
            })
            .sum()
    }

    #[test]
    fn straight_line_path() {
        let grid = Grid::from_layout(&["0000", "0000"]);
        let path = find_path(&grid, (0, 0), (3, 0));
        assert_eq!(path, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(path_cost(&path), 30);
    }

    #[test]
    fn diagonal_is_cheaper_than_l_shape() {
        let grid = Grid::from_layout(&["000", "000", "000"]);
        let path = find_path(&grid, (0, 0), (2, 2));
        assert_eq!(path_cost(&path), 28);
    }

    #[test]
    fn no_corner_cutting_through_walls() {
        // Wall at (1, 0): the diagonal (0,0) -> (1,1) through the corner of
        // that wall plus (0,1) is still fine, but the diagonal past two
        // touching wall corners must detour.
        let grid = Grid::from_layout(&[
            "010", //
            "000", //
            "010", //
        ]);
        let path = find_path(&grid, (0, 0), (2, 0));
        // (0,0) -> diagonal to (1,1) is blocked by the wall at (1,0);
        // the path must pass through (0,1) or (1,1) orthogonally.
        for w in path.windows(2) {
            let dx = w[1].0 - w[0].0;
            let dy = w[1].1 - w[0].1;
            if dx != 0 && dy != 0 {
                assert!(
                    grid.is_walkable(w[0].0 + dx, w[0].1) && grid.is_walkable(w[0].0, w[0].1 + dy),
                    "corner-cut step {:?} -> {:?}",
                    w[0],
                    w[1]
                );
            }
        }
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(2, 0)));
    }

    #[test]
    fn unreachable_goal_returns_empty() {
        let grid = Grid::from_layout(&[
            "00100", //
            "00100", //
            "00100", //
        ]);
        let path = find_path(&grid, (0, 1), (4, 1));
        assert!(path.is_empty());
    }

    #[test]
    fn blocked_goal_returns_empty() {
        let grid = Grid::from_layout(&["001", "000"]);
        assert!(find_path(&grid, (0, 0), (2, 0)).is_empty());
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let grid = Grid::from_layout(&[
            "000000", //
            "011110", //
            "000000", //
            "011110", //
            "000000", //
        ]);
        let first = find_path(&grid, (0, 0), (5, 4));
        for _ in 0..5 {
            assert_eq!(find_path(&grid, (0, 0), (5, 4)), first);
        }
    }

    #[test]
    fn path_around_obstacle_is_minimal() {
        let grid = Grid::from_layout(&[
            "000", //
            "010", //
            "000", //
        ]);
        let path = find_path(&grid, (0, 1), (2, 1));
        // Every diagonal around the center wall clips its corner, so the
        // cheapest legal route is four orthogonal steps.
        assert_eq!(path_cost(&path), 40);
    }
}
