//! World-space collision primitives.
//!
//! The combat resolver works in continuous pixel coordinates even though
//! pathfinding runs on the tile grid: area effects are circles, entities and
//! walls are axis-aligned rectangles, and line of sight is a segment test
//! against the wall set.

use glam::Vec2;

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Circle vs axis-aligned rectangle overlap. The boundary counts as a hit,
/// so a target exactly at distance == radius is included.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest_x = center.x.clamp(rect.left(), rect.right());
    let closest_y = center.y.clamp(rect.top(), rect.bottom());

    let dx = center.x - closest_x;
    let dy = center.y - closest_y;

    dx * dx + dy * dy <= radius * radius
}

/// Does the segment from `p0` to `p1` clip the rectangle?
///
/// Slab test over both axes; degenerate segments fall back to containment.
/// Used for line-of-sight checks against the wall set.
pub fn segment_intersects_rect(p0: Vec2, p1: Vec2, rect: &Rect) -> bool {
    let d = p1 - p0;

    if d.length_squared() <= 1e-12 {
        return rect.contains_point(p0);
    }

    let mut tmin = 0.0f32;
    let mut tmax = 1.0f32;

    for (start, dir, min_b, max_b) in [
        (p0.x, d.x, rect.left(), rect.right()),
        (p0.y, d.y, rect.top(), rect.bottom()),
    ] {
        if dir.abs() < 1e-6 {
            if start < min_b || start > max_b {
                return false;
            }
        } else {
            let inv = 1.0 / dir;
            let mut t0 = (min_b - start) * inv;
            let mut t1 = (max_b - start) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_rect_overlap_inclusive_boundary() {
        let rect = Rect::new(10.0, 0.0, 4.0, 4.0);
        // Circle centered at origin, rect's nearest point is (10, 0)
        assert!(circle_rect_overlap(Vec2::ZERO, 10.0, &rect));
        assert!(!circle_rect_overlap(Vec2::ZERO, 9.99, &rect));
    }

    #[test]
    fn circle_rect_overlap_center_inside() {
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        assert!(circle_rect_overlap(Vec2::new(4.0, 4.0), 0.1, &rect));
    }

    #[test]
    fn rect_intersects_excludes_shared_edges() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        // Flush contact is not an overlap; any inward push is.
        assert!(!a.intersects(&Rect::new(32.0, 0.0, 32.0, 32.0)));
        assert!(a.intersects(&Rect::new(31.0, 0.0, 32.0, 32.0)));
    }

    #[test]
    fn segment_clips_wall() {
        let wall = Rect::new(4.0, -2.0, 2.0, 4.0);
        assert!(segment_intersects_rect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            &wall
        ));
    }

    #[test]
    fn segment_misses_wall() {
        let wall = Rect::new(4.0, 10.0, 2.0, 4.0);
        assert!(!segment_intersects_rect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            &wall
        ));
    }

    #[test]
    fn segment_ending_before_wall_misses() {
        let wall = Rect::new(4.0, -2.0, 2.0, 4.0);
        assert!(!segment_intersects_rect(
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            &wall
        ));
    }

    #[test]
    fn vertical_segment_through_wall() {
        let wall = Rect::new(-1.0, 2.0, 2.0, 2.0);
        assert!(segment_intersects_rect(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            &wall
        ));
    }
}
