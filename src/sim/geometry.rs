//! Axis-aligned boxes, facing directions and world bounds
//!
//! Everything in the game is a rectangle: hit tests are plain AABB overlap,
//! no spatial index. Populations are capped at a few dozen entities, so the
//! per-frame cost is O(projectiles × enemies).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Strict AABB overlap; touching edges don't count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Playfield extents, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether a point lies inside the world (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Clamp a box's top-left so the whole box stays inside the world
    pub fn clamp_pos(&self, pos: Vec2, size: Vec2) -> Vec2 {
        Vec2::new(
            pos.x.min(self.width - size.x).max(0.0),
            pos.y.min(self.height - size.y).max(0.0),
        )
    }
}

/// Cardinal facing, screen orientation (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Up,
    Left,
    Down,
}

impl Facing {
    /// Order extra fire streams are added in, starting after the primary facing
    pub const CYCLE: [Facing; 4] = [Facing::Right, Facing::Up, Facing::Left, Facing::Down];

    pub fn unit(&self) -> Vec2 {
        match self {
            Facing::Right => Vec2::X,
            Facing::Up => Vec2::NEG_Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Down => Vec2::Y,
        }
    }

    /// Facing `steps` places further along `CYCLE`
    pub fn rotated(&self, steps: usize) -> Facing {
        let start = Self::CYCLE.iter().position(|f| f == self).unwrap_or(0);
        Self::CYCLE[(start + steps) % Self::CYCLE.len()]
    }

    /// Closest cardinal to a vector (ties go vertical)
    pub fn from_vector(v: Vec2) -> Facing {
        if v.x.abs() > v.y.abs() {
            if v.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if v.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&a, &c));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_clamp_pos() {
        let world = WorldBounds::new(100.0, 100.0);
        let size = Vec2::splat(20.0);
        assert_eq!(world.clamp_pos(Vec2::new(-5.0, 90.0), size), Vec2::new(0.0, 80.0));
        assert_eq!(world.clamp_pos(Vec2::new(30.0, 30.0), size), Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_world_contains_edges() {
        let world = WorldBounds::new(100.0, 50.0);
        assert!(world.contains(Vec2::new(0.0, 0.0)));
        assert!(world.contains(Vec2::new(100.0, 50.0)));
        assert!(!world.contains(Vec2::new(100.1, 10.0)));
        assert!(!world.contains(Vec2::new(10.0, -0.1)));
    }

    #[test]
    fn test_facing_cycle() {
        assert_eq!(Facing::Right.rotated(1), Facing::Up);
        assert_eq!(Facing::Left.rotated(2), Facing::Right);
        assert_eq!(Facing::Down.rotated(4), Facing::Down);
    }

    #[test]
    fn test_facing_from_vector() {
        assert_eq!(Facing::from_vector(Vec2::new(5.0, 1.0)), Facing::Right);
        assert_eq!(Facing::from_vector(Vec2::new(-5.0, 1.0)), Facing::Left);
        assert_eq!(Facing::from_vector(Vec2::new(1.0, 5.0)), Facing::Down);
        assert_eq!(Facing::from_vector(Vec2::new(1.0, -5.0)), Facing::Up);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.1f32..200.0, 0.1f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_rect_overlaps_itself(a in arb_rect()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn prop_clamped_box_fits(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            s in 1.0f32..80.0,
        ) {
            let world = WorldBounds::new(3000.0, 3000.0);
            let p = world.clamp_pos(Vec2::new(x, y), Vec2::splat(s));
            prop_assert!(p.x >= 0.0 && p.x + s <= 3000.0);
            prop_assert!(p.y >= 0.0 && p.y + s <= 3000.0);
        }
    }
}
