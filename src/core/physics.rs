use crate::domain::model::{ScreenPoint, TerrainElement, TileCoord};
use serde::{Deserialize, Serialize};

const CONTACT_ITERATIONS: u32 = 12;

/// Axis-aligned rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb {
    pub fn around(center: ScreenPoint, half_extent: f64) -> Self {
        Self {
            min_x: center.x - half_extent,
            min_y: center.y - half_extent,
            max_x: center.x + half_extent,
            max_y: center.y + half_extent,
        }
    }

    /// Touching edges do not count as an overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Rectangle offsets relative to a sprite center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl HitBox {
    fn symmetric(half_width: f64, bottom: f64, top: f64) -> Self {
        Self {
            left: -half_width,
            bottom,
            right: half_width,
            top,
        }
    }

    /// Hitbox of an element, sized from the tile.
    ///
    /// Trees reach far below their center because the trunk is drawn at the
    /// bottom of the sprite.
    pub fn for_element(element: TerrainElement, tile_width: f64, tile_height: f64) -> Self {
        let hw = tile_width * 0.3;
        let hh = tile_height * 0.3;

        if element.is_tree() {
            return Self::symmetric(hw * 0.45, -hh * 3.0, hh * 0.8);
        }

        match element {
            TerrainElement::StoneLarge => Self::symmetric(hw * 0.8, -hh * 1.2, hh * 0.6),
            TerrainElement::Log | TerrainElement::LogLarge => {
                Self::symmetric(hw * 0.9, -hh * 1.0, hh * 0.5)
            }
            TerrainElement::StoneTall => Self::symmetric(hw * 0.6, -hh * 0.8, hh * 0.4),
            _ => Self::symmetric(hw / 2.0, -hh / 2.0, hh / 2.0),
        }
    }

    /// Polygon corners, counter-clockwise from bottom-left.
    pub fn points(&self) -> [(f64, f64); 4] {
        [
            (self.left, self.bottom),
            (self.right, self.bottom),
            (self.right, self.top),
            (self.left, self.top),
        ]
    }

    pub fn at(&self, center: ScreenPoint) -> Aabb {
        Aabb {
            min_x: center.x + self.left,
            min_y: center.y + self.bottom,
            max_x: center.x + self.right,
            max_y: center.y + self.top,
        }
    }
}

/// A colliding terrain element placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    pub tile: TileCoord,
    pub position: ScreenPoint,
    pub element: TerrainElement,
    pub hitbox: HitBox,
    /// `hitbox` placed at `position`.
    pub bounds: Aabb,
}

impl Wall {
    pub fn new(tile: TileCoord, position: ScreenPoint, element: TerrainElement, hitbox: HitBox) -> Self {
        Self {
            tile,
            position,
            element,
            hitbox,
            bounds: hitbox.at(position),
        }
    }
}

/// Moves a square body through walls, one axis at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsEngine {
    half_extent: f64,
}

impl PhysicsEngine {
    pub fn new(half_extent: f64) -> Self {
        Self { half_extent }
    }

    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    pub fn collides(&self, center: ScreenPoint, walls: &[&Wall]) -> bool {
        let body = Aabb::around(center, self.half_extent);
        walls.iter().any(|wall| body.overlaps(&wall.bounds))
    }

    /// Attempts to move by `(dx, dy)` and returns where the body ends up.
    ///
    /// X is resolved before Y. A blocked axis stops at the last contact-free
    /// fraction of its step; a body that already overlaps a wall cannot move
    /// along that axis at all.
    pub fn step(&self, from: ScreenPoint, dx: f64, dy: f64, walls: &[&Wall]) -> ScreenPoint {
        let moved_x = self.resolve_axis(from, dx, 0.0, walls);
        self.resolve_axis(moved_x, 0.0, dy, walls)
    }

    fn resolve_axis(&self, from: ScreenPoint, dx: f64, dy: f64, walls: &[&Wall]) -> ScreenPoint {
        if dx == 0.0 && dy == 0.0 {
            return from;
        }

        let target = from.offset(dx, dy);
        if !self.collides(target, walls) {
            return target;
        }
        if self.collides(from, walls) {
            return from;
        }

        let (mut free, mut blocked) = (0.0_f64, 1.0_f64);
        for _ in 0..CONTACT_ITERATIONS {
            let mid = (free + blocked) / 2.0;
            if self.collides(from.offset(dx * mid, dy * mid), walls) {
                blocked = mid;
            } else {
                free = mid;
            }
        }

        from.offset(dx * free, dy * free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at(x: f64, y: f64, element: TerrainElement) -> Wall {
        Wall::new(
            TileCoord::new(0, 0),
            ScreenPoint::new(x, y),
            element,
            HitBox::for_element(element, 128.0, 64.0),
        )
    }

    #[test]
    fn test_tree_hitbox_extends_below_center() {
        let hitbox = HitBox::for_element(TerrainElement::TreeOakFall, 128.0, 64.0);
        let hw = 128.0 * 0.3;
        let hh = 64.0 * 0.3;
        assert!((hitbox.left + hw * 0.45).abs() < 1e-9);
        assert!((hitbox.bottom + hh * 3.0).abs() < 1e-9);
        assert!((hitbox.top - hh * 0.8).abs() < 1e-9);
        assert_eq!(hitbox.points()[0], (hitbox.left, hitbox.bottom));
        assert_eq!(hitbox.points()[2], (hitbox.right, hitbox.top));
    }

    #[test]
    fn test_log_hitboxes_match() {
        assert_eq!(
            HitBox::for_element(TerrainElement::Log, 128.0, 64.0),
            HitBox::for_element(TerrainElement::LogLarge, 128.0, 64.0)
        );
    }

    #[test]
    fn test_bush_uses_default_box() {
        let hitbox = HitBox::for_element(TerrainElement::BushSmall, 128.0, 64.0);
        assert!((hitbox.right - 19.2).abs() < 1e-9);
        assert!((hitbox.top - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_wall_keeps_its_hitbox() {
        let stone = wall_at(100.0, 50.0, TerrainElement::StoneLarge);
        assert_eq!(stone.hitbox, HitBox::for_element(TerrainElement::StoneLarge, 128.0, 64.0));
        assert_eq!(stone.bounds, stone.hitbox.at(stone.position));
        let (left, bottom) = stone.hitbox.points()[0];
        assert!((stone.bounds.min_x - (100.0 + left)).abs() < 1e-9);
        assert!((stone.bounds.min_y - (50.0 + bottom)).abs() < 1e-9);
    }

    #[test]
    fn test_free_movement() {
        let engine = PhysicsEngine::new(16.0);
        let end = engine.step(ScreenPoint::new(0.0, 0.0), 5.0, -3.0, &[]);
        assert_eq!(end, ScreenPoint::new(5.0, -3.0));
    }

    #[test]
    fn test_blocked_axis_stops_at_contact() {
        let engine = PhysicsEngine::new(16.0);
        let stone = wall_at(100.0, 0.0, TerrainElement::StoneTall);
        // stone left edge: 100 - 38.4*0.6 = 76.96; body right edge reaches it at x = 60.96
        let end = engine.step(ScreenPoint::new(55.0, 0.0), 8.0, 0.0, &[&stone]);
        assert!(end.x <= 60.96 + 1e-9);
        assert!(end.x > 60.96 - 8.0 / 1024.0);
        assert_eq!(end.y, 0.0);
    }

    #[test]
    fn test_sliding_along_wall_keeps_other_axis() {
        let engine = PhysicsEngine::new(16.0);
        let stone = wall_at(100.0, 0.0, TerrainElement::StoneTall);
        let end = engine.step(ScreenPoint::new(60.0, 0.0), 8.0, 4.0, &[&stone]);
        assert!((end.x - 60.96).abs() < 8.0 / 1024.0);
        assert_eq!(end.y, 4.0);
    }

    #[test]
    fn test_overlapping_body_cannot_move() {
        let engine = PhysicsEngine::new(16.0);
        let tree = wall_at(0.0, 0.0, TerrainElement::TreeThinFall);
        let end = engine.step(ScreenPoint::new(0.0, 0.0), 8.0, 8.0, &[&tree]);
        assert_eq!(end, ScreenPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_touching_is_not_overlapping() {
        let a = Aabb::around(ScreenPoint::new(0.0, 0.0), 1.0);
        let b = Aabb::around(ScreenPoint::new(2.0, 0.0), 1.0);
        assert!(!a.overlaps(&b));
        let c = Aabb::around(ScreenPoint::new(1.5, 0.5), 1.0);
        assert!(a.overlaps(&c));
    }
}
