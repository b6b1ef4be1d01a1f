use std::ops::{Add, Sub};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector2D {
    pub x: i32,
    pub y: i32,
}

impl Vector2D {
    pub const fn new(x: i32, y: i32) -> Self {
        Vector2D { x, y }
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, other: Vector2D) -> Vector2D {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, other: Vector2D) -> Vector2D {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle. Game-space positions inside it are relative to
/// `origin` and lie in `[0, width) x [0, height)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect2D {
    pub origin: Vector2D,
    pub width: u16,
    pub height: u16,
}

impl Rect2D {
    pub fn new(origin: Vector2D, width: u16, height: u16) -> Self {
        Rect2D { origin, width, height }
    }

    pub fn bottom_right(&self) -> Vector2D {
        self.origin + Vector2D::new(self.width as i32, self.height as i32)
    }

    /// Whether a game-space position lies inside the rectangle.
    pub fn contains(&self, pos: Vector2D) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn to_screen(&self, pos: Vector2D) -> Vector2D {
        self.origin + pos
    }

    /// Every game-space cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Vector2D> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Vector2D::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic() {
        let a = Vector2D::new(3, -2);
        let b = Vector2D::new(-1, 5);
        assert_eq!(a + b, Vector2D::new(2, 3));
        assert_eq!(a - b, Vector2D::new(4, -7));
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn rect_bottom_right_and_contains() {
        let rect = Rect2D::new(Vector2D::new(2, 1), 10, 5);
        assert_eq!(rect.bottom_right(), Vector2D::new(12, 6));
        assert!(rect.contains(Vector2D::new(0, 0)));
        assert!(rect.contains(Vector2D::new(9, 4)));
        assert!(!rect.contains(Vector2D::new(10, 4)));
        assert!(!rect.contains(Vector2D::new(0, -1)));
        assert_eq!(rect.to_screen(Vector2D::new(1, 1)), Vector2D::new(3, 2));
    }

    #[test]
    fn cells_cover_the_area_once() {
        let rect = Rect2D::new(Vector2D::default(), 4, 3);
        let cells: Vec<_> = rect.cells().collect();
        assert_eq!(cells.len(), rect.area());
        assert_eq!(cells[0], Vector2D::new(0, 0));
        assert_eq!(cells[5], Vector2D::new(1, 1));
        assert!(cells.iter().all(|c| rect.contains(*c)));
    }
}
