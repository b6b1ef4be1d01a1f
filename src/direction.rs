use crate::geometry::Vector2D;
use crate::glyph::Glyph;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Single-axis unit step. Screen rows grow downwards.
    pub fn delta(self) -> Vector2D {
        match self {
            Up => Vector2D::new(0, -1),
            Down => Vector2D::new(0, 1),
            Left => Vector2D::new(-1, 0),
            Right => Vector2D::new(1, 0),
        }
    }

    pub fn head_glyph(self) -> Glyph {
        Glyph::Head(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution_without_fixed_points() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn deltas_are_unit_steps_on_one_axis() {
        for d in Direction::ALL {
            let v = d.delta();
            assert_eq!(v.x.abs() + v.y.abs(), 1);
            assert_eq!(v + d.opposite().delta(), Vector2D::default());
        }
    }
}
