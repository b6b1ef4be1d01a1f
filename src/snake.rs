use crate::direction::Direction;
use crate::geometry::{Rect2D, Vector2D};
use crate::glyph::{BodyGlyph, Glyph};
use crossterm::style::Color;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub glyph: Glyph,
    pub position: Vector2D,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is the cell the body left behind, if nothing occupies it anymore.
    Moved { new_head: Vector2D, old_head: Vector2D, old_tail: Option<Vector2D> },
    Crashed { head: Vector2D, old_tail: Option<Vector2D> },
}

#[derive(Clone, Debug)]
pub struct Snake {
    segments: Vec<Segment>,
    direction: Direction,
    alive: bool,
    color: Color,
    next_body: BodyGlyph,
}

impl Snake {
    /// Builds a snake with its head at `head` and the rest of the body trailing
    /// behind it, opposite to `direction`.
    pub fn new(head: Vector2D, size: usize, direction: Direction) -> Self {
        let back = direction.opposite().delta();
        let mut next_body = BodyGlyph::Solid;
        let mut segments = vec![Segment { glyph: direction.head_glyph(), position: head }];

        let mut pos = head;
        for _ in 1..size.max(1) {
            pos = pos + back;
            segments.push(Segment { glyph: Glyph::Body(next_body), position: pos });
            next_body = next_body.next();
        }

        Snake { segments, direction, alive: true, color: Color::Green, next_body }
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Turning straight back is ignored. Any other heading takes effect right
    /// away, head glyph included.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.direction.opposite() {
            return false;
        }

        self.direction = requested;
        self.segments[0].glyph = requested.head_glyph();
        true
    }

    pub fn advance(&mut self, bounds: Rect2D) -> MoveResult {
        if !self.alive {
            return Crashed { head: self.head().position, old_tail: None };
        }

        let old_head = self.head().position;
        let new_head = wrap(old_head + self.direction.delta(), bounds);

        // Ripple: every segment takes its predecessor's previous position
        let old_last = self.segments[self.segments.len() - 1].position;
        for i in (1..self.segments.len()).rev() {
            self.segments[i].position = self.segments[i - 1].position;
        }
        self.segments[0].position = new_head;

        let old_tail = if self.collides_with(old_last) { None } else { Some(old_last) };

        if self.segments[1..].iter().any(|s| s.position == new_head) {
            self.alive = false;
            return Crashed { head: new_head, old_tail };
        }

        Moved { new_head, old_head, old_tail }
    }

    /// Appends a segment on top of the current tail; it separates on the next move.
    pub fn grow(&mut self) {
        let tail = self.segments[self.segments.len() - 1].position;
        self.segments.push(Segment { glyph: Glyph::Body(self.next_body), position: tail });
        self.next_body = self.next_body.next();
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn collides_with(&self, pos: Vector2D) -> bool {
        self.segments.iter().any(|s| s.position == pos)
    }
}

/// Toroidal wraparound: leaving one edge re-enters at the opposite one.
pub fn wrap(pos: Vector2D, bounds: Rect2D) -> Vector2D {
    let wrap_axis = |v: i32, bound: u16| {
        let bound = bound as i32;
        if v < 0 {
            bound - 1
        } else if v >= bound {
            0
        } else {
            v
        }
    };

    Vector2D::new(wrap_axis(pos.x, bounds.width), wrap_axis(pos.y, bounds.height))
}
