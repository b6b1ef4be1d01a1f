use crate::direction::Direction::{self, *};

/// Cosmetic variants for body segments. Grown segments cycle through them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyGlyph {
    Solid,
    Dense,
    Light,
}

impl BodyGlyph {
    pub fn next(self) -> BodyGlyph {
        match self {
            BodyGlyph::Solid => BodyGlyph::Dense,
            BodyGlyph::Dense => BodyGlyph::Light,
            BodyGlyph::Light => BodyGlyph::Solid,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Head(Direction),
    Body(BodyGlyph),
    Apple,
    DeadBody,
    Obstacle,
}

impl Glyph {
    pub fn to_char(self) -> char {
        match self {
            Glyph::Head(Up) => '^',
            Glyph::Head(Down) => 'v',
            Glyph::Head(Left) => '<',
            Glyph::Head(Right) => '>',
            Glyph::Body(BodyGlyph::Solid) => '█',
            Glyph::Body(BodyGlyph::Dense) => '▓',
            Glyph::Body(BodyGlyph::Light) => '▒',
            Glyph::Apple => 'O',
            Glyph::DeadBody => 'X',
            Glyph::Obstacle => '#',
        }
    }
}
