//! Axis-aligned bounding boxes
//!
//! Entity counts stay small, so every pass in the game loop is a plain nested
//! loop over two collections. Keep it that way: the order in which pairs are
//! visited decides which entity is flagged first when several hits land in
//! the same tick.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Anything that occupies a box on the playfield
pub trait Bounded {
    fn bounds(&self) -> Rect;

    fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }
}

pub fn collides(a: &impl Bounded, b: &impl Bounded) -> bool {
    a.bounds().overlaps(&b.bounds())
}
