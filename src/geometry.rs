//! Axis-aligned shapes and the overlap test shared by every entity.
//!
//! Coordinates are screen space: X grows to the right and **Y grows
//! downward**. A shape's `top()` is therefore numerically *smaller* than its
//! `bottom()`, and "moving up" means decreasing Y.

use glam::Vec2;

use crate::error::GeometryError;

/// Anything with an axis-aligned extent.
pub trait Bounded {
    fn left(&self) -> f32;
    fn right(&self) -> f32;
    fn top(&self) -> f32;
    fn bottom(&self) -> f32;
}

/// Rectangle stored as a centre plus half-extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    /// Build a rectangle from its centre and full width/height.
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }
}

impl Bounded for Rect {
    fn left(&self) -> f32 {
        self.center.x - self.half_extents.x
    }
    fn right(&self) -> f32 {
        self.center.x + self.half_extents.x
    }
    fn top(&self) -> f32 {
        self.center.y - self.half_extents.y
    }
    fn bottom(&self) -> f32 {
        self.center.y + self.half_extents.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Bounded for Circle {
    fn left(&self) -> f32 {
        self.center.x - self.radius
    }
    fn right(&self) -> f32 {
        self.center.x + self.radius
    }
    fn top(&self) -> f32 {
        self.center.y - self.radius
    }
    fn bottom(&self) -> f32 {
        self.center.y + self.radius
    }
}

/// The bounds an entity carries: either shape, tagged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bounds {
    Rect(Rect),
    Circle(Circle),
}

impl Bounds {
    pub fn center(&self) -> Vec2 {
        match self {
            Bounds::Rect(r) => r.center,
            Bounds::Circle(c) => c.center,
        }
    }

    /// Shift the shape by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Bounds::Rect(r) => r.center += delta,
            Bounds::Circle(c) => c.center += delta,
        }
    }
}

impl Bounded for Bounds {
    fn left(&self) -> f32 {
        match self {
            Bounds::Rect(r) => r.left(),
            Bounds::Circle(c) => c.left(),
        }
    }
    fn right(&self) -> f32 {
        match self {
            Bounds::Rect(r) => r.right(),
            Bounds::Circle(c) => c.right(),
        }
    }
    fn top(&self) -> f32 {
        match self {
            Bounds::Rect(r) => r.top(),
            Bounds::Circle(c) => c.top(),
        }
    }
    fn bottom(&self) -> f32 {
        match self {
            Bounds::Rect(r) => r.bottom(),
            Bounds::Circle(c) => c.bottom(),
        }
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Bounds::Rect(r)
    }
}

impl From<Circle> for Bounds {
    fn from(c: Circle) -> Self {
        Bounds::Circle(c)
    }
}

/// Closed-interval AABB overlap. Symmetric; edges that merely touch count
/// as intersecting.
pub fn intersects<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> bool {
    a.right() >= b.left() && a.left() <= b.right() && a.bottom() >= b.top() && a.top() <= b.bottom()
}

/// Square root that refuses to produce NaN.
pub fn square_root(value: f64) -> Result<f64, GeometryError> {
    let root = value.sqrt();
    if root.is_nan() {
        return Err(GeometryError::NegativeRoot(value));
    }
    Ok(root)
}
