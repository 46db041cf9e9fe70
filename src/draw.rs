//! The draw sink the core renders into.
//!
//! The core never reads back from a sink; it only hands over shapes and
//! fill colours. The terminal driver implements [`DrawSink`] with crossterm,
//! tests use [`RecordingSink`].

use crate::geometry::Bounds;

/// 24-bit fill colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(220, 40, 40);
    pub const ORANGE: Rgb = Rgb::new(240, 140, 30);
    pub const YELLOW: Rgb = Rgb::new(240, 220, 60);
    pub const BLUE: Rgb = Rgb::new(40, 80, 230);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear blend; `t = 0.0` is `self`, `t = 1.0` is `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

pub trait DrawSink {
    fn fill(&mut self, shape: &Bounds, color: Rgb);
}

/// Headless sink that remembers every draw call, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<(Bounds, Rgb)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawSink for RecordingSink {
    fn fill(&mut self, shape: &Bounds, color: Rgb) {
        self.calls.push((*shape, color));
    }
}
