/// Game entities: the capability every entity shares, and the four concrete
/// kinds that implement it.
///
/// An entity is composition, not a shape hierarchy: each one holds a bounds
/// value plus its own behaviour behind the [`Entity`] trait.

use std::any::Any;

use glam::Vec2;

use crate::draw::{DrawSink, Rgb};
use crate::geometry::{Bounded, Bounds, Circle, Rect};
use crate::input::{InputSnapshot, Key};

// ── Capability ────────────────────────────────────────────────────────────────

/// What the store needs from anything it owns.
///
/// `destroy` is one-way: nothing can clear the flag once it is set, and the
/// next `EntityStore::compact` frees the entity.
pub trait Entity: Any {
    fn update(&mut self, input: &InputSnapshot);
    fn draw(&self, sink: &mut dyn DrawSink);
    fn bounds(&self) -> Bounds;
    fn is_destroyed(&self) -> bool;
    fn destroy(&mut self);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    body: Rect,
    velocity: Vec2,
    track_width: f32,
    fire_cooldown: u32,
    cooldown: u32,
    /// True only on the frames a shot leaves the gun.
    pub is_shooting: bool,
    destroyed: bool,
}

impl Player {
    pub const WIDTH: f32 = 20.0;
    pub const HEIGHT: f32 = 20.0;
    pub const SPEED: f32 = 8.0;
    pub const COLOR: Rgb = Rgb::WHITE;

    pub fn new(center: Vec2, track_width: f32, fire_cooldown: u32) -> Self {
        Self {
            body: Rect::new(center, Vec2::new(Self::WIDTH, Self::HEIGHT)),
            velocity: Vec2::ZERO,
            track_width,
            fire_cooldown,
            cooldown: 0,
            is_shooting: false,
            destroyed: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center
    }

    pub fn body(&self) -> &Rect {
        &self.body
    }

    /// Frames left before the next shot is allowed.
    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }
}

impl Entity for Player {
    fn update(&mut self, input: &InputSnapshot) {
        self.velocity.x = if input.is_pressed(Key::Left) && self.body.left() > 0.0 {
            -Self::SPEED
        } else if input.is_pressed(Key::Right) && self.body.right() < self.track_width {
            Self::SPEED
        } else {
            0.0
        };
        self.body.center += self.velocity;

        // One shot per `fire_cooldown` frames while Fire is held.
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown == 0 && input.is_pressed(Key::Fire) {
            self.cooldown = self.fire_cooldown;
            self.is_shooting = true;
        } else {
            self.is_shooting = false;
        }
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        sink.fill(&self.bounds(), Self::COLOR);
    }

    fn bounds(&self) -> Bounds {
        self.body.into()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    body: Circle,
    velocity: Vec2,
    destroyed: bool,
}

impl Projectile {
    pub const RADIUS: f32 = 5.0;
    pub const SPEED: f32 = 10.0;
    pub const COLOR: Rgb = Rgb::WHITE;

    pub fn new(center: Vec2) -> Self {
        Self {
            body: Circle::new(center, Self::RADIUS),
            velocity: Vec2::new(0.0, -Self::SPEED),
            destroyed: false,
        }
    }

    pub fn body(&self) -> &Circle {
        &self.body
    }
}

impl Entity for Projectile {
    fn update(&mut self, _input: &InputSnapshot) {
        self.body.center += self.velocity;
        if self.body.top() < 0.0 {
            self.velocity = Vec2::ZERO;
            self.destroy();
        }
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        sink.fill(&self.bounds(), Self::COLOR);
    }

    fn bounds(&self) -> Bounds {
        self.body.into()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── Debris ────────────────────────────────────────────────────────────────────

/// How many more hits a piece of debris can take. Declared low to high so
/// the derived ordering gives `High > Med > Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MassLevel {
    Low,
    Med,
    High,
}

impl MassLevel {
    pub const ALL: [MassLevel; 3] = [MassLevel::Low, MassLevel::Med, MassLevel::High];

    /// One step lighter, or `None` when already at `Low`.
    pub fn demote(self) -> Option<MassLevel> {
        match self {
            MassLevel::High => Some(MassLevel::Med),
            MassLevel::Med => Some(MassLevel::Low),
            MassLevel::Low => None,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            MassLevel::High => Rgb::RED,
            MassLevel::Med => Rgb::ORANGE,
            MassLevel::Low => Rgb::YELLOW,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Debris {
    body: Rect,
    velocity: Vec2,
    mass: MassLevel,
    destroyed: bool,
}

impl Debris {
    /// Size of a lone piece dropped on the spawn cadence.
    pub const SMALL_SIZE: Vec2 = Vec2::new(30.0, 20.0);
    /// Size of each piece in a debris field.
    pub const FIELD_SIZE: Vec2 = Vec2::new(80.0, 30.0);
    pub const SPEED: f32 = 2.0;

    pub fn new(center: Vec2, size: Vec2, mass: MassLevel) -> Self {
        Self {
            body: Rect::new(center, size),
            velocity: Vec2::new(0.0, Self::SPEED),
            mass,
            destroyed: false,
        }
    }

    pub fn mass(&self) -> MassLevel {
        self.mass
    }

    pub fn body(&self) -> &Rect {
        &self.body
    }

    /// Take one projectile hit: lose a mass level, or break apart when
    /// there is no lighter level left.
    pub fn absorb_hit(&mut self) {
        match self.mass.demote() {
            Some(lighter) => self.mass = lighter,
            None => self.destroy(),
        }
    }
}

impl Entity for Debris {
    fn update(&mut self, _input: &InputSnapshot) {
        self.body.center += self.velocity;
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        sink.fill(&self.bounds(), self.mass.color());
    }

    fn bounds(&self) -> Bounds {
        self.body.into()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The baseline being defended. Its hit points are the round's life.
#[derive(Clone, Debug)]
pub struct World {
    body: Rect,
    max_hit_points: u32,
    hit_points: u32,
    hit_points_last_frame: u32,
    color: Rgb,
    destroyed: bool,
}

impl World {
    pub const HEIGHT: f32 = 30.0;
    pub const HEALTHY_COLOR: Rgb = Rgb::BLUE;
    pub const DYING_COLOR: Rgb = Rgb::RED;

    pub fn new(center: Vec2, width: f32, max_hit_points: u32) -> Self {
        Self {
            body: Rect::new(center, Vec2::new(width, Self::HEIGHT)),
            max_hit_points,
            hit_points: max_hit_points,
            hit_points_last_frame: max_hit_points,
            color: Self::HEALTHY_COLOR,
            destroyed: max_hit_points == 0,
        }
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> u32 {
        self.max_hit_points
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn body(&self) -> &Rect {
        &self.body
    }

    /// Lose one hit point, never going below zero. Reaching zero destroys
    /// the world.
    pub fn take_hit(&mut self) {
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.destroy();
        }
    }

    fn color_for(&self, hit_points: u32) -> Rgb {
        if self.max_hit_points == 0 {
            return Self::DYING_COLOR;
        }
        let lost = 1.0 - hit_points as f32 / self.max_hit_points as f32;
        Self::HEALTHY_COLOR.lerp(Self::DYING_COLOR, lost)
    }
}

impl Entity for World {
    fn update(&mut self, _input: &InputSnapshot) {
        if self.hit_points != self.hit_points_last_frame {
            self.color = self.color_for(self.hit_points);
            log::debug!(
                "world hit points {} -> {}",
                self.hit_points_last_frame,
                self.hit_points
            );
        }
        self.hit_points_last_frame = self.hit_points;
    }

    fn draw(&self, sink: &mut dyn DrawSink) {
        sink.fill(&self.bounds(), self.color);
    }

    fn bounds(&self) -> Bounds {
        self.body.into()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
