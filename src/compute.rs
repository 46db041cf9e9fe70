/// Frame-stepped game logic.
///
/// [`GameController`] owns the entity store and the round's state machine.
/// Drivers call [`GameController::step`] once per tick with that tick's
/// input, then [`GameController::draw`]. All randomness comes through the
/// injected RNG so tests can run with a seeded one.

use glam::Vec2;
use rand::Rng;

use crate::collision::{resolve_debris_world, resolve_projectile_debris};
use crate::config::GameConfig;
use crate::draw::DrawSink;
use crate::entities::{Debris, MassLevel, Player, Projectile, World};
use crate::error::{GameError, GeometryError};
use crate::geometry::square_root;
use crate::input::{InputSnapshot, Key};
use crate::store::{EntityStore, Handle};

// ── Debris field layout ──────────────────────────────────────────────────────

const FIELD_MIN_PIECES: usize = 4;
const FIELD_MAX_PIECES: usize = 12;
const FIELD_GAP: f32 = 5.0;

/// Columns and rows for a field of `count` pieces on a playfield `width`
/// wide: roughly square, but never wider than the playfield allows.
fn field_grid(count: usize, width: f32) -> Result<(usize, usize), GeometryError> {
    let pitch = Debris::FIELD_SIZE.x + FIELD_GAP;
    let max_cols = (((width + FIELD_GAP) / pitch).floor() as usize).max(1);
    let cols = (square_root(count as f64)?.ceil() as usize).clamp(1, max_cols);
    Ok((cols, count.div_ceil(cols)))
}

fn field_extent(cols: usize, rows: usize) -> Vec2 {
    let pitch = Debris::FIELD_SIZE + Vec2::splat(FIELD_GAP);
    Vec2::new(cols as f32, rows as f32) * pitch - Vec2::splat(FIELD_GAP)
}

/// Height of the tallest debris field that can spawn on a playfield
/// `width` wide.
pub(crate) fn tallest_debris_field(width: f32) -> Result<f32, GeometryError> {
    let mut tallest = 0.0_f32;
    for count in FIELD_MIN_PIECES..=FIELD_MAX_PIECES {
        let (cols, rows) = field_grid(count, width)?;
        tallest = tallest.max(field_extent(cols, rows).y);
    }
    Ok(tallest)
}

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Paused,
    InProgress,
    GameOver,
}

/// What the driver should do after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Exit,
}

pub struct GameController {
    config: GameConfig,
    store: EntityStore,
    state: GameState,
    frame: u64,
    round: u32,
    pause_held_last_frame: bool,
}

/// True on every `interval`-th frame. A zero interval never fires.
fn every(frame: u64, interval: u64) -> bool {
    interval != 0 && frame % interval == 0
}

impl GameController {
    /// Build the controller and start the first round. Fails with
    /// [`GameError::Config`] if `config` does not pass
    /// [`GameConfig::validate`].
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        config
            .validate()
            .map_err(|err| GameError::Config(err.to_string()))?;
        let mut controller = Self {
            config,
            store: EntityStore::new(),
            state: GameState::InProgress,
            frame: 0,
            round: 0,
            pause_held_last_frame: false,
        };
        controller.restart(rng)?;
        Ok(controller)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Frames simulated in the current round.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Rounds started so far, counting the first.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Hit points of the world, or `None` once it has been destroyed.
    pub fn world_hit_points(&self) -> Option<u32> {
        self.world_handle()
            .and_then(|handle| self.store.get(handle))
            .map(World::hit_points)
    }

    pub fn world_handle(&self) -> Option<Handle<World>> {
        self.store.handles_of::<World>().into_iter().next()
    }

    pub fn player_handle(&self) -> Option<Handle<Player>> {
        self.store.handles_of::<Player>().into_iter().next()
    }

    /// Advance one tick.
    pub fn step(
        &mut self,
        input: &InputSnapshot,
        rng: &mut impl Rng,
    ) -> Result<FrameOutcome, GameError> {
        if input.is_pressed(Key::Escape) {
            log::info!("exit requested");
            return Ok(FrameOutcome::Exit);
        }

        // Pause toggles on the press edge only; holding the key does nothing.
        // Restart below always leaves the new round in progress, so it wins
        // over a pause pressed on the same frame.
        let pause_down = input.is_pressed(Key::Pause);
        if pause_down && !self.pause_held_last_frame {
            self.toggle_pause();
        }
        self.pause_held_last_frame = pause_down;

        if input.is_pressed(Key::Restart) {
            self.restart(rng)?;
        }

        match self.state {
            GameState::Paused => {}
            GameState::GameOver => self.restart(rng)?,
            GameState::InProgress => self.advance(input, rng)?,
        }
        Ok(FrameOutcome::Continue)
    }

    /// Draw the current frame. Called every tick, paused or not.
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.store.draw_all(sink);
    }

    /// Throw away every entity and start a fresh round.
    pub fn restart(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        self.round += 1;
        log::info!("restarting, round {}", self.round);

        self.store.clear_all();
        self.frame = 0;
        self.state = GameState::InProgress;

        let width = self.config.width;
        let height = self.config.height;
        self.store.create(Player::new(
            Vec2::new(width / 2.0, height - World::HEIGHT - Player::HEIGHT),
            width,
            self.config.fire_cooldown,
        ));
        self.store.create(World::new(
            Vec2::new(width / 2.0, height - World::HEIGHT),
            width,
            self.config.max_hit_points,
        ));
        self.spawn_debris_field(rng)?;
        Ok(())
    }

    fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::InProgress => GameState::Paused,
            GameState::Paused => GameState::InProgress,
            GameState::GameOver => GameState::GameOver,
        };
        log::debug!("pause toggled, now {:?}", self.state);
    }

    /// One in-progress frame: update, spawn, collide, compact.
    fn advance(&mut self, input: &InputSnapshot, rng: &mut impl Rng) -> Result<(), GameError> {
        self.frame += 1;

        self.store.update_all(input);
        self.spawn_projectiles()?;

        if every(self.frame, self.config.spawn_interval) {
            self.spawn_debris(rng);
        }
        if every(self.frame, self.config.field_interval()) {
            self.spawn_debris_field(rng)?;
        }

        self.resolve_collisions()?;
        self.store.compact();

        if self.store.count_of::<World>() == 0 {
            log::info!(
                "world destroyed after {} frames in round {}, game over",
                self.frame,
                self.round
            );
            self.state = GameState::GameOver;
        }
        Ok(())
    }

    fn spawn_projectiles(&mut self) -> Result<(), GameError> {
        let mut muzzles = Vec::new();
        self.store.for_each_of_type(|player: &mut Player| {
            if player.is_shooting {
                muzzles.push(player.center());
            }
        })?;

        for muzzle in muzzles {
            log::trace!("shot fired from ({:.0}, {:.0})", muzzle.x, muzzle.y);
            self.store.create(Projectile::new(muzzle));
        }
        Ok(())
    }

    fn resolve_collisions(&mut self) -> Result<(), GameError> {
        let mut landed = 0;
        self.store
            .for_each_pair(|debris: &mut Debris, world: &mut World| {
                if resolve_debris_world(debris, world) {
                    landed += 1;
                }
            })?;

        let mut hits = 0;
        self.store
            .for_each_pair(|debris: &mut Debris, projectile: &mut Projectile| {
                if resolve_projectile_debris(debris, projectile) {
                    hits += 1;
                }
            })?;

        if landed > 0 || hits > 0 {
            log::debug!(
                "frame {}: {} debris landed, {} projectile hits",
                self.frame,
                landed,
                hits
            );
        }
        Ok(())
    }

    /// Drop a single small piece of random mass at a random column along
    /// the top edge.
    fn spawn_debris(&mut self, rng: &mut impl Rng) {
        let size = Debris::SMALL_SIZE;
        let half = size / 2.0;
        let max_x = (self.config.width - half.x).max(half.x);
        let x = rng.gen_range(half.x..=max_x);
        let mass = MassLevel::ALL[rng.gen_range(0..MassLevel::ALL.len())];

        log::debug!("spawning {:?} debris at x={:.0}", mass, x);
        self.store.create(Debris::new(Vec2::new(x, half.y), size, mass));
    }

    /// Drop a roughly square block of low-mass debris. The piece count and
    /// the offset are random. On a validated playfield the block always fits
    /// horizontally and lies entirely inside the top quarter.
    fn spawn_debris_field(&mut self, rng: &mut impl Rng) -> Result<usize, GameError> {
        let piece = Debris::FIELD_SIZE;
        let pitch = piece + Vec2::splat(FIELD_GAP);
        let width = self.config.width;
        let height = self.config.height;

        let count = rng.gen_range(FIELD_MIN_PIECES..=FIELD_MAX_PIECES);
        let (cols, rows) = field_grid(count, width)?;
        let field = field_extent(cols, rows);
        let max_x = (width - field.x).max(0.0);
        let max_y = (height / 4.0 - field.y).max(0.0);
        let origin = Vec2::new(rng.gen_range(0.0..=max_x), rng.gen_range(0.0..=max_y));

        for i in 0..count {
            let cell = Vec2::new((i % cols) as f32, (i / cols) as f32);
            let center = origin + piece / 2.0 + cell * pitch;
            self.store.create(Debris::new(center, piece, MassLevel::Low));
        }

        log::debug!(
            "spawned debris field: {} pieces in {}x{} at ({:.0}, {:.0})",
            count,
            cols,
            rows,
            origin.x,
            origin.y
        );
        Ok(count)
    }
}
