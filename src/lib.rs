//! Space Debris: defend the world from falling debris.
//!
//! The library is the frame-stepped game core; it knows nothing about
//! terminals, windows or clocks. Drivers feed it an [`input::InputSnapshot`]
//! per tick and hand it a [`draw::DrawSink`] to render into.

pub mod collision;
pub mod compute;
pub mod config;
pub mod draw;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod store;

pub use compute::{FrameOutcome, GameController, GameState};
pub use config::GameConfig;
pub use store::{EntityId, EntityStore, Handle};
