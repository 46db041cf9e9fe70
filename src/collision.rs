//! Collision rules between entity kinds.
//!
//! Each rule only touches the two entities it is given, so they can be
//! applied pair by pair in any order. The only state shared between pairs is
//! the world's hit points, and decrementing those commutes.

use crate::entities::{Debris, Entity, Projectile, World};
use crate::geometry::{intersects, Bounded};

/// A projectile hitting debris knocks off one mass level and is used up.
/// Debris that is already at the lowest level is destroyed too.
///
/// Returns `true` if the two were touching.
pub fn resolve_projectile_debris(debris: &mut Debris, projectile: &mut Projectile) -> bool {
    if !intersects(debris.body(), projectile.body()) {
        return false;
    }
    debris.absorb_hit();
    projectile.destroy();
    true
}

/// Debris whose bottom edge reaches the world's top edge is destroyed and
/// costs the world one hit point.
///
/// Returns `true` if the debris landed.
pub fn resolve_debris_world(debris: &mut Debris, world: &mut World) -> bool {
    if debris.body().bottom() < world.body().top() {
        return false;
    }
    debris.destroy();
    world.take_hit();
    true
}
