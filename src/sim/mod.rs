// sim/ - Particle populations
//
// Raindrops, splashes and the purple aura. Each population spawns, advances
// and culls itself once per tick; nothing here owns timers.

mod aura;
mod droplet;
mod splash;

pub use aura::{FalloffKernel, PurpleAura};
pub use droplet::{Droplets, GroundHit, RainContext};
pub use splash::Splashes;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seeded generator threaded through every spawner and generator.
pub type SceneRng = Xoshiro256PlusPlus;

/// Uniform in [min, max); returns `min` when the range is empty.
#[inline]
pub fn random_between(rng: &mut SceneRng, min: f32, max: f32) -> f32 {
    min + rng.r#gen::<f32>() * (max - min)
}

/// Uniform integer in [min, max], inclusive on both ends.
#[inline]
pub fn random_int(rng: &mut SceneRng, min: i32, max: i32) -> i32 {
    if max <= min { return min; }
    rng.gen_range(min..=max)
}

#[inline]
pub fn chance(rng: &mut SceneRng, p: f32) -> bool {
    rng.r#gen::<f32>() < p
}
