//! Random draws shared by stamp jitter, dab rotation and the river walk.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform draw in `[lo, hi]`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, lo: f32, hi: f32) -> f32 {
    lo + rand01(rng) * (hi - lo)
}

/// Uniform rotation in degrees.
#[inline]
pub(crate) fn rand_rotation(rng: &mut dyn Rng) -> f32 {
    rand01(rng) * 360.0
}

/// Seeded RNG, or one seeded from the thread RNG when `seed` is `None`.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(rand::make_rng, StdRng::seed_from_u64)
}
