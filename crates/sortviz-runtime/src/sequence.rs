#![forbid(unsafe_code)]

//! Bar heights for a run.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// The values `1..=len` in random order.
pub fn shuffled<R: rand::Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<i32> {
    let top = i32::try_from(len).unwrap_or(i32::MAX);
    let mut values: Vec<i32> = (1..=top).collect();
    values.shuffle(rng);
    values
}

/// A reproducible generator when `seed` is given, an entropy-seeded one
/// otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}
