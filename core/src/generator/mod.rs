use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    /// Returns a `(height, width)` mask with `true` wherever a mine goes.
    fn generate(self, config: BoardConfig) -> Array2<bool>;
}

/// Source of randomness for mine placement, injected into the engine so tests
/// can replace system entropy with something reproducible.
pub trait MineRng {
    /// Uniform index in `0..bound`. Callers never pass a zero bound.
    fn below(&mut self, bound: usize) -> usize;
}

impl<R: MineRng + ?Sized> MineRng for &mut R {
    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

/// Default generator: the standard PRNG seeded once.
#[derive(Debug)]
pub struct SeededRng(StdRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        let seed: u64 = rand::random();
        log::debug!("Seeding mine generator with {}", seed);
        Self::new(seed)
    }
}

impl MineRng for SeededRng {
    fn below(&mut self, bound: usize) -> usize {
        self.0.random_range(0..bound)
    }
}
