use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seeded pseudo-random stream owned by a learner.
///
/// The stream remembers a snapshot of its generator state. [`reset`]
/// rewinds to that snapshot, so a learner that resets at the start of every
/// training call reproduces the same draws on every call; a learner that
/// does not reset keeps consuming one continuous stream across calls.
///
/// [`reset`]: RandomStream::reset
#[derive(Debug, Clone)]
pub struct RandomStream {
    seed: u64,
    rng: StdRng,
    snapshot: StdRng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self {
            seed,
            snapshot: rng.clone(),
            rng,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewinds the generator to the last snapshot.
    pub fn reset(&mut self) {
        self.rng = self.snapshot.clone();
    }

    /// Makes the current generator state the new reset point.
    pub fn take_snapshot(&mut self) {
        self.snapshot = self.rng.clone();
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for RandomStream {
    fn default() -> Self {
        Self::new(42)
    }
}
