use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lower bound of the default measurement noise (ms).
pub const DEFAULT_JITTER_MIN_MS: f64 = 0.1;
/// Upper bound of the default measurement noise (ms).
pub const DEFAULT_JITTER_MAX_MS: f64 = 0.4;

/// Source of measurement noise added to every simulated probe sample.
pub trait JitterSource: std::fmt::Debug + Send {
    /// Next noise sample in milliseconds.
    fn sample_ms(&mut self) -> f64;
}

/// Uniform noise over `[min_ms, max_ms]`, reproducible when seeded.
#[derive(Debug, Clone)]
pub struct UniformJitter {
    rng: StdRng,
    min_ms: f64,
    max_ms: f64,
}

impl UniformJitter {
    pub fn new(rng: StdRng, min_ms: f64, max_ms: f64) -> Self {
        let (min_ms, max_ms) = if min_ms <= max_ms { (min_ms, max_ms) } else { (max_ms, min_ms) };
        Self { rng, min_ms, max_ms }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), DEFAULT_JITTER_MIN_MS, DEFAULT_JITTER_MAX_MS)
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng(), DEFAULT_JITTER_MIN_MS, DEFAULT_JITTER_MAX_MS)
    }
}

impl JitterSource for UniformJitter {
    fn sample_ms(&mut self) -> f64 {
        self.rng.random_range(self.min_ms..=self.max_ms)
    }
}

/// Constant noise. `FixedJitter(0.0)` turns jitter off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample_ms(&mut self) -> f64 {
        self.0
    }
}
