//! Gaussian random source for phase errors and AWGN
//!
//! PCG32 uniform stream feeding a Box-Muller transform. Each transform yields
//! two deviates; the second is cached and handed out on the next call.

use rand::{Rng, RngCore};
use rand_pcg::Pcg32;
use std::f64::consts::PI;

/// Uniform draws at or below this are rejected to keep ln(u) finite
pub const MIN_UNIFORM: f64 = 1e-7;

/// Seeded Gaussian generator
///
/// Owned by the caller and passed into every kernel that needs randomness.
/// Give each concurrent worker its own instance (see [`GaussianSource::fork`]).
#[derive(Debug, Clone)]
pub struct GaussianSource {
    /// PCG32 with state = seed, increment = (seed << 1) | 1
    rng: Pcg32,

    /// Cached second sample from Box-Muller (unit variance)
    cached: Option<f64>,
}

impl GaussianSource {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::new(seed, seed);
        // First output is strongly correlated with the seed
        rng.next_u32();
        Self { rng, cached: None }
    }

    /// Reset to the stream for `seed`, dropping any cached deviate.
    pub fn reseed(&mut self, seed: u64) {
        log::trace!("reseeding gaussian source with {}", seed);
        *self = Self::new(seed);
    }

    /// Derive an independent generator from this one's stream.
    pub fn fork(&mut self) -> Self {
        let seed: u64 = self.rng.gen();
        Self::new(seed)
    }

    /// Uniform draw in (MIN_UNIFORM, 1)
    fn next_uniform(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.gen();
            if u > MIN_UNIFORM {
                return u;
            }
        }
    }

    /// Next N(0, 1) deviate
    pub fn standard_normal(&mut self) -> f64 {
        if let Some(cached) = self.cached.take() {
            return cached;
        }

        let u1 = self.next_uniform();
        let u2: f64 = self.rng.gen();

        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        self.cached = Some(r * theta.sin());
        r * theta.cos()
    }

    /// Next N(mean, std_dev²) deviate
    #[inline]
    pub fn sample_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        mean + std_dev * self.standard_normal()
    }

    /// True when the next call will be served from the Box-Muller cache
    pub fn has_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reseed_reproducible() {
        let mut g = GaussianSource::new(7);
        let first: Vec<f64> = (0..101).map(|_| g.sample_gaussian(0.0, 1.0)).collect();

        g.reseed(7);
        let second: Vec<f64> = (0..101).map(|_| g.sample_gaussian(0.0, 1.0)).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_reseed_clears_cache() {
        let mut g = GaussianSource::new(3);
        g.standard_normal();
        assert!(g.has_cached(), "odd draw should leave a cached deviate");

        g.reseed(3);
        assert!(!g.has_cached());
    }

    #[test]
    fn test_pair_served_from_cache() {
        let mut g = GaussianSource::new(11);
        let mut shadow = g.clone();

        let _z0 = g.standard_normal();
        let z1 = g.standard_normal();

        // Recompute the pair by hand from the same uniform stream
        let _ = shadow.standard_normal();
        let cached = shadow.cached.take().unwrap();
        assert_eq!(z1, cached);
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = GaussianSource::new(1);
        let mut b = GaussianSource::new(2);

        let same = (0..100)
            .filter(|_| a.standard_normal() == b.standard_normal())
            .count();
        assert!(same < 5, "{} identical draws across seeds", same);
    }

    #[test]
    fn test_fork_is_deterministic_and_independent() {
        let mut parent1 = GaussianSource::new(42);
        let mut parent2 = GaussianSource::new(42);

        let mut child1 = parent1.fork();
        let mut child2 = parent2.fork();

        for _ in 0..50 {
            assert_eq!(child1.standard_normal(), child2.standard_normal());
        }

        let mut parent = GaussianSource::new(42);
        let mut child = parent.fork();
        let same = (0..100)
            .filter(|_| parent.standard_normal() == child.standard_normal())
            .count();
        assert!(same < 5, "fork tracks its parent on {} draws", same);
    }

    #[test]
    fn test_sample_statistics() {
        let mut g = GaussianSource::new(42);

        let n = 20000;
        let samples: Vec<f64> = (0..n).map(|_| g.sample_gaussian(2.0, 3.0)).collect();

        let mean: f64 = samples.iter().sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.1, "Mean {} should be close to 2", mean);

        let variance: f64 = samples.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>() / n as f64;
        assert!((variance - 9.0).abs() < 0.5, "Variance {} should be close to 9", variance);
    }

    #[test]
    fn test_samples_are_gaussian() {
        let mut g = GaussianSource::new(42);

        let num_samples = 100000usize;
        let samples: Vec<f64> = (0..num_samples).map(|_| g.standard_normal()).collect();

        let mean: f64 = samples.iter().sum::<f64>() / num_samples as f64;
        let std: f64 = (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
            / num_samples as f64).sqrt();

        let within = |k: f64| samples.iter()
            .filter(|&x| (x - mean).abs() < k * std)
            .count() as f64 / num_samples as f64;

        assert!((within(1.0) - 0.683).abs() < 0.02,
            "1σ coverage {} should be ~0.683", within(1.0));
        assert!((within(2.0) - 0.954).abs() < 0.01,
            "2σ coverage {} should be ~0.954", within(2.0));
        assert!((within(3.0) - 0.997).abs() < 0.01,
            "3σ coverage {} should be ~0.997", within(3.0));
    }

    #[test]
    fn test_zero_std_returns_mean() {
        let mut g = GaussianSource::new(5);
        for _ in 0..10 {
            assert_eq!(g.sample_gaussian(1.5, 0.0), 1.5);
        }
    }

    #[test]
    fn test_numerical_stability() {
        let mut g = GaussianSource::new(42);

        let num_samples = 1_000_000usize;
        let bad = (0..num_samples)
            .filter(|_| !g.standard_normal().is_finite())
            .count();

        assert_eq!(bad, 0, "Found {} non-finite values", bad);
    }
}
