//! Additive White Gaussian Noise injection
//!
//! Noise power is set relative to the measured mean power of the signal:
//! σ² per dimension = P / (2 · 10^(snr_db/10)).

use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::{try_alloc, PatternError, PatternResult};
use crate::pattern::PARALLEL_THRESHOLD;
use crate::rng::GaussianSource;
use crate::utils::{db_to_power_ratio, mean_power};

/// Samples handled by one forked generator on the parallel path
const NOISE_CHUNK: usize = PARALLEL_THRESHOLD;

/// Complex AWGN with a fixed per-dimension standard deviation
#[derive(Debug, Clone, Copy)]
pub struct ComplexNoise {
    /// Standard deviation of each of I and Q
    std_dev: f64,
}

impl ComplexNoise {
    /// Noise for a signal of `signal_power` at `snr_db`
    pub fn for_snr(signal_power: f64, snr_db: f64) -> Self {
        let noise_power = signal_power / db_to_power_ratio(snr_db);
        Self {
            std_dev: (noise_power / 2.0).sqrt(),
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Next complex noise sample
    #[inline]
    pub fn next_sample(&self, rng: &mut GaussianSource) -> Complex64 {
        let re = rng.sample_gaussian(0.0, self.std_dev);
        let im = rng.sample_gaussian(0.0, self.std_dev);
        Complex64::new(re, im)
    }

    fn apply(&self, signal: &mut [Complex64], rng: &mut GaussianSource) {
        for sample in signal.iter_mut() {
            *sample += self.next_sample(rng);
        }
    }
}

/// Add complex AWGN to `signal` in place at `snr_db` relative to its mean power
///
/// Long signals are split into fixed-size chunks, each with its own generator
/// forked from `rng`, so output for a given seed does not depend on thread count.
pub fn add_noise(
    signal: &mut [Complex64],
    snr_db: f64,
    rng: &mut GaussianSource,
) -> PatternResult<()> {
    if signal.is_empty() {
        return Err(PatternError::invalid("sample_count must be positive"));
    }

    let noise = ComplexNoise::for_snr(mean_power(signal), snr_db);
    log::debug!(
        "awgn: {} samples at {} dB, sigma {:.3e}",
        signal.len(),
        snr_db,
        noise.std_dev()
    );

    if signal.len() > PARALLEL_THRESHOLD {
        let num_chunks = signal.len().div_ceil(NOISE_CHUNK);
        let mut workers = try_alloc(num_chunks)?;
        workers.extend((0..num_chunks).map(|_| rng.fork()));

        signal
            .par_chunks_mut(NOISE_CHUNK)
            .zip(workers.par_iter_mut())
            .for_each(|(chunk, worker)| noise.apply(chunk, worker));
    } else {
        noise.apply(signal, rng);
    }

    Ok(())
}
