//! Small angle and decibel helpers

use num_complex::Complex64;

/// Convert a power ratio in dB to linear scale
#[inline]
pub fn db_to_power_ratio(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Convert a magnitude ratio to dB
#[inline]
pub fn magnitude_to_db(linear: f64) -> f64 {
    20.0 * linear.log10()
}

/// exp(i·phase) as cos + i·sin
#[inline]
pub fn phasor(phase: f64) -> Complex64 {
    let (sin, cos) = phase.sin_cos();
    Complex64::new(cos, sin)
}

/// Mean of |x|² over a slice; zero for an empty slice
#[inline]
pub fn mean_power(signal: &[Complex64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|s| s.norm_sqr()).sum::<f64>() / signal.len() as f64
}
