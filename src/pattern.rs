//! Array factor calculation
//!
//! AF(θ) = Σ_n a_n · exp(j(2π · n · d · (sin θ − sin θ_s) + φ_n))
//!
//! Phase errors are resolved once per call before the angle loop, so every
//! angle in a call sees the same element-phase realization. Per-angle sums
//! are independent and run on rayon above [`PARALLEL_THRESHOLD`] angles.

use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

use crate::array::LinearArray;
use crate::error::{try_alloc, try_filled, PatternError, PatternResult};
use crate::noise::add_noise;
use crate::rng::GaussianSource;
use crate::sweep::AngleSweep;
use crate::utils::{magnitude_to_db, phasor};

/// Iteration count above which loops go parallel
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Resolved per-call weights, ready to evaluate at any angle
struct ArrayFactor<'a> {
    array: &'a LinearArray,
    phases_rad: Vec<f64>,
    sin_steering: f64,
}

impl<'a> ArrayFactor<'a> {
    fn new(array: &'a LinearArray, rng: &mut GaussianSource) -> PatternResult<Self> {
        Ok(Self {
            array,
            phases_rad: array.total_phases_rad(rng)?,
            sin_steering: array.steering_angle_deg().to_radians().sin(),
        })
    }

    fn at(&self, theta_deg: f64) -> Complex64 {
        let k = 2.0 * PI;
        let d = self.array.spacing_wavelength();
        let delta = theta_deg.to_radians().sin() - self.sin_steering;

        self.array
            .elements()
            .iter()
            .zip(&self.phases_rad)
            .enumerate()
            .map(|(n, (element, &phi))| {
                let position = n as f64 * d;
                element.amplitude * phasor(k * position * delta + phi)
            })
            .sum()
    }
}

/// Compute the complex pattern at every angle of the sweep
pub fn compute_pattern(
    array: &LinearArray,
    sweep: &AngleSweep,
    rng: &mut GaussianSource,
) -> PatternResult<Vec<Complex64>> {
    let mut pattern = try_filled(sweep.len(), Complex64::new(0.0, 0.0))?;
    compute_pattern_into(array, sweep.as_slice(), rng, &mut pattern)?;
    Ok(pattern)
}

/// Compute the pattern into a caller-owned buffer
///
/// `pattern_out` must have the same length as `theta_deg`. Every check runs
/// before the buffer is touched; on error it is left as it was.
pub fn compute_pattern_into(
    array: &LinearArray,
    theta_deg: &[f64],
    rng: &mut GaussianSource,
    pattern_out: &mut [Complex64],
) -> PatternResult<()> {
    if theta_deg.is_empty() {
        return Err(PatternError::invalid("theta_count must be positive"));
    }
    if pattern_out.len() != theta_deg.len() {
        return Err(PatternError::invalid(format!(
            "pattern buffer length {} does not match theta_count {}",
            pattern_out.len(),
            theta_deg.len()
        )));
    }

    let af = ArrayFactor::new(array, rng)?;

    if theta_deg.len() > PARALLEL_THRESHOLD {
        log::debug!(
            "array factor: {} elements x {} angles (parallel)",
            array.element_count(),
            theta_deg.len()
        );
        pattern_out
            .par_iter_mut()
            .zip(theta_deg.par_iter())
            .for_each(|(out, &theta)| *out = af.at(theta));
    } else {
        log::debug!(
            "array factor: {} elements x {} angles",
            array.element_count(),
            theta_deg.len()
        );
        for (out, &theta) in pattern_out.iter_mut().zip(theta_deg) {
            *out = af.at(theta);
        }
    }

    Ok(())
}

/// Compute the pattern and optionally add receiver AWGN at `snr_db`
pub fn compute_pattern_with_noise(
    array: &LinearArray,
    sweep: &AngleSweep,
    snr_db: Option<f64>,
    rng: &mut GaussianSource,
) -> PatternResult<Vec<Complex64>> {
    let mut pattern = compute_pattern(array, sweep, rng)?;
    if let Some(snr_db) = snr_db {
        add_noise(&mut pattern, snr_db, rng)?;
    }
    Ok(pattern)
}

/// Pattern magnitude in dB, normalized so the peak sits at 0 dB
pub fn pattern_db(pattern: &[Complex64]) -> PatternResult<Vec<f64>> {
    if pattern.is_empty() {
        return Err(PatternError::invalid("pattern is empty"));
    }
    let peak = pattern.iter().map(|p| p.norm()).fold(0.0, f64::max);
    if peak <= 0.0 {
        return Err(PatternError::invalid("pattern has no non-zero samples"));
    }

    let mut db = try_alloc(pattern.len())?;
    db.extend(pattern.iter().map(|p| magnitude_to_db(p.norm() / peak)));
    Ok(db)
}
