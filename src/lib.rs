//! Radiation Pattern NIF
//!
//! Linear antenna array far-field pattern (array factor superposition with
//! beam steering), Gaussian per-element phase errors, and AWGN injection at a
//! given SNR.

pub mod array;
pub mod error;
pub mod noise;
pub mod pattern;
pub mod rng;
pub mod sweep;
mod utils;

pub use array::{ArrayParams, Element, LinearArray};
pub use error::{PatternError, PatternResult};
pub use noise::{add_noise, ComplexNoise};
pub use pattern::{compute_pattern, compute_pattern_into, compute_pattern_with_noise, pattern_db};
pub use rng::GaussianSource;
pub use sweep::AngleSweep;

use num_complex::Complex64;
use rustler::{Atom, NifResult};
use std::sync::{Mutex, MutexGuard};

/// Seed of the shared generator until `seed_rng` is called
pub const DEFAULT_SEED: u64 = 1;

// Process-wide generator backing the NIF surface
lazy_static::lazy_static! {
    static ref SHARED_RNG: Mutex<GaussianSource> = Mutex::new(GaussianSource::new(DEFAULT_SEED));
}

mod atoms {
    rustler::atoms! {
        ok,
        invalid_argument,
        resource_exhausted,
    }
}

rustler::init!("Elixir.RadiationPattern.Nif");

fn shared_rng() -> MutexGuard<'static, GaussianSource> {
    // Generator state stays valid even if a holder panicked
    SHARED_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn nif_error(err: PatternError) -> rustler::Error {
    let kind = match err {
        PatternError::InvalidArgument(_) => atoms::invalid_argument(),
        PatternError::ResourceExhausted { .. } => atoms::resource_exhausted(),
    };
    rustler::Error::Term(Box::new((kind, err.to_string())))
}

fn to_pairs(samples: &[Complex64]) -> Vec<(f64, f64)> {
    samples.iter().map(|s| (s.re, s.im)).collect()
}

fn from_pairs(pairs: &[(f64, f64)]) -> Vec<Complex64> {
    pairs.iter().map(|&(re, im)| Complex64::new(re, im)).collect()
}

fn pattern_for(
    params: ArrayParams,
    theta_deg: Vec<f64>,
    snr_db: Option<f64>,
) -> PatternResult<Vec<Complex64>> {
    let array = params.into_array()?;
    let sweep = AngleSweep::new(theta_deg)?;
    compute_pattern_with_noise(&array, &sweep, snr_db, &mut shared_rng())
}

/// Computes the complex pattern at each angle (degrees).
/// Output: list of {re, im} tuples, one per angle.
#[rustler::nif(name = "compute_pattern")]
fn compute_pattern_nif(params: ArrayParams, theta_deg: Vec<f64>) -> NifResult<(Atom, Vec<(f64, f64)>)> {
    let pattern = pattern_for(params, theta_deg, None).map_err(nif_error)?;
    Ok((atoms::ok(), to_pairs(&pattern)))
}

/// Computes the pattern and adds AWGN at `snr_db`.
#[rustler::nif]
fn compute_pattern_noisy(
    params: ArrayParams,
    theta_deg: Vec<f64>,
    snr_db: f64,
) -> NifResult<(Atom, Vec<(f64, f64)>)> {
    let pattern = pattern_for(params, theta_deg, Some(snr_db)).map_err(nif_error)?;
    Ok((atoms::ok(), to_pairs(&pattern)))
}

/// Adds AWGN to a list of {re, im} samples and returns the noisy copy.
#[rustler::nif(name = "add_noise")]
fn add_noise_nif(signal: Vec<(f64, f64)>, snr_db: f64) -> NifResult<(Atom, Vec<(f64, f64)>)> {
    let mut samples = from_pairs(&signal);
    add_noise(&mut samples, snr_db, &mut shared_rng()).map_err(nif_error)?;
    Ok((atoms::ok(), to_pairs(&samples)))
}

/// Reseeds the shared generator.
#[rustler::nif]
fn seed_rng(seed: u64) -> Atom {
    shared_rng().reseed(seed);
    atoms::ok()
}

/// Normalized pattern magnitude in dB (peak = 0 dB).
#[rustler::nif(name = "pattern_db")]
fn pattern_db_nif(pattern: Vec<(f64, f64)>) -> NifResult<(Atom, Vec<f64>)> {
    let db = pattern_db(&from_pairs(&pattern)).map_err(nif_error)?;
    Ok((atoms::ok(), db))
}
