//! Uniform linear array description
//!
//! Elements sit at `n · d` along one axis, `d` in wavelengths. Each element
//! carries an amplitude and a nominal phase. A Gaussian phase error model
//! perturbs the nominal phases either freshly on every evaluation or with a
//! frozen realization kept on the array.

use rustler::NifStruct;

use crate::error::{try_alloc, try_filled, PatternError, PatternResult};
use crate::rng::GaussianSource;

/// Array parameters from Elixir
///
/// Empty weight lists default to unit amplitude and zero phase.
#[derive(NifStruct, Debug, Clone)]
#[module = "RadiationPattern.ArrayParams"]
pub struct ArrayParams {
    pub element_count: i64,
    pub spacing_wavelength: f64,
    pub steering_angle_deg: f64,
    pub amplitude_weights: Vec<f64>,
    pub phase_weights_deg: Vec<f64>,
    pub phase_error_std_deg: f64,
}

impl ArrayParams {
    /// Validate counts and lengths and build the array
    pub fn into_array(self) -> PatternResult<LinearArray> {
        if self.element_count <= 0 {
            return Err(PatternError::invalid("element_count must be positive"));
        }
        let n = self.element_count as usize;

        let amplitudes = if self.amplitude_weights.is_empty() {
            try_filled(n, 1.0)?
        } else {
            self.amplitude_weights
        };
        let phases = if self.phase_weights_deg.is_empty() {
            try_filled(n, 0.0)?
        } else {
            self.phase_weights_deg
        };

        if amplitudes.len() != n {
            return Err(PatternError::invalid(format!(
                "amplitude weights length {} does not match element_count {}",
                amplitudes.len(),
                n
            )));
        }

        LinearArray::from_weights(
            self.spacing_wavelength,
            self.steering_angle_deg,
            &amplitudes,
            &phases,
            self.phase_error_std_deg,
        )
    }
}

/// One radiating element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub amplitude: f64,
    pub phase_deg: f64,
}

impl Element {
    pub fn new(amplitude: f64, phase_deg: f64) -> Self {
        Self { amplitude, phase_deg }
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Linear array with weights, steering and phase error model
#[derive(Debug, Clone)]
pub struct LinearArray {
    spacing_wavelength: f64,
    steering_angle_deg: f64,
    elements: Vec<Element>,

    /// Std dev of per-element phase error, degrees; 0 disables
    phase_error_std_deg: f64,

    /// Stored error realization, degrees, one per element
    frozen_errors: Option<Vec<f64>>,
}

impl LinearArray {
    pub fn new(spacing_wavelength: f64, elements: Vec<Element>) -> PatternResult<Self> {
        if elements.is_empty() {
            return Err(PatternError::invalid("element_count must be positive"));
        }
        Ok(Self {
            spacing_wavelength,
            steering_angle_deg: 0.0,
            elements,
            phase_error_std_deg: 0.0,
            frozen_errors: None,
        })
    }

    /// `element_count` unit-amplitude, zero-phase elements
    pub fn uniform(element_count: usize, spacing_wavelength: f64) -> PatternResult<Self> {
        Self::new(spacing_wavelength, try_filled(element_count, Element::default())?)
    }

    /// Build from separate amplitude and phase sequences
    pub fn from_weights(
        spacing_wavelength: f64,
        steering_angle_deg: f64,
        amplitude_weights: &[f64],
        phase_weights_deg: &[f64],
        phase_error_std_deg: f64,
    ) -> PatternResult<Self> {
        if amplitude_weights.len() != phase_weights_deg.len() {
            return Err(PatternError::invalid(format!(
                "amplitude weights length {} does not match phase weights length {}",
                amplitude_weights.len(),
                phase_weights_deg.len()
            )));
        }

        let elements = amplitude_weights
            .iter()
            .zip(phase_weights_deg)
            .map(|(&amplitude, &phase_deg)| Element { amplitude, phase_deg })
            .collect();

        Self::new(spacing_wavelength, elements)?
            .with_steering(steering_angle_deg)
            .with_phase_error(phase_error_std_deg)
    }

    pub fn with_steering(mut self, steering_angle_deg: f64) -> Self {
        self.steering_angle_deg = steering_angle_deg;
        self
    }

    pub fn with_phase_error(mut self, std_dev_deg: f64) -> PatternResult<Self> {
        self.set_phase_error(std_dev_deg)?;
        Ok(self)
    }

    /// Change the phase error std dev. Drops any frozen realization.
    pub fn set_phase_error(&mut self, std_dev_deg: f64) -> PatternResult<()> {
        if !std_dev_deg.is_finite() || std_dev_deg < 0.0 {
            return Err(PatternError::invalid(format!(
                "phase error std dev must be finite and non-negative, got {}",
                std_dev_deg
            )));
        }
        self.phase_error_std_deg = std_dev_deg;
        self.frozen_errors = None;
        Ok(())
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn spacing_wavelength(&self) -> f64 {
        self.spacing_wavelength
    }

    pub fn steering_angle_deg(&self) -> f64 {
        self.steering_angle_deg
    }

    pub fn phase_error_std_deg(&self) -> f64 {
        self.phase_error_std_deg
    }

    pub fn frozen_phase_errors(&self) -> Option<&[f64]> {
        self.frozen_errors.as_deref()
    }

    /// Draw one error per element, degrees. All zeros when disabled.
    pub fn draw_phase_errors(&self, rng: &mut GaussianSource) -> PatternResult<Vec<f64>> {
        let mut errors = try_alloc(self.elements.len())?;
        if self.phase_error_std_deg > 0.0 {
            errors.extend(
                (0..self.elements.len()).map(|_| rng.sample_gaussian(0.0, self.phase_error_std_deg)),
            );
        } else {
            errors.resize(self.elements.len(), 0.0);
        }
        Ok(errors)
    }

    /// Store one error realization, reused by every later evaluation
    pub fn freeze_phase_errors(&mut self, rng: &mut GaussianSource) -> PatternResult<()> {
        self.frozen_errors = Some(self.draw_phase_errors(rng)?);
        Ok(())
    }

    /// Replace the frozen realization with a new draw, for Monte Carlo runs
    pub fn regenerate_phase_errors(&mut self, rng: &mut GaussianSource) -> PatternResult<()> {
        self.freeze_phase_errors(rng)
    }

    /// Go back to a fresh draw on every evaluation
    pub fn thaw_phase_errors(&mut self) {
        self.frozen_errors = None;
    }

    /// Nominal phase plus error for each element, radians
    ///
    /// Uses the frozen realization if present, otherwise draws fresh errors.
    pub fn total_phases_rad(&self, rng: &mut GaussianSource) -> PatternResult<Vec<f64>> {
        let mut phases = match &self.frozen_errors {
            Some(frozen) => {
                let mut buf = try_alloc(frozen.len())?;
                buf.extend_from_slice(frozen);
                buf
            }
            None => self.draw_phase_errors(rng)?,
        };

        for (phase, element) in phases.iter_mut().zip(&self.elements) {
            *phase = (element.phase_deg + *phase).to_radians();
        }
        Ok(phases)
    }
}
