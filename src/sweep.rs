//! Observation angle sweeps

use crate::error::{PatternError, PatternResult};

/// Default full-circle sweep: -180° to 180° at 0.5° resolution
pub const FULL_CIRCLE_POINTS: usize = 721;

/// Non-empty ordered list of observation angles in degrees
///
/// Angles are not wrapped or clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleSweep {
    theta_deg: Vec<f64>,
}

impl AngleSweep {
    pub fn new(theta_deg: Vec<f64>) -> PatternResult<Self> {
        if theta_deg.is_empty() {
            return Err(PatternError::invalid("theta_count must be positive"));
        }
        Ok(Self { theta_deg })
    }

    /// `count` evenly spaced angles from `start` to `stop` inclusive
    pub fn linspace(start_deg: f64, stop_deg: f64, count: usize) -> PatternResult<Self> {
        match count {
            0 => Err(PatternError::invalid("theta_count must be positive")),
            1 => Ok(Self { theta_deg: vec![start_deg] }),
            _ => {
                let step = (stop_deg - start_deg) / (count - 1) as f64;
                let theta_deg = (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            stop_deg
                        } else {
                            start_deg + step * i as f64
                        }
                    })
                    .collect();
                Ok(Self { theta_deg })
            }
        }
    }

    pub fn full_circle() -> Self {
        let step = 360.0 / (FULL_CIRCLE_POINTS - 1) as f64;
        Self {
            theta_deg: (0..FULL_CIRCLE_POINTS)
                .map(|i| -180.0 + step * i as f64)
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.theta_deg
    }

    pub fn len(&self) -> usize {
        self.theta_deg.len()
    }

    /// Number of angles is zero
    pub fn is_empty(&self) -> bool {
        self.theta_deg.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.theta_deg
    }
}

impl TryFrom<Vec<f64>> for AngleSweep {
    type Error = PatternError;

    fn try_from(theta_deg: Vec<f64>) -> PatternResult<Self> {
        Self::new(theta_deg)
    }
}
