//! Utility functions for pattern math

mod math;

pub use math::*;
