//! Display parameters
//!
//! Two independent scalars controlling how channel data is drawn. Neither type
//! clamps its value: range enforcement belongs to whoever collects the input,
//! and `is_in_range` is there for them to use.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of raw samples to display, nominally in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplingRate(f64);

impl SamplingRate {
    pub const DEFAULT: SamplingRate = SamplingRate(0.01);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_in_range(self) -> bool {
        self.0 > 0.0 && self.0 <= 1.0
    }
}

impl Default for SamplingRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f64> for SamplingRate {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SamplingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Smoothing window parameter, nominally non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Smoothness(f64);

impl Smoothness {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_in_range(self) -> bool {
        self.0 >= 0.0 && self.0.is_finite()
    }
}

impl From<f64> for Smoothness {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Smoothness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Both display parameters read together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayParameters {
    pub sampling_rate: SamplingRate,
    pub smoothness: Smoothness,
}
