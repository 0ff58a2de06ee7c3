//! Parameter store
//!
//! Sampling rate and smoothness, each replaced unconditionally. Values outside
//! the nominal range are stored as given; range checks are the caller's job.

use std::sync::RwLock;

use diag_types::{DisplayParameters, SamplingRate, Smoothness};
use tracing::debug;

use crate::lock::{read, write};

#[derive(Debug, Default)]
pub struct ParameterStore {
    params: RwLock<DisplayParameters>,
}

impl ParameterStore {
    pub fn new(initial: DisplayParameters) -> Self {
        Self {
            params: RwLock::new(initial),
        }
    }

    pub fn set_sampling_rate(&self, rate: SamplingRate) {
        if !rate.is_in_range() {
            debug!(sampling_rate = rate.value(), "Sampling rate outside (0, 1]");
        }
        write(&self.params).sampling_rate = rate;
    }

    pub fn set_smoothness(&self, smoothness: Smoothness) {
        if !smoothness.is_in_range() {
            debug!(smoothness = smoothness.value(), "Smoothness is negative or not finite");
        }
        write(&self.params).smoothness = smoothness;
    }

    pub fn sampling_rate(&self) -> SamplingRate {
        read(&self.params).sampling_rate
    }

    pub fn smoothness(&self) -> Smoothness {
        read(&self.params).smoothness
    }

    pub fn get(&self) -> DisplayParameters {
        *read(&self.params)
    }
}
