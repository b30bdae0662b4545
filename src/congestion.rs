use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Serialize;

use crate::Stats;

/// Readings below this are light traffic.
const MODERATE_FROM: u32 = 30;

/// Readings at or above this raise a congestion alert.
const HEAVY_FROM: u32 = 70;

/// A simulated traffic density level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CongestionLevel {
    Low,
    Moderate,
    Heavy,
}

impl CongestionLevel {
    /// Classifies a reading on the 0..100 scale.
    pub fn from_reading(value: u32) -> Self {
        match value {
            v if v < MODERATE_FROM => Self::Low,
            v if v < HEAVY_FROM => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low Traffic",
            Self::Moderate => "Moderate Traffic",
            Self::Heavy => "HEAVY CONGESTION!",
        })
    }
}

/// Draws random congestion readings.
#[derive(Clone, Debug)]
pub struct CongestionSampler {
    distr: Uniform<u32>,
}

impl CongestionSampler {
    pub fn new() -> Self {
        Self {
            distr: Uniform::new(0, 100),
        }
    }

    /// Draws a reading and records it.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, stats: &mut Stats) -> CongestionLevel {
        let value = self.distr.sample(rng);
        self.record(value, stats)
    }

    /// Classifies a reading, counting an alert if it is heavy.
    pub fn record(&self, value: u32, stats: &mut Stats) -> CongestionLevel {
        let level = CongestionLevel::from_reading(value);
        if level == CongestionLevel::Heavy {
            stats.record_congestion_alert();
        }
        level
    }
}

impl Default for CongestionSampler {
    fn default() -> Self {
        Self::new()
    }
}
