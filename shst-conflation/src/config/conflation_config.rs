use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{constants, OverlapPolicy};
use crate::model::ConflationError;

/// defines behaviors for a conflation run
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct ConflationConfiguration {
    pub split_buffer_km: f64,
    pub length_ratio_threshold: f64,
    pub primary_matches_only: bool,
    pub overlap_policy: OverlapPolicy,
    pub coordinate_precision: u32,
    pub channel_capacity: usize,
    /// longest wait (seconds) on a single match source, `None` waits forever.
    pub source_timeout_secs: Option<u64>,
    pub batch_size: usize,
    pub parallelize: bool,
}

/// distance tolerances shared by projection, snapping and overlap resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearTolerance {
    pub split_buffer_km: f64,
    pub length_ratio_threshold: f64,
}

impl Default for ConflationConfiguration {
    fn default() -> Self {
        Self {
            split_buffer_km: constants::SPLIT_BUFF_KM,
            length_ratio_threshold: constants::LENGTH_RATIO_THRESHOLD,
            primary_matches_only: true,
            overlap_policy: OverlapPolicy::default(),
            coordinate_precision: constants::COORDINATE_PRECISION,
            channel_capacity: 1,
            source_timeout_secs: Some(constants::DEFAULT_SOURCE_TIMEOUT_SECS),
            batch_size: constants::DEFAULT_BATCH_SIZE,
            parallelize: true,
        }
    }
}

impl Default for LinearTolerance {
    fn default() -> Self {
        Self {
            split_buffer_km: constants::SPLIT_BUFF_KM,
            length_ratio_threshold: constants::LENGTH_RATIO_THRESHOLD,
        }
    }
}

impl LinearTolerance {
    /// true when an interval of this length should be dropped: it is shorter than the
    /// split buffer and does not cover a large share of a (short) reference line.
    pub fn is_negligible(&self, interval_length_km: f64, reference_length_km: f64) -> bool {
        interval_length_km < self.split_buffer_km
            && interval_length_km / reference_length_km < self.length_ratio_threshold
    }
}

impl ConflationConfiguration {
    pub fn tolerance(&self) -> LinearTolerance {
        LinearTolerance {
            split_buffer_km: self.split_buffer_km,
            length_ratio_threshold: self.length_ratio_threshold,
        }
    }

    /// how long the match aggregator waits on a single source stream, if bounded.
    pub fn source_timeout(&self) -> Option<Duration> {
        self.source_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConflationError> {
        use ConflationError as E;
        if !(self.split_buffer_km.is_finite() && self.split_buffer_km > 0.0) {
            return Err(E::ConfigurationError(format!(
                "split_buffer_km must be a positive distance, found {}",
                self.split_buffer_km
            )));
        }
        if !(self.length_ratio_threshold > 0.0 && self.length_ratio_threshold <= 1.0) {
            return Err(E::ConfigurationError(format!(
                "length_ratio_threshold must be in (0, 1], found {}",
                self.length_ratio_threshold
            )));
        }
        if self.channel_capacity == 0 {
            return Err(E::ConfigurationError(String::from(
                "channel_capacity must be at least 1",
            )));
        }
        if self.batch_size == 0 {
            return Err(E::ConfigurationError(String::from(
                "batch_size must be at least 1",
            )));
        }
        if self.source_timeout_secs == Some(0) {
            return Err(E::ConfigurationError(String::from(
                "source_timeout_secs must be positive or null",
            )));
        }
        Ok(())
    }
}

impl TryFrom<&String> for ConflationConfiguration {
    type Error = ConflationError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: ConflationConfiguration = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(ConflationError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()?;
        Ok(conf)
    }
}
