//! Partition settings.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Batch boundaries (index range, output directory) are not part of
//! this config; the driver takes them as plain arguments.

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::ConfigError;
use crate::validity::AreaLimits;

/// How the trial loop picks its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Stop at the first valid partition that improves on the best so far.
    /// Within one search that is simply the first valid trial.
    #[default]
    FirstImprovement,
    /// Run the whole budget and keep the lowest-cost valid partition,
    /// ties going to the earlier trial.
    Exhaustive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub num_areas: usize,
    pub trials: u64,
    pub max_area_width: i64,
    pub max_area_height: i64,
    pub toilet_room: String,
    pub anchor_room: String,
    pub policy: SearchPolicy,
    /// Seed of trial 0; trial `t` uses `first_seed + t`.
    pub first_seed: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            num_areas: defaults::NUM_AREAS,
            trials: defaults::TRIALS,
            max_area_width: defaults::MAX_AREA_WIDTH,
            max_area_height: defaults::MAX_AREA_HEIGHT,
            toilet_room: defaults::TOILET_ROOM.to_string(),
            anchor_room: defaults::ANCHOR_ROOM.to_string(),
            policy: SearchPolicy::default(),
            first_seed: 0,
        }
    }
}

impl PartitionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_areas == 0 {
            return Err(ConfigError::NoAreas);
        }
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.max_area_width <= 0 || self.max_area_height <= 0 {
            return Err(ConfigError::Limits {
                width: self.max_area_width,
                height: self.max_area_height,
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> AreaLimits {
        AreaLimits {
            max_width: self.max_area_width,
            max_height: self.max_area_height,
        }
    }
}
