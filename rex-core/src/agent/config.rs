//! Configuration of [`DdqnAgent`](super::DdqnAgent).
use super::EpsilonGreedy;
use crate::{error::RexError, replay_memory::ReplayMemoryConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DdqnAgent`](super::DdqnAgent).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DdqnConfig {
    /// Number of experiences in a training batch. Training steps are skipped
    /// while the replay memory holds fewer experiences.
    pub batch_size: usize,

    /// Discount factor of future rewards.
    pub discount: f32,

    /// Number of frames stacked into a state.
    pub frame_depth: usize,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,

    /// Configuration of the replay memory.
    pub replay_memory: ReplayMemoryConfig,

    /// Exploration schedule.
    pub explorer: EpsilonGreedy,
}

impl Default for DdqnConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            discount: 0.95,
            frame_depth: 4,
            seed: 42,
            replay_memory: ReplayMemoryConfig::default(),
            explorer: EpsilonGreedy::default(),
        }
    }
}

impl DdqnConfig {
    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    /// Sets the number of stacked frames.
    pub fn frame_depth(mut self, v: usize) -> Self {
        self.frame_depth = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the configuration of the replay memory.
    pub fn replay_memory(mut self, v: ReplayMemoryConfig) -> Self {
        self.replay_memory = v;
        self
    }

    /// Sets the exploration schedule.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Rejects out-of-range values.
    pub fn validate(&self) -> Result<(), RexError> {
        if self.batch_size == 0 {
            return Err(RexError::InvalidConfig(
                "batch_size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(RexError::InvalidConfig(format!(
                "discount must lie in [0, 1], got {}",
                self.discount
            )));
        }
        if self.frame_depth == 0 {
            return Err(RexError::InvalidConfig(
                "frame_depth must be positive".to_string(),
            ));
        }
        if self.replay_memory.capacity == 0 {
            return Err(RexError::InvalidConfig(
                "replay memory capacity must be positive".to_string(),
            ));
        }
        if self.batch_size > self.replay_memory.capacity {
            return Err(RexError::InvalidConfig(format!(
                "batch_size ({}) must not exceed the replay memory capacity ({})",
                self.batch_size, self.replay_memory.capacity
            )));
        }
        self.explorer.validate()
    }

    /// Constructs [`DdqnConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DdqnConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_ddqn_config() -> Result<()> {
        let config = DdqnConfig::default()
            .batch_size(16)
            .discount(0.99)
            .replay_memory(ReplayMemoryConfig::default().capacity(1000))
            .explorer(EpsilonGreedy::new().eps_min(0.05));

        let dir = TempDir::new("ddqn_config")?;
        let path = dir.path().join("ddqn_config.yaml");

        config.save(&path)?;
        let config_ = DdqnConfig::load(&path)?;
        assert_eq!(config, config_);

        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(DdqnConfig::default().validate().is_ok());
        assert!(DdqnConfig::default().batch_size(0).validate().is_err());
        assert!(DdqnConfig::default().discount(1.5).validate().is_err());
        assert!(DdqnConfig::default().frame_depth(0).validate().is_err());
        assert!(DdqnConfig::default()
            .replay_memory(ReplayMemoryConfig::default().capacity(0))
            .validate()
            .is_err());
        assert!(DdqnConfig::default()
            .batch_size(8)
            .replay_memory(ReplayMemoryConfig::default().capacity(4))
            .validate()
            .is_err());
        assert!(DdqnConfig::default()
            .batch_size(4)
            .replay_memory(ReplayMemoryConfig::default().capacity(4))
            .validate()
            .is_ok());
        assert!(DdqnConfig::default()
            .explorer(EpsilonGreedy::new().eps_start(-0.5))
            .validate()
            .is_err());
    }
}
