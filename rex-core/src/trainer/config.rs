//! Configuration of [`Trainer`](super::Trainer).
use crate::error::RexError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TrainerConfig {
    /// The number of training steps after which training ends.
    pub max_train_steps: usize,

    /// Interval of training steps in environment steps.
    pub train_interval: usize,

    /// Interval of target synchronization in training steps.
    pub sync_interval: usize,

    /// Interval of saving the agent in training steps. `0` disables saving.
    pub save_interval: usize,

    /// Interval of flushing records in training steps.
    pub flush_interval: usize,

    /// Number of environment steps before the first training step.
    pub warmup_period: usize,

    /// Where to save the agent.
    pub model_dir: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_train_steps: 10000,
            train_interval: 1,
            sync_interval: 100,
            save_interval: 0,
            flush_interval: 100,
            warmup_period: 0,
            model_dir: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the number of training steps.
    pub fn max_train_steps(mut self, v: usize) -> Self {
        self.max_train_steps = v;
        self
    }

    /// Sets the interval of training in environment steps.
    pub fn train_interval(mut self, v: usize) -> Self {
        self.train_interval = v;
        self
    }

    /// Sets the interval of target synchronization in training steps.
    pub fn sync_interval(mut self, v: usize) -> Self {
        self.sync_interval = v;
        self
    }

    /// Sets the interval of saving in training steps.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the interval of flushing records in training steps.
    pub fn flush_interval(mut self, v: usize) -> Self {
        self.flush_interval = v;
        self
    }

    /// Sets warmup period in environment steps.
    pub fn warmup_period(mut self, v: usize) -> Self {
        self.warmup_period = v;
        self
    }

    /// Sets the directory where the agent is saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Rejects zero intervals.
    pub fn validate(&self) -> Result<(), RexError> {
        for (name, v) in [
            ("train_interval", self.train_interval),
            ("sync_interval", self.sync_interval),
            ("flush_interval", self.flush_interval),
        ] {
            if v == 0 {
                return Err(RexError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
