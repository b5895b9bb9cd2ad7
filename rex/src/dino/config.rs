use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DinoRun`](super::DinoRun).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DinoRunConfig {
    /// Number of cells of the track.
    pub width: usize,

    /// Number of steps the runner stays in the air after a jump.
    pub jump_duration: usize,

    /// Probability that an obstacle appears at the far end of the track when
    /// the previous one is far enough.
    pub obstacle_prob: f64,

    /// Episodes are cut after this number of steps.
    pub max_steps: usize,

    /// Seed of the random number generator placing obstacles.
    pub seed: u64,
}

impl Default for DinoRunConfig {
    fn default() -> Self {
        Self {
            width: 20,
            jump_duration: 3,
            obstacle_prob: 0.2,
            max_steps: 500,
            seed: 42,
        }
    }
}

impl DinoRunConfig {
    /// Sets the width of the track.
    pub fn width(mut self, v: usize) -> Self {
        self.width = v;
        self
    }

    /// Sets the duration of a jump.
    pub fn jump_duration(mut self, v: usize) -> Self {
        self.jump_duration = v;
        self
    }

    /// Sets the probability of obstacles.
    pub fn obstacle_prob(mut self, v: f64) -> Self {
        self.obstacle_prob = v;
        self
    }

    /// Sets the maximum length of episodes.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Length of a frame, two rows of `width` pixels.
    pub fn frame_len(&self) -> usize {
        2 * self.width
    }

    pub(super) fn validate(&self) -> Result<()> {
        ensure!(
            self.width > super::base::RUNNER_COL + 1,
            "The track must be wider than {} cells",
            super::base::RUNNER_COL + 1
        );
        ensure!(self.jump_duration > 0, "jump_duration must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.obstacle_prob),
            "obstacle_prob must lie in [0, 1], got {}",
            self.obstacle_prob
        );
        ensure!(self.max_steps > 0, "max_steps must be positive");
        Ok(())
    }

    /// Constructs [`DinoRunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DinoRunConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
