//! Exploration strategy of the agent.
use crate::error::RexError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer with multiplicative decay.
///
/// A random action is taken with probability `eps`. After each call of
/// [`EpsilonGreedy::decay`], `eps` becomes `max(eps_min, eps * eps_decay)`.
/// `eps == 0` disables exploration entirely.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Current probability of taking a random action.
    pub eps: f64,

    /// Lower bound of `eps` reached by decay.
    pub eps_min: f64,

    /// Factor applied to `eps` at each decay.
    pub eps_decay: f64,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new()
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new() -> Self {
        Self {
            eps: 1.0,
            eps_min: 0.01,
            eps_decay: 0.995,
        }
    }

    /// Set the initial probability of random actions.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps = v;
        self
    }

    /// Set the lower bound of the probability of random actions.
    pub fn eps_min(mut self, v: f64) -> Self {
        self.eps_min = v;
        self
    }

    /// Set the decay factor.
    pub fn eps_decay(mut self, v: f64) -> Self {
        self.eps_decay = v;
        self
    }

    /// Checks that the probabilities lie in `[0, 1]`, the floor does not
    /// exceed the start value and the decay factor lies in `(0, 1]`.
    pub fn validate(&self) -> Result<(), RexError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.eps) {
            return Err(RexError::InvalidConfig(format!(
                "eps must lie in [0, 1], got {}",
                self.eps
            )));
        }
        if !in_unit(self.eps_min) {
            return Err(RexError::InvalidConfig(format!(
                "eps_min must lie in [0, 1], got {}",
                self.eps_min
            )));
        }
        if self.eps_min > self.eps {
            return Err(RexError::InvalidConfig(format!(
                "eps_min ({}) must not exceed eps ({})",
                self.eps_min, self.eps
            )));
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return Err(RexError::InvalidConfig(format!(
                "eps_decay must lie in (0, 1], got {}",
                self.eps_decay
            )));
        }
        Ok(())
    }

    /// Current probability of random actions.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Returns `true` if the next action should be random.
    ///
    /// No random number is drawn when exploration is disabled.
    pub fn explore(&self, rng: &mut impl Rng) -> bool {
        self.eps > 0.0 && rng.gen::<f64>() <= self.eps
    }

    /// Decays the probability of random actions, never below `eps_min` and
    /// never above its current value.
    pub fn decay(&mut self) {
        self.eps = (self.eps * self.eps_decay).max(self.eps_min).min(self.eps);
    }

    /// Disables exploration.
    pub fn disable(&mut self) {
        self.eps = 0.0;
    }
}
