#![warn(missing_docs)]
//! Core of a double DQN agent learning to play games from frames.
//!
//! * [`ReplayMemory`](replay_memory::ReplayMemory) keeps a bounded window of
//!   experiences and samples batches uniformly without replacement.
//! * [`DdqnAgent`] selects actions with an [`EpsilonGreedy`] explorer, trains
//!   its main [`Estimator`] toward targets bootstrapped from a target
//!   estimator and synchronizes the target on request.
//! * [`Trainer`] drives an agent on an [`Environment`], deciding when to train,
//!   decay exploration, synchronize and save.
//!
//! The estimators, the environment and the frame [`Preprocessor`] are
//! collaborators given through traits.
pub mod error;
pub mod record;
pub mod replay_memory;

mod agent;
pub use agent::{DdqnAgent, DdqnConfig, EpsilonGreedy};

mod base;
pub use base::{Environment, Estimator, Preprocessor, StackedFrames};

mod trainer;
pub use trainer::{Trainer, TrainerConfig};

#[cfg(test)]
mod dummy;
