//! A double DQN agent learning to play a runner game from frames.
//!
//! This crate puts together the learning loop of [`rex_core`] and the
//! estimator of [`rex_candle_agent`] with a toy game, [`DinoRun`], whose frames
//! are scaled by [`FrameNormalizer`].
//!
//! ```no_run
//! use rex::{rex_core::record::LogRecorder, play, train, RexConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = RexConfig::default();
//! train(&config, "model/rex", &mut LogRecorder::new())?;
//! let results = play("model/rex", "final", 5, &mut LogRecorder::new())?;
//! # Ok(())
//! # }
//! ```
mod config;
mod dino;
mod preprocessor;
mod run;

pub use config::{build_agent, RexAgent, RexConfig};
pub use dino::{DinoRun, DinoRunConfig};
pub use preprocessor::FrameNormalizer;
pub use run::{play, train, CONFIG_FILE};
pub use rex_candle_agent;
pub use rex_core;
