use crate::DinoRunConfig;
use anyhow::{ensure, Result};
use rex_candle_agent::{
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    util::OutDim,
    CandleEstimator, CandleEstimatorConfig,
};
use rex_core::{DdqnAgent, DdqnConfig, TrainerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// The agent playing [`DinoRun`](crate::DinoRun).
pub type RexAgent = DdqnAgent<CandleEstimator<Mlp>>;

/// Configuration of a training run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RexConfig {
    /// The game.
    pub env: DinoRunConfig,

    /// The agent.
    pub agent: DdqnConfig,

    /// The estimators of the agent.
    pub estimator: CandleEstimatorConfig<MlpConfig>,

    /// The training loop.
    pub trainer: TrainerConfig,
}

impl Default for RexConfig {
    fn default() -> Self {
        let env = DinoRunConfig::default();
        let agent = DdqnConfig::default();
        let estimator = CandleEstimatorConfig::default()
            .q_config(MlpConfig::new(env.frame_len(), agent.frame_depth, 2))
            .opt_config(OptimizerConfig::Adam { lr: 0.001 });
        let trainer = TrainerConfig::default()
            .max_train_steps(20000)
            .sync_interval(500)
            .save_interval(5000)
            .flush_interval(500)
            .warmup_period(100);

        Self {
            env,
            agent,
            estimator,
            trainer,
        }
    }
}

impl RexConfig {
    /// Constructs [`RexConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RexConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Builds an agent whose network fits the frames and actions of the game.
pub fn build_agent(config: &RexConfig) -> Result<RexAgent> {
    let q_config = config.estimator.get_q_config();
    let frames = (config.env.frame_len(), config.agent.frame_depth);
    ensure!(
        q_config.map(|q| (q.frame_len(), q.frame_depth())) == Some(frames),
        "The network must take stacks of {} frames of length {}",
        frames.1,
        frames.0
    );
    ensure!(
        q_config.map(|q| q.get_out_dim()) == Some(2),
        "The output dimension of the network must be 2 (noop and jump)"
    );

    let main = CandleEstimator::build(config.estimator.clone())?;
    let target = CandleEstimator::build(config.estimator.clone())?;
    DdqnAgent::build(config.agent.clone(), main, target)
}
