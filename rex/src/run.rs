use crate::{build_agent, DinoRun, FrameNormalizer, RexConfig};
use anyhow::{Context, Result};
use log::info;
use rex_core::{
    record::{Record, RecordValue::Scalar, Recorder},
    Trainer,
};
use std::{fs, path::Path};

/// Name of the configuration file written in the model directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Trains an agent and saves its checkpoints and configuration in `model_dir`.
pub fn train<R: Recorder>(
    config: &RexConfig,
    model_dir: impl AsRef<Path>,
    recorder: &mut R,
) -> Result<()> {
    let model_dir = model_dir.as_ref();
    let mut config = config.clone();
    config.trainer = config.trainer.model_dir(model_dir.to_string_lossy());

    fs::create_dir_all(model_dir)?;
    config.save(model_dir.join(CONFIG_FILE))?;

    let mut agent = build_agent(&config)?;
    let mut env = DinoRun::build(&config.env)?;
    let mut trainer = Trainer::build(config.trainer.clone())?;
    trainer.train(&mut agent, &mut env, &FrameNormalizer, recorder)
}

/// Plays episodes greedily with the agent saved in `model_dir/checkpoint`.
///
/// Returns the number of steps and the return of each episode.
pub fn play<R: Recorder>(
    model_dir: impl AsRef<Path>,
    checkpoint: &str,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<(usize, f32)>> {
    let model_dir = model_dir.as_ref();
    let config = RexConfig::load(model_dir.join(CONFIG_FILE))
        .with_context(|| format!("No configuration found in {:?}", model_dir))?;

    let mut agent = build_agent(&config)?;
    agent.load(model_dir.join(checkpoint))?;
    let mut env = DinoRun::build(&config.env)?;

    let mut results = Vec::with_capacity(n_episodes);
    for episode in 0..n_episodes {
        let (steps, total_reward) = agent.run_episode(&mut env, &FrameNormalizer)?;
        recorder.write(Record::from_slice(&[
            ("episode", Scalar(episode as f32)),
            ("episode_steps", Scalar(steps as f32)),
            ("episode_return", Scalar(total_reward)),
        ]));
        results.push((steps, total_reward));
    }

    let mean = results.iter().map(|r| r.1).sum::<f32>() / n_episodes.max(1) as f32;
    info!("Played {} episodes, mean return = {}", n_episodes, mean);
    Ok(results)
}
