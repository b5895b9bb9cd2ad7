//! Train [`DdqnAgent`].
mod config;
use crate::{
    agent::DdqnAgent,
    base::{Environment, Estimator, Preprocessor, StackedFrames},
    record::{Record, RecordValue::Scalar, Recorder},
};
use anyhow::{ensure, Context, Result};
pub use config::TrainerConfig;
use log::info;
use std::{borrow::Borrow, path::Path};

/// Manages the training loop.
///
/// # Training loop
///
/// 1. Start an episode and fill the state window with the first frame.
/// 2. Decide an action, apply it, append the new frame to the state window
///    and store the transition in the replay memory.
///    `env_steps += 1`.
/// 3. If `env_steps >= warmup_period` and `env_steps % train_interval == 0`,
///    do a training step. The agent skips it while its replay memory holds
///    less than a batch; otherwise `train_steps += 1` and:
///     1. exploration is decayed,
///     2. if `train_steps % sync_interval == 0`, the target estimator is
///        synchronized,
///     3. if `train_steps % save_interval == 0`, the agent is saved in
///        `(model_dir)/(train_steps)`,
///     4. if `train_steps % flush_interval == 0`, the recorder is flushed,
///     5. if `train_steps == max_train_steps`, training ends.
/// 4. When the episode terminates, its return and length are recorded and a
///    new episode starts (step 1). Otherwise, back to step 2.
///
/// Any error of the agent, the environment or the checkpoint storage ends
/// training and is returned. An episode terminating at its start is an error,
/// as no training step could ever follow.
pub struct Trainer {
    max_train_steps: usize,
    train_interval: usize,
    sync_interval: usize,
    save_interval: usize,
    flush_interval: usize,
    warmup_period: usize,
    model_dir: Option<String>,
    env_steps: usize,
    train_steps: usize,
    episodes: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_train_steps: config.max_train_steps,
            train_interval: config.train_interval,
            sync_interval: config.sync_interval,
            save_interval: config.save_interval,
            flush_interval: config.flush_interval,
            warmup_period: config.warmup_period,
            model_dir: config.model_dir,
            env_steps: 0,
            train_steps: 0,
            episodes: 0,
        })
    }

    /// Number of environment steps done.
    pub fn env_steps(&self) -> usize {
        self.env_steps
    }

    /// Number of training steps done.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Number of completed episodes.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    fn save<Q>(&self, agent: &DdqnAgent<Q>, name: &str) -> Result<()>
    where
        Q: Estimator,
        Q::State: Clone,
    {
        if let Some(model_dir) = &self.model_dir {
            let path = Path::new(model_dir).join(name);
            agent
                .save(&path)
                .with_context(|| format!("Failed to save the agent in {:?}", path))?;
        }
        Ok(())
    }

    /// Does the work following a completed training step.
    ///
    /// Returns `true` if training is over.
    fn after_train_step<Q, R>(
        &mut self,
        agent: &mut DdqnAgent<Q>,
        record: Record,
        recorder: &mut R,
    ) -> Result<bool>
    where
        Q: Estimator,
        Q::State: Clone,
        R: Recorder,
    {
        self.train_steps += 1;
        agent.decay_exploration();

        if self.train_steps % self.sync_interval == 0 {
            agent.sync_target()?;
        }

        if self.save_interval > 0 && self.train_steps % self.save_interval == 0 {
            self.save(agent, &self.train_steps.to_string())?;
        }

        recorder.store(record);
        if self.train_steps % self.flush_interval == 0 {
            recorder.flush(self.train_steps);
        }

        Ok(self.train_steps >= self.max_train_steps)
    }

    /// Trains the agent until `max_train_steps` training steps are done.
    pub fn train<Q, F, E, P, R>(
        &mut self,
        agent: &mut DdqnAgent<Q>,
        env: &mut E,
        preprocessor: &P,
        recorder: &mut R,
    ) -> Result<()>
    where
        Q: Estimator<State = StackedFrames<F>>,
        F: Clone,
        E: Environment,
        P: Preprocessor<Frame = F>,
        E::Frame: Borrow<P::Raw>,
        R: Recorder,
    {
        let mut done = self.train_steps >= self.max_train_steps;

        while !done {
            let (frame, _, mut terminated) = env.start_episode()?;
            ensure!(
                !terminated,
                "Episode {} terminated at its start, no experience can be collected",
                self.episodes + 1
            );
            let first = preprocessor.process(Borrow::<P::Raw>::borrow(&frame));
            let mut state = StackedFrames::filled(first, agent.frame_depth())?;
            let (mut episode_steps, mut episode_return, mut n_random) = (0usize, 0f32, 0usize);

            while !terminated && !done {
                let (action, is_random) = agent.decide_action(&state)?;
                let (frame, reward, is_terminated) = env.apply_action(action)?;
                let next_frame = preprocessor.process(Borrow::<P::Raw>::borrow(&frame));
                let next_state = state.advance(next_frame);
                agent.remember(state, action, reward, next_state.clone(), is_terminated);

                state = next_state;
                terminated = is_terminated;
                self.env_steps += 1;
                episode_steps += 1;
                episode_return += reward;
                n_random += is_random as usize;

                if self.env_steps < self.warmup_period
                    || self.env_steps % self.train_interval != 0
                {
                    continue;
                }
                if let Some(record) = agent.train_step()? {
                    done = self.after_train_step(agent, record, recorder)?;
                }
            }

            if terminated {
                self.episodes += 1;
                recorder.store(Record::from_slice(&[
                    ("episode_return", Scalar(episode_return)),
                    ("episode_steps", Scalar(episode_steps as f32)),
                    (
                        "random_action_ratio",
                        Scalar(n_random as f32 / episode_steps.max(1) as f32),
                    ),
                ]));
            }
        }

        recorder.flush(self.train_steps);
        self.save(agent, "final")?;
        info!(
            "Training finished: {} training steps, {} environment steps, {} episodes",
            self.train_steps, self.env_steps, self.episodes
        );

        Ok(())
    }
}
