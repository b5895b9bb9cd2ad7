//! Double DQN agent.
use super::{DdqnConfig, EpsilonGreedy};
use crate::{
    base::{Environment, Estimator, Preprocessor, StackedFrames},
    record::{Record, RecordValue},
    replay_memory::{Experience, ReplayMemory},
};
use anyhow::{ensure, Result};
use log::{debug, info, trace};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::{borrow::Borrow, fs, path::Path};

/// Double DQN agent.
///
/// The agent owns a replay memory and two estimators of the same type. The
/// main estimator selects actions and is trained; the target estimator only
/// provides the bootstrapped values of the training targets and is refreshed
/// from the main one by [`DdqnAgent::sync_target`].
///
/// When to train, decay exploration and synchronize is decided by the caller,
/// typically [`Trainer`](crate::Trainer).
pub struct DdqnAgent<Q>
where
    Q: Estimator,
    Q::State: Clone,
{
    main: Q,
    target: Q,
    memory: ReplayMemory<Q::State>,
    explorer: EpsilonGreedy,
    batch_size: usize,
    discount: f32,
    frame_depth: usize,
    num_actions: usize,
    n_train_steps: usize,
    rng: SmallRng,
}

impl<Q> DdqnAgent<Q>
where
    Q: Estimator,
    Q::State: Clone,
{
    /// Constructs the agent.
    ///
    /// The configuration is validated and the target estimator is overwritten
    /// with the parameters of the main one.
    pub fn build(config: DdqnConfig, main: Q, mut target: Q) -> Result<Self> {
        config.validate()?;
        let num_actions = main.num_actions();
        ensure!(num_actions > 0, "The estimator has no action");
        ensure!(
            target.num_actions() == num_actions,
            "Main and target estimators differ in the number of actions ({} and {})",
            num_actions,
            target.num_actions()
        );
        target.copy_parameters_from(&main)?;

        Ok(Self {
            main,
            target,
            memory: ReplayMemory::build(&config.replay_memory)?,
            explorer: config.explorer,
            batch_size: config.batch_size,
            discount: config.discount,
            frame_depth: config.frame_depth,
            num_actions,
            n_train_steps: 0,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Decides an action for the given state.
    ///
    /// The second value is `true` if the action was drawn at random.
    pub fn decide_action(&mut self, state: &Q::State) -> Result<(usize, bool)> {
        if self.explorer.explore(&mut self.rng) {
            let action = self.rng.gen_range(0..self.num_actions);
            Ok((action, true))
        } else {
            Ok((self.main.best_action(state)?, false))
        }
    }

    /// Decays the probability of random actions.
    pub fn decay_exploration(&mut self) {
        self.explorer.decay();
    }

    /// Disables exploration: every following action is greedy.
    pub fn disable_exploration(&mut self) {
        self.explorer.disable();
    }

    /// Current probability of random actions.
    pub fn exploration_probability(&self) -> f64 {
        self.explorer.eps()
    }

    /// Stores a transition in the replay memory.
    pub fn remember(
        &mut self,
        state: Q::State,
        action: usize,
        reward: f32,
        next_state: Q::State,
        terminal: bool,
    ) {
        self.memory
            .remember(Experience::new(state, action, reward, next_state, terminal));
    }

    /// Computes `reward + discount * V_target(next_state)` for non-terminal
    /// transitions and `reward` for terminal ones.
    fn targets(
        &self,
        rewards: Vec<f32>,
        next_states: Vec<Q::State>,
        terminal: &[bool],
    ) -> Result<Vec<f32>> {
        let bootstrapped = next_states
            .into_iter()
            .zip(terminal.iter())
            .filter_map(|(s, &t)| if t { None } else { Some(s) })
            .collect::<Vec<_>>();
        let mut targets = rewards;

        if bootstrapped.is_empty() {
            return Ok(targets);
        }

        let (_, values) = self.target.best_action_and_value(&bootstrapped)?;
        ensure!(
            values.len() == bootstrapped.len(),
            "The target estimator returned {} values for {} states",
            values.len(),
            bootstrapped.len()
        );

        let mut values = values.into_iter();
        for (tgt, &t) in targets.iter_mut().zip(terminal.iter()) {
            if t {
                continue;
            }
            if let Some(v) = values.next() {
                *tgt += self.discount * v;
            }
        }

        Ok(targets)
    }

    /// Trains the main estimator on a batch sampled from the replay memory.
    ///
    /// Returns `Ok(None)` without touching the estimators while the memory
    /// holds fewer experiences than the batch size.
    pub fn train_step(&mut self) -> Result<Option<Record>> {
        if self.memory.len() < self.batch_size {
            trace!(
                "Skip training: {} experiences, batch size {}",
                self.memory.len(),
                self.batch_size
            );
            return Ok(None);
        }

        let batch = self.memory.sample(self.batch_size)?;
        let (states, actions, rewards, next_states, terminal) = batch.unpack();
        let targets = self.targets(rewards, next_states, &terminal)?;
        let record = self
            .main
            .train(&states, &actions, &targets, self.n_train_steps)?;
        self.n_train_steps += 1;

        let n = targets.len() as f32;
        let mean_target = targets.iter().sum::<f32>() / n;
        let terminal_fraction = terminal.iter().filter(|&&t| t).count() as f32 / n;
        let memory_terminal_fraction =
            self.memory.num_terminal() as f32 / self.memory.len() as f32;
        debug!(
            "Train step {}: mean target {:.4}",
            self.n_train_steps, mean_target
        );

        Ok(Some(record.merge(Record::from_slice(&[
            ("mean_target", RecordValue::Scalar(mean_target)),
            ("terminal_fraction", RecordValue::Scalar(terminal_fraction)),
            (
                "memory_terminal_fraction",
                RecordValue::Scalar(memory_terminal_fraction),
            ),
            (
                "exploration_probability",
                RecordValue::Scalar(self.explorer.eps() as f32),
            ),
        ]))))
    }

    /// Overwrites the target estimator with the parameters of the main one.
    pub fn sync_target(&mut self) -> Result<()> {
        self.target.copy_parameters_from(&self.main)?;
        debug!("Synchronized the target estimator");
        Ok(())
    }

    /// Saves both estimators in the given directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        self.main.save(&path.join("main"))?;
        self.target.save(&path.join("target"))?;
        info!("Saved the agent in {:?}", path);
        Ok(())
    }

    /// Loads both estimators from the given directory.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.main.load(&path.join("main"))?;
        self.target.load(&path.join("target"))?;
        info!("Loaded the agent from {:?}", path);
        Ok(())
    }

    /// The replay memory.
    pub fn memory(&self) -> &ReplayMemory<Q::State> {
        &self.memory
    }

    /// The main estimator.
    pub fn main(&self) -> &Q {
        &self.main
    }

    /// The target estimator.
    pub fn target(&self) -> &Q {
        &self.target
    }

    /// Number of actions.
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Number of frames stacked into a state.
    pub fn frame_depth(&self) -> usize {
        self.frame_depth
    }

    /// Number of training steps done.
    pub fn n_train_steps(&self) -> usize {
        self.n_train_steps
    }
}

impl<Q, F> DdqnAgent<Q>
where
    Q: Estimator<State = StackedFrames<F>>,
    F: Clone,
{
    /// Plays an episode greedily without learning.
    ///
    /// Exploration is disabled for good. Returns the number of steps and the
    /// total reward of the episode.
    pub fn run_episode<E, P>(&mut self, env: &mut E, preprocessor: &P) -> Result<(usize, f32)>
    where
        E: Environment,
        P: Preprocessor<Frame = F>,
        E::Frame: Borrow<P::Raw>,
    {
        self.disable_exploration();
        let (mut steps, mut total_reward) = (0usize, 0f32);

        let (frame, _, mut terminated) = env.start_episode()?;
        let first = preprocessor.process(Borrow::<P::Raw>::borrow(&frame));
        let mut state = StackedFrames::filled(first, self.frame_depth)?;

        while !terminated {
            let (action, _) = self.decide_action(&state)?;
            let (frame, reward, is_terminated) = env.apply_action(action)?;
            debug!("action: {}", env.action_name(action));

            let frame = preprocessor.process(Borrow::<P::Raw>::borrow(&frame));
            state = state.advance(frame);
            terminated = is_terminated;
            steps += 1;
            total_reward += reward;
        }

        info!("Episode finished: steps = {}, reward = {}", steps, total_reward);
        Ok((steps, total_reward))
    }
}
