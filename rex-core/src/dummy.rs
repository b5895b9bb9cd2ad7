//! Collaborators used in tests.
use crate::{
    base::{Environment, Estimator, Preprocessor, StackedFrames},
    error::RexError,
    record::Record,
};
use anyhow::{anyhow, Result};
use std::path::Path;

/// Arguments of a call of [`Estimator::train`]: the latest frame of each
/// state, actions, targets and the step counter.
pub type TrainCall = (Vec<usize>, Vec<usize>, Vec<f32>, usize);

/// Tabular estimator indexed by the latest frame of a state.
///
/// Training overwrites the value of the taken action with its target.
#[derive(Clone, Debug)]
pub struct TableEstimator {
    num_actions: usize,
    table: Vec<f32>,
    train_calls: Vec<TrainCall>,
    fail: bool,
}

impl TableEstimator {
    pub fn new(num_states: usize, num_actions: usize) -> Self {
        Self {
            num_actions,
            table: vec![0.0; num_states * num_actions],
            train_calls: vec![],
            fail: false,
        }
    }

    /// Makes every training step fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn set(&mut self, state: usize, action: usize, value: f32) {
        self.table[state * self.num_actions + action] = value;
    }

    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn train_calls(&self) -> &[TrainCall] {
        &self.train_calls
    }

    fn row(&self, state: &StackedFrames<usize>) -> &[f32] {
        let s = *state.latest();
        &self.table[s * self.num_actions..(s + 1) * self.num_actions]
    }

    fn best(&self, state: &StackedFrames<usize>) -> (usize, f32) {
        let row = self.row(state);
        let mut best = (0, row[0]);
        for (a, &v) in row.iter().enumerate().skip(1) {
            if v > best.1 {
                best = (a, v);
            }
        }
        best
    }
}

impl Estimator for TableEstimator {
    type State = StackedFrames<usize>;

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn best_action(&self, state: &Self::State) -> Result<usize> {
        Ok(self.best(state).0)
    }

    fn best_action_and_value(&self, states: &[Self::State]) -> Result<(Vec<usize>, Vec<f32>)> {
        Ok(states.iter().map(|s| self.best(s)).unzip())
    }

    fn train(
        &mut self,
        states: &[Self::State],
        actions: &[usize],
        targets: &[f32],
        step_counter: usize,
    ) -> Result<Record> {
        if self.fail {
            return Err(anyhow!("training diverged"));
        }
        let latest = states.iter().map(|s| *s.latest()).collect::<Vec<_>>();
        for i in 0..states.len() {
            self.set(latest[i], actions[i], targets[i]);
        }
        self.train_calls
            .push((latest, actions.to_vec(), targets.to_vec(), step_counter));
        Ok(Record::from_scalar("loss", 0.0))
    }

    fn copy_parameters_from(&mut self, other: &Self) -> Result<()> {
        self.table = other.table.clone();
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<()> {
        let text = self
            .table
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        std::fs::write(path, text)?;
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.table = text
            .split(',')
            .map(|v| v.parse::<f32>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }
}

/// A corridor walked from position 0 to `len`, one cell per step.
///
/// The frame is the current position. Action 1 earns a reward of 1, any other
/// valid action earns nothing.
pub struct CorridorEnv {
    len: usize,
    pos: usize,
    actions: Vec<usize>,
}

impl CorridorEnv {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            pos: 0,
            actions: vec![],
        }
    }

    /// Actions applied since construction.
    pub fn actions(&self) -> &[usize] {
        &self.actions
    }
}

impl Environment for CorridorEnv {
    type Frame = usize;
    type Info = ();

    fn start_episode(&mut self) -> Result<(usize, (), bool)> {
        self.pos = 0;
        Ok((self.pos, (), self.len == 0))
    }

    fn apply_action(&mut self, action: usize) -> Result<(usize, f32, bool)> {
        if action >= self.num_actions() {
            return Err(RexError::InvalidAction(action).into());
        }
        self.actions.push(action);
        self.pos += 1;
        let reward = if action == 1 { 1.0 } else { 0.0 };
        Ok((self.pos, reward, self.pos >= self.len))
    }

    fn num_actions(&self) -> usize {
        3
    }

    fn action_name(&self, action: usize) -> &str {
        match action {
            0 => "stay",
            1 => "walk",
            _ => "wave",
        }
    }
}

/// Passes frames through unchanged.
pub struct IdentityPreprocessor;

impl Preprocessor for IdentityPreprocessor {
    type Raw = usize;
    type Frame = usize;

    fn process(&self, raw: &usize) -> usize {
        *raw
    }
}
