use crate::util::OutDim;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Configuration of [`Mlp`](super::Mlp) on flattened stacks of frames.
///
/// The input layer takes `frame_depth * frame_len` values and the output
/// layer gives one value per action. Hidden layers use ReLU; the output layer
/// is linear since action values may be negative.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MlpConfig {
    frame_len: usize,
    frame_depth: usize,
    hidden: Vec<usize>,
    num_actions: usize,
}

impl MlpConfig {
    /// Network on states of `frame_depth` frames of `frame_len` values, with
    /// two hidden layers of 64 units.
    pub fn new(frame_len: usize, frame_depth: usize, num_actions: usize) -> Self {
        Self {
            frame_len,
            frame_depth,
            hidden: vec![64, 64],
            num_actions,
        }
    }

    /// Sets the number of units of each hidden layer.
    pub fn hidden(mut self, v: Vec<usize>) -> Self {
        self.hidden = v;
        self
    }

    /// Length of a frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Number of stacked frames.
    pub fn frame_depth(&self) -> usize {
        self.frame_depth
    }

    /// Length of a flattened state.
    pub fn in_dim(&self) -> usize {
        self.frame_len * self.frame_depth
    }

    /// Widths of the layers, from the input to the output.
    pub(super) fn dims(&self) -> Vec<usize> {
        let mut dims = Vec::with_capacity(self.hidden.len() + 2);
        dims.push(self.in_dim());
        dims.extend_from_slice(&self.hidden);
        dims.push(self.num_actions);
        dims
    }

    /// Rejects layers without unit.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.dims().iter().all(|&d| d > 0),
            "Every layer needs at least one unit, got {:?}",
            self.dims()
        );
        Ok(())
    }
}

impl OutDim for MlpConfig {
    fn get_out_dim(&self) -> usize {
        self.num_actions
    }

    fn set_out_dim(&mut self, v: usize) {
        self.num_actions = v;
    }
}
