//! Action-value estimator.
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// An action-value function approximator over a discrete action set.
///
/// The agent owns two instances of the same estimator type: the main one,
/// which is trained and used for acting, and the target one, which provides
/// the bootstrapped values of the training targets and is only ever
/// overwritten through [`Estimator::copy_parameters_from`].
///
/// Errors returned by an estimator are passed to the caller of the agent
/// unchanged.
pub trait Estimator {
    /// State given to the estimator.
    type State;

    /// Returns the number of actions, the output dimension of the estimator.
    fn num_actions(&self) -> usize;

    /// Returns the action with the highest estimated value.
    fn best_action(&self, state: &Self::State) -> Result<usize>;

    /// Returns the best action and its estimated value for each state.
    fn best_action_and_value(&self, states: &[Self::State]) -> Result<(Vec<usize>, Vec<f32>)>;

    /// Performs a single regression step.
    ///
    /// The estimated value of `actions[i]` at `states[i]` is regressed toward
    /// `targets[i]`; the values of the other actions are unconstrained.
    /// `step_counter` identifies the step for logging and is not interpreted.
    fn train(
        &mut self,
        states: &[Self::State],
        actions: &[usize],
        targets: &[f32],
        step_counter: usize,
    ) -> Result<Record>;

    /// Overwrites all parameters with those of `other`.
    fn copy_parameters_from(&mut self, other: &Self) -> Result<()>;

    /// Saves the parameters in the given path.
    fn save(&self, path: &Path) -> Result<()>;

    /// Loads the parameters from the given path.
    fn load(&mut self, path: &Path) -> Result<()>;
}
