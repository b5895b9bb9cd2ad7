//! Environment.
use anyhow::Result;

/// A game with a discrete action set, observed through frames.
pub trait Environment {
    /// Raw frame produced by the game.
    type Frame;

    /// Additional information returned at the start of an episode.
    type Info;

    /// Starts a new episode.
    ///
    /// Returns the first frame, information on the episode and whether the
    /// episode is already over.
    fn start_episode(&mut self) -> Result<(Self::Frame, Self::Info, bool)>;

    /// Applies an action, returning the next frame, the reward and whether
    /// the episode has terminated.
    fn apply_action(&mut self, action: usize) -> Result<(Self::Frame, f32, bool)>;

    /// Returns the number of actions.
    fn num_actions(&self) -> usize;

    /// Returns the display name of an action.
    fn action_name(&self, action: usize) -> &str;
}
