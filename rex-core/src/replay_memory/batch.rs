//! Experiences and batches of experiences.

/// One observed transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience<S> {
    /// State in which the action was taken.
    pub state: S,

    /// Index of the action.
    pub action: usize,

    /// Reward observed after the action.
    pub reward: f32,

    /// State reached after the action.
    pub next_state: S,

    /// `true` if the episode ended with this transition.
    pub terminal: bool,
}

impl<S> Experience<S> {
    /// Constructs an experience.
    pub fn new(state: S, action: usize, reward: f32, next_state: S, terminal: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            terminal,
        }
    }
}

/// Experiences sampled from a replay memory, stored as parallel sequences
/// aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceBatch<S> {
    /// States.
    pub states: Vec<S>,

    /// Actions.
    pub actions: Vec<usize>,

    /// Rewards.
    pub rewards: Vec<f32>,

    /// Next states.
    pub next_states: Vec<S>,

    /// Terminal flags.
    pub terminal: Vec<bool>,
}

impl<S> ExperienceBatch<S> {
    /// Number of experiences in the batch.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if the batch holds no experience.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Unpacks the batch into `(states, actions, rewards, next_states, terminal)`.
    pub fn unpack(self) -> (Vec<S>, Vec<usize>, Vec<f32>, Vec<S>, Vec<bool>) {
        (
            self.states,
            self.actions,
            self.rewards,
            self.next_states,
            self.terminal,
        )
    }
}
