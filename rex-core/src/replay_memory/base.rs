//! Circular replay memory with uniform sampling.
use super::{Experience, ExperienceBatch, ReplayMemoryConfig};
use crate::error::RexError;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity circular store of experiences.
///
/// Each field of an experience lives in its own column, so that a sampled
/// batch is built by projecting the columns on the drawn indices.
///
/// * `remember` is O(1) and never fails; once `len() == capacity()` the
///   oldest experience is overwritten.
/// * `sample(n)` draws `min(n, len())` distinct indices uniformly from the
///   valid entries.
pub struct ReplayMemory<S> {
    /// Maximum number of experiences.
    capacity: usize,

    /// Slot written by the next call of `remember`.
    i: usize,

    /// Number of valid experiences.
    size: usize,

    states: Vec<S>,
    actions: Vec<usize>,
    rewards: Vec<f32>,
    next_states: Vec<S>,
    terminal: Vec<bool>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl<S> ReplayMemory<S> {
    /// Builds an empty memory.
    ///
    /// Fails if the capacity is zero.
    pub fn build(config: &ReplayMemoryConfig) -> Result<Self, RexError> {
        let capacity = config.capacity;
        if capacity == 0 {
            return Err(RexError::InvalidConfig(
                "replay memory capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            i: 0,
            size: 0,
            states: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_states: Vec::with_capacity(capacity),
            terminal: Vec::with_capacity(capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Stores an experience, overwriting the oldest one if the memory is full.
    pub fn remember(&mut self, experience: Experience<S>) {
        let Experience {
            state,
            action,
            reward,
            next_state,
            terminal,
        } = experience;

        if self.states.len() < self.capacity {
            // Slots are allocated lazily until the first wrap-around.
            self.states.push(state);
            self.actions.push(action);
            self.rewards.push(reward);
            self.next_states.push(next_state);
            self.terminal.push(terminal);
        } else {
            self.states[self.i] = state;
            self.actions[self.i] = action;
            self.rewards[self.i] = reward;
            self.next_states[self.i] = next_state;
            self.terminal[self.i] = terminal;
        }

        self.i = (self.i + 1) % self.capacity;
        self.size = (self.size + 1).min(self.capacity);
    }

    /// Current number of experiences.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no experience has been stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maximum number of experiences.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the stored experiences from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = Experience<&S>> + '_ {
        // Before the first wrap-around `i == size`, so the start is slot 0.
        let start = if self.size < self.capacity { 0 } else { self.i };
        (0..self.size).map(move |k| {
            let ix = (start + k) % self.capacity;
            Experience::new(
                &self.states[ix],
                self.actions[ix],
                self.rewards[ix],
                &self.next_states[ix],
                self.terminal[ix],
            )
        })
    }

    /// Number of stored experiences flagged as terminal.
    pub fn num_terminal(&self) -> usize {
        self.terminal.iter().filter(|&&t| t).count()
    }
}

impl<S: Clone> ReplayMemory<S> {
    /// Samples a batch of `min(n, len())` distinct experiences uniformly at
    /// random.
    ///
    /// Fails with [`RexError::EmptyMemory`] if the memory is empty and `n > 0`.
    pub fn sample(&mut self, n: usize) -> Result<ExperienceBatch<S>, RexError> {
        if self.size == 0 && n > 0 {
            return Err(RexError::EmptyMemory);
        }

        let m = n.min(self.size);
        let ixs = index::sample(&mut self.rng, self.size, m).into_vec();

        Ok(ExperienceBatch {
            states: ixs.iter().map(|&ix| self.states[ix].clone()).collect(),
            actions: ixs.iter().map(|&ix| self.actions[ix]).collect(),
            rewards: ixs.iter().map(|&ix| self.rewards[ix]).collect(),
            next_states: ixs.iter().map(|&ix| self.next_states[ix].clone()).collect(),
            terminal: ixs.iter().map(|&ix| self.terminal[ix]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn memory(capacity: usize) -> ReplayMemory<u32> {
        let config = ReplayMemoryConfig::default().capacity(capacity).seed(0);
        ReplayMemory::build(&config).unwrap()
    }

    // Experience `k` is tagged by its state `k`, its next state `k + 100`,
    // its action `k % 3` and its reward `k`.
    fn experience(k: u32) -> Experience<u32> {
        Experience::new(k, (k % 3) as usize, k as f32, k + 100, k % 4 == 0)
    }

    #[test]
    fn test_count_is_min_of_inserts_and_capacity() {
        let mut mem = memory(5);
        assert!(mem.is_empty());
        for k in 1..=12 {
            mem.remember(experience(k));
            assert_eq!(mem.len(), (k as usize).min(5));
        }
        assert_eq!(mem.capacity(), 5);
    }

    #[test]
    fn test_oldest_experiences_are_evicted_in_order() {
        let mut mem = memory(4);
        for k in 1..=10 {
            mem.remember(experience(k));
        }
        let states = mem.iter().map(|e| *e.state).collect::<Vec<_>>();
        assert_eq!(states, vec![7, 8, 9, 10]);

        let mut mem = memory(4);
        for k in 1..=2 {
            mem.remember(experience(k));
        }
        let states = mem.iter().map(|e| *e.state).collect::<Vec<_>>();
        assert_eq!(states, vec![1, 2]);
    }

    #[test]
    fn test_num_terminal_follows_eviction() {
        // experiences 4 and 8 are terminal
        let mut mem = memory(6);
        for k in 1..=6 {
            mem.remember(experience(k));
        }
        assert_eq!(mem.num_terminal(), 1);
        for k in 7..=9 {
            mem.remember(experience(k));
        }
        // 4 and 8 are held
        assert_eq!(mem.num_terminal(), 2);
        for k in 10..=14 {
            mem.remember(experience(k));
        }
        // 9..=14 are held, only 12 is terminal
        assert_eq!(mem.num_terminal(), 1);
    }

    #[test]
    fn test_capacity_three_holds_last_three() {
        let mut mem = memory(3);
        for k in 1..=5 {
            mem.remember(experience(k));
        }

        let batch = mem.sample(5).unwrap();
        assert_eq!(batch.len(), 3);
        let mut states = batch.states.clone();
        states.sort();
        assert_eq!(states, vec![3, 4, 5]);
    }

    #[test]
    fn test_sample_is_distinct_and_aligned() {
        let mut mem = memory(50);
        for k in 0..80 {
            mem.remember(experience(k));
        }

        for n in [0usize, 1, 10, 50, 70] {
            let batch = mem.sample(n).unwrap();
            assert_eq!(batch.len(), n.min(50));

            let distinct = batch.states.iter().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), batch.len());

            let (states, actions, rewards, next_states, terminal) = batch.unpack();
            for i in 0..states.len() {
                let k = states[i];
                assert!((30..80).contains(&k));
                assert_eq!(actions[i], (k % 3) as usize);
                assert_eq!(rewards[i], k as f32);
                assert_eq!(next_states[i], k + 100);
                assert_eq!(terminal[i], k % 4 == 0);
            }
        }
    }

    #[test]
    fn test_partially_filled_memory_returns_fewer() {
        let mut mem = memory(10);
        mem.remember(experience(1));
        mem.remember(experience(2));
        let batch = mem.sample(32).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_sample_empty_memory() {
        let mut mem = memory(10);
        assert_eq!(mem.sample(1), Err(RexError::EmptyMemory));
        assert!(mem.sample(0).unwrap().is_empty());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = ReplayMemoryConfig::default().capacity(0);
        assert!(matches!(
            ReplayMemory::<u32>::build(&config),
            Err(RexError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sampling_covers_every_entry() {
        let mut mem = memory(8);
        for k in 0..8 {
            mem.remember(experience(k));
        }
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(mem.sample(2).unwrap().states);
        }
        assert_eq!(seen.len(), 8);
    }
}
