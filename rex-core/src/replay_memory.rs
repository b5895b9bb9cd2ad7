//! Fixed-capacity experience replay.
//!
//! [`ReplayMemory`] keeps the most recent experiences in a circular store and
//! samples batches uniformly without replacement.
//!
//! ```rust
//! use rex_core::replay_memory::{Experience, ReplayMemory, ReplayMemoryConfig};
//!
//! let config = ReplayMemoryConfig::default().capacity(3).seed(1);
//! let mut memory = ReplayMemory::<u32>::build(&config).unwrap();
//! for i in 0..5 {
//!     memory.remember(Experience::new(i, 0, 1.0, i + 1, false));
//! }
//! assert_eq!(memory.len(), 3);
//!
//! let batch = memory.sample(5).unwrap();
//! assert_eq!(batch.len(), 3);
//! ```
mod base;
mod batch;
mod config;
pub use base::ReplayMemory;
pub use batch::{Experience, ExperienceBatch};
pub use config::ReplayMemoryConfig;
