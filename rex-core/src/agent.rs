//! Double DQN agent.
mod base;
mod config;
mod explorer;
pub use base::DdqnAgent;
pub use config::DdqnConfig;
pub use explorer::EpsilonGreedy;
