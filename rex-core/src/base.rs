//! Interfaces of the collaborators of the agent.
mod env;
mod estimator;
mod frames;
mod preprocessor;
pub use env::Environment;
pub use estimator::Estimator;
pub use frames::StackedFrames;
pub use preprocessor::Preprocessor;
