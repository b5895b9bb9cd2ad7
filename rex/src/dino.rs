//! A runner jumping over obstacles on a one-dimensional track.
mod base;
mod config;
pub use base::DinoRun;
pub use config::DinoRunConfig;
