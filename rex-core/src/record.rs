//! Types and traits for recording training metrics.
//!
//! Training and evaluation emit [`Record`]s, key-value containers of
//! [`RecordValue`]s. Records are handed to a [`Recorder`], which decides where
//! they go: [`NullRecorder`] drops them, [`BufferedRecorder`] keeps them in
//! memory and [`LogRecorder`] aggregates scalars and writes them to the log.
//!
//! ```rust
//! use rex_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode_steps", RecordValue::Scalar(120.0));
//! record.insert("episode_return", RecordValue::Scalar(-0.5));
//! assert_eq!(record.get_scalar("episode_steps").unwrap(), 120.0);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
