//! Fixed-depth window of processed frames.
use crate::error::RexError;
use serde::{Deserialize, Serialize};

/// The most recent processed frames, oldest first.
///
/// This is the state the agent acts on. The depth is fixed at construction
/// and preserved by [`StackedFrames::advance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedFrames<F> {
    frames: Vec<F>,
}

impl<F: Clone> StackedFrames<F> {
    /// Creates a window of `depth` copies of `frame`, used at the start of an
    /// episode when no history exists yet.
    pub fn filled(frame: F, depth: usize) -> Result<Self, RexError> {
        if depth == 0 {
            return Err(RexError::InvalidConfig(
                "frame depth must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            frames: vec![frame; depth],
        })
    }

    /// Creates a window from the given frames, oldest first.
    pub fn from_frames(frames: Vec<F>) -> Result<Self, RexError> {
        if frames.is_empty() {
            return Err(RexError::InvalidConfig(
                "frame depth must be at least 1".to_string(),
            ));
        }
        Ok(Self { frames })
    }

    /// Returns a new window with the oldest frame dropped and `frame` appended.
    pub fn advance(&self, frame: F) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len());
        frames.extend_from_slice(&self.frames[1..]);
        frames.push(frame);
        Self { frames }
    }

    /// Number of frames in the window.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames in the window, oldest first.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// The most recent frame.
    pub fn latest(&self) -> &F {
        // never empty
        &self.frames[self.frames.len() - 1]
    }
}
