/// Converts raw frames of an environment into frames given to the estimator.
pub trait Preprocessor {
    /// Raw frame, borrowed from the frames of the environment.
    type Raw: ?Sized;

    /// Processed frame.
    type Frame: Clone;

    /// Processes a raw frame.
    fn process(&self, raw: &Self::Raw) -> Self::Frame;
}
