use super::Record;

/// Destination of the records emitted during training.
pub trait Recorder {
    /// Writes a record immediately.
    fn write(&mut self, record: Record);

    /// Stores a record to be aggregated at the next [`Recorder::flush`].
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the number of training steps done so far.
    fn flush(&mut self, step: usize);
}
