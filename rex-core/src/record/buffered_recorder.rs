use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written and stored record in memory. Flushing moves the stored
/// records to the written ones, tagged with the step of the flush.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    stored: Vec<Record>,
    flushed_steps: Vec<usize>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the written records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.buf.iter()
    }

    /// Steps at which [`Recorder::flush`] was called.
    pub fn flushed_steps(&self) -> &[usize] {
        &self.flushed_steps
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn store(&mut self, record: Record) {
        self.stored.push(record);
    }

    fn flush(&mut self, step: usize) {
        self.flushed_steps.push(step);
        self.buf.append(&mut self.stored);
    }
}
