//! A recorder writing aggregated records to the log.
use super::{Record, RecordValue, Recorder};
use log::info;
use std::collections::BTreeMap;

/// Aggregates stored records and writes them through [`log::info!`].
///
/// On flush, scalars stored under the same key are summarised by their mean,
/// min and max; for other value types the most recent value is kept.
#[derive(Default)]
pub struct LogRecorder {
    stored: Vec<Record>,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates the stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut scalars: BTreeMap<String, Vec<f32>> = BTreeMap::new();
        let mut record = Record::empty();

        for r in self.stored.drain(..) {
            for (k, v) in r.into_iter_in_record() {
                match v {
                    RecordValue::Scalar(v) => scalars.entry(k).or_default().push(v),
                    v => record.insert(k, v),
                }
            }
        }

        for (k, vs) in scalars.into_iter() {
            if vs.len() == 1 {
                record.insert(k, RecordValue::Scalar(vs[0]));
            } else {
                let mean = vs.iter().sum::<f32>() / vs.len() as f32;
                let min = vs.iter().copied().fold(f32::INFINITY, f32::min);
                let max = vs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                record.insert(format!("{}_mean", k), RecordValue::Scalar(mean));
                record.insert(format!("{}_min", k), RecordValue::Scalar(min));
                record.insert(format!("{}_max", k), RecordValue::Scalar(max));
            }
        }

        record
    }
}

fn format_record(record: &Record) -> String {
    let sorted: BTreeMap<_, _> = record.iter().collect();
    sorted
        .into_iter()
        .map(|(k, v)| match v {
            RecordValue::Scalar(v) => format!("{}={:.4}", k, v),
            RecordValue::DateTime(v) => format!("{}={}", k, v.format("%Y-%m-%d %H:%M:%S")),
            RecordValue::Array1(v) => format!("{}={:?}", k, v),
            RecordValue::String(v) => format!("{}={}", k, v),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", format_record(&record));
    }

    fn store(&mut self, record: Record) {
        self.stored.push(record);
    }

    fn flush(&mut self, step: usize) {
        if self.stored.is_empty() {
            return;
        }
        let record = self.aggregate();
        info!("train_steps={}, {}", step, format_record(&record));
    }
}
