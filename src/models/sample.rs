use std::{fmt::Display, sync::Arc, time::Duration};

use thiserror::Error;

use super::temperature::Temperature;

/// One plotted temperature reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Offset from the start of the roast session.
    pub timestamp: Duration,
    pub temperature: Temperature,
}

impl Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(Sample: t={:.1}s, temperature={})",
            self.timestamp.as_secs_f32(),
            self.temperature
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleBufferError {
    /// Samples must be pushed in strictly increasing time order.
    #[error("Sample at {next:?} does not come after the last sample at {last:?}")]
    NonMonotonic { last: Duration, next: Duration },
}

/// Ordered time series of the current roast session.
///
/// Readers take a [`SampleBuffer::snapshot`] which shares the committed
/// samples. Pushing while a snapshot is alive copies the series once and
/// leaves the snapshot untouched, so a renderer never holds up the poller.
#[derive(Debug, Default, Clone)]
pub struct SampleBuffer {
    samples: Arc<Vec<Sample>>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample. Rejects samples that are not newer than the last one.
    pub fn push(&mut self, sample: Sample) -> Result<(), SampleBufferError> {
        if let Some(last) = self.samples.last() {
            if sample.timestamp <= last.timestamp {
                return Err(SampleBufferError::NonMonotonic {
                    last: last.timestamp,
                    next: sample.timestamp,
                });
            }
        }
        Arc::make_mut(&mut self.samples).push(sample);
        Ok(())
    }

    /// Drop every sample to start a new session.
    pub fn clear(&mut self) {
        self.samples = Arc::new(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Read-only view of what has been committed so far.
    pub fn snapshot(&self) -> Arc<Vec<Sample>> {
        Arc::clone(&self.samples)
    }
}
