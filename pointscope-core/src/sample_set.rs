//! The ordered collection of loaded samples

use crate::error::{Error, Result};
use crate::sample::Sample;
use std::sync::Arc;

/// Ordered sequence of all currently loaded samples
///
/// Append-only during import and cleared on reset, so indices stay dense
/// and stable for the lifetime of a loaded session. Samples are shared via
/// `Arc` with worker threads; structural changes (push, clear) belong to
/// the thread that owns the session.
#[derive(Debug, Default)]
pub struct SampleSet {
    samples: Vec<Arc<Sample>>,
}

impl SampleSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Append a sample; its id must equal the index it lands at
    pub fn push_back(&mut self, sample: Arc<Sample>) {
        debug_assert_eq!(sample.id(), self.samples.len());
        self.samples.push(sample);
    }

    /// Sample at the given index, or `Error::SampleIndex` out of range
    pub fn get(&self, index: usize) -> Result<&Arc<Sample>> {
        self.samples.get(index).ok_or(Error::SampleIndex(index))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples and empty the sequence
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Sample>> {
        self.samples.iter()
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Arc<Sample>;
    type IntoIter = std::slice::Iter<'a, Arc<Sample>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
