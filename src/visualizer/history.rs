// src/visualizer/history.rs
//! Fixed-depth history of magnitude vectors for the waterfall view.

use ringbuf::{HeapRb, traits::*};

use super::MagnitudeVector;

pub const DEFAULT_HISTORY_DEPTH: usize = 10;

pub struct SpectrumHistory {
    rows: Option<HeapRb<MagnitudeVector>>,
}

impl SpectrumHistory {
    /// A depth of zero yields a history that stores nothing.
    pub fn new(depth: usize) -> Self {
        Self {
            rows: (depth > 0).then(|| HeapRb::new(depth)),
        }
    }

    pub fn depth(&self) -> usize {
        self.rows.as_ref().map_or(0, |rb| rb.capacity().get())
    }

    pub fn len(&self) -> usize {
        self.rows.as_ref().map_or(0, |rb| rb.occupied_len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert the newest row, evicting the oldest when full.
    pub fn push(&mut self, vector: MagnitudeVector) {
        if let Some(rb) = self.rows.as_mut() {
            let _ = rb.push_overwrite(vector);
        }
    }

    /// Rows from newest to oldest.
    pub fn newest_first(&self) -> Vec<&MagnitudeVector> {
        let mut rows: Vec<&MagnitudeVector> =
            self.rows.iter().flat_map(|rb| rb.iter()).collect();
        rows.reverse();
        rows
    }

    pub fn clear(&mut self) {
        if let Some(rb) = self.rows.as_mut() {
            rb.clear();
        }
    }
}

impl Default for SpectrumHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
