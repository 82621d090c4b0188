use ndarray::{Array2, ArrayView1, ArrayViewMut3, Axis};

use crate::error::{Error, Result};

/// Fixed-capacity FIFO of feature vectors backed by a single `N * 2K` slab.
///
/// Rows live at `(head + i) % capacity`; once full, each push overwrites the
/// oldest row and advances `head`. Pushing never allocates.
#[derive(Debug, Clone)]
pub struct TemporalWindow {
    data: Vec<f32>,
    capacity: usize,
    feature_len: usize,
    head: usize,
    len: usize,
}

impl TemporalWindow {
    pub fn new(capacity: usize, feature_len: usize) -> Self {
        Self {
            data: vec![0.0; capacity * feature_len],
            capacity,
            feature_len,
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, features: &[f32]) -> Result<()> {
        if features.len() != self.feature_len {
            return Err(Error::FeatureLength {
                expected: self.feature_len,
                actual: features.len(),
            });
        }
        if self.capacity == 0 {
            return Ok(());
        }

        let slot = if self.len < self.capacity {
            let slot = (self.head + self.len) % self.capacity;
            self.len += 1;
            slot
        } else {
            let slot = self.head;
            self.head = (self.head + 1) % self.capacity;
            slot
        };

        self.row_mut(slot).copy_from_slice(features);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.capacity > 0 && self.len == self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    /// Back to the filling state, e.g. when the stream restarts.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Rows in insertion order, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.len).map(move |i| self.row((self.head + i) % self.capacity))
    }

    /// Owned copy of the current contents, shape `(len, 2K)`, oldest first.
    pub fn snapshot(&self) -> Array2<f32> {
        let mut out = Array2::zeros((self.len, self.feature_len));
        for (mut dst, src) in out.axis_iter_mut(Axis(0)).zip(self.rows()) {
            dst.assign(&ArrayView1::from(src));
        }
        out
    }

    /// Copies the window into batch slot 0 of a `(1, N, 2K)` tensor.
    pub fn write_batch(&self, mut batch: ArrayViewMut3<'_, f32>) -> Result<()> {
        let expected = [1, self.len, self.feature_len];
        if batch.shape() != &expected[..] {
            return Err(Error::BatchShape {
                expected,
                actual: batch.shape().to_vec(),
            });
        }

        let mut sample = batch.index_axis_mut(Axis(0), 0);
        for (mut dst, src) in sample.axis_iter_mut(Axis(0)).zip(self.rows()) {
            dst.assign(&ArrayView1::from(src));
        }
        Ok(())
    }

    fn row(&self, slot: usize) -> &[f32] {
        let start = slot * self.feature_len;
        &self.data[start..start + self.feature_len]
    }

    fn row_mut(&mut self, slot: usize) -> &mut [f32] {
        let start = slot * self.feature_len;
        &mut self.data[start..start + self.feature_len]
    }
}
