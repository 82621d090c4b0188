//! Translation- and scale-invariant per-frame features.
//!
//! Every selected landmark is expressed relative to the nose anchor and divided by
//! the distance between the outer eye corners, so the vector does not change when
//! the subject moves around or towards the camera.

use std::ops::Deref;

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::face_landmarks::{Landmark, LandmarkSelector, LandmarkSet};

/// `2K` values: an `(x, y)` pair per selected landmark, in selector order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Iterates the `(x, y)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.0.chunks_exact(2).map(|p| (p[0], p[1]))
    }
}

impl Deref for FeatureVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    selector: LandmarkSelector,
    anchor_index: usize,
    scale_fiducials: (usize, usize),
    epsilon: f32,
}

impl FeatureNormalizer {
    pub fn new(
        selector: LandmarkSelector,
        anchor_index: usize,
        scale_fiducials: (usize, usize),
        epsilon: f32,
    ) -> Self {
        Self {
            selector,
            anchor_index,
            scale_fiducials,
            epsilon,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let selector = LandmarkSelector::from_groups(&config.index_groups)?;
        Ok(Self::new(
            selector,
            config.anchor_index,
            config.scale_fiducials,
            config.degenerate_scale_epsilon,
        ))
    }

    pub fn selector(&self) -> &LandmarkSelector {
        &self.selector
    }

    /// Length of every vector this normalizer produces.
    pub fn feature_len(&self) -> usize {
        2 * self.selector.len()
    }

    /// Eye-corner distance, or `1.0` when a fiducial is missing or the distance is
    /// zero, NaN or below epsilon.
    pub fn reference_scale(&self, face: &LandmarkSet) -> f32 {
        let (a, b) = self.scale_fiducials;
        let scale = match (face.get_landmark(a), face.get_landmark(b)) {
            (Some(p1), Some(p2)) => nalgebra::distance(&p1, &p2),
            _ => return 1.0,
        };

        if scale.is_nan() || scale == 0.0 || scale < self.epsilon {
            1.0
        } else {
            scale
        }
    }

    pub fn normalize(&self, face: Option<&LandmarkSet>) -> FeatureVector {
        let mut out = FeatureVector::zeros(self.feature_len());
        self.normalize_into(face, &mut out.0);
        out
    }

    /// Writes the features into `out`, which must hold exactly
    /// [`feature_len`](Self::feature_len) values. Without a face (or without an
    /// anchor) the buffer is zero-filled.
    pub(crate) fn normalize_into(&self, face: Option<&LandmarkSet>, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.feature_len());
        out.fill(0.0);

        let Some(face) = face else {
            return;
        };
        let Some(anchor) = face.get_landmark(self.anchor_index) else {
            return;
        };
        let scale = self.reference_scale(face);

        for (slot, landmark) in out.chunks_exact_mut(2).zip(self.selector.select(Some(face))) {
            if let Some(lm) = landmark {
                let (x, y) = relative(&lm, &anchor, scale);
                slot[0] = x;
                slot[1] = y;
            }
        }
    }
}

fn relative(lm: &Landmark, anchor: &Landmark, scale: f32) -> (f32, f32) {
    let d = (lm - anchor) / scale;
    (d.x, d.y)
}
