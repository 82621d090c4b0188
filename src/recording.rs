use std::fs::File;
use std::path::Path;

use ndarray::{Array3, ArrayView2, Axis};
use ndarray_npy::ReadNpyExt;

use crate::error::{Error, Result};
use crate::face_landmarks::model_mediapipe::{NUM_LANDMARKS, NUM_LANDMARKS_REFINED};
use crate::face_landmarks::{Landmark, LandmarkSet};

/// Landmarks captured offline, stored as an `.npy` array of shape
/// `(frames, points, 2 | 3)`. A frame filled with NaN had no face.
pub struct Recording {
    data: Array3<f32>,
}

impl Recording {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let data = Array3::<f32>::read_npy(file)?;
        let recording = Self::from_array(data)?;

        tracing::info!(
            path = %path.display(),
            frames = recording.len(),
            points = recording.data.shape()[1],
            "opened landmark recording"
        );
        Ok(recording)
    }

    pub fn from_array(data: Array3<f32>) -> Result<Self> {
        let channels = data.shape()[2];
        if channels != 2 && channels != 3 {
            return Err(Error::RecordingShape(data.shape().to_vec()));
        }

        let points = data.shape()[1];
        if points != NUM_LANDMARKS && points != NUM_LANDMARKS_REFINED {
            // still usable, indices past the end read as missing landmarks
            tracing::warn!(points, "recording is not a full face mesh");
        }
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` for an index past the end as well as for a frame without a face.
    pub fn frame(&self, index: usize) -> Option<LandmarkSet> {
        if index >= self.len() {
            return None;
        }
        frame_to_landmarks(self.data.index_axis(Axis(0), index))
    }

    pub fn frames(&self) -> impl Iterator<Item = Option<LandmarkSet>> + '_ {
        self.data.axis_iter(Axis(0)).map(frame_to_landmarks)
    }
}

fn frame_to_landmarks(frame: ArrayView2<'_, f32>) -> Option<LandmarkSet> {
    if frame.iter().all(|v| v.is_nan()) {
        return None;
    }
    let points = frame
        .axis_iter(Axis(0))
        .map(|p| Landmark::new(p[0], p[1]))
        .collect();
    Some(LandmarkSet::new(points))
}
