use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::face_landmarks::model_mediapipe::{
    default_index_groups, LEFT_EYE_OUTER, NOSE_TIP, RIGHT_EYE_OUTER,
};

pub const DEFAULT_WINDOW_SIZE: usize = 45;
pub const DEFAULT_DEGENERATE_SCALE_EPSILON: f32 = 1e-5;

/// Everything the pipeline needs to know before the first frame. Missing fields
/// in a config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of frames per classification window (`N`).
    pub window_size: usize,
    pub index_groups: BTreeMap<String, Vec<usize>>,
    pub anchor_index: usize,
    pub scale_fiducials: (usize, usize),
    pub label_table: Vec<String>,
    pub not_ready_label: String,
    pub degenerate_scale_epsilon: f32,
    /// Detections below this confidence are handled like a frame without a face.
    pub min_face_confidence: f32,
    /// Only every n-th acquired frame enters the pipeline.
    pub frame_stride: usize,
    pub channel_capacity: usize,
    pub model_path: Option<PathBuf>,
    pub intra_threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            index_groups: default_index_groups(),
            anchor_index: NOSE_TIP,
            scale_fiducials: (LEFT_EYE_OUTER, RIGHT_EYE_OUTER),
            label_table: vec!["Alert".into(), "Yawning".into(), "Microsleep".into()],
            not_ready_label: "Loading...".into(),
            degenerate_scale_epsilon: DEFAULT_DEGENERATE_SCALE_EPSILON,
            min_face_confidence: 0.0,
            frame_stride: 1,
            channel_capacity: 8,
            model_path: None,
            intra_threads: 1,
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config. A missing file is not an error: defaults are used.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Structural checks that do not need the classifier. Label cardinality is
    /// checked against the model when the pipeline is assembled.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.index_groups.is_empty() {
            return Err(ConfigError::NoIndexGroups);
        }
        if let Some((name, _)) = self.index_groups.iter().find(|(_, g)| g.is_empty()) {
            return Err(ConfigError::EmptyIndexGroup(name.clone()));
        }
        if self.label_table.is_empty() {
            return Err(ConfigError::EmptyLabelTable);
        }
        let eps = self.degenerate_scale_epsilon;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(eps));
        }
        if self.frame_stride == 0 {
            return Err(ConfigError::ZeroFrameStride);
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok(())
    }
}
