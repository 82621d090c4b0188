//! Alertness classification from a stream of facial landmarks.
//!
//! Each frame's landmark mesh is reduced to a position- and scale-invariant
//! feature vector, collected into a fixed-length window and, once the window is
//! full, classified as alert, yawning or microsleep by a temporal model.

pub mod classifier;
pub mod config;
pub mod error;
pub mod face_landmarks;
pub mod features;
pub mod logging;
pub mod pipeline;
pub mod recording;
pub mod state;
pub mod stream;
pub mod window;

pub use classifier::{decode, ClassificationResult, ClassificationTrigger, Classifier};
pub use config::PipelineConfig;
pub use error::{ClassifierError, ConfigError, Error, Result};
pub use face_landmarks::{Landmark, LandmarkSelector, LandmarkSet};
pub use features::{FeatureNormalizer, FeatureVector};
pub use pipeline::Pipeline;
pub use state::{FrameOutput, StateReducer};
pub use window::TemporalWindow;
