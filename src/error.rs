use thiserror::Error;

/// Configuration problems. All of these are detected before the first frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window_size must be greater than zero")]
    EmptyWindow,
    #[error("index_groups must contain at least one group")]
    NoIndexGroups,
    #[error("index group `{0}` has no indices")]
    EmptyIndexGroup(String),
    #[error("label_table must contain at least one label")]
    EmptyLabelTable,
    #[error("label table has {labels} entries but the classifier produces {outputs} scores")]
    LabelCardinality { labels: usize, outputs: usize },
    #[error("degenerate_scale_epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f32),
    #[error("frame_stride must be greater than zero")]
    ZeroFrameStride,
    #[error("channel_capacity must be greater than zero")]
    ZeroChannelCapacity,
    #[error("no model path configured")]
    MissingModelPath,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("onnx runtime error: {0}")]
    Runtime(String),
    #[error("model expects input shape {expected:?}, pipeline produces {actual:?}")]
    InputShape {
        expected: Vec<Option<u32>>,
        actual: [usize; 3],
    },
    #[error("model has no {0}")]
    MissingTensor(&'static str),
    #[error("classifier returned an empty score vector")]
    EmptyOutput,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("feature vector has {actual} values, window expects {expected}")]
    FeatureLength { expected: usize, actual: usize },
    #[error("batch tensor has shape {actual:?}, window needs {expected:?}")]
    BatchShape { expected: [usize; 3], actual: Vec<usize> },
    #[error("window holds {len} of {capacity} frames, classification needs a full window")]
    WindowNotReady { len: usize, capacity: usize },
    #[error("recording has shape {0:?}, expected (frames, points, 2 or 3)")]
    RecordingShape(Vec<usize>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),
}

pub type Result<T> = std::result::Result<T, Error>;
