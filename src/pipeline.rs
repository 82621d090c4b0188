use crate::classifier::{ClassificationTrigger, Classifier};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::face_landmarks::LandmarkSet;
use crate::features::FeatureNormalizer;
use crate::state::{FrameOutput, StateReducer};
use crate::window::TemporalWindow;

/// Per-stream state: the running window and the last emitted label. Owned by the
/// caller and advanced one frame at a time.
pub struct Pipeline<C> {
    normalizer: FeatureNormalizer,
    window: TemporalWindow,
    trigger: ClassificationTrigger<C>,
    reducer: StateReducer,
    min_face_confidence: f32,
    features: Vec<f32>,
}

impl<C: Classifier> Pipeline<C> {
    /// Validates the configuration against itself and the classifier. Nothing is
    /// processed if this fails.
    pub fn new(config: &PipelineConfig, classifier: C) -> Result<Self> {
        config.validate()?;

        let normalizer = FeatureNormalizer::from_config(config)?;
        let reducer =
            StateReducer::new(config.label_table.clone(), config.not_ready_label.clone())?;
        if let Some(outputs) = classifier.output_cardinality() {
            reducer.check_cardinality(outputs)?;
        }

        let feature_len = normalizer.feature_len();
        tracing::debug!(
            window_size = config.window_size,
            landmarks = normalizer.selector().len(),
            feature_len,
            "pipeline configured"
        );

        Ok(Self {
            window: TemporalWindow::new(config.window_size, feature_len),
            trigger: ClassificationTrigger::new(classifier, config.window_size, feature_len),
            features: vec![0.0; feature_len],
            min_face_confidence: config.min_face_confidence,
            normalizer,
            reducer,
        })
    }

    /// One full pass for one frame. `None` means the detector found no face.
    ///
    /// A classifier error leaves the window intact; calling again with the next
    /// frame slides the window and retries.
    pub fn process_frame(&mut self, face: Option<&LandmarkSet>) -> Result<FrameOutput> {
        let face = face.filter(|f| f.confidence() >= self.min_face_confidence);

        self.normalizer.normalize_into(face, &mut self.features);
        self.window.push(&self.features)?;

        if !self.window.is_ready() {
            return Ok(self.reducer.not_ready());
        }

        let result = self.trigger.classify(&self.window)?;
        Ok(self.reducer.reduce(result)?)
    }

    /// Empties the window, e.g. after a stream restart.
    pub fn reset(&mut self) {
        self.window.reset();
        self.reducer.reset();
    }

    pub fn last_label(&self) -> &str {
        self.reducer.last_label()
    }

    pub fn window(&self) -> &TemporalWindow {
        &self.window
    }

    pub fn feature_len(&self) -> usize {
        self.normalizer.feature_len()
    }

    pub fn classifier(&self) -> &C {
        self.trigger.classifier()
    }

    pub fn invocations(&self) -> u64 {
        self.trigger.invocations()
    }
}
