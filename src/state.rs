use crate::classifier::ClassificationResult;
use crate::error::ConfigError;

/// What the pipeline reports for every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// The window was full and the classifier ran.
    pub ready: bool,
    pub label: String,
    pub class_index: Option<usize>,
    pub raw_scores: Option<Vec<f32>>,
    /// The label differs from the previous frame's.
    pub changed: bool,
}

/// Maps decoded classes onto the label table and remembers the last label.
#[derive(Debug, Clone)]
pub struct StateReducer {
    labels: Vec<String>,
    not_ready_label: String,
    last_label: String,
}

impl StateReducer {
    pub fn new(labels: Vec<String>, not_ready_label: String) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::EmptyLabelTable);
        }
        Ok(Self {
            labels,
            last_label: not_ready_label.clone(),
            not_ready_label,
        })
    }

    /// A model producing `outputs` scores needs one label per score. A scalar
    /// (binary) model decodes to exactly two classes, so it needs exactly a
    /// negative and a positive label.
    pub fn check_cardinality(&self, outputs: usize) -> Result<(), ConfigError> {
        let ok = match outputs {
            1 => self.labels.len() == 2,
            n => self.labels.len() == n,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigError::LabelCardinality {
                labels: self.labels.len(),
                outputs,
            })
        }
    }

    pub fn not_ready(&mut self) -> FrameOutput {
        let label = self.not_ready_label.clone();
        self.emit(label, None, None)
    }

    pub fn reduce(&mut self, result: ClassificationResult) -> Result<FrameOutput, ConfigError> {
        self.check_cardinality(result.scores.len())?;
        let label = self.labels[result.class_index].clone();

        if result.class_index != 0 {
            tracing::debug!(class = result.class_index, label = %label, "non-baseline state");
        }
        Ok(self.emit(label, Some(result.class_index), Some(result.scores)))
    }

    /// The label emitted for the most recent frame.
    pub fn last_label(&self) -> &str {
        &self.last_label
    }

    pub fn reset(&mut self) {
        self.last_label = self.not_ready_label.clone();
    }

    fn emit(
        &mut self,
        label: String,
        class_index: Option<usize>,
        raw_scores: Option<Vec<f32>>,
    ) -> FrameOutput {
        let changed = label != self.last_label;
        if changed {
            tracing::info!(from = %self.last_label, to = %label, "state changed");
            self.last_label.clone_from(&label);
        }

        FrameOutput {
            ready: class_index.is_some(),
            label,
            class_index,
            raw_scores,
            changed,
        }
    }
}
