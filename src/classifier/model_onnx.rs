use std::path::Path;

use ndarray::ArrayView3;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, ValueType};

use super::Classifier;
use crate::error::ClassifierError;

/// Name and declared dimensions of a model input or output. `None` marks a
/// dynamic axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorInfo {
    pub name: String,
    pub dimensions: Vec<Option<u32>>,
}

impl TensorInfo {
    fn new(name: &str, value_type: &ValueType) -> Self {
        let dimensions = match value_type {
            // onnxruntime reports dynamic axes as -1
            ValueType::Tensor { shape, .. } => {
                shape.iter().map(|&d| u32::try_from(d).ok()).collect()
            }
            _ => Vec::new(),
        };
        Self {
            name: name.to_string(),
            dimensions,
        }
    }
}

/// Temporal classifier exported to ONNX, run with onnxruntime on the CPU.
pub struct OnnxClassifier {
    session: Session,
    input: TensorInfo,
    output: TensorInfo,
}

fn runtime(err: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::Runtime(err.to_string())
}

impl OnnxClassifier {
    pub fn load(
        model_path: impl AsRef<Path>,
        intra_threads: usize,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();

        let session = Session::builder()
            .map_err(runtime)?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(runtime)?
            .with_intra_threads(intra_threads)
            .map_err(runtime)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(runtime)?
            .commit_from_file(model_path)
            .map_err(runtime)?;

        let input = session
            .inputs
            .first()
            .map(|i| TensorInfo::new(&i.name, &i.input_type))
            .ok_or(ClassifierError::MissingTensor("inputs"))?;
        let output = session
            .outputs
            .first()
            .map(|o| TensorInfo::new(&o.name, &o.output_type))
            .ok_or(ClassifierError::MissingTensor("outputs"))?;

        tracing::info!(
            path = %model_path.display(),
            input = %input.name,
            input_dims = ?input.dimensions,
            output = %output.name,
            output_dims = ?output.dimensions,
            "loaded onnx classifier"
        );

        Ok(Self {
            session,
            input,
            output,
        })
    }

    pub fn input(&self) -> &TensorInfo {
        &self.input
    }

    pub fn output(&self) -> &TensorInfo {
        &self.output
    }

    /// Fails when a static dimension of the model input disagrees with
    /// `(1, window_size, feature_len)`.
    pub fn check_input_shape(
        &self,
        window_size: usize,
        feature_len: usize,
    ) -> Result<(), ClassifierError> {
        let actual = [1, window_size, feature_len];
        let dims = &self.input.dimensions;

        let matches = dims.len() == actual.len()
            && dims
                .iter()
                .zip(actual)
                .all(|(dim, want)| dim.map_or(true, |d| d as usize == want));

        if matches {
            Ok(())
        } else {
            Err(ClassifierError::InputShape {
                expected: dims.clone(),
                actual,
            })
        }
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&mut self, input: ArrayView3<'_, f32>) -> Result<Vec<f32>, ClassifierError> {
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_array((shape, data)).map_err(runtime)?;

        // load() made sure the model has at least one output
        let outputs = self.session.run(ort::inputs![tensor]).map_err(runtime)?;
        let (_, scores) = outputs[0].try_extract_tensor::<f32>().map_err(runtime)?;
        let scores = scores.to_vec();

        tracing::trace!(?scores, "classifier output");
        Ok(scores)
    }

    /// The last output axis, when the model declares it statically.
    fn output_cardinality(&self) -> Option<usize> {
        self.output
            .dimensions
            .last()
            .copied()
            .flatten()
            .map(|d| d as usize)
    }
}
