pub mod model_onnx;

use ndarray::{Array3, ArrayView3};

use crate::error::{ClassifierError, Error, Result};
use crate::window::TemporalWindow;

/// Scalar outputs above this are the positive class.
pub const BINARY_THRESHOLD: f32 = 0.5;

/// A temporal model consuming a `(1, N, 2K)` tensor and returning raw scores,
/// either one per state or a single scalar for binary models.
pub trait Classifier {
    fn classify(
        &mut self,
        input: ArrayView3<'_, f32>,
    ) -> std::result::Result<Vec<f32>, ClassifierError>;

    /// Number of scores the model produces, when it is known up front.
    fn output_cardinality(&self) -> Option<usize> {
        None
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(
        &mut self,
        input: ArrayView3<'_, f32>,
    ) -> std::result::Result<Vec<f32>, ClassifierError> {
        (**self).classify(input)
    }

    fn output_cardinality(&self) -> Option<usize> {
        (**self).output_cardinality()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub class_index: usize,
    pub scores: Vec<f32>,
}

/// Decodes raw scores into a class index.
///
/// Several scores: argmax, the lowest index wins ties and NaN never wins.
/// One score: class 1 iff it exceeds [`BINARY_THRESHOLD`].
pub fn decode(scores: &[f32]) -> Option<usize> {
    match scores {
        [] => None,
        [score] => Some(usize::from(*score > BINARY_THRESHOLD)),
        _ => {
            let mut best = 0;
            for (i, &score) in scores.iter().enumerate().skip(1) {
                if score > scores[best] || (scores[best].is_nan() && !score.is_nan()) {
                    best = i;
                }
            }
            Some(best)
        }
    }
}

/// Packs a full window into the model's batch tensor, runs the model once and
/// decodes its output. Errors from the model are returned untouched.
pub struct ClassificationTrigger<C> {
    classifier: C,
    batch: Array3<f32>,
    invocations: u64,
}

impl<C: Classifier> ClassificationTrigger<C> {
    pub fn new(classifier: C, window_size: usize, feature_len: usize) -> Self {
        Self {
            classifier,
            batch: Array3::zeros((1, window_size, feature_len)),
            invocations: 0,
        }
    }

    pub fn classify(&mut self, window: &TemporalWindow) -> Result<ClassificationResult> {
        if !window.is_ready() {
            return Err(Error::WindowNotReady {
                len: window.len(),
                capacity: window.capacity(),
            });
        }

        window.write_batch(self.batch.view_mut())?;
        self.invocations += 1;
        let scores = self.classifier.classify(self.batch.view())?;
        let class_index = decode(&scores).ok_or(ClassifierError::EmptyOutput)?;

        Ok(ClassificationResult {
            class_index,
            scores,
        })
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// How many times the model has been called.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f32>);

    impl Classifier for Fixed {
        fn classify(
            &mut self,
            input: ArrayView3<'_, f32>,
        ) -> std::result::Result<Vec<f32>, ClassifierError> {
            assert_eq!(input.shape(), &[1, 2, 2]);
            Ok(self.0.clone())
        }
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(decode(&[0.5, 0.5, 0.2]), Some(0));
        assert_eq!(decode(&[0.1, 0.7, 0.7]), Some(1));
        assert_eq!(decode(&[-3.0, -1.0, -2.0]), Some(1));
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(decode(&[f32::NAN, 0.1, 0.3]), Some(2));
        assert_eq!(decode(&[0.2, f32::NAN, 0.1]), Some(0));
    }

    #[test]
    fn scalar_output_is_thresholded() {
        assert_eq!(decode(&[0.73]), Some(1));
        assert_eq!(decode(&[0.5]), Some(0));
        assert_eq!(decode(&[0.1]), Some(0));
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn trigger_requires_full_window() {
        let mut trigger = ClassificationTrigger::new(Fixed(vec![1.0, 0.0]), 2, 2);
        let mut window = TemporalWindow::new(2, 2);
        window.push(&[0.0, 0.0]).unwrap();

        assert!(matches!(
            trigger.classify(&window),
            Err(Error::WindowNotReady { len: 1, capacity: 2 })
        ));
        assert_eq!(trigger.invocations(), 0);

        window.push(&[0.0, 0.0]).unwrap();
        let result = trigger.classify(&window).unwrap();
        assert_eq!(result.class_index, 0);
        assert_eq!(result.scores, vec![1.0, 0.0]);
        assert_eq!(trigger.invocations(), 1);
    }

    #[test]
    fn empty_output_is_a_classifier_error() {
        let mut trigger = ClassificationTrigger::new(Fixed(vec![]), 2, 2);
        let mut window = TemporalWindow::new(2, 2);
        window.push(&[0.0, 0.0]).unwrap();
        window.push(&[0.0, 0.0]).unwrap();

        assert!(matches!(
            trigger.classify(&window),
            Err(Error::Classifier(ClassifierError::EmptyOutput))
        ));
    }
}
