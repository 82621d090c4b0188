//! Two-stage runner: frames are acquired on a worker thread and handed to the
//! pipeline over a bounded channel. The channel preserves arrival order, so the
//! window always sees frames in the order they were captured.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use crate::classifier::Classifier;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::face_landmarks::LandmarkSet;
use crate::pipeline::Pipeline;
use crate::state::FrameOutput;

/// What to do when classifying a frame fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop the stream and return the error.
    #[default]
    Halt,
    /// Log the error and keep accumulating frames.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    pub frame_stride: usize,
    pub channel_capacity: usize,
    pub error_policy: ErrorPolicy,
}

impl StreamOptions {
    pub fn from_config(config: &PipelineConfig, error_policy: ErrorPolicy) -> Self {
        Self {
            frame_stride: config.frame_stride,
            channel_capacity: config.channel_capacity,
            error_policy,
        }
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            frame_stride: 1,
            channel_capacity: 8,
            error_policy: ErrorPolicy::Halt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames that went through the pipeline.
    pub frames: usize,
    pub classified: usize,
    pub errors: usize,
}

/// Drives `pipeline` with every `frame_stride`-th frame from `source` until the
/// source is exhausted. `sink` sees the output of every processed frame.
pub fn run<C, I, F>(
    pipeline: &mut Pipeline<C>,
    source: I,
    options: StreamOptions,
    mut sink: F,
) -> Result<StreamSummary>
where
    C: Classifier,
    I: IntoIterator<Item = Option<LandmarkSet>>,
    I::IntoIter: Send,
    F: FnMut(&FrameOutput),
{
    let stride = options.frame_stride.max(1);
    let source = source.into_iter();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::sync_channel(options.channel_capacity.max(1));
        scope.spawn(move || acquire(source, stride, tx));
        consume(pipeline, rx, options.error_policy, &mut sink)
    })
}

fn acquire<I>(source: I, stride: usize, tx: SyncSender<Option<LandmarkSet>>)
where
    I: Iterator<Item = Option<LandmarkSet>>,
{
    for (n, frame) in source.step_by(stride).enumerate() {
        if tx.send(frame).is_err() {
            tracing::debug!(frames = n, "pipeline stage stopped, ending acquisition");
            return;
        }
    }
}

fn consume<C, F>(
    pipeline: &mut Pipeline<C>,
    rx: Receiver<Option<LandmarkSet>>,
    policy: ErrorPolicy,
    sink: &mut F,
) -> Result<StreamSummary>
where
    C: Classifier,
    F: FnMut(&FrameOutput),
{
    let mut summary = StreamSummary::default();

    for frame in rx {
        summary.frames += 1;
        match pipeline.process_frame(frame.as_ref()) {
            Ok(output) => {
                if output.ready {
                    summary.classified += 1;
                }
                sink(&output);
            }
            Err(err @ (Error::Classifier(_) | Error::Config(_))) if policy == ErrorPolicy::Skip => {
                summary.errors += 1;
                tracing::warn!(frame = summary.frames, error = %err, "skipping frame");
            }
            Err(err) => {
                tracing::error!(frame = summary.frames, error = %err, "halting stream");
                return Err(err);
            }
        }
    }

    tracing::info!(
        frames = summary.frames,
        classified = summary.classified,
        errors = summary.errors,
        "stream finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use ndarray::ArrayView3;

    use super::*;
    use crate::error::ClassifierError;
    use crate::face_landmarks::Landmark;

    /// Echoes the last frame's first feature so the output reveals ordering.
    struct LastFrame;

    impl Classifier for LastFrame {
        fn classify(
            &mut self,
            input: ArrayView3<'_, f32>,
        ) -> std::result::Result<Vec<f32>, ClassifierError> {
            let n = input.shape()[1];
            let x = input[[0, n - 1, 0]];
            Ok(vec![x, 0.0, 0.0])
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn classify(
            &mut self,
            _input: ArrayView3<'_, f32>,
        ) -> std::result::Result<Vec<f32>, ClassifierError> {
            Err(ClassifierError::Other("model crashed".into()))
        }
    }

    fn config(window_size: usize) -> PipelineConfig {
        PipelineConfig {
            window_size,
            ..Default::default()
        }
    }

    // every third frame has no face; otherwise landmark 0 encodes the frame number
    fn frames(count: usize) -> Vec<Option<LandmarkSet>> {
        (0..count)
            .map(|i| {
                if i % 3 == 0 {
                    return None;
                }
                let mut points = vec![Landmark::new(0.5, 0.5); 468];
                points[0].x += i as f32 * 0.01;
                Some(LandmarkSet::new(points))
            })
            .collect()
    }

    fn expected_feature(i: usize) -> f32 {
        if i % 3 == 0 {
            0.0
        } else {
            i as f32 * 0.01
        }
    }

    #[test]
    fn processes_every_frame_in_order() {
        let mut pipeline = Pipeline::new(&config(4), LastFrame).unwrap();
        let mut outputs = Vec::new();

        let summary = run(&mut pipeline, frames(10), StreamOptions::default(), |o| {
            outputs.push(o.clone())
        })
        .unwrap();

        assert_eq!(summary.frames, 10);
        assert_eq!(summary.classified, 7);
        assert_eq!(outputs.len(), 10);
        assert!(outputs[..3].iter().all(|o| !o.ready));
        for (i, output) in outputs.iter().enumerate().skip(3) {
            let scores = output.raw_scores.as_ref().unwrap();
            assert!((scores[0] - expected_feature(i)).abs() < 1e-4, "frame {i}");
        }
    }

    #[test]
    fn stride_skips_frames_at_acquisition() {
        let mut pipeline = Pipeline::new(&config(2), LastFrame).unwrap();
        let options = StreamOptions {
            frame_stride: 3,
            ..Default::default()
        };

        let summary = run(&mut pipeline, frames(10), options, |_| {}).unwrap();
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.classified, 3);
    }

    #[test]
    fn halt_policy_returns_the_error() {
        let mut pipeline = Pipeline::new(&config(2), Failing).unwrap();
        let err = run(&mut pipeline, frames(50), StreamOptions::default(), |_| {}).unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
        assert!(pipeline.window().is_ready());
    }

    #[test]
    fn skip_policy_keeps_going() {
        let mut pipeline = Pipeline::new(&config(2), Failing).unwrap();
        let options = StreamOptions {
            error_policy: ErrorPolicy::Skip,
            ..Default::default()
        };

        let summary = run(&mut pipeline, frames(6), options, |_| {}).unwrap();
        assert_eq!(summary.frames, 6);
        assert_eq!(summary.errors, 5);
        assert_eq!(summary.classified, 0);
    }
}
