use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use fatiguetracking::classifier::model_onnx::OnnxClassifier;
use fatiguetracking::recording::Recording;
use fatiguetracking::stream::{self, ErrorPolicy, StreamOptions};
use fatiguetracking::{logging, ConfigError, Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark recording to replay (.npy, shape frames x points x 2|3)
    #[arg(short, long)]
    recording: PathBuf,

    /// Pipeline configuration (JSON)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// ONNX model, overrides `model_path` from the config
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Keep going when a window fails to classify
    #[arg(long, default_value_t = false)]
    skip_errors: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let mut config = PipelineConfig::load(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    if let Some(model) = args.model {
        config.model_path = Some(model);
    }
    config.validate()?;

    let model_path = config
        .model_path
        .clone()
        .ok_or(ConfigError::MissingModelPath)?;
    let classifier = OnnxClassifier::load(&model_path, config.intra_threads)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    let mut pipeline = Pipeline::new(&config, classifier)?;
    pipeline
        .classifier()
        .check_input_shape(config.window_size, pipeline.feature_len())?;

    let recording = Recording::open(&args.recording)?;

    let policy = if args.skip_errors {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::Halt
    };
    let options = StreamOptions::from_config(&config, policy);

    let summary = stream::run(&mut pipeline, recording.frames(), options, |output| {
        if output.changed {
            println!("state: {}", output.label);
        }
        tracing::debug!(label = %output.label, scores = ?output.raw_scores, "frame");
    })?;

    println!(
        "{} frames, {} classified, {} errors, final state: {}",
        summary.frames,
        summary.classified,
        summary.errors,
        pipeline.last_label()
    );
    Ok(())
}
