use std::path::PathBuf;

use clap::Parser;

use fatiguetracking::classifier::model_onnx::OnnxClassifier;
use fatiguetracking::classifier::Classifier;
use fatiguetracking::{logging, FeatureNormalizer, PipelineConfig};

/// Prints a model's input/output layout and checks it against a pipeline config
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    model: PathBuf,

    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init("warn");

    let config = PipelineConfig::load(&args.config)?;
    config.validate()?;
    let feature_len = FeatureNormalizer::from_config(&config)?.feature_len();

    let classifier = OnnxClassifier::load(&args.model, config.intra_threads)?;

    println!("Inspecting model: {}", args.model.display());
    println!("\n--- Input ---");
    println!("Name: {}", classifier.input().name);
    println!("Dims: {:?}", classifier.input().dimensions);
    println!("\n--- Output ---");
    println!("Name: {}", classifier.output().name);
    println!("Dims: {:?}", classifier.output().dimensions);

    println!("\nPipeline produces (1, {}, {})", config.window_size, feature_len);
    match classifier.check_input_shape(config.window_size, feature_len) {
        Ok(()) => println!("Input shape: ok"),
        Err(e) => println!("Input shape: {e}"),
    }
    match classifier.output_cardinality() {
        Some(n) => println!(
            "Output cardinality: {n}, label table: {:?}",
            config.label_table
        ),
        None => println!("Output cardinality: dynamic"),
    }

    Ok(())
}
