// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::AssessmentClient;
use crate::diagnosis::{
    aggregate, classify_image, ClassCatalog, ImageOutcome, PredictionResponse, SeverityTable,
};
use crate::vision::{decode_rgb_image, ImageClassifier, OnnxPlantClassifier};

/// Farmer Shield AI CLI
#[derive(Parser, Debug)]
#[command(name = "farmer-shield-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "CLI tools for the Farmer Shield crop damage service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a running service to assess images by URL
    Predict(PredictArgs),

    /// Classify a local image file without starting the service
    Classify(ClassifyArgs),

    /// Print service and model metadata
    Info,
}

/// Arguments for predict command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Base URL of the prediction service
    #[arg(long, env = "AI_SERVICE_URL", default_value = "http://localhost:8000")]
    pub endpoint: String,

    /// Image URL to analyze (repeatable)
    #[arg(long = "image-url", required = true)]
    pub image_urls: Vec<String>,

    /// Fail instead of returning a simulated assessment when the service is down
    #[arg(long)]
    pub no_simulation: bool,
}

/// Arguments for classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the ONNX classifier
    #[arg(
        long,
        env = "CLASSIFIER_MODEL_PATH",
        default_value = "./models/resnet50-plantvillage.onnx"
    )]
    pub model: PathBuf,

    /// Local image file
    #[arg(long)]
    pub image: PathBuf,

    /// ONNX Runtime intra-op threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Predict(args) => predict(args).await,
        Commands::Classify(args) => classify(args),
        Commands::Info => {
            println!(
                "{}",
                serde_json::to_string_pretty(&crate::version::get_version_info())?
            );
            Ok(())
        }
    }
}

async fn predict(args: PredictArgs) -> Result<()> {
    let client = AssessmentClient::new(&args.endpoint)?.with_simulation(!args.no_simulation);
    let result = client.predict_damage(&args.image_urls).await?;

    println!("Damage:   {:.2}%", result.damage_percentage);
    println!("Disease:  {}", result.disease_detected);
    println!("Model:    {}", result.model_version);
    println!("{}", serde_json::to_string_pretty(&result.details)?);
    Ok(())
}

fn classify(args: ClassifyArgs) -> Result<()> {
    let catalog = ClassCatalog::plant_village();
    let classifier = OnnxPlantClassifier::new(&args.model, catalog.len(), args.threads)
        .with_context(|| format!("Failed to load classifier from {}", args.model.display()))?;

    let response = classify_file(&classifier, &catalog, &SeverityTable::default(), &args.image)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Run the local pipeline on one image file
pub fn classify_file(
    classifier: &dyn ImageClassifier,
    catalog: &ClassCatalog,
    severity: &SeverityTable,
    path: &Path,
) -> Result<PredictionResponse> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (image, image_info) = decode_rgb_image(&bytes)?;
    info!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image_info.width,
        image_info.height,
        image_info.format
    );

    let prediction = classify_image(classifier, catalog, &image)?
        .map_err(|e| anyhow!("Failed to analyze {}: {}", path.display(), e))?;

    Ok(aggregate(&[ImageOutcome::Classified(prediction)], severity))
}
