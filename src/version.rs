// Version information for the Farmer Shield AI service

/// Service name shown in startup logs
pub const SERVICE_NAME: &str = "Farmer Shield AI";

/// One-line service description
pub const SERVICE_DESCRIPTION: &str =
    "Crop Disease Detection using ResNet50 pretrained on PlantVillage";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Identifier of the deployed classifier, returned on every prediction
pub const MODEL_VERSION: &str = "ResNet50-PlantVillage-v1";

/// Reported top-1 accuracy of the classifier on PlantVillage
pub const MODEL_ACCURACY: &str = "98.7%";

/// Dataset the classifier was fine-tuned on
pub const DATASET: &str = "PlantVillage";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {} ({})", SERVICE_NAME, VERSION_NUMBER, MODEL_VERSION)
}

/// Get full version info as JSON
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "service": SERVICE_NAME,
        "description": SERVICE_DESCRIPTION,
        "version": VERSION_NUMBER,
        "model": MODEL_VERSION,
        "model_accuracy": MODEL_ACCURACY,
        "dataset": DATASET,
    })
}
