// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PlantVillage class catalog
//!
//! Label position must match the classifier's output ordering exactly;
//! a reordered catalog silently mislabels every prediction.

/// Delimiter between crop and condition in a catalog label
pub const LABEL_DELIMITER: &str = "___";

/// PlantVillage 38 classes, in model output order
pub const PLANT_VILLAGE_CLASSES: [&str; 38] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Blueberry___healthy",
    "Cherry_(including_sour)___Powdery_mildew",
    "Cherry_(including_sour)___healthy",
    "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_(maize)___Common_rust_",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Corn_(maize)___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// Ordered, immutable list of class labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    labels: Vec<String>,
}

impl ClassCatalog {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// The 38-class PlantVillage catalog
    pub fn plant_village() -> Self {
        Self::new(PLANT_VILLAGE_CLASSES)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::plant_village()
    }
}

/// Turn a catalog label into display text.
///
/// `"Tomato___Early_blight"` becomes `"Tomato - Early blight"`.
pub fn display_name(label: &str) -> String {
    label.replace(LABEL_DELIMITER, " - ").replace('_', " ")
}
