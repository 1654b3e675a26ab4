// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Damage estimation from a predicted class label
//!
//! The table is matched by case-insensitive substring in declaration order
//! and the first hit wins. Some keys overlap (`Northern_Leaf_Blight` also
//! contains `Leaf_blight`), so reordering entries changes results.

/// Upper bound for the confidence-proxy damage estimate
pub const CONFIDENCE_PROXY_CAP: f64 = 85.0;

/// Marker substring identifying healthy classes
const HEALTHY_MARKER: &str = "healthy";

/// Default condition severities, in match order
pub const DEFAULT_SEVERITIES: [(&str, u8); 21] = [
    ("healthy", 0),
    ("Early_blight", 45),
    ("Late_blight", 85),
    ("Black_rot", 75),
    ("Apple_scab", 55),
    ("Cedar_apple_rust", 60),
    ("Powdery_mildew", 50),
    ("Cercospora_leaf_spot", 65),
    ("Common_rust", 70),
    ("Northern_Leaf_Blight", 80),
    ("Esca", 90),
    ("Leaf_blight", 70),
    ("Haunglongbing", 95),
    ("Bacterial_spot", 60),
    ("Leaf_scorch", 55),
    ("Leaf_Mold", 50),
    ("Septoria_leaf_spot", 65),
    ("Spider_mites", 45),
    ("Target_Spot", 60),
    ("Yellow_Leaf_Curl_Virus", 85),
    ("mosaic_virus", 75),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityEntry {
    /// Lower-cased condition substring
    key: String,
    severity: u8,
}

impl SeverityEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }
}

/// Ordered condition → severity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityTable {
    entries: Vec<SeverityEntry>,
}

impl SeverityTable {
    /// Build a table; severities above 100 are clamped
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, severity)| SeverityEntry {
                    key: key.as_ref().to_lowercase(),
                    severity: severity.min(100),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[SeverityEntry] {
        &self.entries
    }

    /// Severity of the first entry whose key occurs in `label`
    pub fn lookup(&self, label: &str) -> Option<u8> {
        let label = label.to_lowercase();
        self.entries
            .iter()
            .find(|entry| label.contains(&entry.key))
            .map(|entry| entry.severity)
    }

    /// Estimate damage (0-100) for the primary prediction.
    ///
    /// A zero table value on a label that is not a healthy class falls back
    /// to the prediction confidence capped at 85.
    pub fn resolve(&self, label: &str, confidence: f64) -> f64 {
        let damage = self.lookup(label).map(f64::from).unwrap_or(0.0);

        if damage == 0.0 && !label.to_lowercase().contains(HEALTHY_MARKER) {
            return confidence.clamp(0.0, 100.0).min(CONFIDENCE_PROXY_CAP);
        }

        damage
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::new(DEFAULT_SEVERITIES)
    }
}
