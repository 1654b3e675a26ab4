// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Damage estimation across the whole PlantVillage catalog

use farmer_shield_ai::diagnosis::{
    aggregate, ClassCatalog, ImageOutcome, Prediction, SeverityTable, CONFIDENCE_PROXY_CAP,
};

fn outcome(label: &str, confidence: f64) -> ImageOutcome {
    ImageOutcome::Classified(Prediction {
        class_name: label.to_string(),
        confidence,
    })
}

#[test]
fn test_every_label_damage_in_range() {
    let table = SeverityTable::default();
    for label in ClassCatalog::plant_village().labels() {
        for confidence in [0.0, 50.0, 99.9] {
            let response = aggregate(&[outcome(label, confidence)], &table);
            assert!(
                (0.0..=100.0).contains(&response.damage_percentage),
                "{} -> {}",
                label,
                response.damage_percentage
            );
            assert_eq!(response.analysis_count, 1);
        }
    }
}

#[test]
fn test_healthy_labels_report_no_damage() {
    let table = SeverityTable::default();
    for label in ClassCatalog::plant_village()
        .labels()
        .filter(|l| l.ends_with("healthy"))
    {
        let response = aggregate(&[outcome(label, 99.0)], &table);
        assert_eq!(response.damage_percentage, 0.0, "{}", label);
    }
}

#[test]
fn test_custom_table_fallback_cap() {
    let table = SeverityTable::new([("healthy", 0u8), ("rust", 0u8)]);

    let response = aggregate(&[outcome("Wheat___Stem_rust", 97.5)], &table);
    assert_eq!(response.damage_percentage, CONFIDENCE_PROXY_CAP);

    let response = aggregate(&[outcome("Wheat___Stem_rust", 12.3)], &table);
    assert_eq!(response.damage_percentage, 12.3);
}

#[test]
fn test_first_match_wins_in_table_order() {
    // "Leaf_blight" appears after "Northern_Leaf_Blight", which matches first
    let table = SeverityTable::default();
    let response = aggregate(&[outcome("Corn_(maize)___Northern_Leaf_Blight", 90.0)], &table);
    assert_eq!(response.damage_percentage, 80.0);
}
