//! Static suggestions shown whenever the model call fails.

use indexmap::IndexMap;

use crate::domain::suggestion::{Suggestion, SuggestionSet};

const FALLBACK_REASONING: &str = "Fallback display";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn scores(values: &[(&str, f64)]) -> IndexMap<String, f64> {
    values.iter().map(|(material, score)| (material.to_string(), *score)).collect()
}

/// Always the same three brands. The entries are checked against the
/// response validator in tests rather than at runtime.
pub fn fallback() -> SuggestionSet {
    SuggestionSet::from_trusted([
        Suggestion {
            brand: "Mountain Equipment".to_string(),
            eco_score: 0.45,
            avg_price: 99.95,
            materials: strings(&["Recycled Polyester", "Recycled Nylon"]),
            material_eco_scores: scores(&[("Recycled Polyester", 0.7), ("Recycled Nylon", 0.65)]),
            alternative_materials: strings(&["Organic Cotton", "Nylon"]),
            reasoning: FALLBACK_REASONING.to_string(),
        },
        Suggestion {
            brand: "REI Co-op".to_string(),
            eco_score: 0.292962962962963,
            avg_price: 55.69109375,
            materials: strings(&["REPREVE Polyester", "COOLMAX EcoMade Polyester"]),
            material_eco_scores: scores(&[
                ("REPREVE Polyester", 0.8),
                ("COOLMAX EcoMade Polyester", 0.7),
            ]),
            alternative_materials: strings(&["Recycled Polyester", "Nylon"]),
            reasoning: FALLBACK_REASONING.to_string(),
        },
        Suggestion {
            brand: "Fjallraven".to_string(),
            eco_score: 0.5,
            avg_price: 152.5,
            materials: strings(&["Recycled Polyester", "Cotton"]),
            material_eco_scores: scores(&[("Recycled Polyester", 0.7), ("Cotton", 0.25)]),
            alternative_materials: strings(&["Recycled Nylon", "Organic Cotton"]),
            reasoning: FALLBACK_REASONING.to_string(),
        },
    ])
}
