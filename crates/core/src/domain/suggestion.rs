use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::SchemaViolation;

pub const SUGGESTIONS_PER_SET: usize = 3;

/// One recommended brand, as returned by the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Suggestion {
    pub brand: String,
    #[serde(rename = "brand_eco_score")]
    pub eco_score: f64,
    pub avg_price: f64,
    pub materials: Vec<String>,
    pub material_eco_scores: IndexMap<String, f64>,
    pub alternative_materials: Vec<String>,
    pub reasoning: String,
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

impl Suggestion {
    /// Field and range rules for a single entry. `index` is the entry's
    /// position in the response, used for error reporting.
    pub fn check(&self, index: usize) -> Result<(), SchemaViolation> {
        if self.brand.trim().is_empty() {
            return Err(SchemaViolation::EmptyField { index, field: "brand" });
        }
        if !unit_interval(self.eco_score) {
            return Err(SchemaViolation::OutOfRange {
                index,
                field: "brand_eco_score".to_string(),
                value: self.eco_score,
                range: "[0.0, 1.0]",
            });
        }
        if !self.avg_price.is_finite() || self.avg_price < 0.0 {
            return Err(SchemaViolation::OutOfRange {
                index,
                field: "avg_price".to_string(),
                value: self.avg_price,
                range: "[0.0, inf)",
            });
        }
        if self.materials.is_empty() || self.materials.iter().any(|m| m.trim().is_empty()) {
            return Err(SchemaViolation::EmptyField { index, field: "materials" });
        }
        for (material, score) in &self.material_eco_scores {
            if !self.materials.contains(material) {
                return Err(SchemaViolation::UnlistedMaterialScore {
                    index,
                    material: material.clone(),
                });
            }
            if !unit_interval(*score) {
                return Err(SchemaViolation::OutOfRange {
                    index,
                    field: format!("material_eco_scores.{material}"),
                    value: *score,
                    range: "[0.0, 1.0]",
                });
            }
        }
        if self.reasoning.trim().is_empty() {
            return Err(SchemaViolation::EmptyField { index, field: "reasoning" });
        }

        Ok(())
    }
}

/// The three suggestions produced by one pipeline run. Serializes to the
/// same `{"suggestions": [...]}` shape the model is asked to return.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SuggestionSet {
    suggestions: [Suggestion; SUGGESTIONS_PER_SET],
}

impl SuggestionSet {
    pub fn new(suggestions: [Suggestion; SUGGESTIONS_PER_SET]) -> Result<Self, SchemaViolation> {
        let mut brands = HashSet::new();
        for (index, suggestion) in suggestions.iter().enumerate() {
            suggestion.check(index)?;
            if !brands.insert(suggestion.brand.trim().to_lowercase()) {
                return Err(SchemaViolation::DuplicateBrand { brand: suggestion.brand.clone() });
            }
        }

        Ok(Self { suggestions })
    }

    /// For fixed data that is covered by tests instead of runtime checks.
    pub(crate) fn from_trusted(suggestions: [Suggestion; SUGGESTIONS_PER_SET]) -> Self {
        Self { suggestions }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Suggestion> {
        self.suggestions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Suggestion> {
        self.suggestions.get(index)
    }

    /// Brand lookup uses the same case-insensitive identity as the
    /// uniqueness check.
    pub fn position_of(&self, brand: &str) -> Option<usize> {
        let wanted = brand.trim().to_lowercase();
        self.suggestions.iter().position(|suggestion| suggestion.brand.trim().to_lowercase() == wanted)
    }
}

impl<'a> IntoIterator for &'a SuggestionSet {
    type Item = &'a Suggestion;
    type IntoIter = std::slice::Iter<'a, Suggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
