//! Strict validation of the model's JSON answer.
//!
//! The model is asked for `{"suggestions": [ ... ]}` with exactly three
//! entries. Anything else is reported as a [`SchemaViolation`] naming the
//! first rule that failed; extra fields are ignored.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::domain::suggestion::{Suggestion, SuggestionSet, SUGGESTIONS_PER_SET};
use crate::errors::SchemaViolation;

pub fn parse_suggestion_set(raw: &str) -> Result<SuggestionSet, SchemaViolation> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|error| SchemaViolation::InvalidJson(error.to_string()))?;
    suggestion_set_from_value(&root)
}

pub fn suggestion_set_from_value(root: &Value) -> Result<SuggestionSet, SchemaViolation> {
    let root = root.as_object().ok_or(SchemaViolation::RootNotObject)?;
    let entries = root
        .get("suggestions")
        .ok_or(SchemaViolation::MissingSuggestions)?
        .as_array()
        .ok_or(SchemaViolation::SuggestionsNotArray)?;

    let parsed = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| suggestion_from_value(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let count = parsed.len();
    let suggestions: [Suggestion; SUGGESTIONS_PER_SET] =
        parsed.try_into().map_err(|_| SchemaViolation::WrongSuggestionCount(count))?;

    SuggestionSet::new(suggestions)
}

fn suggestion_from_value(index: usize, entry: &Value) -> Result<Suggestion, SchemaViolation> {
    let fields = entry.as_object().ok_or(SchemaViolation::EntryNotObject { index })?;
    let reader = EntryReader { index, fields };

    Ok(Suggestion {
        brand: reader.string("brand")?,
        eco_score: reader.number("brand_eco_score")?,
        avg_price: reader.number("avg_price")?,
        materials: reader.string_list("materials")?,
        material_eco_scores: reader.score_map("material_eco_scores")?,
        alternative_materials: reader.string_list("alternative_materials")?,
        reasoning: reader.string("reasoning")?,
    })
}

struct EntryReader<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> EntryReader<'a> {
    fn field(&self, field: &'static str) -> Result<&'a Value, SchemaViolation> {
        self.fields.get(field).ok_or(SchemaViolation::MissingField { index: self.index, field })
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> SchemaViolation {
        SchemaViolation::WrongFieldType { index: self.index, field, expected }
    }

    fn string(&self, field: &'static str) -> Result<String, SchemaViolation> {
        self.field(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.wrong_type(field, "string"))
    }

    fn number(&self, field: &'static str) -> Result<f64, SchemaViolation> {
        self.field(field)?.as_f64().ok_or_else(|| self.wrong_type(field, "number"))
    }

    fn string_list(&self, field: &'static str) -> Result<Vec<String>, SchemaViolation> {
        self.field(field)?
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "array of strings"))?
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| self.wrong_type(field, "array of strings"))
            })
            .collect()
    }

    fn score_map(&self, field: &'static str) -> Result<IndexMap<String, f64>, SchemaViolation> {
        self.field(field)?
            .as_object()
            .ok_or_else(|| self.wrong_type(field, "object of numbers"))?
            .iter()
            .map(|(material, score)| {
                score
                    .as_f64()
                    .map(|score| (material.clone(), score))
                    .ok_or_else(|| self.wrong_type(field, "object of numbers"))
            })
            .collect()
    }
}
