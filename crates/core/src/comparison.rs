use serde::Serialize;

use crate::domain::suggestion::SuggestionSet;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub brand: String,
    pub eco_score: f64,
}

/// `(brand, eco_score)` pairs in suggestion order.
pub fn project(set: &SuggestionSet) -> Vec<ComparisonPoint> {
    set.iter()
        .map(|suggestion| ComparisonPoint {
            brand: suggestion.brand.clone(),
            eco_score: suggestion.eco_score,
        })
        .collect()
}

/// Bar chart description for the eco score comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub title: &'static str,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    pub y_range: (f64, f64),
    pub points: Vec<ComparisonPoint>,
}

impl ComparisonChart {
    pub fn from_set(set: &SuggestionSet) -> Self {
        Self {
            title: "Eco Score Comparison",
            x_axis_title: "Brand",
            y_axis_title: "Eco Score (0.0 - 1.0)",
            y_range: (0.0, 1.0),
            points: project(set),
        }
    }
}
