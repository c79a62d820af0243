//! Plain-text rendering of suggestion cards, the detail view and the eco
//! score chart.

use naked_core::eco_tier::legend;
use naked_core::{ComparisonChart, EcoTier, Suggestion, SuggestionSet};

const BAR_WIDTH: usize = 40;

pub fn cards(set: &SuggestionSet) -> String {
    let mut lines = vec!["Suggested Brands".to_string(), legend(), String::new()];

    for (position, suggestion) in set.iter().enumerate() {
        let tier = EcoTier::classify(suggestion.eco_score);
        lines.push(format!(
            "{}. {} [{} - {}]",
            position + 1,
            suggestion.brand,
            tier.color_name(),
            tier.label()
        ));
        lines.push(format!("   Avg. Price: ${:.2}", suggestion.avg_price));
        lines.push(format!("   Eco Score: {:.2}", suggestion.eco_score));
        lines.push(format!("   Materials: {}", join_or_none(&suggestion.materials)));
        lines.push(format!(
            "   Alternative Materials: {}",
            join_or_none(&suggestion.alternative_materials)
        ));
    }

    lines.join("\n")
}

pub fn detail(suggestion: &Suggestion) -> String {
    let mut lines = vec![
        format!("Details for {}", suggestion.brand),
        "  Reasoning:".to_string(),
        format!("    {}", suggestion.reasoning),
    ];

    if !suggestion.material_eco_scores.is_empty() {
        lines.push("  Material Eco Scores:".to_string());
        for (material, score) in &suggestion.material_eco_scores {
            lines.push(format!("    - {material}: {score:.2}"));
        }
    }

    lines.push("  Alternative Materials:".to_string());
    lines.push(format!("    {}", join_or_none(&suggestion.alternative_materials)));
    lines.join("\n")
}

pub fn chart(chart: &ComparisonChart) -> String {
    let label_width = chart.points.iter().map(|point| point.brand.chars().count()).max().unwrap_or(0);
    let (low, high) = chart.y_range;

    let mut lines = vec![
        chart.title.to_string(),
        format!("  {:label_width$}  {}", chart.x_axis_title, chart.y_axis_title),
    ];
    for point in &chart.points {
        let fraction = ((point.eco_score - low) / (high - low)).clamp(0.0, 1.0);
        let filled = (fraction * BAR_WIDTH as f64).round() as usize;
        lines.push(format!(
            "  {:label_width$} |{}{}| {:.2}",
            point.brand,
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            point.eco_score
        ));
    }

    lines.join("\n")
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        return "none listed".to_string();
    }
    items.join(", ")
}
