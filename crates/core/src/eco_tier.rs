use serde::Serialize;

pub const SUSTAINABLE_THRESHOLD: f64 = 0.5;
pub const MODERATE_THRESHOLD: f64 = 0.35;

/// Sustainability band derived from an eco score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoTier {
    Sustainable,
    Moderate,
    Low,
}

impl EcoTier {
    pub const ALL: [Self; 3] = [Self::Sustainable, Self::Moderate, Self::Low];

    /// Total over all inputs: scores above 1.0 land in `Sustainable`,
    /// negative scores and NaN in `Low`.
    pub fn classify(score: f64) -> Self {
        if score >= SUSTAINABLE_THRESHOLD {
            Self::Sustainable
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Card background color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Sustainable => "#235723",
            Self::Moderate => "#f7aa0f",
            Self::Low => "#b32020",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sustainable => "Very Sustainable",
            Self::Moderate => "Somewhat Sustainable",
            Self::Low => "Not Sustainable",
        }
    }

    pub fn color_name(&self) -> &'static str {
        match self {
            Self::Sustainable => "Green",
            Self::Moderate => "Yellow",
            Self::Low => "Red",
        }
    }
}

/// Legend line explaining the card colors.
pub fn legend() -> String {
    let entries: Vec<String> = EcoTier::ALL
        .iter()
        .map(|tier| format!("{} = {}", tier.color_name(), tier.label()))
        .collect();
    format!("Colors dependent on Eco-Score ({})", entries.join(", "))
}
