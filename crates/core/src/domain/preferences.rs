use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::SelectionError;

pub const MAX_FREE_TEXT_CHARS: usize = 2000;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {category} option `{value}` (expected one of: {expected})")]
pub struct UnknownOption {
    pub category: &'static str,
    pub value: String,
    pub expected: String,
}

/// Option text compared without case, spacing or punctuation, so
/// `trail-running` and `Trail Running` name the same option.
fn option_key(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).map(|ch| ch.to_ascii_lowercase()).collect()
}

fn parse_option<T: Copy>(
    category: &'static str,
    raw: &str,
    all: &[T],
    label: fn(&T) -> &'static str,
) -> Result<T, UnknownOption> {
    let wanted = option_key(raw);
    all.iter().copied().find(|option| option_key(label(option)) == wanted).ok_or_else(|| {
        UnknownOption {
            category,
            value: raw.to_string(),
            expected: all.iter().map(label).collect::<Vec<_>>().join(", "),
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "Hiking")]
    Hiking,
    #[serde(rename = "Backpacking")]
    Backpacking,
    #[serde(rename = "Trail Running")]
    TrailRunning,
    #[serde(rename = "Camping")]
    Camping,
    #[serde(rename = "Casual Outdoor")]
    CasualOutdoor,
}

impl Activity {
    pub const ALL: [Self; 5] =
        [Self::Hiking, Self::Backpacking, Self::TrailRunning, Self::Camping, Self::CasualOutdoor];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hiking => "Hiking",
            Self::Backpacking => "Backpacking",
            Self::TrailRunning => "Trail Running",
            Self::Camping => "Camping",
            Self::CasualOutdoor => "Casual Outdoor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Hot,
    Cold,
    Wet,
    Dry,
    Variable,
}

impl WeatherCondition {
    pub const ALL: [Self; 5] = [Self::Hot, Self::Cold, Self::Wet, Self::Dry, Self::Variable];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Cold => "Cold",
            Self::Wet => "Wet",
            Self::Dry => "Dry",
            Self::Variable => "Variable",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialPreference {
    #[serde(rename = "Natural Fibers")]
    NaturalFibers,
    #[serde(rename = "Synthetic Fibers")]
    SyntheticFibers,
    #[serde(rename = "Technical Materials")]
    TechnicalMaterials,
    #[serde(rename = "Composite or Natural Materials")]
    CompositeOrNatural,
    #[serde(rename = "Blends")]
    Blends,
}

impl MaterialPreference {
    pub const ALL: [Self; 5] = [
        Self::NaturalFibers,
        Self::SyntheticFibers,
        Self::TechnicalMaterials,
        Self::CompositeOrNatural,
        Self::Blends,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NaturalFibers => "Natural Fibers",
            Self::SyntheticFibers => "Synthetic Fibers",
            Self::TechnicalMaterials => "Technical Materials",
            Self::CompositeOrNatural => "Composite or Natural Materials",
            Self::Blends => "Blends",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SustainabilityPreference {
    #[serde(rename = "Very Sustainable")]
    VerySustainable,
    #[serde(rename = "Semi-Sustainable")]
    SemiSustainable,
    #[serde(rename = "Doesn't Matter")]
    DoesNotMatter,
}

impl SustainabilityPreference {
    pub const ALL: [Self; 3] = [Self::VerySustainable, Self::SemiSustainable, Self::DoesNotMatter];

    pub fn label(&self) -> &'static str {
        match self {
            Self::VerySustainable => "Very Sustainable",
            Self::SemiSustainable => "Semi-Sustainable",
            Self::DoesNotMatter => "Doesn't Matter",
        }
    }
}

impl FromStr for Activity {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_option("activity", value, &Self::ALL, Self::label)
    }
}

impl FromStr for WeatherCondition {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_option("weather", value, &Self::ALL, Self::label)
    }
}

impl FromStr for MaterialPreference {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_option("material", value, &Self::ALL, Self::label)
    }
}

impl FromStr for SustainabilityPreference {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_option("sustainability", value, &Self::ALL, Self::label)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for MaterialPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SustainabilityPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user asked for. Each category behaves like a multi-select:
/// insertion order is kept and repeats are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceSelection {
    activities: Vec<Activity>,
    weather_conditions: Vec<WeatherCondition>,
    material_preferences: Vec<MaterialPreference>,
    sustainability_preferences: Vec<SustainabilityPreference>,
    free_text: Option<String>,
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

impl PreferenceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_activities(mut self, activities: impl IntoIterator<Item = Activity>) -> Self {
        activities.into_iter().for_each(|value| push_unique(&mut self.activities, value));
        self
    }

    pub fn with_weather(mut self, conditions: impl IntoIterator<Item = WeatherCondition>) -> Self {
        conditions.into_iter().for_each(|value| push_unique(&mut self.weather_conditions, value));
        self
    }

    pub fn with_materials(
        mut self,
        preferences: impl IntoIterator<Item = MaterialPreference>,
    ) -> Self {
        preferences
            .into_iter()
            .for_each(|value| push_unique(&mut self.material_preferences, value));
        self
    }

    pub fn with_sustainability(
        mut self,
        preferences: impl IntoIterator<Item = SustainabilityPreference>,
    ) -> Self {
        preferences
            .into_iter()
            .for_each(|value| push_unique(&mut self.sustainability_preferences, value));
        self
    }

    /// Kept verbatim; only an empty string counts as absent.
    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.free_text = (!text.is_empty()).then_some(text);
        self
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn weather_conditions(&self) -> &[WeatherCondition] {
        &self.weather_conditions
    }

    pub fn material_preferences(&self) -> &[MaterialPreference] {
        &self.material_preferences
    }

    pub fn sustainability_preferences(&self) -> &[SustainabilityPreference] {
        &self.sustainability_preferences
    }

    pub fn free_text(&self) -> Option<&str> {
        self.free_text.as_deref()
    }

    pub fn validate(&self) -> Result<SubmittableSelection, SelectionError> {
        if self.activities.is_empty() {
            return Err(SelectionError::NoActivities);
        }

        let len = self.free_text.as_deref().map(|text| text.chars().count()).unwrap_or(0);
        if len > MAX_FREE_TEXT_CHARS {
            return Err(SelectionError::FreeTextTooLong { len });
        }

        Ok(SubmittableSelection(self.clone()))
    }
}

/// A selection that passed [`PreferenceSelection::validate`]; the only input
/// a recommendation request can be built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittableSelection(PreferenceSelection);

impl SubmittableSelection {
    pub fn selection(&self) -> &PreferenceSelection {
        &self.0
    }
}
