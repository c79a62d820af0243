use std::sync::Arc;

use clap::Args;
use naked_agent::{ChatCompletionsTransport, RecommendationPipeline, SubmitError};
use naked_core::config::{AppConfig, LoadOptions};
use naked_core::{
    Activity, ComparisonChart, EcoTier, KnowledgeStore, MaterialPreference, OutcomeSummary,
    PreferenceSelection, Session, Suggestion, SustainabilityPreference, WeatherCondition,
};
use serde::Serialize;

use crate::commands::{
    escape_json, CommandResult, EXIT_CONFIG, EXIT_INVALID_SELECTION, EXIT_KNOWLEDGE,
};
use crate::render;

const COMMAND: &str = "recommend";

#[derive(Debug, Default, Args)]
pub struct RecommendArgs {
    #[arg(long = "activity", value_name = "ACTIVITY", help = "Planned activity; repeat for several")]
    pub activities: Vec<Activity>,
    #[arg(long = "weather", value_name = "CONDITION", help = "Expected weather; repeatable")]
    pub weather: Vec<WeatherCondition>,
    #[arg(long = "material", value_name = "MATERIAL", help = "Preferred material family; repeatable")]
    pub materials: Vec<MaterialPreference>,
    #[arg(long = "sustainability", value_name = "LEVEL", help = "Sustainability preference; repeatable")]
    pub sustainability: Vec<SustainabilityPreference>,
    #[arg(long, value_name = "TEXT", help = "Free-form description of what you need")]
    pub description: Option<String>,
    #[arg(long, value_name = "BRAND", help = "Show the detail view for this suggested brand")]
    pub select: Option<String>,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

impl RecommendArgs {
    fn selection(&self) -> PreferenceSelection {
        let selection = PreferenceSelection::new()
            .with_activities(self.activities.iter().copied())
            .with_weather(self.weather.iter().copied())
            .with_materials(self.materials.iter().copied())
            .with_sustainability(self.sustainability.iter().copied());
        match &self.description {
            Some(text) => selection.with_free_text(text.clone()),
            None => selection,
        }
    }
}

#[derive(Debug, Serialize)]
struct TierBadge {
    label: &'static str,
    color: &'static str,
}

impl From<EcoTier> for TierBadge {
    fn from(tier: EcoTier) -> Self {
        Self { label: tier.label(), color: tier.color() }
    }
}

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    command: &'static str,
    status: &'static str,
    #[serde(flatten)]
    outcome: OutcomeSummary<'a>,
    eco_tiers: Vec<TierBadge>,
    selected: Option<&'a Suggestion>,
    unmatched_selection: Option<&'a str>,
    chart: ComparisonChart,
}

pub fn run(args: RecommendArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };

    let knowledge = match KnowledgeStore::load(
        &config.knowledge.brand_profiles_path,
        &config.knowledge.materials_profiles_path,
    ) {
        Ok(knowledge) => knowledge,
        Err(error) => {
            return CommandResult::failure(COMMAND, "knowledge_store", error.to_string(), EXIT_KNOWLEDGE)
        }
    };

    let transport = match ChatCompletionsTransport::new(&config.llm) {
        Ok(transport) => transport,
        Err(error) => {
            return CommandResult::failure(COMMAND, "http_client", error.to_string(), EXIT_CONFIG)
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            )
        }
    };

    let pipeline = RecommendationPipeline::new(Arc::new(knowledge), transport);
    let mut session = Session::new();
    let submitted = runtime.block_on(pipeline.submit_into(&mut session, &args.selection()));
    match submitted {
        Ok(()) => {}
        Err(SubmitError::InvalidSelection(error)) => {
            return CommandResult::failure(
                COMMAND,
                "invalid_selection",
                error.user_message(),
                EXIT_INVALID_SELECTION,
            )
        }
        Err(SubmitError::Session(error)) => {
            return CommandResult::failure(COMMAND, "session", error.to_string(), 1)
        }
    }

    let unmatched = match args.select.as_deref() {
        Some(brand) if session.suggestions().and_then(|set| set.position_of(brand)).is_some() => {
            session.select_brand(brand);
            None
        }
        Some(brand) => {
            session.clear_selection();
            Some(brand)
        }
        None => None,
    };

    let Some(outcome) = session.outcome() else {
        return CommandResult::failure(COMMAND, "session", "submission produced no outcome", 1);
    };

    if args.json {
        let report = RecommendReport {
            command: COMMAND,
            status: "ok",
            outcome: outcome.summary(),
            eco_tiers: outcome
                .suggestions
                .iter()
                .map(|suggestion| TierBadge::from(EcoTier::classify(suggestion.eco_score)))
                .collect(),
            selected: session.selected(),
            unmatched_selection: unmatched,
            chart: ComparisonChart::from_set(&outcome.suggestions),
        };
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"{COMMAND}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult::ok(output);
    }

    let mut sections = Vec::new();
    if let Some(warning) = outcome.warning() {
        sections.push(warning);
    }
    sections.push(render::cards(&outcome.suggestions));
    if let Some(suggestion) = session.selected() {
        sections.push(render::detail(suggestion));
    }
    if let Some(brand) = unmatched {
        sections.push(format!("No suggested brand is named `{brand}`; detail view skipped."));
    }
    sections.push(render::chart(&ComparisonChart::from_set(&outcome.suggestions)));

    CommandResult::ok(sections.join("\n\n"))
}
