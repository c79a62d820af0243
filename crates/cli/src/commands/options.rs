use naked_core::domain::preferences::MAX_FREE_TEXT_CHARS;
use naked_core::{Activity, MaterialPreference, SustainabilityPreference, WeatherCondition};

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let groups = [
        group("--activity (at least one required)", Activity::ALL.iter().map(Activity::label)),
        group("--weather", WeatherCondition::ALL.iter().map(WeatherCondition::label)),
        group("--material", MaterialPreference::ALL.iter().map(MaterialPreference::label)),
        group(
            "--sustainability",
            SustainabilityPreference::ALL.iter().map(SustainabilityPreference::label),
        ),
    ];

    let mut sections: Vec<String> = groups.into_iter().collect();
    sections.push(format!("--description: free text, up to {MAX_FREE_TEXT_CHARS} characters"));
    sections.push(
        "Values match without regard to case, spaces or punctuation (e.g. trail-running)."
            .to_string(),
    );

    CommandResult::ok(sections.join("\n\n"))
}

fn group<'a>(flag: &str, labels: impl Iterator<Item = &'a str>) -> String {
    let mut lines = vec![format!("{flag}:")];
    lines.extend(labels.map(|label| format!("  - {label}")));
    lines.join("\n")
}
