use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use naked_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct FileDoc {
    path: PathBuf,
    doc: Value,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };

    let file = detect_config_path().and_then(|path| load_config_file_doc(&path));
    CommandResult::ok(render(&config, file.as_ref()))
}

fn render(config: &AppConfig, file: Option<&FileDoc>) -> String {
    let api_key = if config.llm.has_api_key() { "<redacted>" } else { "<unset>" };
    let entries: [(&str, String, &[&str]); 9] = [
        ("llm.api_key", api_key.to_string(), &["NAKED_LLM_API_KEY", "LITELLM_TOKEN"]),
        ("llm.base_url", config.llm.base_url.clone(), &["NAKED_LLM_BASE_URL"]),
        ("llm.model", config.llm.model.clone(), &["NAKED_LLM_MODEL"]),
        ("llm.temperature", config.llm.temperature.to_string(), &["NAKED_LLM_TEMPERATURE"]),
        ("llm.timeout_secs", config.llm.timeout_secs.to_string(), &["NAKED_LLM_TIMEOUT_SECS"]),
        (
            "knowledge.brand_profiles_path",
            config.knowledge.brand_profiles_path.display().to_string(),
            &["NAKED_KNOWLEDGE_BRAND_PROFILES_PATH"],
        ),
        (
            "knowledge.materials_profiles_path",
            config.knowledge.materials_profiles_path.display().to_string(),
            &["NAKED_KNOWLEDGE_MATERIALS_PROFILES_PATH"],
        ),
        ("logging.level", config.logging.level.clone(), &["NAKED_LOGGING_LEVEL", "NAKED_LOG_LEVEL"]),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["NAKED_LOGGING_FORMAT", "NAKED_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(|(key, value, env_keys)| {
        format!("- {key} = {value} (source: {})", field_source(key, env_keys, file))
    }));
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("naked.toml"), PathBuf::from("config/naked.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: &Path) -> Option<FileDoc> {
    let raw = fs::read_to_string(path).ok()?;
    let doc = raw.parse::<Value>().ok()?;
    Some(FileDoc { path: path.to_path_buf(), doc })
}

fn field_source(key_path: &str, env_keys: &[&str], file: Option<&FileDoc>) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(file) = file {
        if contains_path(&file.doc, key_path) {
            return format!("file ({})", file.path.display());
        }
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they are not a source either.
fn env_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use naked_core::config::AppConfig;
    use toml::Value;

    use super::{contains_path, render, FileDoc};

    #[test]
    fn defaults_are_attributed_and_key_is_not_leaked() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-very-secret".to_string().into());
        let file = FileDoc {
            path: PathBuf::from("naked.toml"),
            doc: "[llm]\nmodel = \"gpt-4o-mini\"\n".parse::<Value>().expect("valid toml"),
        };

        let output = render(&config, Some(&file));

        assert!(!output.contains("sk-very-secret"));
        assert!(output.contains("- llm.api_key = <redacted>"));
        assert!(output.contains("- llm.model = gpt-5-mini (source: file (naked.toml))"));
        assert!(output.contains("- logging.format = compact (source: default)"));
    }

    #[test]
    fn nested_paths_are_resolved() {
        let doc = "[knowledge]\nbrand_profiles_path = \"a.json\"\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "knowledge.brand_profiles_path"));
        assert!(!contains_path(&doc, "knowledge.materials_profiles_path"));
        assert!(!contains_path(&doc, "llm.model"));
    }
}
