use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use naked_cli::commands::recommend::{self, RecommendArgs};
use naked_cli::commands::{config, doctor};
use naked_core::{Activity, WeatherCondition};
use serde_json::Value;

#[test]
fn recommend_falls_back_when_model_is_unreachable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = knowledge_env(dir.path());

    with_env(&unreachable_model(&vars), || {
        let result = recommend::run(RecommendArgs {
            activities: vec![Activity::Hiking],
            weather: vec![WeatherCondition::Wet],
            ..RecommendArgs::default()
        });
        assert_eq!(result.exit_code, 0, "fallback results are still a success");

        let output = &result.output;
        assert!(output.starts_with("Model error: "), "{output}");
        assert!(output.contains("Showing fallback data."));
        assert!(output.contains("1. Mountain Equipment [Yellow - Somewhat Sustainable]"));
        assert!(output.contains("Eco Score Comparison"));
    });
}

#[test]
fn recommend_json_reports_fallback_source_and_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = knowledge_env(dir.path());

    with_env(&unreachable_model(&vars), || {
        let result = recommend::run(RecommendArgs {
            activities: vec![Activity::Camping],
            select: Some("fjallraven".to_string()),
            json: true,
            ..RecommendArgs::default()
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["source"], "fallback");
        assert_eq!(payload["error_class"], "transport_error");
        assert_eq!(payload["suggestions"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["suggestions"][1]["brand"], "REI Co-op");
        assert_eq!(payload["eco_tiers"][0]["label"], "Somewhat Sustainable");
        assert_eq!(payload["eco_tiers"][0]["color"], "#f7aa0f");
        assert_eq!(payload["eco_tiers"][1]["color"], "#b32020");
        assert_eq!(payload["eco_tiers"][2]["label"], "Very Sustainable");
        assert_eq!(payload["eco_tiers"][2]["color"], "#235723");
        assert_eq!(payload["selected"]["brand"], "Fjallraven");
        assert_eq!(payload["unmatched_selection"], Value::Null);
        assert_eq!(payload["chart"]["points"][0]["eco_score"], 0.45);
    });
}

#[test]
fn recommend_without_activity_is_an_invalid_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = knowledge_env(dir.path());

    with_env(&unreachable_model(&vars), || {
        let result = recommend::run(RecommendArgs::default());
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_selection");
        assert_eq!(payload["message"], "Please select at least one Activity.");
    });
}

#[test]
fn recommend_reports_missing_knowledge_files() {
    with_env(
        &[
            ("NAKED_KNOWLEDGE_BRAND_PROFILES_PATH", "does-not-exist/brands.json"),
            ("NAKED_KNOWLEDGE_MATERIALS_PROFILES_PATH", "does-not-exist/materials.json"),
        ],
        || {
            let result = recommend::run(RecommendArgs {
                activities: vec![Activity::Hiking],
                ..RecommendArgs::default()
            });
            assert_eq!(result.exit_code, 4);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["error_class"], "knowledge_store");
        },
    );
}

#[test]
fn recommend_reports_invalid_config() {
    with_env(&[("NAKED_LLM_TIMEOUT_SECS", "0")], || {
        let result = recommend::run(RecommendArgs {
            activities: vec![Activity::Hiking],
            ..RecommendArgs::default()
        });
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_attributes_env_sources_without_leaking_key() {
    with_env(&[("LITELLM_TOKEN", "sk-live-secret"), ("NAKED_LLM_MODEL", "gpt-4o-mini")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        assert!(!result.output.contains("sk-live-secret"));
        assert!(result.output.contains("- llm.api_key = <redacted> (source: env (LITELLM_TOKEN))"));
        assert!(result.output.contains("- llm.model = gpt-4o-mini (source: env (NAKED_LLM_MODEL))"));
    });
}

#[test]
fn config_skips_blank_env_values_when_attributing_sources() {
    with_env(&[("NAKED_LLM_API_KEY", "  "), ("LITELLM_TOKEN", "sk-live-secret")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        assert!(
            result.output.contains("- llm.api_key = <redacted> (source: env (LITELLM_TOKEN))"),
            "{}",
            result.output
        );
    });
}

#[test]
fn recommend_with_unknown_brand_skips_detail_view() {
    let dir = tempfile::tempdir().expect("tempdir");
    let vars = knowledge_env(dir.path());

    with_env(&unreachable_model(&vars), || {
        let result = recommend::run(RecommendArgs {
            activities: vec![Activity::Hiking],
            select: Some("Decathlon".to_string()),
            json: true,
            ..RecommendArgs::default()
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["selected"], Value::Null);
        assert_eq!(payload["unmatched_selection"], "Decathlon");
    });
}

#[test]
fn doctor_json_lists_all_checks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut vars = knowledge_env(dir.path());
    vars.push(("NAKED_LLM_API_KEY".to_string(), "sk-test".to_string()));
    let vars: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

    with_env(&vars, || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["overall_status"], "pass");
        let names: Vec<&str> = payload["checks"]
            .as_array()
            .map(|checks| checks.iter().filter_map(|check| check["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, ["config_validation", "llm_credentials", "llm_endpoint", "knowledge_store"]);
    });
}

fn knowledge_env(dir: &Path) -> Vec<(String, String)> {
    let brands = dir.join("brand_profiles.json");
    let materials = dir.join("materials_profiles.json");
    fs::write(&brands, r#"{"Patagonia": {"eco_score": 0.8}, "Columbia": {"eco_score": 0.3}}"#)
        .expect("write brand profiles");
    fs::write(&materials, r#"{"Recycled Nylon": {"eco_score": 0.65}}"#)
        .expect("write materials profiles");

    vec![
        ("NAKED_KNOWLEDGE_BRAND_PROFILES_PATH".to_string(), brands.display().to_string()),
        ("NAKED_KNOWLEDGE_MATERIALS_PROFILES_PATH".to_string(), materials.display().to_string()),
    ]
}

/// Port 9 (discard) on loopback refuses connections, so the model call fails fast.
fn unreachable_model(knowledge: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut vars: Vec<(&str, &str)> =
        knowledge.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect();
    vars.push(("NAKED_LLM_BASE_URL", "http://127.0.0.1:9/v1"));
    vars.push(("NAKED_LLM_TIMEOUT_SECS", "5"));
    vars.push(("NAKED_LLM_API_KEY", "sk-test"));
    vars
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "NAKED_LLM_API_KEY",
        "LITELLM_TOKEN",
        "NAKED_LLM_BASE_URL",
        "NAKED_LLM_MODEL",
        "NAKED_LLM_TEMPERATURE",
        "NAKED_LLM_TIMEOUT_SECS",
        "NAKED_KNOWLEDGE_BRAND_PROFILES_PATH",
        "NAKED_KNOWLEDGE_MATERIALS_PROFILES_PATH",
        "NAKED_LOGGING_LEVEL",
        "NAKED_LOGGING_FORMAT",
        "NAKED_LOG_LEVEL",
        "NAKED_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
