use anyhow::{ensure, Context};
use naked_agent::ChatCompletionsTransport;
use naked_core::config::{AppConfig, LoadOptions};
use naked_core::KnowledgeStore;
use serde::Serialize;

use crate::commands::{escape_json, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::load(LoadOptions::default()).map_err(anyhow::Error::from));
    let exit_code = if report.overall_status == CheckStatus::Fail { 1 } else { 0 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(config: anyhow::Result<AppConfig>) -> DoctorReport {
    let mut checks = Vec::new();

    match config {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_credentials(&config));
            checks.push(from_result("llm_endpoint", check_endpoint(&config)));
            checks.push(from_result("knowledge_store", check_knowledge(&config)));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: format!("{error:#}"),
            });
            for name in ["llm_credentials", "llm_endpoint", "knowledge_store"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let any_fail = checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Fail | CheckStatus::Skipped));
    let any_warn = checks.iter().any(|check| check.status == CheckStatus::Warn);
    let (overall_status, summary) = match (any_fail, any_warn) {
        (true, _) => (CheckStatus::Fail, "doctor: one or more readiness checks failed"),
        (false, true) => {
            (CheckStatus::Warn, "doctor: ready, but recommendations may use fallback data")
        }
        (false, false) => (CheckStatus::Pass, "doctor: all readiness checks passed"),
    };

    DoctorReport { overall_status, summary: summary.to_string(), checks }
}

fn check_credentials(config: &AppConfig) -> DoctorCheck {
    if config.llm.has_api_key() {
        return DoctorCheck {
            name: "llm_credentials",
            status: CheckStatus::Pass,
            details: "API key is configured".to_string(),
        };
    }

    DoctorCheck {
        name: "llm_credentials",
        status: CheckStatus::Warn,
        details: "no API key (set NAKED_LLM_API_KEY or LITELLM_TOKEN); the model endpoint will \
                  likely reject requests and fallback data will be shown"
            .to_string(),
    }
}

fn check_endpoint(config: &AppConfig) -> anyhow::Result<String> {
    let transport = ChatCompletionsTransport::new(&config.llm)
        .context("failed to prepare the model HTTP client")?;
    Ok(format!(
        "requests go to `{}` with model `{}` ({}s timeout)",
        transport.endpoint(),
        config.llm.model,
        config.llm.timeout_secs
    ))
}

fn check_knowledge(config: &AppConfig) -> anyhow::Result<String> {
    let knowledge = KnowledgeStore::load(
        &config.knowledge.brand_profiles_path,
        &config.knowledge.materials_profiles_path,
    )
    .context("failed to load knowledge files")?;

    let brands = knowledge.brand_names().len();
    let materials = knowledge.material_names().len();
    ensure!(brands > 0, "brand profiles document has no entries");
    ensure!(materials > 0, "materials profiles document has no entries");

    Ok(format!("{brands} brand profiles and {materials} material profiles loaded"))
}

fn from_result(name: &'static str, result: anyhow::Result<String>) -> DoctorCheck {
    match result {
        Ok(details) => DoctorCheck { name, status: CheckStatus::Pass, details },
        Err(error) => DoctorCheck { name, status: CheckStatus::Fail, details: format!("{error:#}") },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
