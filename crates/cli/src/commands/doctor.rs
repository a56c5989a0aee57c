use secrecy::ExposeSecret;
use serde::Serialize;

use storebot_core::config::{AppConfig, LoadOptions};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
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
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed: {}\"}}",
                error.to_string().replace('"', "'")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_llm(&config));
            checks.push(check_shopify(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("llm_credentials"));
            checks.push(skipped("shopify_credentials"));
        }
    }

    let failed = checks.iter().filter(|check| check.status == CheckStatus::Fail).count();
    DoctorReport {
        overall_status: if failed == 0 { CheckStatus::Pass } else { CheckStatus::Fail },
        summary: if failed == 0 {
            "all checks passed".to_string()
        } else {
            format!("{failed} check(s) failed")
        },
        checks,
    }
}

fn check_llm(config: &AppConfig) -> DoctorCheck {
    let key = config.llm.api_key.expose_secret();
    DoctorCheck {
        name: "llm_credentials",
        status: CheckStatus::Pass,
        details: format!(
            "api key present ({} chars), model {}, base url {}",
            key.len(),
            config.llm.model,
            config.llm.base_url
        ),
    }
}

fn check_shopify(config: &AppConfig) -> DoctorCheck {
    let token = config.shopify.access_token.expose_secret();
    let mut details = format!(
        "store {}, api version {}, access token present ({} chars)",
        config.shopify.normalized_store_name(),
        config.shopify.api_version,
        token.len()
    );
    if !token.starts_with("shpat_") {
        details.push_str(" (note: custom app Admin API tokens usually start with `shpat_`)");
    }
    DoctorCheck { name: "shopify_credentials", status: CheckStatus::Pass, details }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration did not load".to_string(),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![format!("doctor: {}", report.summary)];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("  [{marker}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}
