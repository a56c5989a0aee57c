use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use storebot_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(format!("config validation failed: {error}"), 2)
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |field: &str, env_keys: &[&str]| {
        field_source(field, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.api_key",
        &redact_token(config.llm.api_key.expose_secret()),
        source("llm.api_key", &["STOREBOT_LLM_API_KEY", "GROQ_API_KEY"]),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("llm.base_url", &["STOREBOT_LLM_BASE_URL"]),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", &["STOREBOT_LLM_MODEL"]),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", &["STOREBOT_LLM_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "shopify.store_name",
        &config.shopify.normalized_store_name(),
        source("shopify.store_name", &["STOREBOT_SHOPIFY_STORE_NAME", "SHOPIFY_STORE_NAME"]),
    ));
    lines.push(render_line(
        "shopify.access_token",
        &redact_token(config.shopify.access_token.expose_secret()),
        source("shopify.access_token", &["STOREBOT_SHOPIFY_ACCESS_TOKEN", "SHOPIFY_ACCESS_TOKEN"]),
    ));
    lines.push(render_line(
        "shopify.api_version",
        &config.shopify.api_version,
        source("shopify.api_version", &["STOREBOT_SHOPIFY_API_VERSION", "SHOPIFY_API_VERSION"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["STOREBOT_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["STOREBOT_SERVER_PORT"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["STOREBOT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_lowercase(),
        source("logging.format", &["STOREBOT_LOG_FORMAT"]),
    ));

    CommandResult::success(lines.join("\n"))
}

fn render_line(field: &str, value: &str, source: String) -> String {
    format!("  {field} = {value}  ({source})")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("storebot.toml"), PathBuf::from("config/storebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &str,
    env_keys: &[&str],
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    for key in env_keys {
        if env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false) {
            return format!("env: {key}");
        }
    }

    if let (Some(doc), Some(path)) = (file_doc, file_path) {
        let mut node = Some(doc);
        for part in field.split('.') {
            node = node.and_then(|value| value.get(part));
        }
        if node.is_some() {
            return format!("file: {}", path.display());
        }
    }

    "default".to_string()
}

// Char-wise so multi-byte credentials never split a boundary.
fn redact_token(token: &str) -> String {
    if token.is_empty() {
        return "<unset>".to_string();
    }
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}****{tail}")
}
