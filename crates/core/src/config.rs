use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub shopify: ShopifyConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    pub store_name: String,
    pub access_token: SecretString,
    pub api_version: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub shopify_store_name: Option<String>,
    pub shopify_access_token: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: String::new().into(),
                base_url: "https://api.groq.com".to_string(),
                model: "llama-3.1-8b-instant".to_string(),
                temperature: 0.6,
                max_tokens: 512,
                timeout_secs: 30,
            },
            shopify: ShopifyConfig {
                store_name: String::new(),
                access_token: String::new().into(),
                api_version: "2024-01".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_string(), port: 8080 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl ShopifyConfig {
    /// Store handle with `.env` debris removed: URL scheme and the
    /// `.myshopify.com` suffix both show up in the wild.
    pub fn normalized_store_name(&self) -> String {
        self.store_name
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .trim_end_matches(".myshopify.com")
            .to_string()
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("storebot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(llm) = patch.llm {
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = api_key_value.into();
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(max_tokens) = llm.max_tokens {
                self.llm.max_tokens = max_tokens;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(shopify) = patch.shopify {
            if let Some(store_name) = shopify.store_name {
                self.shopify.store_name = store_name;
            }
            if let Some(access_token_value) = shopify.access_token {
                self.shopify.access_token = access_token_value.into();
            }
            if let Some(api_version) = shopify.api_version {
                self.shopify.api_version = api_version;
            }
            if let Some(timeout_secs) = shopify.timeout_secs {
                self.shopify.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // The short names are the ones the deployment scripts historically
        // exported; the STOREBOT_* names win when both are set.
        let api_key = read_env("STOREBOT_LLM_API_KEY").or_else(|| read_env("GROQ_API_KEY"));
        if let Some(value) = api_key {
            self.llm.api_key = value.into();
        }
        if let Some(value) = read_env("STOREBOT_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("STOREBOT_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("STOREBOT_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("STOREBOT_LLM_TIMEOUT_SECS", &value)?;
        }

        let store_name =
            read_env("STOREBOT_SHOPIFY_STORE_NAME").or_else(|| read_env("SHOPIFY_STORE_NAME"));
        if let Some(value) = store_name {
            self.shopify.store_name = value;
        }
        let access_token =
            read_env("STOREBOT_SHOPIFY_ACCESS_TOKEN").or_else(|| read_env("SHOPIFY_ACCESS_TOKEN"));
        if let Some(value) = access_token {
            self.shopify.access_token = value.into();
        }
        let api_version =
            read_env("STOREBOT_SHOPIFY_API_VERSION").or_else(|| read_env("SHOPIFY_API_VERSION"));
        if let Some(value) = api_version {
            self.shopify.api_version = value;
        }
        if let Some(value) = read_env("STOREBOT_SHOPIFY_TIMEOUT_SECS") {
            self.shopify.timeout_secs = parse_u64("STOREBOT_SHOPIFY_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("STOREBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("STOREBOT_SERVER_PORT") {
            self.server.port = parse_u16("STOREBOT_SERVER_PORT", &value)?;
        }

        if let Some(value) = read_env("STOREBOT_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("STOREBOT_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key_value) = overrides.llm_api_key {
            self.llm.api_key = api_key_value.into();
        }
        if let Some(model) = overrides.llm_model {
            self.llm.model = model;
        }
        if let Some(store_name) = overrides.shopify_store_name {
            self.shopify.store_name = store_name;
        }
        if let Some(access_token_value) = overrides.shopify_access_token {
            self.shopify.access_token = access_token_value.into();
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_llm(&self.llm)?;
        validate_shopify(&self.shopify)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("storebot.toml"), PathBuf::from("config/storebot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "llm.api_key is required. Set STOREBOT_LLM_API_KEY (or GROQ_API_KEY) or llm.api_key \
             in storebot.toml"
                .to_string(),
        ));
    }
    if llm.base_url.trim().is_empty() {
        return Err(ConfigError::Validation("llm.base_url must not be empty".to_string()));
    }
    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }
    Ok(())
}

fn validate_shopify(shopify: &ShopifyConfig) -> Result<(), ConfigError> {
    if shopify.normalized_store_name().is_empty() {
        return Err(ConfigError::Validation(
            "shopify.store_name is required. Set STOREBOT_SHOPIFY_STORE_NAME (or \
             SHOPIFY_STORE_NAME), the bare store handle without `.myshopify.com`"
                .to_string(),
        ));
    }
    if shopify.access_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "shopify.access_token is required. Set STOREBOT_SHOPIFY_ACCESS_TOKEN (or \
             SHOPIFY_ACCESS_TOKEN) from your custom app's Admin API credentials"
                .to_string(),
        ));
    }
    if shopify.api_version.trim().is_empty() {
        return Err(ConfigError::Validation("shopify.api_version must not be empty".to_string()));
    }
    if shopify.timeout_secs == 0 || shopify.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "shopify.timeout_secs must be in range 1..=300".to_string(),
        ));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// Env values get trimmed and stripped of accidental surrounding quotes,
/// which `.env` files grow with depressing regularity.
fn read_env(key: &str) -> Option<String> {
    let value = env::var(key).ok()?;
    let cleaned = value.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    llm: Option<LlmPatch>,
    shopify: Option<ShopifyPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ShopifyPatch {
    store_name: Option<String>,
    access_token: Option<String>,
    api_version: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
