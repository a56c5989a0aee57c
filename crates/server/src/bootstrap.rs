use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use storebot_connectors::{GroqClient, ShopifyClient};
use storebot_core::config::{AppConfig, ConfigError, LoadOptions};
use storebot_core::handler::ChatHandler;

use crate::chat::ChatState;

pub struct Application {
    pub config: AppConfig,
    pub chat_state: Arc<ChatState<GroqClient, ShopifyClient>>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("collaborator client construction failed: {0}")]
    Client(#[source] anyhow::Error),
}

/// Fail-fast assembly: configuration problems stop the process here, not
/// mid-request.
pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let chat_client = GroqClient::new(&config.llm).map_err(BootstrapError::Client)?;
    let order_client = ShopifyClient::new(&config.shopify).map_err(BootstrapError::Client)?;

    info!(
        event_name = "system.bootstrap.collaborators_ready",
        correlation_id = "bootstrap",
        model = %config.llm.model,
        store = %config.shopify.normalized_store_name(),
        "collaborator clients constructed"
    );

    let chat_state = Arc::new(ChatState { handler: ChatHandler::new(chat_client, order_client) });
    Ok(Application { config, chat_state })
}
