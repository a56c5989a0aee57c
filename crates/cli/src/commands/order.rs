use anyhow::{Context, Result};

use storebot_connectors::ShopifyClient;
use storebot_core::config::{AppConfig, LoadOptions};
use storebot_core::conversation::NO_ORDER_FOUND_REPLY;
use storebot_core::format_order_summary;
use storebot_core::handler::OrderLookup;

use crate::commands::CommandResult;
use crate::OrderArgs;

/// One-shot lookup that renders exactly what the chat pipeline would.
pub fn run(args: &OrderArgs) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(format!("config validation failed: {error}"), 2),
    };

    match lookup(&config, args) {
        Ok(Some(summary)) => CommandResult::success(summary),
        Ok(None) => CommandResult::success(NO_ORDER_FOUND_REPLY),
        Err(error) => CommandResult::failure(format!("order lookup failed: {error:#}"), 1),
    }
}

fn lookup(config: &AppConfig, args: &OrderArgs) -> Result<Option<String>> {
    let client = ShopifyClient::new(&config.shopify)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let response = runtime.block_on(async {
        match (&args.id, &args.number) {
            (Some(id), _) => client.order_by_id(id.trim()).await,
            (None, Some(number)) => {
                client.orders_by_number(number.trim().trim_start_matches('#')).await
            }
            // clap's arg group enforces this before we get here.
            (None, None) => Err(anyhow::anyhow!("either --id or --number is required")),
        }
    })?;

    Ok(response.into_order().map(|order| format_order_summary(&order)))
}
