use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use storebot_core::config::ShopifyConfig;
use storebot_core::domain::order::OrderLookupResponse;
use storebot_core::handler::OrderLookup;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Order-lookup client for the Shopify Admin REST API.
pub struct ShopifyClient {
    client: reqwest::Client,
    access_token: SecretString,
    base_url: Url,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building shopify http client")?;

        let store = config.normalized_store_name();
        let base_url = Url::parse(&format!(
            "https://{store}.myshopify.com/admin/api/{}/",
            config.api_version.trim()
        ))
        .with_context(|| format!("invalid shopify store name `{store}`"))?;

        Ok(Self { client, access_token: config.access_token.clone(), base_url })
    }

    fn order_by_id_url(&self, order_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        // `push` percent-encodes the id, matching how the API expects raw
        // identifiers to be quoted.
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("shopify base url cannot carry path segments"))?
            .pop_if_empty()
            .push("orders")
            .push(&format!("{order_id}.json"));
        Ok(url)
    }

    fn orders_by_number_url(&self, order_number: &str) -> Result<Url> {
        let mut url = self.base_url.join("orders.json").context("building orders url")?;
        url.query_pairs_mut().append_pair("name", &format!("#{order_number}"));
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<OrderLookupResponse> {
        debug!(event_name = "shopify.lookup_request", path = url.path());

        let response = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.access_token.expose_secret())
            .send()
            .await
            .context("sending order lookup request")?;

        let status = response.status();
        if status.as_u16() == 404 {
            // An unknown order id is a miss, not a failure.
            return Ok(OrderLookupResponse::default());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("shopify returned HTTP {status}: {}", crate::snippet(&body));
        }

        response.json().await.context("decoding order lookup response")
    }
}

#[async_trait]
impl OrderLookup for ShopifyClient {
    async fn order_by_id(&self, id: &str) -> Result<OrderLookupResponse> {
        self.fetch(self.order_by_id_url(id)?).await
    }

    async fn orders_by_number(&self, number: &str) -> Result<OrderLookupResponse> {
        self.fetch(self.orders_by_number_url(number)?).await
    }
}
