//! Collaborator clients - the network edges of the pipeline
//!
//! This crate implements the two collaborator traits from `storebot-core`:
//! - **Groq** (`groq`) - OpenAI-compatible chat completions over HTTPS
//! - **Shopify** (`shopify`) - Admin REST order lookups by id or number
//!
//! Both clients make exactly one attempt per call; retry policy, if any,
//! belongs to whoever deploys the service, not to the request path.

pub mod groq;
pub mod shopify;

pub use groq::GroqClient;
pub use shopify::ShopifyClient;

/// Sent on every outbound request so upstream logs can tell us apart.
pub(crate) const USER_AGENT: &str = concat!("storebot/", env!("CARGO_PKG_VERSION"));

/// Upstream error bodies can be huge; keep the interesting prefix.
pub(crate) fn snippet(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(300) {
        Some((index, _)) => &trimmed[..index],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::snippet;

    #[test]
    fn snippet_caps_long_bodies_on_char_boundaries() {
        assert_eq!(snippet("plain error"), "plain error");

        let long = "é".repeat(400);
        assert_eq!(snippet(&long).chars().count(), 300);
    }
}
