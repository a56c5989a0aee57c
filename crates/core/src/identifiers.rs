use once_cell::sync::Lazy;
use regex::Regex;

/// Identifiers pulled out of free text. Both fields are independent: a
/// message may carry either, both, or neither. Which one drives a lookup
/// is the executor's decision, not the extractor's.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedIdentifiers {
    /// External system id: a run of 10 or more digits.
    pub order_id: Option<String>,
    /// Human-facing reference: 3-7 digits, usually written as `#1001`.
    pub order_number: Option<String>,
}

impl ExtractedIdentifiers {
    pub fn is_empty(&self) -> bool {
        self.order_id.is_none() && self.order_number.is_none()
    }
}

static ORDER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{10,})\b").expect("order id pattern compiles"));

static HASH_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s*(\d{3,7})\b").expect("hash number pattern compiles"));

static WORD_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\border\s*(?:no\.?|number)?\s*(\d{3,7})\b")
        .expect("worded number pattern compiles")
});

/// Scan text for an order id and an order number. First match wins per
/// rule; the `#NNNN` form is tried before the worded "order number NNNN"
/// form. Digit-count bounds are the only validation - whether the digits
/// name a real order is the lookup's problem.
pub fn extract_identifiers(text: &str) -> ExtractedIdentifiers {
    let order_id = ORDER_ID.captures(text).map(|c| c[1].to_string());

    let order_number = HASH_NUMBER
        .captures(text)
        .or_else(|| WORD_NUMBER.captures(text))
        .map(|c| c[1].to_string());

    ExtractedIdentifiers { order_id, order_number }
}
