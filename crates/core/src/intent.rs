/// Fixed vocabulary of order-domain keywords. Matching is substring-based
/// on the lowercased message, so "tracking" also matches "track" queries.
const ORDER_KEYWORDS: &[&str] = &[
    "order",
    "orders",
    "tracking",
    "track",
    "delivery",
    "delivered",
    "shipment",
    "shipping",
    "status",
    "refund",
    "return",
    "cancel",
    "cancellation",
    "invoice",
];

/// True iff the text contains at least one order-domain keyword. Empty
/// text is never order-related.
pub fn is_order_related(text: &str) -> bool {
    let normalized = text.to_lowercase();
    ORDER_KEYWORDS.iter().any(|keyword| normalized.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::is_order_related;

    #[test]
    fn keyword_anywhere_in_text_matches() {
        assert!(is_order_related("Where is my shipment?"));
        assert!(is_order_related("I want a REFUND now"));
        assert!(is_order_related("can you track package 12?"));
        assert!(is_order_related("status update please"));
    }

    #[test]
    fn non_order_text_does_not_match() {
        assert!(!is_order_related("What are your store hours?"));
        assert!(!is_order_related("do you sell gift cards?"));
    }

    #[test]
    fn empty_text_is_not_order_related() {
        assert!(!is_order_related(""));
        assert!(!is_order_related("   "));
    }

    #[test]
    fn keyword_inside_larger_word_still_matches() {
        // Substring matching is deliberate: "reordering" contains "order".
        assert!(is_order_related("thinking about reordering"));
    }
}
