use crate::domain::order::{Fulfillment, LineItem, OrderRecord, Scalar};

/// Caps keep pathological orders from flooding the chat UI.
const MAX_ITEM_LINES: usize = 25;
const MAX_TRACKING_LINES: usize = 10;

pub const FOLLOW_UP_PROMPT: &str = "If this isn't the right order, please share your Order ID \
                                    (long number) or Order Number like #1001.";

/// Render an order record as a fixed-layout text block for the chat UI.
///
/// Deterministic and total: absent or blank fields are skipped rather than
/// rendered as placeholders, and no input shape can make this fail. The one
/// defaulted field is the fulfillment status, which always renders and
/// falls back to the literal `unfulfilled`.
pub fn format_order_summary(order: &OrderRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(header) = header_line(order) {
        lines.push(header);
    }
    if let Some(created) = non_blank(order.created_at.as_deref()) {
        lines.push(format!("Created: {created}"));
    }
    if let Some(total) = format_money(
        order.current_total_price.as_ref().or(order.total_price.as_ref()),
        order.currency.as_deref(),
    ) {
        lines.push(format!("Total: {total}"));
    }
    if let Some(financial) = non_blank(order.financial_status.as_deref()) {
        lines.push(format!("Payment: {financial}"));
    }
    lines.push(format!(
        "Fulfillment: {}",
        non_blank(order.fulfillment_status.as_deref()).unwrap_or("unfulfilled")
    ));
    if let Some(customer) = customer_line(order) {
        lines.push(customer);
    }

    let item_lines: Vec<String> = order
        .line_items
        .iter()
        .filter_map(|item| item_line(item, order.currency.as_deref()))
        .take(MAX_ITEM_LINES)
        .collect();
    if !item_lines.is_empty() {
        lines.push(String::new());
        lines.push("Items:".to_string());
        lines.extend(item_lines);
    }

    let tracking_lines: Vec<String> =
        order.fulfillments.iter().filter_map(tracking_line).take(MAX_TRACKING_LINES).collect();
    if !tracking_lines.is_empty() {
        lines.push(String::new());
        lines.push("Tracking:".to_string());
        lines.extend(tracking_lines);
    }

    lines.push(String::new());
    lines.push(FOLLOW_UP_PROMPT.to_string());

    lines.join("\n").trim().to_string()
}

fn header_line(order: &OrderRecord) -> Option<String> {
    let name = non_blank(order.name.as_deref());
    let id = order.id.as_ref().filter(|id| !id.is_blank()).map(Scalar::render);
    match (name, id) {
        (Some(name), Some(id)) => Some(format!("Order: {name} (ID: {id})")),
        (Some(name), None) => Some(format!("Order: {name}")),
        (None, Some(id)) => Some(format!("Order: (ID: {id})")),
        (None, None) => None,
    }
}

fn customer_line(order: &OrderRecord) -> Option<String> {
    let customer = order.customer.as_ref();
    let full_name = customer
        .map(|c| {
            [c.first_name.as_deref(), c.last_name.as_deref()]
                .into_iter()
                .filter_map(non_blank)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|name| !name.is_empty());
    let email = non_blank(order.email.as_deref())
        .or_else(|| customer.and_then(|c| non_blank(c.email.as_deref())))
        .map(str::to_string);

    match (full_name, email) {
        (Some(name), Some(email)) => Some(format!("Customer: {name} — {email}")),
        (Some(name), None) => Some(format!("Customer: {name}")),
        (None, Some(email)) => Some(format!("Customer: {email}")),
        (None, None) => None,
    }
}

fn item_line(item: &LineItem, currency: Option<&str>) -> Option<String> {
    let title = non_blank(item.title.as_deref());
    let quantity = item.quantity.as_ref().filter(|q| !q.is_blank()).map(Scalar::render);
    if title.is_none() && quantity.is_none() {
        return None;
    }

    let mut line = String::from("-");
    if let Some(quantity) = quantity {
        line.push_str(&format!(" {quantity} ×"));
    }
    if let Some(title) = title {
        line.push_str(&format!(" {title}"));
    }
    // Item prices share the order-level currency in the wire format.
    if let Some(price) = format_money(item.price.as_ref(), currency) {
        line.push_str(&format!(" @ {price}"));
    }
    Some(line)
}

fn tracking_line(fulfillment: &Fulfillment) -> Option<String> {
    let number = fulfillment.tracking_number.as_ref().filter(|n| !n.is_blank()).map(Scalar::render);
    let url = non_blank(fulfillment.tracking_url.as_deref());
    if number.is_none() && url.is_none() {
        return None;
    }

    let mut head = String::new();
    if let Some(company) = non_blank(fulfillment.tracking_company.as_deref()) {
        head.push_str(company);
        head.push_str(": ");
    }
    if let Some(number) = &number {
        head.push_str(number);
    }

    match (head.trim_end_matches(": ").is_empty(), url) {
        (true, Some(url)) => Some(format!("- {url}")),
        (false, Some(url)) => Some(format!("- {} — {url}", head.trim_end())),
        (false, None) => Some(format!("- {}", head.trim_end())),
        (true, None) => None,
    }
}

fn format_money(amount: Option<&Scalar>, currency: Option<&str>) -> Option<String> {
    let amount = amount.filter(|a| !a.is_blank())?.render();
    match non_blank(currency) {
        Some(currency) => Some(format!("{amount} {currency}")),
        None => Some(amount),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{format_order_summary, FOLLOW_UP_PROMPT, MAX_ITEM_LINES, MAX_TRACKING_LINES};
    use crate::domain::order::OrderRecord;

    fn order(json: &str) -> OrderRecord {
        serde_json::from_str(json).expect("test order deserializes")
    }

    #[test]
    fn full_record_renders_every_section_in_order() {
        let record = order(
            r##"{
                "name": "#1042",
                "id": 5412345678,
                "created_at": "2024-03-01T10:00:00Z",
                "financial_status": "paid",
                "fulfillment_status": "fulfilled",
                "currency": "USD",
                "current_total_price": "59.80",
                "email": "jo@example.com",
                "customer": {"first_name": "Jo", "last_name": "Singh"},
                "line_items": [
                    {"title": "Mango Chutney", "quantity": 2, "price": "12.40"},
                    {"title": "Gift Wrap", "quantity": 1}
                ],
                "fulfillments": [
                    {
                        "tracking_number": "TRK123",
                        "tracking_url": "https://t.example/TRK123",
                        "tracking_company": "UPS"
                    }
                ]
            }"##,
        );

        let summary = format_order_summary(&record);
        let expected = "Order: #1042 (ID: 5412345678)\n\
                        Created: 2024-03-01T10:00:00Z\n\
                        Total: 59.80 USD\n\
                        Payment: paid\n\
                        Fulfillment: fulfilled\n\
                        Customer: Jo Singh — jo@example.com\n\
                        \n\
                        Items:\n\
                        - 2 × Mango Chutney @ 12.40 USD\n\
                        - 1 × Gift Wrap\n\
                        \n\
                        Tracking:\n\
                        - UPS: TRK123 — https://t.example/TRK123\n\
                        \n"
            .to_string()
            + FOLLOW_UP_PROMPT;
        assert_eq!(summary, expected);
    }

    #[test]
    fn formatting_is_idempotent() {
        let record = order(r##"{"name": "#7", "currency": "EUR", "total_price": "10.00"}"##);
        assert_eq!(format_order_summary(&record), format_order_summary(&record));
    }

    #[test]
    fn missing_fulfillment_status_defaults_to_unfulfilled() {
        let summary = format_order_summary(&order(r##"{"name": "#1"}"##));
        assert!(summary.contains("Fulfillment: unfulfilled"));

        let summary = format_order_summary(&order(r#"{"fulfillment_status": "  "}"#));
        assert!(summary.contains("Fulfillment: unfulfilled"));
    }

    #[test]
    fn empty_record_still_renders_default_and_prompt() {
        let summary = format_order_summary(&order("{}"));
        assert_eq!(summary, format!("Fulfillment: unfulfilled\n\n{FOLLOW_UP_PROMPT}"));
    }

    #[test]
    fn no_items_means_no_items_section() {
        let summary = format_order_summary(&order(r##"{"name": "#1", "line_items": []}"##));
        assert!(!summary.contains("Items:"));
    }

    #[test]
    fn current_total_price_beats_total_price() {
        let record = order(
            r#"{"currency": "USD", "current_total_price": "5.00", "total_price": "9.00"}"#,
        );
        let summary = format_order_summary(&record);
        assert!(summary.contains("Total: 5.00 USD"));
        assert!(!summary.contains("9.00"));
    }

    #[test]
    fn total_omitted_without_an_amount() {
        let summary = format_order_summary(&order(r#"{"currency": "USD"}"#));
        assert!(!summary.contains("Total:"));
    }

    #[test]
    fn header_trims_missing_side() {
        assert!(format_order_summary(&order(r##"{"name": "#9"}"##)).starts_with("Order: #9\n"));
        assert!(format_order_summary(&order(r#"{"id": 12}"#)).starts_with("Order: (ID: 12)\n"));
    }

    #[test]
    fn customer_line_drops_missing_parts() {
        let summary =
            format_order_summary(&order(r#"{"customer": {"first_name": "Ana"}}"#));
        assert!(summary.contains("Customer: Ana\n"));

        let summary = format_order_summary(&order(r#"{"email": "a@b.example"}"#));
        assert!(summary.contains("Customer: a@b.example"));

        let summary = format_order_summary(
            &order(r#"{"customer": {"email": "nested@b.example"}}"#),
        );
        assert!(summary.contains("Customer: nested@b.example"));
    }

    #[test]
    fn top_level_email_beats_nested_email() {
        let record = order(
            r#"{"email": "top@example.com", "customer": {"email": "nested@example.com"}}"#,
        );
        assert!(format_order_summary(&record).contains("Customer: top@example.com"));
    }

    #[test]
    fn item_lines_are_capped() {
        let items: Vec<String> = (0..40)
            .map(|i| format!(r#"{{"title": "Item {i}", "quantity": 1}}"#))
            .collect();
        let record = order(&format!(r#"{{"line_items": [{}]}}"#, items.join(",")));
        let summary = format_order_summary(&record);
        assert_eq!(summary.matches("\n- ").count(), MAX_ITEM_LINES);
        assert!(summary.contains("Item 24"));
        assert!(!summary.contains("Item 25"));
    }

    #[test]
    fn tracking_lines_are_capped_and_filtered() {
        let mut fulfillments: Vec<String> =
            (0..15).map(|i| format!(r#"{{"tracking_number": "T{i:03}"}}"#)).collect();
        // Entries with neither number nor url never qualify.
        fulfillments.push(r#"{"tracking_company": "UPS"}"#.to_string());
        let record = order(&format!(r#"{{"fulfillments": [{}]}}"#, fulfillments.join(",")));
        let summary = format_order_summary(&record);
        assert_eq!(summary.matches("\n- ").count(), MAX_TRACKING_LINES);
        assert!(!summary.contains("UPS"));
    }

    #[test]
    fn tracking_line_shapes() {
        let summary = format_order_summary(&order(
            r#"{"fulfillments": [
                {"tracking_number": "T1"},
                {"tracking_number": "T2", "tracking_company": "DHL"},
                {"tracking_url": "https://t.example/3"}
            ]}"#,
        ));
        assert!(summary.contains("\n- T1\n"));
        assert!(summary.contains("\n- DHL: T2\n"));
        assert!(summary.contains("\n- https://t.example/3\n"));
    }

    #[test]
    fn no_qualifying_fulfillment_means_no_tracking_section() {
        let summary = format_order_summary(&order(
            r#"{"fulfillments": [{"tracking_company": "UPS"}]}"#,
        ));
        assert!(!summary.contains("Tracking:"));
    }
}
