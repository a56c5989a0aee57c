use serde::Deserialize;

/// A scalar field that the order API serves inconsistently: numeric ids
/// arrive as JSON numbers, money amounts as strings, and older payloads mix
/// the two. Both render the same way in a summary.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

/// Order record as returned by the order API. Every field is optional and
/// unknown fields are ignored; absence never fails, it only shortens the
/// rendered summary.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub financial_status: Option<String>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub current_total_price: Option<Scalar>,
    #[serde(default)]
    pub total_price: Option<Scalar>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: Option<Scalar>,
    #[serde(default)]
    pub price: Option<Scalar>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Fulfillment {
    #[serde(default)]
    pub tracking_number: Option<Scalar>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub tracking_company: Option<String>,
}

/// Wrapper shape the order API answers with: a singular `order` for lookups
/// by id, an `orders` list for lookups by number.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrderLookupResponse {
    #[serde(default)]
    pub order: Option<OrderRecord>,
    #[serde(default)]
    pub orders: Option<Vec<OrderRecord>>,
}

impl OrderLookupResponse {
    /// The singular record wins; otherwise the first list element. `None`
    /// means no matching order, which is a normal reply, not an error.
    pub fn into_order(self) -> Option<OrderRecord> {
        if let Some(order) = self.order {
            return Some(order);
        }
        self.orders.into_iter().flatten().next()
    }
}
