use rust_decimal::Decimal;

/// Order as submitted by the caller. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Kept as the raw string; the validator decides whether it is numeric.
    pub order_id: String,
    pub amount: Decimal,
}

impl Order {
    pub fn new(order_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            order_id: order_id.into(),
            amount,
        }
    }
}
