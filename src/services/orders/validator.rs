use rust_decimal::Decimal;
use thiserror::Error;

use crate::services::orders::Order;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `order_id` is not a base-10 integer (or does not fit one).
    #[error("order id {order_id:?} is not an integer")]
    Malformed { order_id: String },
    #[error("{field} must be greater than zero")]
    OutOfRange { field: &'static str },
}

/// Structural checks on an order payload. Pure.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderValidator;

impl OrderValidator {
    pub fn validate(&self, order: &Order) -> Result<(), ValidationError> {
        let order_id = parse_order_id(&order.order_id)?;

        if order_id <= 0 {
            return Err(ValidationError::OutOfRange { field: "orderId" });
        }
        if order.amount <= Decimal::ZERO {
            return Err(ValidationError::OutOfRange { field: "amount" });
        }

        Ok(())
    }
}

fn parse_order_id(raw: &str) -> Result<i64, ValidationError> {
    // Overflow counts as malformed: it is not an integer we can use.
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::Malformed {
            order_id: raw.to_string(),
        })
}
