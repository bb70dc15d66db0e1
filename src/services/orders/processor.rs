use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::services::orders::Order;

/// Orders below this amount are refused by the business rule.
pub const MINIMUM_AMOUNT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusinessError {
    #[error("insufficient amount ${amount} for order {order_id}")]
    InsufficientAmount { order_id: String, amount: Decimal },
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Business(#[from] BusinessError),
    /// Completion failed for a reason outside the business rule.
    #[error("order fulfillment failed: {0:#}")]
    Fulfillment(anyhow::Error),
}

/// The external side effect of completing an order.
pub trait OrderFulfillment: Send + Sync {
    fn complete(&self, order: &Order) -> anyhow::Result<()>;
}

/// Default fulfillment: records the order in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFulfillment;

impl OrderFulfillment for LogFulfillment {
    fn complete(&self, order: &Order) -> anyhow::Result<()> {
        info!(order_id = %order.order_id, amount = %order.amount, "processing order");
        Ok(())
    }
}

#[derive(Clone)]
pub struct OrderProcessor {
    fulfillment: Arc<dyn OrderFulfillment>,
}

impl std::fmt::Debug for OrderProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderProcessor")
            .field("minimum_amount", &MINIMUM_AMOUNT)
            .finish()
    }
}

impl Default for OrderProcessor {
    fn default() -> Self {
        Self::new(Arc::new(LogFulfillment))
    }
}

impl OrderProcessor {
    pub fn new(fulfillment: Arc<dyn OrderFulfillment>) -> Self {
        Self { fulfillment }
    }

    /// Apply the minimum-amount rule, then complete the order.
    ///
    /// Exactly [`MINIMUM_AMOUNT`] is accepted.
    pub fn process(&self, order: &Order) -> Result<(), ProcessError> {
        if order.amount < MINIMUM_AMOUNT {
            return Err(BusinessError::InsufficientAmount {
                order_id: order.order_id.clone(),
                amount: order.amount,
            }
            .into());
        }

        self.fulfillment
            .complete(order)
            .map_err(ProcessError::Fulfillment)
    }
}
