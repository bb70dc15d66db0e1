use std::sync::Arc;

use tracing::{error, warn};

use crate::services::auth::IdentityContext;
use crate::services::gate::{AuthorizationGate, GateError, GatePipeline, RequestScope};
use crate::services::orders::{Order, OrderProcessor, OrderValidator, ProcessError};

/// The only role allowed to place orders.
pub const CUSTOMER_ROLE: &str = "Customer";

pub const PROCESSED_MESSAGE: &str = "Order processed successfully.";
pub const UNAUTHENTICATED_MESSAGE: &str = "You must be logged in to place orders.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to process orders.";
pub const INVALID_ORDER_MESSAGE: &str = "Invalid order data. Please review and correct any errors.";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Which check turned the request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCategory {
    Auth,
    Authz,
    Validation,
    Business,
}

/// Final result of a process-order request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed(String),
    Rejected {
        reason: String,
        category: RejectionCategory,
    },
    ServerError(String),
}

impl Outcome {
    fn rejected(category: RejectionCategory, reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
            category,
        }
    }

    pub fn category(&self) -> Option<RejectionCategory> {
        match self {
            Self::Rejected { category, .. } => Some(*category),
            _ => None,
        }
    }
}

impl From<GateError> for Outcome {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Unauthenticated => {
                Outcome::rejected(RejectionCategory::Auth, UNAUTHENTICATED_MESSAGE)
            }
            GateError::Forbidden { .. } => {
                Outcome::rejected(RejectionCategory::Authz, FORBIDDEN_MESSAGE)
            }
        }
    }
}

/// Runs the authenticate → authorize → validate → process sequence.
#[derive(Debug, Clone)]
pub struct OrderService {
    gate: Arc<AuthorizationGate>,
    filters: GatePipeline,
    validator: OrderValidator,
    processor: OrderProcessor,
}

impl OrderService {
    pub fn new(gate: Arc<AuthorizationGate>, processor: OrderProcessor) -> Self {
        let filters = gate.pipeline(CUSTOMER_ROLE);
        Self {
            gate,
            filters,
            validator: OrderValidator,
            processor,
        }
    }

    /// Gate stages for the staged composition, in the order they must run.
    pub fn filters(&self) -> &GatePipeline {
        &self.filters
    }

    /// Inline gate call. Runs before anything else in the inline handler.
    pub fn authorize(&self, raw_credential: Option<&str>) -> Result<IdentityContext, Outcome> {
        self.gate
            .authorize(raw_credential, CUSTOMER_ROLE)
            .map_err(Outcome::from)
    }

    /// Inline composition: the handler calls the gate and branches itself.
    pub fn handle_process_order(&self, raw_credential: Option<&str>, order: &Order) -> Outcome {
        let identity = match self.authorize(raw_credential) {
            Ok(identity) => identity,
            Err(outcome) => return outcome,
        };

        self.handle_authorized(&identity, order)
    }

    /// Staged composition without a transport: run the filters, then the handler.
    pub fn handle_staged(&self, raw_credential: Option<&str>, order: &Order) -> Outcome {
        let mut scope = RequestScope::new(raw_credential);
        if let Err(err) = self.filters.run(&mut scope) {
            return err.into();
        }

        match scope.into_identity() {
            Some(identity) => self.handle_authorized(&identity, order),
            None => GateError::Unauthenticated.into(),
        }
    }

    /// The handler body once the gate has passed: validate, then process.
    pub fn handle_authorized(&self, identity: &IdentityContext, order: &Order) -> Outcome {
        if let Err(err) = self.validator.validate(order) {
            warn!(subject = ?identity.subject, error = %err, "order failed validation");
            return Outcome::rejected(RejectionCategory::Validation, INVALID_ORDER_MESSAGE);
        }

        match self.processor.process(order) {
            Ok(()) => Outcome::Processed(PROCESSED_MESSAGE.to_string()),
            Err(ProcessError::Business(err)) => {
                warn!(subject = ?identity.subject, error = %err, "order rejected by business rule");
                Outcome::rejected(RejectionCategory::Business, err.to_string())
            }
            Err(err @ ProcessError::Fulfillment(_)) => {
                error!(order_id = %order.order_id, error = ?err, "order processing failed");
                Outcome::ServerError(SERVER_ERROR_MESSAGE.to_string())
            }
        }
    }
}
