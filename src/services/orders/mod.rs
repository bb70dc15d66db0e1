/*
 * Responsibility
 * - 注文の検証 (validator) と業務ルールの実行 (processor)
 * - Gate → 検証 → 処理 の順序を組み立て、Outcome に分類する (service)
 */
pub mod processor;
pub mod service;
pub mod types;
pub mod validator;

pub use processor::{
    BusinessError, LogFulfillment, MINIMUM_AMOUNT, OrderFulfillment, OrderProcessor, ProcessError,
};
pub use service::{CUSTOMER_ROLE, OrderService, Outcome, RejectionCategory};
pub use types::Order;
pub use validator::{OrderValidator, ValidationError};
