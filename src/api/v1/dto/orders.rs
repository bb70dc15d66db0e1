/*
 * Responsibility
 * - Orders の request DTO
 * - 形式チェック (orderId が整数か、金額が正か) は services::orders::OrderValidator の責務
 *   ここでは JSON → Order への詰め替えのみ
 */
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::services::orders::Order;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOrderRequest {
    pub order_id: String,
    pub amount: Decimal,
}

impl From<ProcessOrderRequest> for Order {
    fn from(req: ProcessOrderRequest) -> Self {
        Order::new(req.order_id, req.amount)
    }
}
