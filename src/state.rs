/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - credential の発行/検証 (codec) と注文処理のパイプライン (orders)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - 起動後は読み取り専用 (リクエスト間で共有する可変状態は持たない)
 */
use std::sync::Arc;

use crate::services::{auth::CredentialCodec, orders::OrderService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub codec: Arc<CredentialCodec>,
    pub orders: Arc<OrderService>,
}

impl AppState {
    pub fn new(codec: Arc<CredentialCodec>, orders: Arc<OrderService>) -> Self {
        Self { codec, orders }
    }
}
