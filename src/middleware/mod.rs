/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth::gate::apply (gate stage を middleware として登録), http::apply など
 */
pub mod auth;
pub mod bearer_auth;
pub mod http;

pub use bearer_auth::bearer_token;
