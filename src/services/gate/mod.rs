/*!
 * Authorization gate
 *
 * Responsibility:
 * - authenticate → authorize の順で stage を実行し、最初の失敗で打ち切る
 * - inline (handler 内で呼ぶ) と staged (middleware として前段に置く) の 2 通りで同じ結果を返す
 *
 * Public API:
 * - AuthorizationGate / GatePipeline
 * - GateStage / Authenticate / RequireRole / RequestScope / GateError
 */

mod core;
mod stage;

pub use self::core::{AuthorizationGate, GatePipeline, run_stage};
pub use stage::{Authenticate, GateError, GateStage, RequestScope, RequireRole};
