/*!
 * Identity extractor
 *
 * Responsibility:
 * - gate の middleware が検証済みの IdentityContext を handler に提供する
 * - 型定義 (IdentityContext) は services::auth 側、ここは axum 依存部分だけ
 */

mod core;

pub use self::core::Identity;
