/*
 * Responsibility
 * - Authorization ヘッダから Bearer トークンを取り出す (ヘッダ抽出のみ)
 * - 検証 (署名/期限/iss/aud) は services::auth 側の責務
 * - ヘッダが無い・形式が違う場合は None (= 未認証として扱う)
 */
use axum::http::{HeaderMap, header};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
