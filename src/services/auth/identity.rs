/*
 * Responsibility
 * - 検証済み credential から導出される「認証済みコンテキスト」の型
 * - リクエスト単位で生成され、リクエスト終了とともに破棄される (保存しない)
 *
 * Notes
 * - claim は `role` と `subject` の 2 つに絞る (汎用 claim bag は持たない)
 * - role が空文字の credential は「認証済み・ロールなし」として扱う
 */
use std::collections::BTreeSet;

/// Facts about the caller derived from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityContext {
    pub is_authenticated: bool,
    pub roles: BTreeSet<String>,
    pub subject: Option<String>,
}

impl IdentityContext {
    /// Identity for a caller whose credential verified.
    ///
    /// An empty `role` yields an empty role set rather than a role named `""`.
    pub fn authenticated(subject: Option<String>, role: &str) -> Self {
        let mut roles = BTreeSet::new();
        if !role.is_empty() {
            roles.insert(role.to_string());
        }

        Self {
            is_authenticated: true,
            roles,
            subject,
        }
    }

    /// Exact, case-sensitive role membership.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
