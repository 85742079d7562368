//! StoreError - 永続化ポート共通のエラー

/// Failure reported by any persistence port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record with the same unique key already exists (plain insert only).
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
