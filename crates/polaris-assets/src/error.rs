/// Errors from asset registration and lookup.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no asset named '{0}' is registered")]
    NotFound(String),

    #[error("an asset named '{0}' is already registered")]
    DuplicateName(String),

    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),
}
