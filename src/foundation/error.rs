/// Convenience result type used across shopframe.
pub type ShopframeResult<T> = Result<T, ShopframeError>;

/// Top-level error taxonomy used by the cache, layout, compositor and orchestrator.
#[derive(thiserror::Error, Debug)]
pub enum ShopframeError {
    /// A cache entry that was asked for does not exist. Non-fatal; callers render instead.
    #[error("cache miss: {0}")]
    NotFound(String),

    /// Fetching an image or catalog from its source failed.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Writing to (or reading an existing entry from) the cache directory failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid or incomplete configuration (missing colour entry, impossible pagination).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid catalog data or caller input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Drawing failed (surface limits, decode of a cached artifact, text shaping).
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShopframeError {
    /// Build a [`ShopframeError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`ShopframeError::Retrieval`] value.
    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    /// Build a [`ShopframeError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`ShopframeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ShopframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShopframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// `true` for [`ShopframeError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
