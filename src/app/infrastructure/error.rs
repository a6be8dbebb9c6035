use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
