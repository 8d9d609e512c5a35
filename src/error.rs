use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("config load error: {0}")]
    ConfigLoad(String),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("transport error: {0}")]
    Transport(String),
}
