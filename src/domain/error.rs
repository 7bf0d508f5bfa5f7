use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required tool `{tool}` could not be located: {detail}")]
    ToolNotFound { tool: String, detail: String },

    #[error("Failed to start `{program}`: {detail}")]
    Launch { program: String, detail: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Errors the user can fix from the form; shown as a plain notice.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}
