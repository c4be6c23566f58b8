#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream API error {status}. {preview}")]
    Upstream { status: u16, preview: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl AppError {
    /// Build an upstream error, keeping only the head of the response body.
    pub fn upstream(status: u16, body: &str) -> Self {
        AppError::Upstream {
            status,
            preview: body.chars().take(200).collect(),
        }
    }
}
