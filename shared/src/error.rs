use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{filename} is not an image (declared type: {mime_type:?})")]
    NotAnImage { filename: String, mime_type: String },
}

/// Failures of a single HTTP exchange with the prediction or webhook endpoint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Failed to build request: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Please upload an image first")]
    NoImageSelected,
    #[error("An analysis is already in progress")]
    AlreadyAnalyzing,
}
