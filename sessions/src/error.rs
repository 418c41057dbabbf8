use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionsError>;

/// Failures surfaced by [`crate::SessionsClient`]. Every failure aborts the
/// current operation; nothing is retried locally.
#[derive(Debug, Error)]
pub enum SessionsError {
    /// Token acquisition failed or the credential returned nothing.
    #[error("failed to acquire access token: {0}")]
    Credential(anyhow::Error),

    /// The service answered with a non-2xx status. `body` is verbatim.
    #[error("request failed with status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    /// The request never produced a usable response.
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected schema.
    #[error("decode error for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Upload succeeded but the response listed no files.
    #[error("file upload response contained no file metadata")]
    MissingFileMetadata,

    /// Reading the caller's upload stream failed.
    #[error("failed to read upload data: {0}")]
    Io(#[from] std::io::Error),

    /// Re-serializing the summarized tool output failed.
    #[error("failed to serialize tool output: {0}")]
    Serialize(#[source] serde_json::Error),
}
