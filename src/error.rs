use serde::Serialize;

/// All errors that can occur while talking to the generation service, the
/// sync server or the MCP bridge, or while touching local state.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The body parsed as JSON but not in any shape the endpoint is known to return.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The generation service returned something that is not a file map.
    /// `raw` keeps the original text for the diagnostic log.
    #[error("{message}")]
    Generation { message: String, raw: String },

    #[error("{0}")]
    Custom(String),
}

// Tauri requires error types to implement Serialize for IPC transport.
impl Serialize for StudioError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
