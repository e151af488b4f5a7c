//! Clients for the three services the studio talks to: the sync/preview
//! server, the generation service and the MCP bridge.

pub mod bridge;
pub mod generation;
pub mod projects;
pub mod sync;
pub mod wire;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::error::{Result, StudioError};
use crate::util::NGROK_SKIP_HEADER;

pub use bridge::{BridgeClient, Workflow};
pub use generation::{GenerationClient, GenerationRequest};
pub use projects::RemoteProjects;
pub use sync::{ProjectSync, SyncResult};

/// HTTP client shared by every remote call, with the tunnel header set.
pub fn http_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(NGROK_SKIP_HEADER, HeaderValue::from_static("69420"));
    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .user_agent(concat!("AI-Craft-Studio/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Turns a non-success response into `StudioError::Http`, keeping the body
/// as diagnostic text. An empty body falls back to the status reason.
pub(crate) async fn read_failure(response: reqwest::Response) -> StudioError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = if text.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        text
    };
    StudioError::Http {
        status: status.as_u16(),
        body,
    }
}
