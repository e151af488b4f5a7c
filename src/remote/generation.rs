use serde::Serialize;

use crate::error::{Result, StudioError};
use crate::remote::bridge::Workflow;
use crate::remote::{http_client, read_failure};
use crate::vfs::FileMap;

pub const EMPTY_RESPONSE_MESSAGE: &str = "AI failed to generate response.";
pub const PARSE_FAILURE_MESSAGE: &str =
    "Failed to parse AI response. Ensure output is valid JSON VFS.";

/// What the generation service is asked to build.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    /// Technical profile of the n8n workflow the app should drive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
    /// The project as it stands, for iterative refinement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_files: Option<FileMap>,
}

/// Parses the generation service's answer into a file map.
///
/// The text must be one JSON object of path -> file content. Anything else is
/// a `StudioError::Generation` carrying the raw text for the log.
pub fn parse_generated_files(text: &str) -> Result<FileMap> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(StudioError::Generation {
            message: EMPTY_RESPONSE_MESSAGE.to_string(),
            raw: text.to_string(),
        });
    }
    serde_json::from_str::<FileMap>(trimmed).map_err(|_| StudioError::Generation {
        message: PARSE_FAILURE_MESSAGE.to_string(),
        raw: text.to_string(),
    })
}

/// Client of the generation endpoint, which owns prompt construction and the
/// model call and answers with the raw JSON file map.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GenerationClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            endpoint: endpoint.into(),
        })
    }

    /// Asks for a full project. Unlike sync, every failure here is returned
    /// to the caller: there is no partial result worth keeping.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<FileMap> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        let text = response.text().await?;
        parse_generated_files(&text)
    }
}
