use serde::Serialize;

use crate::error::{Result, StudioError};
use crate::remote::{http_client, read_failure};
use crate::util::endpoint_url;
use crate::vfs::{clean_files, FileMap};

/// Outcome of pushing a project to the preview server. Sync never errors;
/// callers branch on this instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum SyncResult {
    Success,
    Failure { message: String },
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncResult::Success)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SyncResult::Success => None,
            SyncResult::Failure { message } => Some(message),
        }
    }
}

const UNKNOWN_FAILURE: &str = "Unknown network error";

fn failure_message(err: StudioError) -> String {
    let message = match err {
        // reqwest's own text, without our "Network error:" prefix.
        StudioError::Network(e) => e.to_string(),
        other => other.to_string(),
    };
    if message.trim().is_empty() {
        UNKNOWN_FAILURE.to_string()
    } else {
        message
    }
}

/// Pushes cleaned project files to `POST <server>/projects/<id>/update-code`.
#[derive(Clone, Debug)]
pub struct ProjectSync {
    http: reqwest::Client,
    server_url: String,
}

impl ProjectSync {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(http_client()?, server_url))
    }

    pub fn with_client(http: reqwest::Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into(),
        }
    }

    /// Sends every file, cleaned, as one request.
    ///
    /// Returns `None` without touching the network when `project_id` is
    /// empty; that is the caller's guard, not a failure. `files` itself is
    /// never modified.
    pub async fn sync(&self, files: &FileMap, project_id: &str) -> Option<SyncResult> {
        if project_id.is_empty() {
            return None;
        }
        let cleaned = clean_files(files);
        Some(match self.push(&cleaned, project_id).await {
            Ok(()) => SyncResult::Success,
            Err(e) => SyncResult::Failure {
                message: failure_message(e),
            },
        })
    }

    async fn push(&self, files: &FileMap, project_id: &str) -> Result<()> {
        let url = endpoint_url(&self.server_url, &["projects", project_id, "update-code"])?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "files": files }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        Ok(())
    }
}
