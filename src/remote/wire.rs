//! Response shapes of the sync server, normalized in one place.
//!
//! Each listing endpoint answers either with a bare value or with the same
//! value wrapped in an object under a single key. The adapters here accept
//! both and hand the rest of the crate one shape.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StudioError};

/// Top-level names in the project directory that are never projects.
pub const NON_PROJECT_ENTRIES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    ".vite",
    ".cache",
    ".env",
    ".DS_Store",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
];

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectListing {
    Bare(Vec<String>),
    Wrapped { projects: Vec<String> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileListing {
    Bare(Vec<String>),
    Wrapped { files: Vec<String> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileContent {
    Bare(String),
    Wrapped { content: String },
}

fn shape_error(endpoint: &str, value: &Value) -> StudioError {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    StudioError::UnexpectedShape(format!("{endpoint} returned an unexpected {kind}"))
}

/// `["a", "b"]` or `{ "projects": ["a", "b"] }`, minus non-project entries.
pub fn parse_project_listing(value: Value) -> Result<Vec<String>> {
    let listing = ProjectListing::deserialize(&value)
        .map_err(|_| shape_error("project listing", &value))?;
    let names = match listing {
        ProjectListing::Bare(names) | ProjectListing::Wrapped { projects: names } => names,
    };
    Ok(names
        .into_iter()
        .filter(|name| !NON_PROJECT_ENTRIES.contains(&name.as_str()))
        .collect())
}

/// `["App.tsx"]` or `{ "files": ["App.tsx"] }`.
pub fn parse_file_listing(value: Value) -> Result<Vec<String>> {
    let listing =
        FileListing::deserialize(&value).map_err(|_| shape_error("file listing", &value))?;
    Ok(match listing {
        FileListing::Bare(paths) | FileListing::Wrapped { files: paths } => paths,
    })
}

/// `"text"` or `{ "content": "text" }`.
pub fn parse_file_content(value: Value) -> Result<String> {
    let content =
        FileContent::deserialize(&value).map_err(|_| shape_error("file content", &value))?;
    Ok(match content {
        FileContent::Bare(text) | FileContent::Wrapped { content: text } => text,
    })
}

/// A file body as it came off the wire. JSON responses go through
/// [`parse_file_content`]; any other content type is the file text itself.
pub fn parse_file_body(body: &str, is_json: bool) -> Result<String> {
    if !is_json {
        return Ok(body.to_string());
    }
    parse_file_content(serde_json::from_str(body)?)
}
