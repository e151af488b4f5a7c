use reqwest::header::CONTENT_TYPE;
use tokio::sync::Mutex;

use crate::error::{Result, StudioError};
use crate::logs::ActivityLog;
use crate::remote::wire::{parse_file_body, parse_file_listing, parse_project_listing};
use crate::remote::{http_client, read_failure};
use crate::util::endpoint_url;
use crate::vfs::{FileEntry, Vfs};

/// Read side of the sync server: which projects exist, which files they hold,
/// and what is in each file.
#[derive(Clone, Debug)]
pub struct RemoteProjects {
    http: reqwest::Client,
    server_url: String,
}

impl RemoteProjects {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(http_client()?, server_url))
    }

    pub fn with_client(http: reqwest::Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into(),
        }
    }

    async fn get(&self, segments: &[&str]) -> Result<reqwest::Response> {
        let url = endpoint_url(&self.server_url, segments)?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        Ok(response)
    }

    /// `GET /projects`, without build output, lockfiles and dotfiles.
    pub async fn list_projects(&self) -> Result<Vec<String>> {
        let value = self.get(&["projects"]).await?.json().await?;
        parse_project_listing(value)
    }

    /// `GET /projects/<id>/files`.
    pub async fn list_files(&self, project_id: &str) -> Result<Vec<String>> {
        let value = self
            .get(&["projects", project_id, "files"])
            .await?
            .json()
            .await?;
        parse_file_listing(value)
    }

    /// `GET /projects/<id>/files/<path>`, the path sent as one encoded segment.
    pub async fn fetch_file_content(&self, project_id: &str, path: &str) -> Result<String> {
        let response = self.get(&["projects", project_id, "files", path]).await?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let body = response.text().await?;
        parse_file_body(&body, is_json)
    }

    /// Project names for the picker. A failure is logged and yields nothing.
    pub async fn projects(&self, log: &ActivityLog) -> Vec<String> {
        match self.list_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                log.error(format!("Failed to list projects: {e}"));
                Vec::new()
            }
        }
    }

    /// Loads a project's file list as placeholders, replacing whatever the
    /// store held. On failure the store keeps its previous project.
    pub async fn load_project(&self, vfs: &Mutex<Vfs>, log: &ActivityLog, project_id: &str) -> bool {
        match self.list_files(project_id).await {
            Ok(paths) => {
                let count = paths.len();
                vfs.lock().await.replace_entries(
                    paths
                        .into_iter()
                        .map(|p| (p, FileEntry::Placeholder))
                        .collect(),
                );
                log.info(format!("Loaded {count} files from {project_id}"));
                true
            }
            Err(e) => {
                log.error(format!("Failed to list files of {project_id}: {e}"));
                false
            }
        }
    }

    /// Re-reads the file list and adds placeholders for paths the store does
    /// not know yet. Loaded and edited files are left alone. Returns how many
    /// paths were added.
    pub async fn refresh_files(&self, vfs: &Mutex<Vfs>, log: &ActivityLog, project_id: &str) -> usize {
        match self.list_files(project_id).await {
            Ok(paths) => {
                let mut vfs = vfs.lock().await;
                paths
                    .into_iter()
                    .filter(|p| vfs.insert_placeholder(p.as_str()))
                    .count()
            }
            Err(e) => {
                log.error(format!("Failed to list files of {project_id}: {e}"));
                0
            }
        }
    }

    /// Fetches `path` into the store if it is missing or still a placeholder.
    ///
    /// The lock is not held across the request. If a newer fetch or a local
    /// edit lands on the same path meanwhile, this result is discarded.
    /// Returns whether the store changed.
    pub async fn open_file(
        &self,
        vfs: &Mutex<Vfs>,
        log: &ActivityLog,
        project_id: &str,
        path: &str,
    ) -> bool {
        let ticket = {
            let mut vfs = vfs.lock().await;
            if !vfs.needs_fetch(path) {
                return false;
            }
            vfs.begin_fetch(path)
        };
        match self.fetch_file_content(project_id, path).await {
            Ok(content) => vfs.lock().await.complete_fetch(ticket, content),
            Err(e) => {
                log.error(format!("Failed to load {path}: {e}"));
                false
            }
        }
    }

    /// Fetches every file still held as a placeholder, so the whole project
    /// is in memory before it is pushed or handed to the generator.
    ///
    /// Stops at the first file that cannot be loaded. A path edited or
    /// replaced while its fetch was in flight keeps the newer text. Returns
    /// how many files were loaded.
    pub async fn load_placeholders(&self, vfs: &Mutex<Vfs>, project_id: &str) -> Result<usize> {
        let pending = vfs.lock().await.placeholder_paths();
        let mut loaded = 0;
        for path in pending {
            let ticket = {
                let mut vfs = vfs.lock().await;
                if !vfs.get(&path).is_some_and(FileEntry::is_placeholder) {
                    continue;
                }
                vfs.begin_fetch(&path)
            };
            let content = self
                .fetch_file_content(project_id, &path)
                .await
                .map_err(|e| StudioError::Custom(format!("Could not load {path}: {e}")))?;
            if vfs.lock().await.complete_fetch(ticket, content) {
                loaded += 1;
            }
        }
        Ok(loaded)
    }
}
