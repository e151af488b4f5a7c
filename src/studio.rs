//! One editing session: the project in memory plus everything the UI asks of
//! it. Each method is what a button in the studio does.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex as StdMutex;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::{BridgeSettings, ConfigStore, Endpoints, Language, StudioConfig};
use crate::error::{Result, StudioError};
use crate::logs::ActivityLog;
use crate::remote::{
    BridgeClient, GenerationClient, GenerationRequest, ProjectSync, RemoteProjects, SyncResult,
    Workflow,
};
use crate::templates;
use crate::util::unix_millis;
use crate::vfs::tree::find_conflicts;
use crate::vfs::{build_tree, visible_rows, ExpansionState, FileMap, TreeNode, TreeRow, Vfs};

/// How many workflows the picker asks the bridge for.
const WORKFLOW_LIMIT: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Connecting,
    Error,
}

/// What the header and footer of the studio show.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_project: Option<String>,
    pub active_file: Option<String>,
    pub status: ConnectionStatus,
    pub preview_url: String,
    pub file_count: usize,
    pub placeholder_count: usize,
    pub mcp_active: bool,
    pub language: Language,
    pub prompt: String,
}

#[derive(Clone)]
struct Clients {
    sync: ProjectSync,
    remote: RemoteProjects,
    generation: GenerationClient,
    bridge: Option<BridgeClient>,
}

impl Clients {
    fn from_config(endpoints: &Endpoints, bridge: &BridgeSettings) -> Result<Self> {
        let http = crate::remote::http_client()?;
        let bridge = if bridge.bridge_url.is_empty() {
            None
        } else {
            Some(BridgeClient::new(bridge.bridge_url.clone())?)
        };
        Ok(Self {
            sync: ProjectSync::with_client(http.clone(), endpoints.server_url.clone()),
            remote: RemoteProjects::with_client(http, endpoints.server_url.clone()),
            generation: GenerationClient::new(endpoints.generation_url.clone())?,
            bridge,
        })
    }
}

fn pick(language: Language, pt_br: &str, en: &str) -> String {
    match language {
        Language::PtBr => pt_br.to_string(),
        Language::En => en.to_string(),
    }
}

/// File to show after a project is replaced: `App.tsx` if there is one,
/// otherwise the first path.
fn default_active_file(vfs: &Vfs) -> Option<String> {
    if vfs.get("App.tsx").is_some() {
        return Some("App.tsx".to_string());
    }
    vfs.paths().next().map(str::to_string)
}

pub struct Studio {
    vfs: Mutex<Vfs>,
    expansion: StdMutex<ExpansionState>,
    active_file: StdMutex<Option<String>>,
    status: StdMutex<ConnectionStatus>,
    preview_nonce: AtomicU64,
    mcp_active: AtomicBool,
    config: StdMutex<ConfigStore>,
    clients: StdMutex<Clients>,
    log: ActivityLog,
}

impl Studio {
    /// Starts a session from the saved config with the starter project loaded.
    pub fn new(config: ConfigStore) -> Result<Self> {
        let clients = Clients::from_config(&config.config().endpoints, &config.config().bridge)?;
        let vfs = Vfs::from_files(templates::starter_project());
        let active = default_active_file(&vfs);
        Ok(Self {
            vfs: Mutex::new(vfs),
            expansion: StdMutex::new(ExpansionState::new()),
            active_file: StdMutex::new(active),
            status: StdMutex::new(ConnectionStatus::Connected),
            preview_nonce: AtomicU64::new(unix_millis()),
            mcp_active: AtomicBool::new(false),
            config: StdMutex::new(config),
            clients: StdMutex::new(clients),
            log: ActivityLog::new(),
        })
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    fn clients(&self) -> Clients {
        self.clients.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn with_config<T>(&self, f: impl FnOnce(&mut ConfigStore) -> T) -> T {
        f(&mut self.config.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn config(&self) -> StudioConfig {
        self.with_config(|c| c.config().clone())
    }

    fn language(&self) -> Language {
        self.with_config(|c| c.config().language)
    }

    pub fn current_project(&self) -> Option<String> {
        self.with_config(|c| c.current_project().map(str::to_string))
    }

    fn set_status(&self, status: ConnectionStatus) {
        *self.status.lock().unwrap_or_else(|e| e.into_inner()) = status;
    }

    fn set_active_file(&self, path: Option<String>) {
        *self.active_file.lock().unwrap_or_else(|e| e.into_inner()) = path;
    }

    pub fn active_file(&self) -> Option<String> {
        self.active_file
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn preview_url(&self) -> String {
        let server = self.with_config(|c| c.config().endpoints.server_url.clone());
        format!(
            "{}/?t={}",
            server.trim_end_matches('/'),
            self.preview_nonce.load(Ordering::SeqCst)
        )
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let (file_count, placeholder_count) = {
            let vfs = self.vfs.lock().await;
            (vfs.len(), vfs.placeholder_count())
        };
        let current_project = self.current_project();
        let prompt = current_project
            .as_deref()
            .map(|p| self.with_config(|c| c.prompt(p).to_string()))
            .unwrap_or_default();
        SessionSnapshot {
            current_project,
            active_file: self.active_file(),
            status: *self.status.lock().unwrap_or_else(|e| e.into_inner()),
            preview_url: self.preview_url(),
            file_count,
            placeholder_count,
            mcp_active: self.mcp_active.load(Ordering::SeqCst),
            language: self.language(),
            prompt,
        }
    }

    // ── Settings ────────────────────────────────────────────────────────────

    /// Saves new endpoints and points the clients at them.
    pub fn save_endpoints(&self, endpoints: Endpoints) -> Result<()> {
        let bridge = self.with_config(|c| c.config().bridge.clone());
        let clients = Clients::from_config(&endpoints, &bridge)?;
        self.with_config(|c| c.set_endpoints(endpoints))?;
        *self.clients.lock().unwrap_or_else(|e| e.into_inner()) = clients;
        Ok(())
    }

    pub fn set_language(&self, language: Language) -> Result<()> {
        self.with_config(|c| c.set_language(language))
    }

    /// Stores the draft prompt of the current project.
    pub fn save_prompt(&self, prompt: &str) -> Result<()> {
        let Some(project) = self.current_project() else {
            return Ok(());
        };
        self.with_config(|c| c.set_prompt(&project, prompt))
    }

    // ── Explorer and editor ─────────────────────────────────────────────────

    pub async fn file_tree(&self) -> Vec<TreeNode> {
        let paths: Vec<String> = self.vfs.lock().await.paths().map(str::to_string).collect();
        build_tree(&paths)
    }

    pub async fn visible_rows(&self) -> Vec<TreeRow> {
        let tree = self.file_tree().await;
        let expansion = self.expansion.lock().unwrap_or_else(|e| e.into_inner());
        visible_rows(&tree, &expansion)
    }

    pub fn toggle_folder(&self, path: &str) -> bool {
        self.expansion
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .toggle(path)
    }

    /// Makes `path` the active file, fetching its text first if the store
    /// only holds a placeholder. Returns the text, or `None` if it could not
    /// be loaded.
    pub async fn open_file(&self, path: &str) -> Option<String> {
        self.set_active_file(Some(path.to_string()));
        self.expansion
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .expand_to(path);

        if let Some(project) = self.current_project() {
            let remote = self.clients().remote;
            remote.open_file(&self.vfs, &self.log, &project, path).await;
        }
        self.vfs.lock().await.content(path).map(str::to_string)
    }

    /// Editor keystrokes land here. Only `path` changes.
    pub async fn update_file(&self, path: &str, content: &str) {
        self.vfs.lock().await.set(path, content);
    }

    pub async fn files(&self) -> FileMap {
        self.vfs.lock().await.to_file_map()
    }

    // ── Projects ────────────────────────────────────────────────────────────

    pub async fn list_projects(&self) -> Vec<String> {
        let remote = self.clients().remote;
        remote.projects(&self.log).await
    }

    /// Switches to a remote project: file list now, contents on demand.
    /// On failure the current project stays loaded.
    pub async fn open_project(&self, project_id: &str) -> Result<bool> {
        let remote = self.clients().remote;
        if !remote.load_project(&self.vfs, &self.log, project_id).await {
            return Ok(false);
        }
        self.with_config(|c| c.set_current_project(Some(project_id.to_string())))?;
        self.after_replace().await;
        Ok(true)
    }

    /// Starts a new project from the starter files and pushes it.
    pub async fn new_project(&self, project_id: &str) -> Result<Option<SyncResult>> {
        if project_id.trim().is_empty() {
            return Err(StudioError::Custom("Project name is empty".into()));
        }
        self.vfs
            .lock()
            .await
            .replace_all(templates::starter_project());
        self.with_config(|c| c.set_current_project(Some(project_id.to_string())))?;
        self.after_replace().await;
        Ok(self.sync().await)
    }

    /// Picks up files that appeared on the server since the project was
    /// opened.
    pub async fn refresh_files(&self) -> usize {
        let Some(project) = self.current_project() else {
            return 0;
        };
        let remote = self.clients().remote;
        remote.refresh_files(&self.vfs, &self.log, &project).await
    }

    async fn after_replace(&self) {
        let (active, paths) = {
            let vfs = self.vfs.lock().await;
            (
                default_active_file(&vfs),
                vfs.paths().map(str::to_string).collect::<Vec<_>>(),
            )
        };
        for shadowed in find_conflicts(&paths) {
            self.log
                .error(format!("{shadowed} clashes with another path and is hidden"));
        }
        let tree = build_tree(&paths);
        self.expansion
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain_existing(&tree);
        self.set_active_file(active);
    }

    // ── Sync and generation ─────────────────────────────────────────────────

    /// Pushes the current project to the preview server.
    ///
    /// `None` when no project is selected. Failures are logged and reported
    /// through the result and the connection status.
    pub async fn sync(&self) -> Option<SyncResult> {
        let project = self.current_project().filter(|p| !p.is_empty())?;
        self.set_status(ConnectionStatus::Connecting);

        let result = match self.complete_files(Some(&project)).await {
            Ok(files) => {
                let sync = self.clients().sync;
                sync.sync(&files, &project)
                    .await
                    .unwrap_or_else(|| SyncResult::Failure {
                        message: "No project selected".to_string(),
                    })
            }
            Err(e) => SyncResult::Failure {
                message: e.to_string(),
            },
        };
        match &result {
            SyncResult::Success => {
                self.preview_nonce.store(unix_millis(), Ordering::SeqCst);
                self.set_status(ConnectionStatus::Connected);
            }
            SyncResult::Failure { message } => {
                self.set_status(ConnectionStatus::Error);
                self.log.error(format!("Sync error: {message}"));
            }
        }
        Some(result)
    }

    /// The whole project as text, with every placeholder fetched first. Fails
    /// rather than hand out a map where unfetched files read as empty.
    async fn complete_files(&self, project: Option<&str>) -> Result<FileMap> {
        if let Some(project) = project {
            let remote = self.clients().remote;
            remote.load_placeholders(&self.vfs, project).await?;
        }
        let vfs = self.vfs.lock().await;
        match vfs.placeholder_count() {
            0 => Ok(vfs.to_file_map()),
            n => Err(StudioError::Custom(format!("{n} files are not loaded yet"))),
        }
    }

    /// Generates a new project from `prompt` and pushes it.
    ///
    /// A blank prompt does nothing. With `workflow_id` the bridge is asked
    /// for the workflow's technical profile first; with `refine` the current
    /// files go along so the service can edit instead of starting over.
    /// Errors from the bridge or the generation service are logged and
    /// returned; the store is only replaced on success.
    pub async fn generate(
        &self,
        prompt: &str,
        workflow_id: Option<&str>,
        refine: bool,
    ) -> Result<Option<SyncResult>> {
        if prompt.trim().is_empty() {
            return Ok(None);
        }
        let language = self.language();
        self.log.info(pick(
            language,
            "Arquitetando estrutura modular...",
            "Architecting modular root structure...",
        ));

        let files = match self.request_generation(prompt, workflow_id, refine).await {
            Ok(files) => files,
            Err(e) => {
                if let StudioError::Generation { raw, .. } = &e {
                    self.log.diagnostic("generation-raw", raw);
                }
                self.log.error(e.to_string());
                return Err(e);
            }
        };

        self.vfs.lock().await.replace_all(files);
        self.after_replace().await;
        if let Some(project) = self.current_project() {
            self.with_config(|c| c.set_prompt(&project, ""))?;
        }

        let result = self.sync().await;
        self.log.info(pick(
            language,
            "Projeto Modular Gerado",
            "Modular Project Generated",
        ));
        Ok(result)
    }

    async fn request_generation(
        &self,
        prompt: &str,
        workflow_id: Option<&str>,
        refine: bool,
    ) -> Result<FileMap> {
        let clients = self.clients();
        let workflow = match workflow_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(self.bridge(&clients)?.workflow_details(id).await?),
            None => None,
        };
        let current_files = if refine {
            let project = self.current_project();
            Some(self.complete_files(project.as_deref()).await?)
        } else {
            None
        };
        clients
            .generation
            .generate(&GenerationRequest {
                prompt: prompt.to_string(),
                workflow,
                current_files,
            })
            .await
    }

    // ── MCP bridge ──────────────────────────────────────────────────────────

    fn bridge<'a>(&self, clients: &'a Clients) -> Result<&'a BridgeClient> {
        clients.bridge.as_ref().ok_or_else(|| {
            StudioError::Custom(pick(
                self.language(),
                "Configure o n8n primeiro (+)",
                "Configure n8n first (+)",
            ))
        })
    }

    /// Workflows for the picker. Marks the bridge active on success.
    pub async fn search_workflows(&self) -> Result<Vec<Workflow>> {
        let clients = self.clients();
        let result = match self.bridge(&clients) {
            Ok(bridge) => bridge.search_workflows(WORKFLOW_LIMIT).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(list) => {
                if !self.mcp_active.swap(true, Ordering::SeqCst) {
                    self.log.info(pick(
                        self.language(),
                        "Conexão n8n estabelecida.",
                        "n8n connection established.",
                    ));
                }
                Ok(list)
            }
            Err(e) => {
                self.mcp_active.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Configures the bridge for an n8n instance, saves the settings and
    /// loads the workflow list.
    pub async fn setup_bridge(&self, settings: BridgeSettings) -> Result<Vec<Workflow>> {
        let endpoints = self.with_config(|c| c.config().endpoints.clone());
        let clients = Clients::from_config(&endpoints, &settings)?;
        let setup = match self.bridge(&clients) {
            Ok(bridge) => bridge.setup(&settings.n8n_url, &settings.api_token).await,
            Err(e) => Err(e),
        };
        if let Err(e) = setup {
            self.log.error(format!("Setup error: {e}"));
            return Err(e);
        }
        self.with_config(|c| c.set_bridge(settings))?;
        *self.clients.lock().unwrap_or_else(|e| e.into_inner()) = clients;
        self.mcp_active.store(false, Ordering::SeqCst);
        self.search_workflows().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{closed_port_url, StubResponse, StubServer};
    use crate::vfs::NodeKind;

    fn studio_for(dir: &tempfile::TempDir, server_url: &str, generation_url: &str) -> Studio {
        let mut config = ConfigStore::load(dir.path().join("config.json"));
        config
            .set_endpoints(Endpoints {
                server_url: server_url.to_string(),
                generation_url: generation_url.to_string(),
            })
            .unwrap();
        Studio::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_session_shows_starter_project() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(&dir, "http://127.0.0.1:1", "http://127.0.0.1:1/generate");
        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.active_file.as_deref(), Some("App.tsx"));
        assert_eq!(snapshot.file_count, 4);
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert!(snapshot.preview_url.starts_with("http://127.0.0.1:1/?t="));
        assert_eq!(studio.sync().await, None);
    }

    #[tokio::test]
    async fn test_generate_replaces_and_syncs() {
        let server = StubServer::start(vec![
            (
                "POST /generate",
                StubResponse::ok(
                    r#"{"index.html":"<html>...</html>","App.tsx":"import React from 'react';"}"#,
                ),
            ),
            ("POST /projects/todo/update-code", StubResponse::ok("{}")),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );
        studio
            .with_config(|c| c.set_current_project(Some("todo".into())))
            .unwrap();
        studio.save_prompt("a todo list").unwrap();

        let result = studio.generate("a todo list", None, false).await.unwrap();
        assert_eq!(result, Some(SyncResult::Success));

        let tree = studio.file_tree().await;
        let names: Vec<_> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["App.tsx", "index.html"]);
        assert!(tree.iter().all(|n| n.kind == NodeKind::File));

        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.active_file.as_deref(), Some("App.tsx"));
        assert_eq!(snapshot.prompt, "");
        assert_eq!(snapshot.status, ConnectionStatus::Connected);

        let pushes: Vec<_> = server
            .requests()
            .into_iter()
            .filter(|r| r.path == "/projects/todo/update-code")
            .collect();
        assert_eq!(pushes.len(), 1);
        let body: serde_json::Value = serde_json::from_str(&pushes[0].body).unwrap();
        assert_eq!(body["files"].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_project() {
        let server = StubServer::start(vec![(
            "POST /generate",
            StubResponse::ok("I could not do that."),
        )])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );

        let err = studio.generate("crm", None, false).await.unwrap_err();
        assert!(matches!(err, StudioError::Generation { .. }));
        assert_eq!(studio.files().await, templates::starter_project());
        let last = studio.log().entries().pop().unwrap();
        assert!(last.is_error());
        assert!(last.message.starts_with("Failed to parse AI response"));
    }

    #[tokio::test]
    async fn test_blank_prompt_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(&dir, "http://127.0.0.1:1", "http://127.0.0.1:1/generate");
        assert_eq!(studio.generate("   ", None, false).await.unwrap(), None);
        assert!(studio.log().entries().is_empty());
    }

    #[tokio::test]
    async fn test_workflow_without_bridge_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(&dir, "http://127.0.0.1:1", "http://127.0.0.1:1/generate");
        let err = studio.generate("crm", Some("7"), false).await.unwrap_err();
        assert_eq!(err.to_string(), "Configure o n8n primeiro (+)");
    }

    #[tokio::test]
    async fn test_sync_failure_sets_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let url = closed_port_url().await;
        let studio = studio_for(&dir, &url, &format!("{url}/generate"));
        let before = studio.preview_url();

        let result = studio.new_project("todo").await.unwrap().unwrap();
        assert!(!result.is_success());
        assert_eq!(studio.snapshot().await.status, ConnectionStatus::Error);
        assert_eq!(studio.preview_url(), before);
        let last = studio.log().entries().pop().unwrap();
        assert!(last.message.starts_with("Sync error: "));
    }

    #[tokio::test]
    async fn test_open_project_then_file() {
        let server = StubServer::start(vec![
            (
                "GET /projects/todo/files",
                StubResponse::ok(r#"{"files":["App.tsx","components/Header.tsx"]}"#),
            ),
            (
                "GET /projects/todo/files/components%2FHeader.tsx",
                StubResponse::ok(r#"{"content":"export const Header = () => null;"}"#),
            ),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );

        assert!(studio.open_project("todo").await.unwrap());
        assert_eq!(studio.current_project().as_deref(), Some("todo"));
        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.placeholder_count, 2);

        let text = studio.open_file("components/Header.tsx").await;
        assert_eq!(text.as_deref(), Some("export const Header = () => null;"));
        assert_eq!(studio.snapshot().await.placeholder_count, 1);

        let rows = studio.visible_rows().await;
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["components", "Header.tsx", "App.tsx"]);

        assert!(!studio.toggle_folder("components"));
        assert_eq!(studio.visible_rows().await.len(), 2);
    }

    #[tokio::test]
    async fn test_open_project_failure_keeps_current() {
        let server = StubServer::start(vec![]).await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );
        assert!(!studio.open_project("missing").await.unwrap());
        assert_eq!(studio.current_project(), None);
        assert_eq!(studio.files().await, templates::starter_project());
    }

    #[tokio::test]
    async fn test_setup_bridge_loads_workflows() {
        let bridge = StubServer::start(vec![
            ("POST /setup", StubResponse::ok(r#"{"ok":true}"#)),
            (
                "POST /execute",
                StubResponse::ok(r#"{"result":{"output":{"data":[{"id":"7","name":"Leads"}]}}}"#),
            ),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(&dir, "http://127.0.0.1:1", "http://127.0.0.1:1/generate");

        let list = studio
            .setup_bridge(BridgeSettings {
                bridge_url: bridge.base_url.clone(),
                n8n_url: "https://n8n.example.com".into(),
                api_token: "jwt".into(),
            })
            .await
            .unwrap();
        assert_eq!(list[0].id, "7");
        assert!(studio.snapshot().await.mcp_active);

        let saved = ConfigStore::load(dir.path().join("config.json"));
        assert_eq!(saved.config().bridge.bridge_url, bridge.base_url);
    }

    fn lazy_project_routes(header: StubResponse) -> Vec<(&'static str, StubResponse)> {
        vec![
            (
                "GET /projects/todo/files",
                StubResponse::ok(r#"["App.tsx","components/Header.tsx"]"#),
            ),
            (
                "GET /projects/todo/files/App.tsx",
                StubResponse::ok(r#"{"content":"export const App = 1;"}"#),
            ),
            ("GET /projects/todo/files/components%2FHeader.tsx", header),
            ("POST /projects/todo/update-code", StubResponse::ok("{}")),
            (
                "POST /generate",
                StubResponse::ok(r#"{"App.tsx":"export const App = 3;"}"#),
            ),
        ]
    }

    #[tokio::test]
    async fn test_sync_sends_unopened_files_in_full() {
        let server = StubServer::start(lazy_project_routes(StubResponse::ok(
            r#"{"content":"export const Header = () => null;"}"#,
        )))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );

        assert!(studio.open_project("todo").await.unwrap());
        studio.open_file("App.tsx").await;
        studio.update_file("App.tsx", "export const App = 2;").await;
        assert_eq!(studio.sync().await, Some(SyncResult::Success));

        let push = server
            .requests()
            .into_iter()
            .find(|r| r.path == "/projects/todo/update-code")
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&push.body).unwrap();
        assert_eq!(body["files"]["App.tsx"], "export const App = 2;");
        assert_eq!(
            body["files"]["components/Header.tsx"],
            "export const Header = () => null;"
        );
        assert_eq!(studio.snapshot().await.placeholder_count, 0);
    }

    #[tokio::test]
    async fn test_sync_refuses_to_blank_unloadable_files() {
        let server =
            StubServer::start(lazy_project_routes(StubResponse::status(500, "disk full"))).await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );

        assert!(studio.open_project("todo").await.unwrap());
        let result = studio.sync().await.unwrap();
        assert!(!result.is_success());
        assert!(result.message().unwrap().contains("components/Header.tsx"));
        assert_eq!(studio.snapshot().await.status, ConnectionStatus::Error);
        assert!(!server
            .requests()
            .iter()
            .any(|r| r.path == "/projects/todo/update-code"));
    }

    #[tokio::test]
    async fn test_refine_sends_fetched_files() {
        let server = StubServer::start(lazy_project_routes(StubResponse::ok(
            r#"{"content":"export const Header = () => null;"}"#,
        )))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let studio = studio_for(
            &dir,
            &server.base_url,
            &format!("{}/generate", server.base_url),
        );

        assert!(studio.open_project("todo").await.unwrap());
        studio.generate("add a footer", None, true).await.unwrap();

        let request = server
            .requests()
            .into_iter()
            .find(|r| r.path == "/generate")
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["currentFiles"]["App.tsx"], "export const App = 1;");
        assert_eq!(
            body["currentFiles"]["components/Header.tsx"],
            "export const Header = () => null;"
        );
    }

    #[tokio::test]
    async fn test_empty_current_project_does_not_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"version":1,"currentProject":"","endpoints":{"serverUrl":"http://127.0.0.1:1","generationUrl":"http://127.0.0.1:1/generate"}}"#,
        )
        .unwrap();
        let studio = Studio::new(ConfigStore::load(&path)).unwrap();
        assert_eq!(studio.sync().await, None);
        assert_eq!(studio.snapshot().await.status, ConnectionStatus::Connected);
    }
}
