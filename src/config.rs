use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};

const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-br")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    /// Sync and preview server.
    pub server_url: String,
    /// Generation service that turns a prompt into a file map.
    pub generation_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001".to_string(),
            generation_url: "http://localhost:3002/generate".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSettings {
    pub bridge_url: String,
    pub n8n_url: String,
    pub api_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_project: Option<String>,
    /// Draft prompt per project id.
    #[serde(default)]
    pub prompts: HashMap<String, String>,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub bridge: BridgeSettings,
    #[serde(default)]
    pub language: Language,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            current_project: None,
            prompts: HashMap::new(),
            endpoints: Endpoints::default(),
            bridge: BridgeSettings::default(),
            language: Language::default(),
        }
    }
}

/// `~/.craft-studio/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".craft-studio").join("config.json"))
}

/// Studio settings backed by one JSON file.
///
/// Loaded once at startup; every setter writes the whole file back.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: StudioConfig,
}

impl ConfigStore {
    /// Reads `path`. A missing or unreadable file starts from defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut config: StudioConfig = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        config.current_project = config.current_project.filter(|p| !p.is_empty());
        Self { path, config }
    }

    pub fn load_default() -> Result<Self> {
        let path = default_config_path()
            .ok_or_else(|| StudioError::Custom("Cannot find home directory".into()))?;
        Ok(Self::load(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn current_project(&self) -> Option<&str> {
        self.config.current_project.as_deref()
    }

    pub fn prompt(&self, project_id: &str) -> &str {
        self.config
            .prompts
            .get(project_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_current_project(&mut self, project_id: Option<String>) -> Result<()> {
        self.config.current_project = project_id.filter(|p| !p.is_empty());
        self.save()
    }

    /// Stores the draft prompt for a project; an empty prompt removes it.
    pub fn set_prompt(&mut self, project_id: &str, prompt: &str) -> Result<()> {
        if prompt.is_empty() {
            self.config.prompts.remove(project_id);
        } else {
            self.config
                .prompts
                .insert(project_id.to_string(), prompt.to_string());
        }
        self.save()
    }

    pub fn set_endpoints(&mut self, endpoints: Endpoints) -> Result<()> {
        self.config.endpoints = endpoints;
        self.save()
    }

    pub fn set_bridge(&mut self, bridge: BridgeSettings) -> Result<()> {
        self.config.bridge = bridge;
        self.save()
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.config.language = language;
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
