use tauri::State;

use crate::config::{BridgeSettings, Endpoints, Language, StudioConfig};
use crate::error::Result;
use crate::remote::Workflow;
use crate::studio::Studio;

#[tauri::command]
pub async fn load_config(studio: State<'_, Studio>) -> Result<StudioConfig> {
    Ok(studio.config())
}

#[tauri::command]
pub async fn save_endpoints(endpoints: Endpoints, studio: State<'_, Studio>) -> Result<()> {
    studio.save_endpoints(endpoints)
}

/// Saves the n8n settings, configures the bridge and returns its workflows.
#[tauri::command]
pub async fn save_bridge_settings(
    settings: BridgeSettings,
    studio: State<'_, Studio>,
) -> Result<Vec<Workflow>> {
    studio.setup_bridge(settings).await
}

#[tauri::command]
pub async fn set_language(language: Language, studio: State<'_, Studio>) -> Result<()> {
    studio.set_language(language)
}

#[tauri::command]
pub async fn save_prompt(prompt: String, studio: State<'_, Studio>) -> Result<()> {
    studio.save_prompt(&prompt)
}
