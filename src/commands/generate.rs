use tauri::State;

use crate::error::Result;
use crate::remote::{SyncResult, Workflow};
use crate::studio::Studio;

#[tauri::command]
pub async fn generate_app(
    prompt: String,
    workflow_id: Option<String>,
    refine: Option<bool>,
    studio: State<'_, Studio>,
) -> Result<Option<SyncResult>> {
    studio
        .generate(&prompt, workflow_id.as_deref(), refine.unwrap_or(false))
        .await
}

#[tauri::command]
pub async fn search_workflows(studio: State<'_, Studio>) -> Result<Vec<Workflow>> {
    studio.search_workflows().await
}
