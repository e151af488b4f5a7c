use tauri::State;

use crate::error::Result;
use crate::remote::SyncResult;
use crate::studio::Studio;

#[tauri::command]
pub async fn list_projects(studio: State<'_, Studio>) -> Result<Vec<String>> {
    Ok(studio.list_projects().await)
}

/// Returns `false` when the file list could not be fetched; the reason is in
/// the log panel.
#[tauri::command]
pub async fn open_project(project_id: String, studio: State<'_, Studio>) -> Result<bool> {
    studio.open_project(&project_id).await
}

#[tauri::command]
pub async fn new_project(
    project_id: String,
    studio: State<'_, Studio>,
) -> Result<Option<SyncResult>> {
    studio.new_project(&project_id).await
}

#[tauri::command]
pub async fn refresh_files(studio: State<'_, Studio>) -> Result<usize> {
    Ok(studio.refresh_files().await)
}

/// `None` when no project is selected.
#[tauri::command]
pub async fn sync_project(studio: State<'_, Studio>) -> Result<Option<SyncResult>> {
    Ok(studio.sync().await)
}
