use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use crate::error::{Result, StudioError};
use crate::logs::LogEntry;
use crate::studio::Studio;

#[tauri::command]
pub async fn get_logs(studio: State<'_, Studio>) -> Result<Vec<LogEntry>> {
    Ok(studio.log().entries())
}

/// Opens the live preview in the system browser.
#[tauri::command]
pub async fn open_preview(app: AppHandle, studio: State<'_, Studio>) -> Result<()> {
    app.opener()
        .open_url(studio.preview_url(), None::<&str>)
        .map_err(|e| StudioError::Custom(format!("Could not open preview: {e}")))
}
