use tauri::State;

use crate::error::Result;
use crate::studio::{SessionSnapshot, Studio};
use crate::vfs::{TreeNode, TreeRow};

#[tauri::command]
pub async fn get_session(studio: State<'_, Studio>) -> Result<SessionSnapshot> {
    Ok(studio.snapshot().await)
}

#[tauri::command]
pub async fn file_tree(studio: State<'_, Studio>) -> Result<Vec<TreeNode>> {
    Ok(studio.file_tree().await)
}

/// The explorer as drawn: only rows inside expanded folders.
#[tauri::command]
pub async fn explorer_rows(studio: State<'_, Studio>) -> Result<Vec<TreeRow>> {
    Ok(studio.visible_rows().await)
}

#[tauri::command]
pub async fn toggle_folder(path: String, studio: State<'_, Studio>) -> Result<bool> {
    Ok(studio.toggle_folder(&path))
}

/// Returns the file's text, fetching it from the server on first open.
#[tauri::command]
pub async fn open_file(path: String, studio: State<'_, Studio>) -> Result<Option<String>> {
    Ok(studio.open_file(&path).await)
}

#[tauri::command]
pub async fn update_file(path: String, content: String, studio: State<'_, Studio>) -> Result<()> {
    studio.update_file(&path, &content).await;
    Ok(())
}
