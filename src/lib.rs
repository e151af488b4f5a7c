pub mod config;
pub mod error;
pub mod logs;
pub mod remote;
pub mod studio;
pub mod templates;
pub mod util;
pub mod vfs;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(test)]
mod testing;

#[cfg(feature = "desktop")]
pub fn run() {
    use tauri::Manager;

    use crate::config::{default_config_path, ConfigStore};
    use crate::logs::{default_logs_dir, SessionLogger};
    use crate::studio::Studio;

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let config_path = default_config_path()
                .ok_or_else(|| error::StudioError::Custom("Cannot find home directory".into()))?;
            let studio = Studio::new(ConfigStore::load(config_path))?;
            app.manage(studio);

            // Session log file; the studio runs without one if the directory is unusable.
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let Some(dir) = default_logs_dir() else {
                    return;
                };
                if let Some(logger) = SessionLogger::new(&dir).await {
                    handle.state::<Studio>().log().attach(logger);
                }
            });

            // Reopen the last project; a first run keeps the starter files.
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let studio = handle.state::<Studio>();
                if let Some(project) = studio.current_project() {
                    let _ = studio.open_project(&project).await;
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::config::load_config,
            commands::config::save_endpoints,
            commands::config::save_bridge_settings,
            commands::config::set_language,
            commands::config::save_prompt,
            commands::files::get_session,
            commands::files::file_tree,
            commands::files::explorer_rows,
            commands::files::toggle_folder,
            commands::files::open_file,
            commands::files::update_file,
            commands::project::list_projects,
            commands::project::open_project,
            commands::project::new_project,
            commands::project::refresh_files,
            commands::project::sync_project,
            commands::generate::generate_app,
            commands::generate::search_workflows,
            commands::logs::get_logs,
            commands::logs::open_preview,
        ])
        .run(tauri::generate_context!())
        .expect("failed to run AI-Craft Studio");
}
