//! Tauri IPC surface. Each command is a thin wrapper over [`crate::studio::Studio`].

pub mod config;
pub mod files;
pub mod generate;
pub mod logs;
pub mod project;
