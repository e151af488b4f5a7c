use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::mpsc;

/// How many entries the studio's log panel keeps.
pub const PANEL_CAPACITY: usize = 16;

/// How many rotated `session-*.log` files survive a new session.
const MAX_SESSIONS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
    pub timestamp: String,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }
}

/// The operator-facing log panel. Keeps the most recent entries in memory and
/// mirrors each one into the session log file when one is attached.
#[derive(Default)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<LogEntry>>,
    session: Mutex<Option<SessionLogger>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors every later entry into `logger`.
    pub fn attach(&self, logger: SessionLogger) {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(logger);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    /// Writes to the session file only; for payloads too large for the panel.
    pub fn diagnostic(&self, prefix: &str, line: &str) {
        if let Some(logger) = self
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            logger.log(prefix, line);
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn push(&self, level: LogLevel, message: String) {
        let prefix = match level {
            LogLevel::Info => "studio",
            LogLevel::Error => "studio-err",
        };
        self.diagnostic(prefix, &message);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == PANEL_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            message,
            level,
            timestamp: format_timestamp(unix_timestamp()),
        });
    }
}

/// Session logger that appends timestamped lines to `<dir>/latest.log`.
///
/// `log()` only pushes into a channel; a background task owns the file.
pub struct SessionLogger {
    tx: mpsc::UnboundedSender<String>,
}

impl SessionLogger {
    /// Opens a new session in `logs_dir`.
    ///
    /// - Creates `logs_dir` if needed
    /// - Rotates `latest.log` to `session-{timestamp}.log`
    /// - Keeps at most 10 rotated sessions
    /// - Spawns the writer task (needs a running Tokio runtime)
    pub async fn new(logs_dir: &Path) -> Option<Self> {
        tokio::fs::create_dir_all(logs_dir).await.ok()?;

        let latest = logs_dir.join("latest.log");
        if tokio::fs::try_exists(&latest).await.unwrap_or(false) {
            let rotated = logs_dir.join(format!("session-{}.log", unix_timestamp()));
            let _ = tokio::fs::rename(&latest, &rotated).await;
        }
        cleanup_old_sessions(logs_dir).await;

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&latest)
            .await
            .ok()?;

        let (tx, rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(writer_task(file, rx));
        Some(Self { tx })
    }

    /// `[<timestamp>] [<prefix>] <line>`. Never blocks.
    pub fn log(&self, prefix: &str, line: &str) {
        let ts = format_timestamp(unix_timestamp());
        let _ = self.tx.send(format!("[{ts}] [{prefix}] {line}\n"));
    }
}

/// Default location of session logs: `~/.craft-studio/logs`.
pub fn default_logs_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".craft-studio").join("logs"))
}

/// Owns the file: writes the opening marker, every queued line, and a closing
/// marker with the line count once every sender is gone.
async fn writer_task(file: tokio::fs::File, mut rx: mpsc::UnboundedReceiver<String>) {
    use tokio::io::AsyncWriteExt;
    let mut writer = tokio::io::BufWriter::new(file);

    let opened = format!(
        "# craft-studio {} opened {}\n",
        env!("CARGO_PKG_VERSION"),
        format_timestamp(unix_timestamp())
    );
    let _ = writer.write_all(opened.as_bytes()).await;

    let mut lines = 0usize;
    while let Some(line) = rx.recv().await {
        lines += 1;
        let _ = writer.write_all(line.as_bytes()).await;
        let _ = writer.flush().await;
    }

    let closed = format!(
        "# closed {} after {lines} lines\n",
        format_timestamp(unix_timestamp())
    );
    let _ = writer.write_all(closed.as_bytes()).await;
    let _ = writer.flush().await;
}

async fn cleanup_old_sessions(logs_dir: &Path) {
    let Ok(mut entries) = tokio::fs::read_dir(logs_dir).await else {
        return;
    };

    let mut sessions: Vec<PathBuf> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("session-") && name.ends_with(".log") {
            sessions.push(entry.path());
        }
    }

    // Timestamp is embedded, so name order is age order.
    sessions.sort();
    let excess = sessions.len().saturating_sub(MAX_SESSIONS);
    for old in sessions.drain(..excess) {
        let _ = tokio::fs::remove_file(old).await;
    }
}

fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// ISO 8601 UTC, e.g. `2025-06-15T10:30:00Z`.
fn format_timestamp(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (hour, min, sec) = (rem / 3600, (rem / 60) % 60, rem % 60);

    // Civil date from days since 1970-01-01 (Howard Hinnant's algorithm).
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp(1_735_689_600), "2025-01-01T00:00:00Z");
        assert_eq!(format_timestamp(951_825_600), "2000-02-29T12:00:00Z");
    }

    #[test]
    fn test_panel_keeps_most_recent() {
        let log = ActivityLog::new();
        for i in 0..20 {
            log.info(format!("step {i}"));
        }
        log.error("Sync error: Server error (500): oops");
        let entries = log.entries();
        assert_eq!(entries.len(), PANEL_CAPACITY);
        assert_eq!(entries[0].message, "step 5");
        assert!(entries.last().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_panel_mirrors_into_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new();
        log.info("before attach");
        log.attach(SessionLogger::new(dir.path()).await.unwrap());
        log.error("Sync error: Server error (500): oops");
        log.diagnostic("generation-raw", "not json");
        assert_eq!(log.entries().len(), 2);

        let latest = dir.path().join("latest.log");
        let mut contents = String::new();
        for _ in 0..50 {
            contents = std::fs::read_to_string(&latest).unwrap_or_default();
            if contents.contains("not json") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(contents.contains("[studio-err] Sync error: Server error (500): oops"));
        assert!(contents.contains("[generation-raw] not json"));
        assert!(!contents.contains("before attach"));
    }

    #[tokio::test]
    async fn test_session_log_rotates_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("latest.log"), "previous").unwrap();
        for i in 0..12 {
            std::fs::write(dir.path().join(format!("session-{:03}.log", i)), "").unwrap();
        }

        let logger = SessionLogger::new(dir.path()).await.unwrap();
        logger.log("studio", "hello");
        drop(logger);

        let mut sessions: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("session-"))
            .collect();
        sessions.sort();
        assert_eq!(sessions.len(), MAX_SESSIONS);
        assert!(!sessions.contains(&"session-000.log".to_string()));

        // The writer drains the channel after the sender is dropped.
        let latest = dir.path().join("latest.log");
        let mut contents = String::new();
        for _ in 0..50 {
            contents = std::fs::read_to_string(&latest).unwrap_or_default();
            if contents.contains("# closed") {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(contents.starts_with("# craft-studio "));
        assert!(contents.contains("[studio] hello"));
        assert!(contents.contains("after 1 lines"));
        assert!(!contents.contains("previous"));
    }
}
