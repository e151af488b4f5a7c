use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Flat path -> content map, the shape the generation service returns and the
/// sync endpoint accepts.
pub type FileMap = BTreeMap<String, String>;

/// Content of one VFS entry.
///
/// A remote file list only tells us which paths exist; their text arrives
/// later, one file at a time. `Placeholder` marks a path whose text has not
/// been fetched yet, which keeps it apart from a file that is really empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "content")]
pub enum FileEntry {
    Placeholder,
    Loaded(String),
}

impl FileEntry {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FileEntry::Placeholder)
    }

    /// Loaded text, or `None` for a placeholder.
    pub fn content(&self) -> Option<&str> {
        match self {
            FileEntry::Placeholder => None,
            FileEntry::Loaded(text) => Some(text),
        }
    }

    /// Text for a flat snapshot; a placeholder reads as `""`.
    pub fn wire_text(&self) -> &str {
        self.content().unwrap_or("")
    }
}

/// Ticket handed out when a file fetch starts. Completing with a ticket that
/// is no longer the newest for its path is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    path: String,
    generation: u64,
    seq: u64,
}

impl FetchTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// In-memory virtual file system: the single source of truth for the files of
/// the project being edited.
///
/// Every write touches exactly one key, except `replace_all`, which swaps the
/// whole project at once.
#[derive(Clone, Debug, Default)]
pub struct Vfs {
    entries: BTreeMap<String, FileEntry>,
    // Bumped whenever the whole project is swapped out.
    generation: u64,
    // Newest sequence number issued per path within the current generation.
    // Bumped by fetch tickets and by local writes, so a fetch that started
    // before an edit cannot undo it.
    seq: HashMap<String, u64>,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store where every file is already loaded.
    pub fn from_files(files: FileMap) -> Self {
        let mut vfs = Self::new();
        vfs.replace_all(files);
        vfs
    }

    /// Builds a store of placeholders, one per listed path.
    pub fn from_listing<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vfs = Self::new();
        vfs.replace_entries(
            paths
                .into_iter()
                .map(|p| (p.into(), FileEntry::Placeholder))
                .collect(),
        );
        vfs
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(path)
    }

    /// Loaded text at `path`; `None` when absent or still a placeholder.
    pub fn content(&self, path: &str) -> Option<&str> {
        self.entries.get(path).and_then(FileEntry::content)
    }

    /// Writes one file. Sibling keys are never touched.
    pub fn set(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        self.bump(&path);
        self.entries.insert(path, FileEntry::Loaded(content.into()));
    }

    /// Adds a placeholder for `path` unless an entry already exists there.
    /// Returns whether anything was inserted.
    pub fn insert_placeholder(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return false;
        }
        self.entries.insert(path, FileEntry::Placeholder);
        true
    }

    /// Swaps in a whole new project with every file loaded.
    pub fn replace_all(&mut self, files: FileMap) {
        self.replace_entries(
            files
                .into_iter()
                .map(|(path, text)| (path, FileEntry::Loaded(text)))
                .collect(),
        );
    }

    /// Swaps in a whole new project, entries as given.
    pub fn replace_entries(&mut self, entries: BTreeMap<String, FileEntry>) {
        // Any fetch in flight belongs to the old project.
        self.generation += 1;
        self.seq.clear();
        self.entries = entries;
    }

    /// Whether opening `path` should trigger a content fetch.
    pub fn needs_fetch(&self, path: &str) -> bool {
        self.entries
            .get(path)
            .map_or(true, FileEntry::is_placeholder)
    }

    /// Starts a content fetch for `path`, superseding any earlier ticket.
    pub fn begin_fetch(&mut self, path: &str) -> FetchTicket {
        let seq = self.bump(path);
        FetchTicket {
            path: path.to_string(),
            generation: self.generation,
            seq,
        }
    }

    /// Applies fetched content if `ticket` is still the newest for its path.
    /// Returns `false` when the result was stale and dropped.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, content: String) -> bool {
        if ticket.generation != self.generation
            || self.seq.get(&ticket.path).copied() != Some(ticket.seq)
        {
            return false;
        }
        self.entries.insert(ticket.path, FileEntry::Loaded(content));
        true
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_placeholder()).count()
    }

    /// Paths whose text has not been fetched yet.
    pub fn placeholder_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_placeholder())
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Flat snapshot. Every key is kept; placeholders become `""`, so callers
    /// that push or share the map load them first.
    pub fn to_file_map(&self) -> FileMap {
        self.entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.wire_text().to_string()))
            .collect()
    }

    fn bump(&mut self, path: &str) -> u64 {
        let seq = self.seq.entry(path.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }
}
