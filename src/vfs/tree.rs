use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Whether a tree node is a folder or a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Folder,
    File,
}

/// One node of the explorer tree. Derived from the VFS keys on every change
/// and thrown away afterwards; nothing is ever written through it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Present only for folders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    fn folder(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind: NodeKind::Folder,
            children: Some(Vec::new()),
        }
    }

    fn file(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind: NodeKind::File,
            children: None,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Folders before files, then case-sensitive byte order of the name.
fn explorer_order(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

fn sort_level(nodes: &mut [TreeNode]) {
    nodes.sort_by(explorer_order);
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            sort_level(children);
        }
    }
}

/// Outcome of inserting one path into a level.
enum Placed {
    Inserted,
    /// An existing node of the other kind already owns this segment.
    Shadowed,
}

/// `prefix` is the path of the level being filled, `None` at the root. Node
/// paths are rebuilt from the raw segments, so a leaf's path is exactly the
/// key it came from even when that key has empty segments.
fn insert_path(level: &mut Vec<TreeNode>, segments: &[&str], prefix: Option<&str>) -> Placed {
    let Some((head, rest)) = segments.split_first() else {
        return Placed::Shadowed;
    };
    let path = match prefix {
        None => head.to_string(),
        Some(prefix) => format!("{prefix}/{head}"),
    };

    let idx = match level.iter().position(|n| n.name == *head) {
        Some(idx) => idx,
        None => {
            let node = if rest.is_empty() {
                TreeNode::file(head, path.clone())
            } else {
                TreeNode::folder(head, path.clone())
            };
            level.push(node);
            level.len() - 1
        }
    };

    let node = &mut level[idx];
    if rest.is_empty() {
        // First occurrence decides the kind of a segment.
        return if node.is_folder() {
            Placed::Shadowed
        } else {
            Placed::Inserted
        };
    }
    match node.children.as_mut() {
        Some(children) => insert_path(children, rest, Some(path.as_str())),
        None => Placed::Shadowed,
    }
}

fn build(paths: &[&str]) -> (Vec<TreeNode>, Vec<String>) {
    let mut roots = Vec::new();
    let mut shadowed = Vec::new();
    for path in paths {
        let segments: Vec<&str> = path.split('/').collect();
        if let Placed::Shadowed = insert_path(&mut roots, &segments, None) {
            shadowed.push(path.to_string());
        }
    }
    sort_level(&mut roots);
    (roots, shadowed)
}

/// Turns a flat set of `/`-separated paths into the explorer tree.
///
/// Every level is ordered folders first, then by name. When two paths
/// disagree on whether a segment is a folder or a file, whichever path comes
/// first in `paths` wins and the other is left out of the tree; see
/// [`find_conflicts`] to learn which ones were dropped.
pub fn build_tree<I, S>(paths: I) -> Vec<TreeNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = paths.into_iter().collect();
    let refs: Vec<&str> = owned.iter().map(AsRef::as_ref).collect();
    build(&refs).0
}

/// Paths that [`build_tree`] could not place because an earlier path already
/// claimed one of their segments with the other kind.
pub fn find_conflicts<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = paths.into_iter().collect();
    let refs: Vec<&str> = owned.iter().map(AsRef::as_ref).collect();
    build(&refs).1
}

/// Every file path in the tree, depth first.
pub fn leaf_paths(nodes: &[TreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        if node.is_folder() {
            out.extend(leaf_paths(node.children()));
        } else {
            out.push(node.path.clone());
        }
    }
    out
}

/// Which folders the user has opened. Kept apart from the tree so a rebuild
/// does not collapse everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionState {
    open: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapsed unless explicitly opened.
    pub fn is_expanded(&self, folder: &str) -> bool {
        self.open.get(folder).copied().unwrap_or(false)
    }

    pub fn set_expanded(&mut self, folder: impl Into<String>, expanded: bool) {
        self.open.insert(folder.into(), expanded);
    }

    /// Flips one folder and returns its new state.
    pub fn toggle(&mut self, folder: &str) -> bool {
        let next = !self.is_expanded(folder);
        self.open.insert(folder.to_string(), next);
        next
    }

    /// Opens every ancestor folder of `path`.
    pub fn expand_to(&mut self, path: &str) {
        for (idx, _) in path.match_indices('/') {
            self.open.insert(path[..idx].to_string(), true);
        }
    }

    /// Forgets folders that no longer exist in `tree`.
    pub fn retain_existing(&mut self, tree: &[TreeNode]) {
        fn collect<'a>(nodes: &'a [TreeNode], out: &mut HashSet<&'a str>) {
            for node in nodes.iter().filter(|n| n.is_folder()) {
                out.insert(node.path.as_str());
                collect(node.children(), out);
            }
        }
        let mut folders = HashSet::new();
        collect(tree, &mut folders);
        self.open.retain(|path, _| folders.contains(path.as_str()));
    }
}

/// One line of the explorer as it is drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub expanded: bool,
}

/// Flattens the tree into the rows currently visible, only descending into
/// expanded folders.
pub fn visible_rows(tree: &[TreeNode], expansion: &ExpansionState) -> Vec<TreeRow> {
    fn walk(nodes: &[TreeNode], depth: usize, expansion: &ExpansionState, out: &mut Vec<TreeRow>) {
        for node in nodes {
            let expanded = node.is_folder() && expansion.is_expanded(&node.path);
            out.push(TreeRow {
                depth,
                name: node.name.clone(),
                path: node.path.clone(),
                kind: node.kind,
                expanded,
            });
            if expanded {
                walk(node.children(), depth + 1, expansion, out);
            }
        }
    }
    let mut rows = Vec::new();
    walk(tree, 0, expansion, &mut rows);
    rows
}
