//! The project being edited: the file store, the explorer tree derived from
//! it, and the cleaning pass applied on the way out.

pub mod sanitize;
pub mod store;
pub mod tree;

pub use sanitize::{clean, clean_files};
pub use store::{FetchTicket, FileEntry, FileMap, Vfs};
pub use tree::{build_tree, visible_rows, ExpansionState, NodeKind, TreeNode, TreeRow};
