//! Entity model and the tree that owns it.

pub mod entity;
pub mod tree;
pub mod wire;

pub use entity::{
    is_trash_reason, EntityKind, EntityRef, Entry, File, FilePatch, Folder, FolderPatch,
    ItemPatch, Workspace, WorkspacePatch,
};
pub use tree::{TreeCounts, WorkspaceTree};
pub use wire::{ChangeEvent, ChangeKind, FileRow, FolderRow, RowKey, Table, WorkspaceRow};
