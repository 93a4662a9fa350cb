//! Durable store contract.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::models::{File, FilePatch, Folder, FolderPatch, Table, Workspace, WorkspacePatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { table: Table, id: String },
    Duplicate { table: Table, id: String },
    Invalid(String),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            StoreError::Duplicate { table, id } => write!(f, "{table} row already exists: {id}"),
            StoreError::Invalid(msg) => write!(f, "invalid request: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Writes and listings against the authoritative rows. Listings return
/// entities with empty child collections.
pub trait DocumentStore: Send + Sync {
    fn create_workspace(&self, workspace: Workspace) -> StoreFuture<'_, ()>;
    fn create_folder(&self, folder: Folder) -> StoreFuture<'_, ()>;
    fn create_file(&self, file: File) -> StoreFuture<'_, ()>;

    fn update_workspace(&self, id: String, patch: WorkspacePatch) -> StoreFuture<'_, ()>;
    fn update_folder(&self, id: String, patch: FolderPatch) -> StoreFuture<'_, ()>;
    fn update_file(&self, id: String, patch: FilePatch) -> StoreFuture<'_, ()>;

    fn delete_workspace(&self, id: String) -> StoreFuture<'_, ()>;
    fn delete_folder(&self, id: String) -> StoreFuture<'_, ()>;
    fn delete_file(&self, id: String) -> StoreFuture<'_, ()>;

    fn list_workspaces(&self, owner_id: String) -> StoreFuture<'_, Vec<Workspace>>;
    fn list_folders(&self, workspace_id: String) -> StoreFuture<'_, Vec<Folder>>;
    fn list_files(&self, folder_id: String) -> StoreFuture<'_, Vec<File>>;
}
