//! In-memory durable store that publishes its own change feed.
//!
//! Every successful write emits the matching row event on the table's
//! broadcast channel, the same way a database replication feed would.
//! Deleting a parent removes its descendants and emits one DELETE per row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::kernel::services::ports::{
    ChangeFeed, ChangeSubscription, DocumentStore, StoreError, StoreFuture, StoreResult,
};
use crate::models::wire::non_empty;
use crate::models::{
    ChangeEvent, File, FilePatch, FileRow, Folder, FolderPatch, FolderRow, ItemPatch, Table,
    Workspace, WorkspacePatch, WorkspaceRow,
};

/// Events a subscriber may fall behind by before it starts missing them.
pub const FEED_CAPACITY: usize = 256;

#[derive(Debug, Default, Clone)]
struct Tables {
    workspaces: Vec<WorkspaceRow>,
    folders: Vec<FolderRow>,
    files: Vec<FileRow>,
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    workspace_feed: broadcast::Sender<ChangeEvent>,
    folder_feed: broadcast::Sender<ChangeEvent>,
    file_feed: broadcast::Sender<ChangeEvent>,
    offline: AtomicBool,
    latency: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (workspace_feed, _) = broadcast::channel(FEED_CAPACITY);
        let (folder_feed, _) = broadcast::channel(FEED_CAPACITY);
        let (file_feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            tables: Mutex::new(Tables::default()),
            workspace_feed,
            folder_feed,
            file_feed,
            offline: AtomicBool::new(false),
            latency: Duration::ZERO,
        }
    }

    /// Delays every call, so optimistic state is visible before the echo.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Loads a whole workspace subtree without emitting events.
    pub fn seed(&self, workspace: &Workspace) {
        let mut tables = self.lock();
        tables.workspaces.push(WorkspaceRow::from(workspace));
        for folder in &workspace.folders {
            tables.folders.push(FolderRow::from(folder));
            for file in &folder.files {
                tables.files.push(FileRow::from(file));
            }
        }
    }

    /// Publishes a raw event without touching the rows.
    pub fn inject(&self, table: Table, event: ChangeEvent) {
        self.publish(table, event);
    }

    /// Live subscriptions on `table`.
    pub fn subscriber_count(&self, table: Table) -> usize {
        self.feed(table).receiver_count()
    }

    pub fn workspace_rows(&self) -> Vec<WorkspaceRow> {
        self.lock().workspaces.clone()
    }

    pub fn folder_rows(&self) -> Vec<FolderRow> {
        self.lock().folders.clone()
    }

    pub fn file_rows(&self) -> Vec<FileRow> {
        self.lock().files.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn feed(&self, table: Table) -> &broadcast::Sender<ChangeEvent> {
        match table {
            Table::Workspaces => &self.workspace_feed,
            Table::Folders => &self.folder_feed,
            Table::Files => &self.file_feed,
        }
    }

    fn publish(&self, table: Table, event: ChangeEvent) {
        // No subscribers is not an error.
        let _ = self.feed(table).send(event);
    }

    fn publish_all(&self, events: Vec<(Table, ChangeEvent)>) {
        for (table, event) in events {
            self.publish(table, event);
        }
    }

    async fn ready(&self) -> StoreResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

fn patch_workspace_row(row: &mut WorkspaceRow, patch: WorkspacePatch) {
    if let Some(title) = patch.title {
        row.title = title;
    }
    if let Some(icon_id) = patch.icon_id {
        row.icon_id = icon_id;
    }
    if let Some(logo) = patch.logo {
        row.logo = non_empty(logo);
    }
    if let Some(banner_url) = patch.banner_url {
        row.banner_url = non_empty(banner_url);
    }
    if let Some(data) = patch.data {
        row.data = data;
    }
    if let Some(in_trash) = patch.in_trash {
        row.in_trash = in_trash;
    }
}

struct ItemColumns<'a> {
    title: &'a mut String,
    icon_id: &'a mut String,
    banner_url: &'a mut Option<String>,
    data: &'a mut Option<String>,
    in_trash: &'a mut Option<String>,
}

fn patch_item_row(row: ItemColumns<'_>, patch: ItemPatch) {
    if let Some(title) = patch.title {
        *row.title = title;
    }
    if let Some(icon_id) = patch.icon_id {
        *row.icon_id = icon_id;
    }
    if let Some(banner_url) = patch.banner_url {
        *row.banner_url = non_empty(banner_url);
    }
    if let Some(data) = patch.data {
        *row.data = data;
    }
    if let Some(in_trash) = patch.in_trash {
        *row.in_trash = in_trash;
    }
}

impl DocumentStore for MemoryStore {
    fn create_workspace(&self, workspace: Workspace) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = WorkspaceRow::from(&workspace);
            {
                let mut tables = self.lock();
                if tables.workspaces.iter().any(|w| w.id == row.id) {
                    return Err(StoreError::Duplicate {
                        table: Table::Workspaces,
                        id: row.id,
                    });
                }
                tables.workspaces.push(row.clone());
            }
            self.publish(Table::Workspaces, ChangeEvent::insert(&row));
            Ok(())
        })
    }

    fn create_folder(&self, folder: Folder) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = FolderRow::from(&folder);
            {
                let mut tables = self.lock();
                if tables.folders.iter().any(|f| f.id == row.id) {
                    return Err(StoreError::Duplicate {
                        table: Table::Folders,
                        id: row.id,
                    });
                }
                if !tables.workspaces.iter().any(|w| w.id == row.workspace_id) {
                    return Err(StoreError::Invalid(format!(
                        "workspace {} does not exist",
                        row.workspace_id
                    )));
                }
                tables.folders.push(row.clone());
            }
            self.publish(Table::Folders, ChangeEvent::insert(&row));
            Ok(())
        })
    }

    fn create_file(&self, file: File) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = FileRow::from(&file);
            {
                let mut tables = self.lock();
                if tables.files.iter().any(|f| f.id == row.id) {
                    return Err(StoreError::Duplicate {
                        table: Table::Files,
                        id: row.id,
                    });
                }
                let parent_ok = tables
                    .folders
                    .iter()
                    .any(|f| f.id == row.folder_id && f.workspace_id == row.workspace_id);
                if !parent_ok {
                    return Err(StoreError::Invalid(format!(
                        "folder {} does not exist",
                        row.folder_id
                    )));
                }
                tables.files.push(row.clone());
            }
            self.publish(Table::Files, ChangeEvent::insert(&row));
            Ok(())
        })
    }

    fn update_workspace(&self, id: String, patch: WorkspacePatch) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = {
                let mut tables = self.lock();
                let Some(row) = tables.workspaces.iter_mut().find(|w| w.id == id) else {
                    return Err(StoreError::NotFound {
                        table: Table::Workspaces,
                        id,
                    });
                };
                patch_workspace_row(row, patch);
                row.clone()
            };
            self.publish(Table::Workspaces, ChangeEvent::update(&row));
            Ok(())
        })
    }

    fn update_folder(&self, id: String, patch: FolderPatch) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = {
                let mut tables = self.lock();
                let Some(row) = tables.folders.iter_mut().find(|f| f.id == id) else {
                    return Err(StoreError::NotFound {
                        table: Table::Folders,
                        id,
                    });
                };
                patch_item_row(
                    ItemColumns {
                        title: &mut row.title,
                        icon_id: &mut row.icon_id,
                        banner_url: &mut row.banner_url,
                        data: &mut row.data,
                        in_trash: &mut row.in_trash,
                    },
                    patch,
                );
                row.clone()
            };
            self.publish(Table::Folders, ChangeEvent::update(&row));
            Ok(())
        })
    }

    fn update_file(&self, id: String, patch: FilePatch) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let row = {
                let mut tables = self.lock();
                let Some(row) = tables.files.iter_mut().find(|f| f.id == id) else {
                    return Err(StoreError::NotFound {
                        table: Table::Files,
                        id,
                    });
                };
                patch_item_row(
                    ItemColumns {
                        title: &mut row.title,
                        icon_id: &mut row.icon_id,
                        banner_url: &mut row.banner_url,
                        data: &mut row.data,
                        in_trash: &mut row.in_trash,
                    },
                    patch,
                );
                row.clone()
            };
            self.publish(Table::Files, ChangeEvent::update(&row));
            Ok(())
        })
    }

    fn delete_workspace(&self, id: String) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let events = {
                let mut tables = self.lock();
                let before = tables.workspaces.len();
                tables.workspaces.retain(|w| w.id != id);
                if tables.workspaces.len() == before {
                    return Err(StoreError::NotFound {
                        table: Table::Workspaces,
                        id,
                    });
                }
                let mut events = vec![(Table::Workspaces, ChangeEvent::delete(&id))];
                tables.folders.retain(|f| {
                    let keep = f.workspace_id != id;
                    if !keep {
                        events.push((Table::Folders, ChangeEvent::delete(&f.id)));
                    }
                    keep
                });
                tables.files.retain(|f| {
                    let keep = f.workspace_id != id;
                    if !keep {
                        events.push((Table::Files, ChangeEvent::delete(&f.id)));
                    }
                    keep
                });
                events
            };
            self.publish_all(events);
            Ok(())
        })
    }

    fn delete_folder(&self, id: String) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            let events = {
                let mut tables = self.lock();
                let before = tables.folders.len();
                tables.folders.retain(|f| f.id != id);
                if tables.folders.len() == before {
                    return Err(StoreError::NotFound {
                        table: Table::Folders,
                        id,
                    });
                }
                let mut events = vec![(Table::Folders, ChangeEvent::delete(&id))];
                tables.files.retain(|f| {
                    let keep = f.folder_id != id;
                    if !keep {
                        events.push((Table::Files, ChangeEvent::delete(&f.id)));
                    }
                    keep
                });
                events
            };
            self.publish_all(events);
            Ok(())
        })
    }

    fn delete_file(&self, id: String) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.ready().await?;
            {
                let mut tables = self.lock();
                let before = tables.files.len();
                tables.files.retain(|f| f.id != id);
                if tables.files.len() == before {
                    return Err(StoreError::NotFound {
                        table: Table::Files,
                        id,
                    });
                }
            }
            self.publish(Table::Files, ChangeEvent::delete(&id));
            Ok(())
        })
    }

    fn list_workspaces(&self, owner_id: String) -> StoreFuture<'_, Vec<Workspace>> {
        Box::pin(async move {
            self.ready().await?;
            let tables = self.lock();
            Ok(tables
                .workspaces
                .iter()
                .filter(|w| w.workspace_owner == owner_id)
                .cloned()
                .map(Workspace::from)
                .collect())
        })
    }

    fn list_folders(&self, workspace_id: String) -> StoreFuture<'_, Vec<Folder>> {
        Box::pin(async move {
            self.ready().await?;
            let tables = self.lock();
            Ok(tables
                .folders
                .iter()
                .filter(|f| f.workspace_id == workspace_id)
                .cloned()
                .map(Folder::from)
                .collect())
        })
    }

    fn list_files(&self, folder_id: String) -> StoreFuture<'_, Vec<File>> {
        Box::pin(async move {
            self.ready().await?;
            let tables = self.lock();
            Ok(tables
                .files
                .iter()
                .filter(|f| f.folder_id == folder_id)
                .cloned()
                .map(File::from)
                .collect())
        })
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self, table: Table) -> ChangeSubscription {
        ChangeSubscription::new(table, self.feed(table).subscribe())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
