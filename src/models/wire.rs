//! Row shapes of the durable store and the change events carrying them.
//!
//! Column names are snake_case on the wire; conversion into the entity model
//! happens here and nowhere else.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{File, Folder, Workspace};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Workspaces,
    Folders,
    Files,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Workspaces, Table::Folders, Table::Files];

    pub fn name(self) -> &'static str {
        match self {
            Table::Workspaces => "workspaces",
            Table::Folders => "folders",
            Table::Files => "files",
        }
    }

    pub fn channel(self) -> &'static str {
        match self {
            Table::Workspaces => "db-changes-workspace",
            Table::Folders => "db-changes-folders",
            Table::Files => "db-changes-files",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub event_type: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
}

impl ChangeEvent {
    pub fn insert<R: Serialize>(row: &R) -> Self {
        Self {
            event_type: ChangeKind::Insert,
            new: serde_json::to_value(row).ok(),
            old: None,
        }
    }

    pub fn update<R: Serialize>(row: &R) -> Self {
        let new = serde_json::to_value(row).ok();
        let old = new
            .as_ref()
            .and_then(|v| v.get("id"))
            .map(|id| serde_json::json!({ "id": id }));
        Self {
            event_type: ChangeKind::Update,
            new,
            old,
        }
    }

    pub fn delete(id: &str) -> Self {
        Self {
            event_type: ChangeKind::Delete,
            new: None,
            old: Some(serde_json::json!({ "id": id })),
        }
    }

    /// Decodes the `new` record; `None` when absent or malformed.
    pub fn new_row<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.new.clone()?;
        serde_json::from_value(value).ok()
    }

    pub fn old_key(&self) -> Option<RowKey> {
        let value = self.old.clone()?;
        serde_json::from_value(value).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowKey {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRow {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon_id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub in_trash: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub workspace_owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRow {
    pub id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon_id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub in_trash: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    pub id: String,
    pub workspace_id: String,
    pub folder_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon_id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub in_trash: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

/// The store writes `""` for "no banner"/"no logo"; the model uses `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<WorkspaceRow> for Workspace {
    fn from(row: WorkspaceRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
            icon_id: row.icon_id,
            owner_id: row.workspace_owner,
            logo: non_empty(row.logo),
            banner_url: non_empty(row.banner_url),
            data: row.data,
            in_trash: row.in_trash,
            folders: Vec::new(),
        }
    }
}

impl From<&Workspace> for WorkspaceRow {
    fn from(workspace: &Workspace) -> Self {
        Self {
            id: workspace.id.clone(),
            created_at: workspace.created_at.clone(),
            title: workspace.title.clone(),
            icon_id: workspace.icon_id.clone(),
            data: workspace.data.clone(),
            in_trash: workspace.in_trash.clone(),
            banner_url: workspace.banner_url.clone(),
            logo: workspace.logo.clone(),
            workspace_owner: workspace.owner_id.clone(),
        }
    }
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            workspace_id: row.workspace_id,
            created_at: row.created_at,
            title: row.title,
            icon_id: row.icon_id,
            banner_url: non_empty(row.banner_url),
            data: row.data,
            in_trash: row.in_trash,
            files: Vec::new(),
        }
    }
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            workspace_id: folder.workspace_id.clone(),
            created_at: folder.created_at.clone(),
            title: folder.title.clone(),
            icon_id: folder.icon_id.clone(),
            data: folder.data.clone(),
            in_trash: folder.in_trash.clone(),
            banner_url: folder.banner_url.clone(),
        }
    }
}

impl From<FileRow> for File {
    fn from(row: FileRow) -> Self {
        Self {
            id: row.id,
            folder_id: row.folder_id,
            workspace_id: row.workspace_id,
            created_at: row.created_at,
            title: row.title,
            icon_id: row.icon_id,
            banner_url: non_empty(row.banner_url),
            data: row.data,
            in_trash: row.in_trash,
        }
    }
}

impl From<&File> for FileRow {
    fn from(file: &File) -> Self {
        Self {
            id: file.id.clone(),
            workspace_id: file.workspace_id.clone(),
            folder_id: file.folder_id.clone(),
            created_at: file.created_at.clone(),
            title: file.title.clone(),
            icon_id: file.icon_id.clone(),
            data: file.data.clone(),
            in_trash: file.in_trash.clone(),
            banner_url: file.banner_url.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/wire.rs"]
mod tests;
