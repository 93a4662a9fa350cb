use serde::{Deserialize, Serialize};

use crate::models::{EntityKind, EntityRef, WorkspaceTree};

/// What the user is looking at. Deeper ids are only meaningful when the
/// shallower ones are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewSelection {
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

impl ViewSelection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            folder_id: None,
            file_id: None,
        }
    }

    pub fn folder(workspace_id: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            folder_id: Some(folder_id.into()),
            file_id: None,
        }
    }

    pub fn file(
        workspace_id: impl Into<String>,
        folder_id: impl Into<String>,
        file_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            folder_id: Some(folder_id.into()),
            file_id: Some(file_id.into()),
        }
    }

    /// Kind of the deepest selected entity.
    pub fn kind(&self) -> Option<EntityKind> {
        match (&self.workspace_id, &self.folder_id, &self.file_id) {
            (Some(_), Some(_), Some(_)) => Some(EntityKind::File),
            (Some(_), Some(_), None) => Some(EntityKind::Folder),
            (Some(_), None, _) => Some(EntityKind::Workspace),
            (None, _, _) => None,
        }
    }

    pub fn target(&self) -> Option<EntityRef> {
        match (&self.workspace_id, &self.folder_id, &self.file_id) {
            (Some(ws), Some(folder), Some(file)) => Some(EntityRef::file(ws, folder, file)),
            (Some(ws), Some(folder), None) => Some(EntityRef::folder(ws, folder)),
            (Some(ws), None, _) => Some(EntityRef::workspace(ws)),
            (None, _, _) => None,
        }
    }

    /// True when `target` is the selected entity or one of its ancestors.
    pub fn is_within(&self, target: &EntityRef) -> bool {
        let id = Some(target.id());
        match target.kind() {
            EntityKind::Workspace => self.workspace_id.as_deref() == id,
            EntityKind::Folder => self.workspace_id.is_some() && self.folder_id.as_deref() == id,
            EntityKind::File => {
                self.workspace_id.is_some()
                    && self.folder_id.is_some()
                    && self.file_id.as_deref() == id
            }
        }
    }

    /// Where to send the user when `target` disappears from under them, or
    /// `None` if the current view does not depend on it.
    pub fn fallback_for(&self, target: &EntityRef) -> Option<Route> {
        if !self.is_within(target) {
            return None;
        }
        Some(match target {
            EntityRef::Workspace { .. } => Route::Dashboard,
            EntityRef::Folder { workspace_id, .. } | EntityRef::File { workspace_id, .. } => {
                Route::Workspace {
                    workspace_id: workspace_id.clone(),
                }
            }
        })
    }
}

/// Navigation target handed to the external router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Workspace {
        workspace_id: String,
    },
    Folder {
        workspace_id: String,
        folder_id: String,
    },
    File {
        workspace_id: String,
        folder_id: String,
        file_id: String,
    },
}

impl Route {
    pub fn path(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        match self {
            Route::Dashboard => prefix.to_string(),
            Route::Workspace { workspace_id } => format!("{prefix}/{workspace_id}"),
            Route::Folder {
                workspace_id,
                folder_id,
            } => format!("{prefix}/{workspace_id}/{folder_id}"),
            Route::File {
                workspace_id,
                folder_id,
                file_id,
            } => format!("{prefix}/{workspace_id}/{folder_id}/{file_id}"),
        }
    }

    pub fn selection(&self) -> ViewSelection {
        match self {
            Route::Dashboard => ViewSelection::none(),
            Route::Workspace { workspace_id } => ViewSelection::workspace(workspace_id),
            Route::Folder {
                workspace_id,
                folder_id,
            } => ViewSelection::folder(workspace_id, folder_id),
            Route::File {
                workspace_id,
                folder_id,
                file_id,
            } => ViewSelection::file(workspace_id, folder_id, file_id),
        }
    }
}

impl From<&EntityRef> for Route {
    fn from(target: &EntityRef) -> Self {
        match target.clone() {
            EntityRef::Workspace { id } => Route::Workspace { workspace_id: id },
            EntityRef::Folder { workspace_id, id } => Route::Folder {
                workspace_id,
                folder_id: id,
            },
            EntityRef::File {
                workspace_id,
                folder_id,
                id,
            } => Route::File {
                workspace_id,
                folder_id,
                file_id: id,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub tree: WorkspaceTree,
    pub selection: ViewSelection,
    /// Bumped on every dispatch that changes the state.
    pub revision: u64,
}

impl AppState {
    pub fn new(tree: WorkspaceTree) -> Self {
        Self {
            tree,
            selection: ViewSelection::none(),
            revision: 0,
        }
    }
}
