//! Read-side projections of the tree for whatever the user is viewing.

use serde::Serialize;

use crate::models::{is_trash_reason, EntityKind, WorkspaceTree};

use super::{AppState, ViewSelection};

pub fn breadcrumb(tree: &WorkspaceTree, selection: &ViewSelection) -> String {
    let mut segments = Vec::with_capacity(3);
    let Some(workspace) = selection
        .workspace_id
        .as_deref()
        .and_then(|id| tree.workspace(id))
    else {
        return String::new();
    };
    segments.push(format!("{} {}", workspace.icon_id, workspace.title));

    let folder = selection
        .folder_id
        .as_deref()
        .and_then(|id| tree.folder(&workspace.id, id));
    if let Some(folder) = folder {
        segments.push(format!("/ {} {}", folder.icon_id, folder.title));
        let file = selection
            .file_id
            .as_deref()
            .and_then(|id| tree.file(&workspace.id, &folder.id, id));
        if let Some(file) = file {
            segments.push(format!("/ {} {}", file.icon_id, file.title));
        }
    }
    segments.join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub id: String,
    pub title: String,
    pub icon_id: String,
    pub created_at: String,
    pub in_trash: Option<String>,
    pub banner_url: Option<String>,
    pub data: Option<String>,
}

impl EntityView {
    pub fn is_trashed(&self) -> bool {
        is_trash_reason(self.in_trash.as_deref())
    }
}

/// Projection of the deepest selected entity. `None` when it, or any of its
/// ancestors, is not in the tree.
pub fn current_entity(tree: &WorkspaceTree, selection: &ViewSelection) -> Option<EntityView> {
    let workspace = tree.workspace(selection.workspace_id.as_deref()?)?;
    let Some(folder_id) = selection.folder_id.as_deref() else {
        return Some(EntityView {
            kind: EntityKind::Workspace,
            id: workspace.id.clone(),
            title: workspace.title.clone(),
            icon_id: workspace.icon_id.clone(),
            created_at: workspace.created_at.clone(),
            in_trash: workspace.in_trash.clone(),
            banner_url: workspace.banner_url.clone(),
            data: workspace.data.clone(),
        });
    };
    let folder = tree.folder(&workspace.id, folder_id)?;
    let Some(file_id) = selection.file_id.as_deref() else {
        return Some(EntityView {
            kind: EntityKind::Folder,
            id: folder.id.clone(),
            title: folder.title.clone(),
            icon_id: folder.icon_id.clone(),
            created_at: folder.created_at.clone(),
            in_trash: folder.in_trash.clone(),
            banner_url: folder.banner_url.clone(),
            data: folder.data.clone(),
        });
    };
    let file = tree.file(&workspace.id, &folder.id, file_id)?;
    Some(EntityView {
        kind: EntityKind::File,
        id: file.id.clone(),
        title: file.title.clone(),
        icon_id: file.icon_id.clone(),
        created_at: file.created_at.clone(),
        in_trash: file.in_trash.clone(),
        banner_url: file.banner_url.clone(),
        data: file.data.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub kind: EntityKind,
    pub id: String,
    pub title: String,
    pub icon_id: String,
    pub trashed: bool,
}

/// Children of the current directory: workspaces on the dashboard, folders
/// inside a workspace, files inside a folder (a selected file lists its
/// siblings).
pub fn directory_listing(tree: &WorkspaceTree, selection: &ViewSelection) -> Vec<ListingEntry> {
    let Some(workspace_id) = selection.workspace_id.as_deref() else {
        return tree
            .workspaces()
            .iter()
            .map(|w| ListingEntry {
                kind: EntityKind::Workspace,
                id: w.id.clone(),
                title: w.title.clone(),
                icon_id: w.icon_id.clone(),
                trashed: is_trash_reason(w.in_trash.as_deref()),
            })
            .collect();
    };
    let Some(workspace) = tree.workspace(workspace_id) else {
        return Vec::new();
    };
    match selection.folder_id.as_deref() {
        None => workspace
            .folders
            .iter()
            .map(|f| ListingEntry {
                kind: EntityKind::Folder,
                id: f.id.clone(),
                title: f.title.clone(),
                icon_id: f.icon_id.clone(),
                trashed: is_trash_reason(f.in_trash.as_deref()),
            })
            .collect(),
        Some(folder_id) => tree
            .folder(workspace_id, folder_id)
            .map(|folder| {
                folder
                    .files
                    .iter()
                    .map(|f| ListingEntry {
                        kind: EntityKind::File,
                        id: f.id.clone(),
                        title: f.title.clone(),
                        icon_id: f.icon_id.clone(),
                        trashed: is_trash_reason(f.in_trash.as_deref()),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Every trashed folder and file in a workspace, in tree order.
pub fn trash_listing(tree: &WorkspaceTree, workspace_id: &str) -> Vec<ListingEntry> {
    let Some(workspace) = tree.workspace(workspace_id) else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    for folder in &workspace.folders {
        if is_trash_reason(folder.in_trash.as_deref()) {
            entries.push(ListingEntry {
                kind: EntityKind::Folder,
                id: folder.id.clone(),
                title: folder.title.clone(),
                icon_id: folder.icon_id.clone(),
                trashed: true,
            });
        }
        for file in &folder.files {
            if is_trash_reason(file.in_trash.as_deref()) {
                entries.push(ListingEntry {
                    kind: EntityKind::File,
                    id: file.id.clone(),
                    title: file.title.clone(),
                    icon_id: file.icon_id.clone(),
                    trashed: true,
                });
            }
        }
    }
    entries
}

pub fn trash_notice(entity: &EntityView) -> Option<String> {
    let reason = entity.in_trash.as_deref().filter(|r| !r.is_empty())?;
    Some(format!(
        "This {} is in the trash. {}",
        entity.kind.as_str(),
        reason
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveStatus {
    Saving,
    Saved,
}

impl SaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
        }
    }
}

pub fn save_status(in_flight: usize) -> SaveStatus {
    if in_flight > 0 {
        SaveStatus::Saving
    } else {
        SaveStatus::Saved
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub breadcrumb: String,
    pub entity: Option<EntityView>,
    pub listing: Vec<ListingEntry>,
    pub trash_notice: Option<String>,
}

impl ViewModel {
    pub fn compute(state: &AppState) -> Self {
        let entity = current_entity(&state.tree, &state.selection);
        let trash_notice = entity.as_ref().and_then(trash_notice);
        Self {
            breadcrumb: breadcrumb(&state.tree, &state.selection),
            entity,
            listing: directory_listing(&state.tree, &state.selection),
            trash_notice,
        }
    }
}

/// Memoizes the [`ViewModel`] per (revision, selection).
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, ViewSelection)>,
    model: Option<ViewModel>,
    recomputes: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, state: &AppState) -> &ViewModel {
        let fresh = matches!(
            &self.key,
            Some((revision, selection)) if *revision == state.revision && *selection == state.selection
        );
        if !fresh {
            self.key = Some((state.revision, state.selection.clone()));
            self.model = None;
        }
        if self.model.is_none() {
            self.recomputes += 1;
        }
        self.model.get_or_insert_with(|| ViewModel::compute(state))
    }

    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/view.rs"]
mod tests;
