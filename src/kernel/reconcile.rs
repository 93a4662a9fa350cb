//! Translates change-feed events into ordered plans.
//!
//! Every event is judged against the local tree alone: nothing is buffered,
//! and duplicates of optimistic changes are absorbed by the reducer's add
//! guards.

use serde::de::DeserializeOwned;

use crate::models::wire::non_empty;
use crate::models::{
    ChangeEvent, ChangeKind, EntityRef, FileRow, FolderRow, ItemPatch, Table, WorkspacePatch,
    WorkspaceRow, WorkspaceTree,
};

use super::{Action, AppState, Step};

pub fn reconcile(state: &AppState, table: Table, event: &ChangeEvent) -> Vec<Step> {
    match event.event_type {
        ChangeKind::Insert => on_insert(&state.tree, table, event),
        ChangeKind::Update => on_update(&state.tree, table, event),
        ChangeKind::Delete => on_delete(state, table, event),
    }
}

fn decode<T: DeserializeOwned>(table: Table, event: &ChangeEvent) -> Option<T> {
    let row = event.new_row::<T>();
    if row.is_none() {
        tracing::debug!(%table, kind = ?event.event_type, "undecodable change payload; dropped");
    }
    row
}

fn on_insert(tree: &WorkspaceTree, table: Table, event: &ChangeEvent) -> Vec<Step> {
    let action = match table {
        Table::Workspaces => {
            let Some(row) = decode::<WorkspaceRow>(table, event) else {
                return Vec::new();
            };
            if row.id.is_empty() || tree.workspace(&row.id).is_some() {
                return Vec::new();
            }
            Action::AddWorkspace {
                workspace: row.into(),
            }
        }
        Table::Folders => {
            let Some(row) = decode::<FolderRow>(table, event) else {
                return Vec::new();
            };
            if row.id.is_empty() || tree.find_folder(&row.id).is_some() {
                return Vec::new();
            }
            if tree.workspace(&row.workspace_id).is_none() {
                tracing::debug!(
                    folder_id = %row.id,
                    workspace_id = %row.workspace_id,
                    "folder insert for unknown workspace; dropped"
                );
                return Vec::new();
            }
            Action::AddFolder {
                workspace_id: row.workspace_id.clone(),
                folder: row.into(),
            }
        }
        Table::Files => {
            let Some(row) = decode::<FileRow>(table, event) else {
                return Vec::new();
            };
            if row.id.is_empty() || tree.find_file(&row.id).is_some() {
                return Vec::new();
            }
            if tree.folder(&row.workspace_id, &row.folder_id).is_none() {
                tracing::debug!(
                    file_id = %row.id,
                    folder_id = %row.folder_id,
                    "file insert for unknown folder; dropped"
                );
                return Vec::new();
            }
            Action::AddFile {
                workspace_id: row.workspace_id.clone(),
                folder_id: row.folder_id.clone(),
                file: row.into(),
            }
        }
    };
    vec![Step::Apply(action)]
}

fn on_update(tree: &WorkspaceTree, table: Table, event: &ChangeEvent) -> Vec<Step> {
    let action = match table {
        Table::Workspaces => {
            let Some(row) = decode::<WorkspaceRow>(table, event) else {
                return Vec::new();
            };
            let Some(local) = tree.workspace(&row.id) else {
                tracing::debug!(workspace_id = %row.id, "update for unknown workspace; dropped");
                return Vec::new();
            };
            let item = diff_item(
                Fields {
                    title: &local.title,
                    icon_id: &local.icon_id,
                    banner_url: local.banner_url.as_deref(),
                    in_trash: local.in_trash.as_deref(),
                },
                row.title,
                row.icon_id,
                row.banner_url,
                row.in_trash,
            );
            let mut patch = WorkspacePatch::from(item);
            let logo = non_empty(row.logo);
            if logo != local.logo {
                patch.logo = Some(logo);
            }
            if patch.is_empty() {
                return Vec::new();
            }
            Action::UpdateWorkspace {
                workspace_id: local.id.clone(),
                patch,
            }
        }
        Table::Folders => {
            let Some(row) = decode::<FolderRow>(table, event) else {
                return Vec::new();
            };
            let Some(local) = tree.find_folder(&row.id) else {
                tracing::debug!(folder_id = %row.id, "update for unknown folder; dropped");
                return Vec::new();
            };
            let patch = diff_item(
                Fields {
                    title: &local.title,
                    icon_id: &local.icon_id,
                    banner_url: local.banner_url.as_deref(),
                    in_trash: local.in_trash.as_deref(),
                },
                row.title,
                row.icon_id,
                row.banner_url,
                row.in_trash,
            );
            if patch.is_empty() {
                return Vec::new();
            }
            Action::update_item(&EntityRef::folder(&local.workspace_id, &local.id), patch)
        }
        Table::Files => {
            let Some(row) = decode::<FileRow>(table, event) else {
                return Vec::new();
            };
            let Some(local) = tree.find_file(&row.id) else {
                tracing::debug!(file_id = %row.id, "update for unknown file; dropped");
                return Vec::new();
            };
            let patch = diff_item(
                Fields {
                    title: &local.title,
                    icon_id: &local.icon_id,
                    banner_url: local.banner_url.as_deref(),
                    in_trash: local.in_trash.as_deref(),
                },
                row.title,
                row.icon_id,
                row.banner_url,
                row.in_trash,
            );
            if patch.is_empty() {
                return Vec::new();
            }
            let target = EntityRef::file(&local.workspace_id, &local.folder_id, &local.id);
            Action::update_item(&target, patch)
        }
    };
    vec![Step::Apply(action)]
}

/// Displayable fields of the local copy.
struct Fields<'a> {
    title: &'a str,
    icon_id: &'a str,
    banner_url: Option<&'a str>,
    in_trash: Option<&'a str>,
}

fn diff_item(
    local: Fields<'_>,
    title: String,
    icon_id: String,
    banner_url: Option<String>,
    in_trash: Option<String>,
) -> ItemPatch {
    let mut patch = ItemPatch::default();
    if title != local.title {
        patch.title = Some(title);
    }
    if icon_id != local.icon_id {
        patch.icon_id = Some(icon_id);
    }
    let banner_url = non_empty(banner_url);
    if banner_url.as_deref() != local.banner_url {
        patch.banner_url = Some(banner_url);
    }
    // "" and null both mean active; only a real change of reason counts.
    if trash_reason(in_trash.as_deref()) != trash_reason(local.in_trash) {
        patch.in_trash = Some(in_trash);
    }
    patch
}

fn trash_reason(in_trash: Option<&str>) -> Option<&str> {
    in_trash.filter(|reason| !reason.is_empty())
}

fn on_delete(state: &AppState, table: Table, event: &ChangeEvent) -> Vec<Step> {
    let Some(key) = event.old_key() else {
        tracing::debug!(%table, "delete without old id; dropped");
        return Vec::new();
    };
    let tree = &state.tree;
    let target = match table {
        Table::Workspaces => tree.workspace(&key.id).map(|w| EntityRef::workspace(&w.id)),
        Table::Folders => tree
            .find_folder(&key.id)
            .map(|f| EntityRef::folder(&f.workspace_id, &f.id)),
        Table::Files => tree
            .find_file(&key.id)
            .map(|f| EntityRef::file(&f.workspace_id, &f.folder_id, &f.id)),
    };
    let Some(target) = target else {
        tracing::debug!(%table, id = %key.id, "delete for unknown entity; dropped");
        return Vec::new();
    };

    let mut steps = Vec::with_capacity(2);
    if let Some(route) = state.selection.fallback_for(&target) {
        steps.push(Step::Navigate(route));
    }
    steps.push(Step::Apply(Action::delete(&target)));
    steps
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/reconcile.rs"]
mod tests;
