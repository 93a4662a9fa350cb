//! The three-level tree of workspaces, folders and files.
//!
//! Every mutation returns whether the tree actually changed so callers can
//! skip re-deriving views on no-ops. Mutations whose parent chain does not
//! resolve are no-ops; a child is never stored without its owner.

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::entity::{
    EntityRef, Entry, File, FilePatch, Folder, FolderPatch, Workspace, WorkspacePatch,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceTree {
    workspaces: Vec<Workspace>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub workspaces: usize,
    pub folders: usize,
    pub files: usize,
}

impl WorkspaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_workspaces(workspaces: Vec<Workspace>) -> Self {
        let mut tree = Self::new();
        tree.set_workspaces(workspaces);
        tree
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    pub fn counts(&self) -> TreeCounts {
        let mut counts = TreeCounts {
            workspaces: self.workspaces.len(),
            ..TreeCounts::default()
        };
        for workspace in &self.workspaces {
            counts.folders += workspace.folders.len();
            counts.files += workspace.folders.iter().map(|f| f.files.len()).sum::<usize>();
        }
        counts
    }

    pub fn workspace(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    fn workspace_mut(&mut self, id: &str) -> Option<&mut Workspace> {
        self.workspaces.iter_mut().find(|w| w.id == id)
    }

    pub fn folder(&self, workspace_id: &str, folder_id: &str) -> Option<&Folder> {
        self.workspace(workspace_id)?
            .folders
            .iter()
            .find(|f| f.id == folder_id)
    }

    fn folder_mut(&mut self, workspace_id: &str, folder_id: &str) -> Option<&mut Folder> {
        self.workspace_mut(workspace_id)?
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
    }

    pub fn file(&self, workspace_id: &str, folder_id: &str, file_id: &str) -> Option<&File> {
        self.folder(workspace_id, folder_id)?
            .files
            .iter()
            .find(|f| f.id == file_id)
    }

    fn file_mut(
        &mut self,
        workspace_id: &str,
        folder_id: &str,
        file_id: &str,
    ) -> Option<&mut File> {
        self.folder_mut(workspace_id, folder_id)?
            .files
            .iter_mut()
            .find(|f| f.id == file_id)
    }

    /// Looks a folder up by id alone, whatever workspace owns it.
    pub fn find_folder(&self, folder_id: &str) -> Option<&Folder> {
        self.workspaces
            .iter()
            .flat_map(|w| w.folders.iter())
            .find(|f| f.id == folder_id)
    }

    /// Looks a file up by id alone, whatever folder owns it.
    pub fn find_file(&self, file_id: &str) -> Option<&File> {
        self.workspaces
            .iter()
            .flat_map(|w| w.folders.iter())
            .flat_map(|f| f.files.iter())
            .find(|f| f.id == file_id)
    }

    pub fn resolves(&self, target: &EntityRef) -> bool {
        match target {
            EntityRef::Workspace { id } => self.workspace(id).is_some(),
            EntityRef::Folder { workspace_id, id } => self.folder(workspace_id, id).is_some(),
            EntityRef::File {
                workspace_id,
                folder_id,
                id,
            } => self.file(workspace_id, folder_id, id).is_some(),
        }
    }

    // workspaces

    pub fn set_workspaces(&mut self, incoming: Vec<Workspace>) -> bool {
        let incoming = incoming
            .into_iter()
            .map(|mut workspace| {
                workspace.adopt_children();
                workspace
            })
            .collect();
        merge_siblings(&mut self.workspaces, incoming)
    }

    pub fn add_workspace(&mut self, mut workspace: Workspace) -> bool {
        if self.workspace(&workspace.id).is_some() {
            return false;
        }
        workspace.adopt_children();
        self.workspaces.push(workspace);
        true
    }

    pub fn update_workspace(&mut self, workspace_id: &str, patch: WorkspacePatch) -> bool {
        self.workspace_mut(workspace_id)
            .is_some_and(|workspace| patch.apply(workspace))
    }

    pub fn delete_workspace(&mut self, workspace_id: &str) -> bool {
        remove_by_id(&mut self.workspaces, workspace_id)
    }

    pub fn restore_workspace(&mut self, workspace_id: &str) -> bool {
        self.workspace_mut(workspace_id).is_some_and(restore)
    }

    // folders

    pub fn set_folders(&mut self, workspace_id: &str, incoming: Vec<Folder>) -> bool {
        let foreign: FxHashSet<&str> = self
            .workspaces
            .iter()
            .filter(|w| w.id != workspace_id)
            .flat_map(|w| w.folders.iter().map(|f| f.id.as_str()))
            .collect();
        let incoming: Vec<Folder> = incoming
            .into_iter()
            .filter(|f| !foreign.contains(f.id.as_str()))
            .map(|mut folder| {
                folder.adopt(workspace_id);
                folder
            })
            .collect();

        let Some(workspace) = self.workspace_mut(workspace_id) else {
            return false;
        };
        merge_siblings(&mut workspace.folders, incoming)
    }

    pub fn add_folder(&mut self, workspace_id: &str, mut folder: Folder) -> bool {
        if self.find_folder(&folder.id).is_some() {
            return false;
        }
        let Some(workspace) = self.workspace_mut(workspace_id) else {
            return false;
        };
        folder.adopt(workspace_id);
        workspace.folders.push(folder);
        true
    }

    pub fn update_folder(&mut self, workspace_id: &str, folder_id: &str, patch: FolderPatch) -> bool {
        self.folder_mut(workspace_id, folder_id)
            .is_some_and(|folder| patch.apply_to_folder(folder))
    }

    /// Removes the folder and, with it, every file it owns.
    pub fn delete_folder(&mut self, workspace_id: &str, folder_id: &str) -> bool {
        self.workspace_mut(workspace_id)
            .is_some_and(|workspace| remove_by_id(&mut workspace.folders, folder_id))
    }

    pub fn restore_folder(&mut self, workspace_id: &str, folder_id: &str) -> bool {
        self.folder_mut(workspace_id, folder_id).is_some_and(restore)
    }

    // files

    pub fn set_files(&mut self, workspace_id: &str, folder_id: &str, incoming: Vec<File>) -> bool {
        let foreign: FxHashSet<&str> = self
            .workspaces
            .iter()
            .flat_map(|w| w.folders.iter())
            .filter(|f| f.id != folder_id || f.workspace_id != workspace_id)
            .flat_map(|f| f.files.iter().map(|file| file.id.as_str()))
            .collect();
        let incoming: Vec<File> = incoming
            .into_iter()
            .filter(|f| !foreign.contains(f.id.as_str()))
            .map(|mut file| {
                file.adopt(workspace_id, folder_id);
                file
            })
            .collect();

        let Some(folder) = self.folder_mut(workspace_id, folder_id) else {
            return false;
        };
        merge_siblings(&mut folder.files, incoming)
    }

    pub fn add_file(&mut self, workspace_id: &str, folder_id: &str, mut file: File) -> bool {
        if self.find_file(&file.id).is_some() {
            return false;
        }
        let Some(folder) = self.folder_mut(workspace_id, folder_id) else {
            return false;
        };
        file.adopt(workspace_id, folder_id);
        folder.files.push(file);
        true
    }

    pub fn update_file(
        &mut self,
        workspace_id: &str,
        folder_id: &str,
        file_id: &str,
        patch: FilePatch,
    ) -> bool {
        self.file_mut(workspace_id, folder_id, file_id)
            .is_some_and(|file| patch.apply_to_file(file))
    }

    pub fn delete_file(&mut self, workspace_id: &str, folder_id: &str, file_id: &str) -> bool {
        self.folder_mut(workspace_id, folder_id)
            .is_some_and(|folder| remove_by_id(&mut folder.files, file_id))
    }

    pub fn restore_file(&mut self, workspace_id: &str, folder_id: &str, file_id: &str) -> bool {
        self.file_mut(workspace_id, folder_id, file_id)
            .is_some_and(restore)
    }
}

fn restore<T: Entry>(entry: &mut T) -> bool {
    if entry.trash_reason() == Some("") {
        return false;
    }
    entry.set_trash(Some(String::new()));
    true
}

fn remove_by_id<T: Entry>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Replaces `local` with `incoming` in the incoming order. Entries already
/// known locally keep their children when the incoming copy has none; local
/// entries missing from `incoming` are dropped with their subtrees.
fn merge_siblings<T: Entry + Clone + PartialEq>(local: &mut Vec<T>, incoming: Vec<T>) -> bool {
    let before = local.clone();
    let mut previous = std::mem::take(local);
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for mut entry in incoming {
        if !seen.insert(entry.id().to_string()) {
            continue;
        }
        if let Some(pos) = previous.iter().position(|p| p.id() == entry.id()) {
            let mut existing = previous.remove(pos);
            entry.inherit_children(&mut existing);
        }
        local.push(entry);
    }

    *local != before
}

#[cfg(test)]
#[path = "../../tests/unit/models/tree.rs"]
mod tests;
