use crate::models::{
    EntityRef, File, FilePatch, Folder, FolderPatch, ItemPatch, Workspace, WorkspacePatch,
};

use super::commands::UserCommand;
use super::state::ViewSelection;

/// Intents accepted by [`super::Store::dispatch`]. The tree variants are the
/// only way the workspace tree changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetWorkspaces {
        workspaces: Vec<Workspace>,
    },
    AddWorkspace {
        workspace: Workspace,
    },
    UpdateWorkspace {
        workspace_id: String,
        patch: WorkspacePatch,
    },
    DeleteWorkspace {
        workspace_id: String,
    },
    RestoreWorkspace {
        workspace_id: String,
    },
    SetFolders {
        workspace_id: String,
        folders: Vec<Folder>,
    },
    AddFolder {
        workspace_id: String,
        folder: Folder,
    },
    UpdateFolder {
        workspace_id: String,
        folder_id: String,
        patch: FolderPatch,
    },
    DeleteFolder {
        workspace_id: String,
        folder_id: String,
    },
    RestoreFolder {
        workspace_id: String,
        folder_id: String,
    },
    SetFiles {
        workspace_id: String,
        folder_id: String,
        files: Vec<File>,
    },
    AddFile {
        workspace_id: String,
        folder_id: String,
        file: File,
    },
    UpdateFile {
        workspace_id: String,
        folder_id: String,
        file_id: String,
        patch: FilePatch,
    },
    DeleteFile {
        workspace_id: String,
        folder_id: String,
        file_id: String,
    },
    RestoreFile {
        workspace_id: String,
        folder_id: String,
        file_id: String,
    },
    SelectView(ViewSelection),
    RunCommand(UserCommand),
}

impl Action {
    /// Short tag used in logs; bodies can be large, so actions are never
    /// logged whole.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetWorkspaces { .. } => "SET_WORKSPACES",
            Action::AddWorkspace { .. } => "ADD_WORKSPACE",
            Action::UpdateWorkspace { .. } => "UPDATE_WORKSPACE",
            Action::DeleteWorkspace { .. } => "DELETE_WORKSPACE",
            Action::RestoreWorkspace { .. } => "RESTORE_WORKSPACE",
            Action::SetFolders { .. } => "SET_FOLDERS",
            Action::AddFolder { .. } => "ADD_FOLDER",
            Action::UpdateFolder { .. } => "UPDATE_FOLDER",
            Action::DeleteFolder { .. } => "DELETE_FOLDER",
            Action::RestoreFolder { .. } => "RESTORE_FOLDER",
            Action::SetFiles { .. } => "SET_FILES",
            Action::AddFile { .. } => "ADD_FILE",
            Action::UpdateFile { .. } => "UPDATE_FILE",
            Action::DeleteFile { .. } => "DELETE_FILE",
            Action::RestoreFile { .. } => "RESTORE_FILE",
            Action::SelectView(_) => "SELECT_VIEW",
            Action::RunCommand(_) => "RUN_COMMAND",
        }
    }
}

impl Action {
    /// Update intent for whatever level `target` addresses.
    pub fn update_item(target: &EntityRef, patch: ItemPatch) -> Action {
        match target.clone() {
            EntityRef::Workspace { id } => Action::UpdateWorkspace {
                workspace_id: id,
                patch: patch.into(),
            },
            EntityRef::Folder { workspace_id, id } => Action::UpdateFolder {
                workspace_id,
                folder_id: id,
                patch,
            },
            EntityRef::File {
                workspace_id,
                folder_id,
                id,
            } => Action::UpdateFile {
                workspace_id,
                folder_id,
                file_id: id,
                patch,
            },
        }
    }

    pub fn delete(target: &EntityRef) -> Action {
        match target.clone() {
            EntityRef::Workspace { id } => Action::DeleteWorkspace { workspace_id: id },
            EntityRef::Folder { workspace_id, id } => Action::DeleteFolder {
                workspace_id,
                folder_id: id,
            },
            EntityRef::File {
                workspace_id,
                folder_id,
                id,
            } => Action::DeleteFile {
                workspace_id,
                folder_id,
                file_id: id,
            },
        }
    }

    pub fn restore(target: &EntityRef) -> Action {
        match target.clone() {
            EntityRef::Workspace { id } => Action::RestoreWorkspace { workspace_id: id },
            EntityRef::Folder { workspace_id, id } => Action::RestoreFolder {
                workspace_id,
                folder_id: id,
            },
            EntityRef::File {
                workspace_id,
                folder_id,
                id,
            } => Action::RestoreFile {
                workspace_id,
                folder_id,
                file_id: id,
            },
        }
    }
}
