use crate::models::{
    EntityKind, EntityRef, File, FilePatch, Folder, FolderPatch, ItemPatch, Workspace,
    WorkspacePatch,
};

use super::action::Action;
use super::state::Route;

/// Side effects requested by the store; executed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigate(Route),
    Persist(PersistRequest),
    LoadFolders {
        workspace_id: String,
    },
    LoadFiles {
        workspace_id: String,
        folder_id: String,
    },
}

/// One entry of an ordered plan produced by the reconciler or the command
/// planner. Steps run strictly in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Navigate(Route),
    Apply(Action),
    Persist(PersistRequest),
}

/// A fire-and-forget write against the durable store.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    CreateWorkspace(Workspace),
    CreateFolder(Folder),
    CreateFile(File),
    UpdateWorkspace { id: String, patch: WorkspacePatch },
    UpdateFolder { id: String, patch: FolderPatch },
    UpdateFile { id: String, patch: FilePatch },
    DeleteWorkspace { id: String },
    DeleteFolder { id: String },
    DeleteFile { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    Create,
    Update,
    Delete,
}

impl PersistRequest {
    pub fn update_item(target: &EntityRef, patch: ItemPatch) -> Self {
        let id = target.id().to_string();
        match target.kind() {
            EntityKind::Workspace => PersistRequest::UpdateWorkspace {
                id,
                patch: patch.into(),
            },
            EntityKind::Folder => PersistRequest::UpdateFolder { id, patch },
            EntityKind::File => PersistRequest::UpdateFile { id, patch },
        }
    }

    pub fn delete(target: &EntityRef) -> Self {
        let id = target.id().to_string();
        match target.kind() {
            EntityKind::Workspace => PersistRequest::DeleteWorkspace { id },
            EntityKind::Folder => PersistRequest::DeleteFolder { id },
            EntityKind::File => PersistRequest::DeleteFile { id },
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            PersistRequest::CreateWorkspace(_)
            | PersistRequest::UpdateWorkspace { .. }
            | PersistRequest::DeleteWorkspace { .. } => EntityKind::Workspace,
            PersistRequest::CreateFolder(_)
            | PersistRequest::UpdateFolder { .. }
            | PersistRequest::DeleteFolder { .. } => EntityKind::Folder,
            PersistRequest::CreateFile(_)
            | PersistRequest::UpdateFile { .. }
            | PersistRequest::DeleteFile { .. } => EntityKind::File,
        }
    }

    pub fn op(&self) -> PersistOp {
        match self {
            PersistRequest::CreateWorkspace(_)
            | PersistRequest::CreateFolder(_)
            | PersistRequest::CreateFile(_) => PersistOp::Create,
            PersistRequest::UpdateWorkspace { .. }
            | PersistRequest::UpdateFolder { .. }
            | PersistRequest::UpdateFile { .. } => PersistOp::Update,
            PersistRequest::DeleteWorkspace { .. }
            | PersistRequest::DeleteFolder { .. }
            | PersistRequest::DeleteFile { .. } => PersistOp::Delete,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PersistRequest::CreateWorkspace(w) => &w.id,
            PersistRequest::CreateFolder(f) => &f.id,
            PersistRequest::CreateFile(f) => &f.id,
            PersistRequest::UpdateWorkspace { id, .. }
            | PersistRequest::UpdateFolder { id, .. }
            | PersistRequest::UpdateFile { id, .. }
            | PersistRequest::DeleteWorkspace { id }
            | PersistRequest::DeleteFolder { id }
            | PersistRequest::DeleteFile { id } => id,
        }
    }
}
