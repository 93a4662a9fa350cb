//! Workspace / Folder / File records and their partial-update shapes.
//!
//! The tree owns children by value: a `Workspace` owns its `folders`, a
//! `Folder` owns its `files`. Back-references (`workspace_id`, `folder_id`)
//! are kept in sync with the owner by the tree, never trusted from callers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Workspace,
    Folder,
    File,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Workspace => "workspace",
            EntityKind::Folder => "folder",
            EntityKind::File => "file",
        }
    }
}

/// `None` and `Some("")` are both "active"; a non-empty string is the reason
/// the entity sits in the trash.
pub fn is_trash_reason(in_trash: Option<&str>) -> bool {
    in_trash.is_some_and(|reason| !reason.is_empty())
}

pub trait Entry {
    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn trash_reason(&self) -> Option<&str>;
    fn set_trash(&mut self, reason: Option<String>);

    fn is_trashed(&self) -> bool {
        is_trash_reason(self.trash_reason())
    }

    /// Takes over children attached to `local` when `self` arrived without any.
    fn inherit_children(&mut self, _local: &mut Self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub icon_id: String,
    pub owner_id: String,
    pub logo: Option<String>,
    pub banner_url: Option<String>,
    pub data: Option<String>,
    pub in_trash: Option<String>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub workspace_id: String,
    pub created_at: String,
    pub title: String,
    pub icon_id: String,
    pub banner_url: Option<String>,
    pub data: Option<String>,
    pub in_trash: Option<String>,
    #[serde(default)]
    pub files: Vec<File>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub folder_id: String,
    pub workspace_id: String,
    pub created_at: String,
    pub title: String,
    pub icon_id: String,
    pub banner_url: Option<String>,
    pub data: Option<String>,
    pub in_trash: Option<String>,
}

impl Workspace {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        icon_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: String::new(),
            title: title.into(),
            icon_id: icon_id.into(),
            owner_id: owner_id.into(),
            logo: None,
            banner_url: None,
            data: None,
            in_trash: None,
            folders: Vec::new(),
        }
    }

    /// Points every descendant back at this workspace.
    pub fn adopt_children(&mut self) {
        for folder in &mut self.folders {
            folder.adopt(&self.id);
        }
    }
}

impl Folder {
    pub fn new(
        id: impl Into<String>,
        workspace_id: impl Into<String>,
        title: impl Into<String>,
        icon_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            workspace_id: workspace_id.into(),
            created_at: String::new(),
            title: title.into(),
            icon_id: icon_id.into(),
            banner_url: None,
            data: None,
            in_trash: None,
            files: Vec::new(),
        }
    }

    pub fn adopt(&mut self, workspace_id: &str) {
        if self.workspace_id != workspace_id {
            self.workspace_id = workspace_id.to_string();
        }
        for file in &mut self.files {
            file.adopt(workspace_id, &self.id);
        }
    }
}

impl File {
    pub fn new(
        id: impl Into<String>,
        workspace_id: impl Into<String>,
        folder_id: impl Into<String>,
        title: impl Into<String>,
        icon_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            folder_id: folder_id.into(),
            workspace_id: workspace_id.into(),
            created_at: String::new(),
            title: title.into(),
            icon_id: icon_id.into(),
            banner_url: None,
            data: None,
            in_trash: None,
        }
    }

    pub fn adopt(&mut self, workspace_id: &str, folder_id: &str) {
        if self.workspace_id != workspace_id {
            self.workspace_id = workspace_id.to_string();
        }
        if self.folder_id != folder_id {
            self.folder_id = folder_id.to_string();
        }
    }
}

impl Entry for Workspace {
    const KIND: EntityKind = EntityKind::Workspace;

    fn id(&self) -> &str {
        &self.id
    }

    fn trash_reason(&self) -> Option<&str> {
        self.in_trash.as_deref()
    }

    fn set_trash(&mut self, reason: Option<String>) {
        self.in_trash = reason;
    }

    fn inherit_children(&mut self, local: &mut Self) {
        if self.folders.is_empty() {
            self.folders = std::mem::take(&mut local.folders);
        }
    }
}

impl Entry for Folder {
    const KIND: EntityKind = EntityKind::Folder;

    fn id(&self) -> &str {
        &self.id
    }

    fn trash_reason(&self) -> Option<&str> {
        self.in_trash.as_deref()
    }

    fn set_trash(&mut self, reason: Option<String>) {
        self.in_trash = reason;
    }

    fn inherit_children(&mut self, local: &mut Self) {
        if self.files.is_empty() {
            self.files = std::mem::take(&mut local.files);
        }
    }
}

impl Entry for File {
    const KIND: EntityKind = EntityKind::File;

    fn id(&self) -> &str {
        &self.id
    }

    fn trash_reason(&self) -> Option<&str> {
        self.in_trash.as_deref()
    }

    fn set_trash(&mut self, reason: Option<String>) {
        self.in_trash = reason;
    }
}

/// Addresses one entity by its full owning chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityRef {
    Workspace {
        id: String,
    },
    Folder {
        workspace_id: String,
        id: String,
    },
    File {
        workspace_id: String,
        folder_id: String,
        id: String,
    },
}

impl EntityRef {
    pub fn workspace(id: impl Into<String>) -> Self {
        EntityRef::Workspace { id: id.into() }
    }

    pub fn folder(workspace_id: impl Into<String>, id: impl Into<String>) -> Self {
        EntityRef::Folder {
            workspace_id: workspace_id.into(),
            id: id.into(),
        }
    }

    pub fn file(
        workspace_id: impl Into<String>,
        folder_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        EntityRef::File {
            workspace_id: workspace_id.into(),
            folder_id: folder_id.into(),
            id: id.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Workspace { .. } => EntityKind::Workspace,
            EntityRef::Folder { .. } => EntityKind::Folder,
            EntityRef::File { .. } => EntityKind::File,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityRef::Workspace { id } | EntityRef::Folder { id, .. } | EntityRef::File { id, .. } => {
                id
            }
        }
    }

    pub fn workspace_id(&self) -> &str {
        match self {
            EntityRef::Workspace { id } => id,
            EntityRef::Folder { workspace_id, .. } | EntityRef::File { workspace_id, .. } => {
                workspace_id
            }
        }
    }
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

/// Partial update for a workspace. `None` leaves a field untouched; the
/// nullable fields take `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePatch {
    pub title: Option<String>,
    pub icon_id: Option<String>,
    pub logo: Option<Option<String>>,
    pub banner_url: Option<Option<String>>,
    pub data: Option<Option<String>>,
    pub in_trash: Option<Option<String>>,
}

impl WorkspacePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, workspace: &mut Workspace) -> bool {
        let mut changed = set_if_changed(&mut workspace.title, self.title);
        changed |= set_if_changed(&mut workspace.icon_id, self.icon_id);
        changed |= set_if_changed(&mut workspace.logo, self.logo);
        changed |= set_if_changed(&mut workspace.banner_url, self.banner_url);
        changed |= set_if_changed(&mut workspace.data, self.data);
        changed |= set_if_changed(&mut workspace.in_trash, self.in_trash);
        changed
    }
}

/// Folders and files share the same updatable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub icon_id: Option<String>,
    pub banner_url: Option<Option<String>>,
    pub data: Option<Option<String>>,
    pub in_trash: Option<Option<String>>,
}

pub type FolderPatch = ItemPatch;
pub type FilePatch = ItemPatch;

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to_folder(self, folder: &mut Folder) -> bool {
        let mut changed = set_if_changed(&mut folder.title, self.title);
        changed |= set_if_changed(&mut folder.icon_id, self.icon_id);
        changed |= set_if_changed(&mut folder.banner_url, self.banner_url);
        changed |= set_if_changed(&mut folder.data, self.data);
        changed |= set_if_changed(&mut folder.in_trash, self.in_trash);
        changed
    }

    pub fn apply_to_file(self, file: &mut File) -> bool {
        let mut changed = set_if_changed(&mut file.title, self.title);
        changed |= set_if_changed(&mut file.icon_id, self.icon_id);
        changed |= set_if_changed(&mut file.banner_url, self.banner_url);
        changed |= set_if_changed(&mut file.data, self.data);
        changed |= set_if_changed(&mut file.in_trash, self.in_trash);
        changed
    }
}

impl From<ItemPatch> for WorkspacePatch {
    fn from(patch: ItemPatch) -> Self {
        Self {
            title: patch.title,
            icon_id: patch.icon_id,
            logo: None,
            banner_url: patch.banner_url,
            data: patch.data,
            in_trash: patch.in_trash,
        }
    }
}
