//! User commands and the planner that turns them into ordered steps.
//!
//! A plan is the optimistic intent plus the persistence request that backs
//! it, preceded by a navigation when the command removes what the user is
//! looking at.

use serde::{Deserialize, Serialize};

use crate::kernel::services::ports::SyncConfig;
use crate::models::{EntityRef, File, Folder, ItemPatch, Workspace, WorkspacePatch};

use super::{Action, AppState, PersistRequest, Step};

const FALLBACK_TRASH_REASON: &str = "Moved to trash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UserCommand {
    CreateWorkspace {
        owner_id: String,
        title: String,
        #[serde(default)]
        icon_id: Option<String>,
    },
    CreateFolder {
        workspace_id: String,
        #[serde(default)]
        title: Option<String>,
    },
    CreateFile {
        workspace_id: String,
        folder_id: String,
        #[serde(default)]
        title: Option<String>,
    },
    Rename {
        target: EntityRef,
        title: String,
    },
    SetIcon {
        target: EntityRef,
        icon_id: String,
    },
    SetBanner {
        target: EntityRef,
        banner_url: String,
    },
    RemoveBanner {
        target: EntityRef,
    },
    SetLogo {
        workspace_id: String,
        #[serde(default)]
        logo: Option<String>,
    },
    MoveToTrash {
        target: EntityRef,
        #[serde(default)]
        reason: String,
    },
    Restore {
        target: EntityRef,
    },
    Delete {
        target: EntityRef,
    },
    SaveBody {
        target: EntityRef,
        data: String,
    },
}

impl UserCommand {
    pub fn name(&self) -> &'static str {
        match self {
            UserCommand::CreateWorkspace { .. } => "create_workspace",
            UserCommand::CreateFolder { .. } => "create_folder",
            UserCommand::CreateFile { .. } => "create_file",
            UserCommand::Rename { .. } => "rename",
            UserCommand::SetIcon { .. } => "set_icon",
            UserCommand::SetBanner { .. } => "set_banner",
            UserCommand::RemoveBanner { .. } => "remove_banner",
            UserCommand::SetLogo { .. } => "set_logo",
            UserCommand::MoveToTrash { .. } => "move_to_trash",
            UserCommand::Restore { .. } => "restore",
            UserCommand::Delete { .. } => "delete",
            UserCommand::SaveBody { .. } => "save_body",
        }
    }
}

/// Stateless apart from the defaults it stamps on new entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planner {
    default_title: String,
    default_icon: String,
}

impl Default for Planner {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

impl Planner {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            default_title: config.default_title.clone(),
            default_icon: config.default_icon.clone(),
        }
    }

    /// Returns the steps for `command`, or an empty plan when the command
    /// addresses something the tree does not hold.
    pub fn plan(&self, state: &AppState, command: UserCommand) -> Vec<Step> {
        let name = command.name();
        let steps = match command {
            UserCommand::CreateWorkspace {
                owner_id,
                title,
                icon_id,
            } => {
                let icon = icon_id.unwrap_or_else(|| self.default_icon.clone());
                let mut workspace =
                    Workspace::new(new_id(), owner_id, self.title_or_default(Some(title)), icon);
                workspace.created_at = now();
                vec![
                    Step::Apply(Action::AddWorkspace {
                        workspace: workspace.clone(),
                    }),
                    Step::Persist(PersistRequest::CreateWorkspace(workspace)),
                ]
            }
            UserCommand::CreateFolder {
                workspace_id,
                title,
            } => {
                if state.tree.workspace(&workspace_id).is_none() {
                    return self.unresolved(name, &workspace_id);
                }
                let mut folder = Folder::new(
                    new_id(),
                    workspace_id.clone(),
                    self.title_or_default(title),
                    self.default_icon.clone(),
                );
                folder.created_at = now();
                vec![
                    Step::Apply(Action::AddFolder {
                        workspace_id,
                        folder: folder.clone(),
                    }),
                    Step::Persist(PersistRequest::CreateFolder(folder)),
                ]
            }
            UserCommand::CreateFile {
                workspace_id,
                folder_id,
                title,
            } => {
                if state.tree.folder(&workspace_id, &folder_id).is_none() {
                    return self.unresolved(name, &folder_id);
                }
                let mut file = File::new(
                    new_id(),
                    workspace_id.clone(),
                    folder_id.clone(),
                    self.title_or_default(title),
                    self.default_icon.clone(),
                );
                file.created_at = now();
                vec![
                    Step::Apply(Action::AddFile {
                        workspace_id,
                        folder_id,
                        file: file.clone(),
                    }),
                    Step::Persist(PersistRequest::CreateFile(file)),
                ]
            }
            UserCommand::SetLogo { workspace_id, logo } => {
                if state.tree.workspace(&workspace_id).is_none() {
                    return self.unresolved(name, &workspace_id);
                }
                let patch = WorkspacePatch {
                    logo: Some(logo.filter(|l| !l.is_empty())),
                    ..WorkspacePatch::default()
                };
                vec![
                    Step::Apply(Action::UpdateWorkspace {
                        workspace_id: workspace_id.clone(),
                        patch: patch.clone(),
                    }),
                    Step::Persist(PersistRequest::UpdateWorkspace {
                        id: workspace_id,
                        patch,
                    }),
                ]
            }
            UserCommand::Rename { target, title } => {
                let patch = ItemPatch {
                    title: Some(title),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::SetIcon { target, icon_id } => {
                let patch = ItemPatch {
                    icon_id: Some(icon_id),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::SetBanner { target, banner_url } => {
                let banner = Some(banner_url).filter(|url| !url.is_empty());
                let patch = ItemPatch {
                    banner_url: Some(banner),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::RemoveBanner { target } => {
                let patch = ItemPatch {
                    banner_url: Some(None),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::MoveToTrash { target, reason } => {
                let reason = if reason.trim().is_empty() {
                    FALLBACK_TRASH_REASON.to_string()
                } else {
                    reason
                };
                let patch = ItemPatch {
                    in_trash: Some(Some(reason)),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::SaveBody { target, data } => {
                let patch = ItemPatch {
                    data: Some(Some(data)),
                    ..ItemPatch::default()
                };
                self.update(state, name, &target, patch)
            }
            UserCommand::Restore { target } => {
                if !state.tree.resolves(&target) {
                    return self.unresolved(name, target.id());
                }
                let patch = ItemPatch {
                    in_trash: Some(Some(String::new())),
                    ..ItemPatch::default()
                };
                vec![
                    Step::Apply(Action::restore(&target)),
                    Step::Persist(PersistRequest::update_item(&target, patch)),
                ]
            }
            UserCommand::Delete { target } => {
                if !state.tree.resolves(&target) {
                    return self.unresolved(name, target.id());
                }
                let mut steps = Vec::with_capacity(3);
                if let Some(route) = state.selection.fallback_for(&target) {
                    steps.push(Step::Navigate(route));
                }
                steps.push(Step::Apply(Action::delete(&target)));
                steps.push(Step::Persist(PersistRequest::delete(&target)));
                steps
            }
        };
        tracing::debug!(command = name, steps = steps.len(), "planned");
        steps
    }

    fn update(
        &self,
        state: &AppState,
        name: &'static str,
        target: &EntityRef,
        patch: ItemPatch,
    ) -> Vec<Step> {
        if !state.tree.resolves(target) {
            return self.unresolved(name, target.id());
        }
        vec![
            Step::Apply(Action::update_item(target, patch.clone())),
            Step::Persist(PersistRequest::update_item(target, patch)),
        ]
    }

    fn unresolved(&self, name: &'static str, id: &str) -> Vec<Step> {
        tracing::debug!(command = name, id, "command target not in tree; skipped");
        Vec::new()
    }

    fn title_or_default(&self, title: Option<String>) -> String {
        match title {
            Some(title) if !title.trim().is_empty() => title,
            _ => self.default_title.clone(),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/commands.rs"]
mod tests;
