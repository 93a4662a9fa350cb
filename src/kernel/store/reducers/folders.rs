use crate::kernel::Action;

use super::super::{DispatchResult, Store};

impl Store {
    pub(in crate::kernel::store) fn reduce_folder_action(&mut self, action: Action) -> DispatchResult {
        let tree = &mut self.state.tree;
        match action {
            Action::SetFolders {
                workspace_id,
                folders,
            } => DispatchResult::changed(tree.set_folders(&workspace_id, folders)),
            Action::AddFolder {
                workspace_id,
                folder,
            } => {
                let id = folder.id.clone();
                let added = tree.add_folder(&workspace_id, folder);
                if !added {
                    tracing::debug!(
                        workspace_id = %workspace_id,
                        folder_id = %id,
                        "folder already present or workspace unknown, add skipped"
                    );
                }
                DispatchResult::changed(added)
            }
            Action::UpdateFolder {
                workspace_id,
                folder_id,
                patch,
            } => DispatchResult::changed(tree.update_folder(&workspace_id, &folder_id, patch)),
            Action::DeleteFolder {
                workspace_id,
                folder_id,
            } => DispatchResult::changed(tree.delete_folder(&workspace_id, &folder_id)),
            Action::RestoreFolder {
                workspace_id,
                folder_id,
            } => DispatchResult::changed(tree.restore_folder(&workspace_id, &folder_id)),
            _ => DispatchResult::unchanged(),
        }
    }
}
