use crate::kernel::Action;

use super::super::{DispatchResult, Store};

impl Store {
    pub(in crate::kernel::store) fn reduce_file_action(&mut self, action: Action) -> DispatchResult {
        let tree = &mut self.state.tree;
        match action {
            Action::SetFiles {
                workspace_id,
                folder_id,
                files,
            } => DispatchResult::changed(tree.set_files(&workspace_id, &folder_id, files)),
            Action::AddFile {
                workspace_id,
                folder_id,
                file,
            } => {
                let id = file.id.clone();
                let added = tree.add_file(&workspace_id, &folder_id, file);
                if !added {
                    tracing::debug!(
                        folder_id = %folder_id,
                        file_id = %id,
                        "file already present or folder unknown, add skipped"
                    );
                }
                DispatchResult::changed(added)
            }
            Action::UpdateFile {
                workspace_id,
                folder_id,
                file_id,
                patch,
            } => DispatchResult::changed(tree.update_file(&workspace_id, &folder_id, &file_id, patch)),
            Action::DeleteFile {
                workspace_id,
                folder_id,
                file_id,
            } => DispatchResult::changed(tree.delete_file(&workspace_id, &folder_id, &file_id)),
            Action::RestoreFile {
                workspace_id,
                folder_id,
                file_id,
            } => DispatchResult::changed(tree.restore_file(&workspace_id, &folder_id, &file_id)),
            _ => DispatchResult::unchanged(),
        }
    }
}
