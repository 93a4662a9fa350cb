use crate::kernel::Action;

use super::super::{DispatchResult, Store};

impl Store {
    pub(in crate::kernel::store) fn reduce_workspace_action(&mut self, action: Action) -> DispatchResult {
        let tree = &mut self.state.tree;
        match action {
            Action::SetWorkspaces { workspaces } => {
                DispatchResult::changed(tree.set_workspaces(workspaces))
            }
            Action::AddWorkspace { workspace } => {
                let id = workspace.id.clone();
                let added = tree.add_workspace(workspace);
                if !added {
                    tracing::debug!(workspace_id = %id, "workspace already present, add skipped");
                }
                DispatchResult::changed(added)
            }
            Action::UpdateWorkspace {
                workspace_id,
                patch,
            } => DispatchResult::changed(tree.update_workspace(&workspace_id, patch)),
            Action::DeleteWorkspace { workspace_id } => {
                DispatchResult::changed(tree.delete_workspace(&workspace_id))
            }
            Action::RestoreWorkspace { workspace_id } => {
                DispatchResult::changed(tree.restore_workspace(&workspace_id))
            }
            _ => DispatchResult::unchanged(),
        }
    }
}
