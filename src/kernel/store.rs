use crate::models::WorkspaceTree;

use super::commands::{Planner, UserCommand};
use super::{Action, AppState, Effect, Step, ViewSelection};

mod reducers {
    mod files;
    mod folders;
    mod workspaces;
}

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }

    fn merge(&mut self, other: DispatchResult) {
        self.state_changed |= other.state_changed;
        self.effects.extend(other.effects);
    }
}

/// Sole owner of the application state. Every mutation goes through
/// [`Store::dispatch`], which runs to completion without I/O.
pub struct Store {
    state: AppState,
    planner: Planner,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self::with_planner(state, Planner::default())
    }

    pub fn with_planner(state: AppState, planner: Planner) -> Self {
        Self { state, planner }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let name = action.name();
        let counts_as_revision = !matches!(action, Action::RunCommand(_));

        let result = match action {
            Action::SetWorkspaces { .. }
            | Action::AddWorkspace { .. }
            | Action::UpdateWorkspace { .. }
            | Action::DeleteWorkspace { .. }
            | Action::RestoreWorkspace { .. } => self.reduce_workspace_action(action),
            Action::SetFolders { .. }
            | Action::AddFolder { .. }
            | Action::UpdateFolder { .. }
            | Action::DeleteFolder { .. }
            | Action::RestoreFolder { .. } => self.reduce_folder_action(action),
            Action::SetFiles { .. }
            | Action::AddFile { .. }
            | Action::UpdateFile { .. }
            | Action::DeleteFile { .. }
            | Action::RestoreFile { .. } => self.reduce_file_action(action),
            Action::SelectView(selection) => self.select_view(selection),
            Action::RunCommand(command) => self.run_command(command),
        };

        if result.state_changed && counts_as_revision {
            self.state.revision = self.state.revision.wrapping_add(1);
        }
        tracing::trace!(
            action = name,
            changed = result.state_changed,
            revision = self.state.revision,
            "dispatch"
        );
        result
    }

    fn select_view(&mut self, selection: ViewSelection) -> DispatchResult {
        if self.state.selection == selection {
            return DispatchResult::unchanged();
        }

        let prev = std::mem::replace(&mut self.state.selection, selection);
        let next = &self.state.selection;
        let mut effects = Vec::new();

        if let Some(workspace_id) = next.workspace_id.as_ref() {
            let workspace_changed = prev.workspace_id.as_ref() != Some(workspace_id);
            if workspace_changed {
                effects.push(Effect::LoadFolders {
                    workspace_id: workspace_id.clone(),
                });
            }
            if let Some(folder_id) = next.folder_id.as_ref() {
                if workspace_changed || prev.folder_id.as_ref() != Some(folder_id) {
                    effects.push(Effect::LoadFiles {
                        workspace_id: workspace_id.clone(),
                        folder_id: folder_id.clone(),
                    });
                }
            }
        }

        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    /// Plans `command` against the current state and applies it in place.
    /// Navigation and persistence come back as effects, in plan order.
    fn run_command(&mut self, command: UserCommand) -> DispatchResult {
        let steps = self.planner.plan(&self.state, command);
        let mut result = DispatchResult::unchanged();
        for step in steps {
            match step {
                Step::Navigate(route) => {
                    let selection = route.selection();
                    result.effects.push(Effect::Navigate(route));
                    result.merge(self.dispatch(Action::SelectView(selection)));
                }
                Step::Apply(action) => result.merge(self.dispatch(action)),
                Step::Persist(request) => result.effects.push(Effect::Persist(request)),
            }
        }
        result
    }
}

/// Pure form of the reducer: consumes a tree and an intent, returns the next
/// tree. Effects are discarded.
pub fn reduce(tree: WorkspaceTree, action: Action) -> WorkspaceTree {
    let mut store = Store::new(AppState::new(tree));
    let _ = store.dispatch(action);
    store.into_state().tree
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
