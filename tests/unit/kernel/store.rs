use super::*;
use crate::kernel::{PersistRequest, Route};
use crate::models::{EntityRef, File, Folder, FolderPatch, Workspace};

fn new_store() -> Store {
    let mut workspace = Workspace::new("w1", "u1", "Home", "🏠");
    workspace.folders.push(Folder::new("f1", "w1", "Specs", "📁"));
    Store::new(AppState::new(WorkspaceTree::from_workspaces(vec![workspace])))
}

#[test]
fn test_revision_bumps_only_on_change() {
    let mut store = new_store();
    let file = File::new("x1", "w1", "f1", "Notes", "📄");

    let first = store.dispatch(Action::AddFile {
        workspace_id: "w1".into(),
        folder_id: "f1".into(),
        file: file.clone(),
    });
    assert!(first.state_changed);
    assert_eq!(store.state().revision, 1);

    let replay = store.dispatch(Action::AddFile {
        workspace_id: "w1".into(),
        folder_id: "f1".into(),
        file,
    });
    assert!(!replay.state_changed);
    assert_eq!(store.state().revision, 1);
}

#[test]
fn test_reduce_returns_input_for_inapplicable_intents() {
    let store = new_store();
    let tree = store.state().tree.clone();

    let next = reduce(
        tree.clone(),
        Action::UpdateFolder {
            workspace_id: "w1".into(),
            folder_id: "ghost".into(),
            patch: FolderPatch {
                title: Some("Nope".into()),
                ..FolderPatch::default()
            },
        },
    );
    assert_eq!(next, tree);

    let next = reduce(
        tree.clone(),
        Action::DeleteFile {
            workspace_id: "w1".into(),
            folder_id: "f1".into(),
            file_id: "ghost".into(),
        },
    );
    assert_eq!(next, tree);
}

#[test]
fn test_select_view_requests_hydration() {
    let mut store = new_store();

    let result = store.dispatch(Action::SelectView(ViewSelection::folder("w1", "f1")));
    assert!(result.state_changed);
    assert_eq!(
        result.effects,
        vec![
            Effect::LoadFolders {
                workspace_id: "w1".into()
            },
            Effect::LoadFiles {
                workspace_id: "w1".into(),
                folder_id: "f1".into()
            },
        ]
    );

    let same = store.dispatch(Action::SelectView(ViewSelection::folder("w1", "f1")));
    assert!(!same.state_changed);
    assert!(same.effects.is_empty());

    let up = store.dispatch(Action::SelectView(ViewSelection::workspace("w1")));
    assert!(up.state_changed);
    assert!(up.effects.is_empty());
}

#[test]
fn test_run_command_applies_optimistically_and_returns_persist_effect() {
    let mut store = new_store();

    let result = store.dispatch(Action::RunCommand(UserCommand::CreateFolder {
        workspace_id: "w1".into(),
        title: Some("Roadmap".into()),
    }));
    assert!(result.state_changed);

    let folders = &store.state().tree.workspace("w1").unwrap().folders;
    assert_eq!(folders.len(), 2);
    let created = &folders[1];
    assert_eq!(created.title, "Roadmap");

    match result.effects.as_slice() {
        [Effect::Persist(PersistRequest::CreateFolder(folder))] => assert_eq!(folder, created),
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn test_run_command_delete_of_viewed_folder_navigates_first() {
    let mut store = new_store();
    store.dispatch(Action::SelectView(ViewSelection::folder("w1", "f1")));

    let result = store.dispatch(Action::RunCommand(UserCommand::Delete {
        target: EntityRef::folder("w1", "f1"),
    }));

    assert_eq!(
        result.effects.first(),
        Some(&Effect::Navigate(Route::Workspace {
            workspace_id: "w1".into()
        }))
    );
    assert_eq!(
        result.effects.last(),
        Some(&Effect::Persist(PersistRequest::DeleteFolder { id: "f1".into() }))
    );
    assert_eq!(store.state().selection, ViewSelection::workspace("w1"));
    assert!(store.state().tree.find_folder("f1").is_none());
}

#[test]
fn test_restore_workspace_action() {
    let mut store = new_store();
    store.dispatch(Action::UpdateWorkspace {
        workspace_id: "w1".into(),
        patch: crate::models::WorkspacePatch {
            in_trash: Some(Some("Deleted by u1".into())),
            ..Default::default()
        },
    });
    let result = store.dispatch(Action::RestoreWorkspace {
        workspace_id: "w1".into(),
    });
    assert!(result.state_changed);
    assert_eq!(
        store.state().tree.workspace("w1").unwrap().in_trash.as_deref(),
        Some("")
    );
}
