use super::*;
use crate::kernel::{Route, Store, ViewSelection};
use crate::models::{File, Folder, Workspace};
use serde_json::json;

fn seeded_state() -> AppState {
    let mut workspace = Workspace::new("w1", "u1", "Home", "🏠");
    let mut folder = Folder::new("f1", "w1", "Specs", "📁");
    folder.files.push(File::new("x1", "w1", "f1", "Notes", "📄"));
    workspace.folders.push(folder);
    AppState::new(WorkspaceTree::from_workspaces(vec![workspace]))
}

fn insert(new: serde_json::Value) -> ChangeEvent {
    ChangeEvent {
        event_type: ChangeKind::Insert,
        new: Some(new),
        old: None,
    }
}

fn update(new: serde_json::Value) -> ChangeEvent {
    ChangeEvent {
        event_type: ChangeKind::Update,
        new: Some(new),
        old: None,
    }
}

#[test]
fn test_insert_of_known_id_is_ignored() {
    let state = seeded_state();
    let event = insert(json!({ "id": "f1", "workspace_id": "w1", "title": "Specs" }));
    assert!(reconcile(&state, Table::Folders, &event).is_empty());
}

#[test]
fn test_insert_under_known_parent_adds_with_empty_children() {
    let state = seeded_state();
    let event = insert(json!({
        "id": "f2", "workspace_id": "w1", "title": "Roadmap", "icon_id": "🗺️",
        "in_trash": "", "banner_url": ""
    }));
    let steps = reconcile(&state, Table::Folders, &event);

    let [Step::Apply(Action::AddFolder { workspace_id, folder })] = steps.as_slice() else {
        panic!("unexpected steps: {steps:?}");
    };
    assert_eq!(workspace_id, "w1");
    assert_eq!(folder.id, "f2");
    assert!(folder.files.is_empty());
    assert_eq!(folder.banner_url, None);
}

#[test]
fn test_insert_for_unknown_parent_is_dropped() {
    let state = seeded_state();
    let early_file = insert(json!({ "id": "x9", "workspace_id": "w1", "folder_id": "f9" }));
    assert!(reconcile(&state, Table::Files, &early_file).is_empty());

    let wrong_workspace = insert(json!({ "id": "x9", "workspace_id": "w2", "folder_id": "f1" }));
    assert!(reconcile(&state, Table::Files, &wrong_workspace).is_empty());
}

#[test]
fn test_malformed_payloads_are_dropped() {
    let state = seeded_state();
    let no_new = ChangeEvent {
        event_type: ChangeKind::Insert,
        new: None,
        old: None,
    };
    assert!(reconcile(&state, Table::Workspaces, &no_new).is_empty());

    let bad_shape = update(json!({ "title": 42 }));
    assert!(reconcile(&state, Table::Folders, &bad_shape).is_empty());

    let no_key = ChangeEvent {
        event_type: ChangeKind::Delete,
        new: None,
        old: Some(json!({})),
    };
    assert!(reconcile(&state, Table::Files, &no_key).is_empty());
}

#[test]
fn test_update_carries_only_changed_display_fields() {
    let state = seeded_state();
    let event = update(json!({
        "id": "x1", "workspace_id": "w1", "folder_id": "f1",
        "title": "Meeting notes", "icon_id": "📄", "in_trash": "",
        "banner_url": null, "data": "[{\"type\":\"p\"}]"
    }));
    let steps = reconcile(&state, Table::Files, &event);

    let [Step::Apply(Action::UpdateFile { workspace_id, folder_id, file_id, patch })] =
        steps.as_slice()
    else {
        panic!("unexpected steps: {steps:?}");
    };
    assert_eq!((workspace_id.as_str(), folder_id.as_str(), file_id.as_str()), ("w1", "f1", "x1"));
    assert_eq!(patch.title.as_deref(), Some("Meeting notes"));
    assert_eq!(patch.icon_id, None);
    assert_eq!(patch.in_trash, None);
    assert_eq!(patch.banner_url, None);
    assert_eq!(patch.data, None);
}

#[test]
fn test_update_with_nothing_new_emits_nothing() {
    let state = seeded_state();
    let echo = update(json!({
        "id": "f1", "workspace_id": "w1", "title": "Specs", "icon_id": "📁", "in_trash": null
    }));
    assert!(reconcile(&state, Table::Folders, &echo).is_empty());
}

#[test]
fn test_update_uses_local_parents_not_payload() {
    let state = seeded_state();
    let event = update(json!({
        "id": "f1", "workspace_id": "somewhere-else", "title": "Specs",
        "icon_id": "📁", "in_trash": "Deleted by ana@example.com"
    }));
    let steps = reconcile(&state, Table::Folders, &event);
    let [Step::Apply(Action::UpdateFolder { workspace_id, patch, .. })] = steps.as_slice() else {
        panic!("unexpected steps: {steps:?}");
    };
    assert_eq!(workspace_id, "w1");
    assert_eq!(
        patch.in_trash,
        Some(Some("Deleted by ana@example.com".to_string()))
    );
}

#[test]
fn test_workspace_update_diffs_logo() {
    let state = seeded_state();
    let event = update(json!({
        "id": "w1", "title": "Home", "icon_id": "🏠", "logo": "logos/w1.png",
        "workspace_owner": "u1"
    }));
    let steps = reconcile(&state, Table::Workspaces, &event);
    let [Step::Apply(Action::UpdateWorkspace { patch, .. })] = steps.as_slice() else {
        panic!("unexpected steps: {steps:?}");
    };
    assert_eq!(patch.logo, Some(Some("logos/w1.png".to_string())));
    assert_eq!(patch.title, None);
}

#[test]
fn test_update_for_unknown_entity_is_dropped() {
    let state = seeded_state();
    let event = update(json!({ "id": "x404", "workspace_id": "w1", "folder_id": "f1" }));
    assert!(reconcile(&state, Table::Files, &event).is_empty());
}

#[test]
fn test_delete_of_viewed_folder_navigates_before_deleting() {
    let mut state = seeded_state();
    state.selection = ViewSelection::folder("w1", "f1");

    let steps = reconcile(&state, Table::Folders, &ChangeEvent::delete("f1"));
    assert_eq!(
        steps,
        vec![
            Step::Navigate(Route::Workspace {
                workspace_id: "w1".into()
            }),
            Step::Apply(Action::DeleteFolder {
                workspace_id: "w1".into(),
                folder_id: "f1".into()
            }),
        ]
    );
}

#[test]
fn test_delete_of_folder_while_viewing_its_file_navigates() {
    let mut state = seeded_state();
    state.selection = ViewSelection::file("w1", "f1", "x1");

    let steps = reconcile(&state, Table::Folders, &ChangeEvent::delete("f1"));
    assert!(matches!(steps.first(), Some(Step::Navigate(Route::Workspace { .. }))));
    assert_eq!(steps.len(), 2);
}

#[test]
fn test_delete_of_viewed_workspace_goes_to_dashboard() {
    let mut state = seeded_state();
    state.selection = ViewSelection::file("w1", "f1", "x1");

    let steps = reconcile(&state, Table::Workspaces, &ChangeEvent::delete("w1"));
    assert_eq!(steps.first(), Some(&Step::Navigate(Route::Dashboard)));
}

#[test]
fn test_delete_elsewhere_does_not_navigate() {
    let mut state = seeded_state();
    state.selection = ViewSelection::workspace("w1");

    let steps = reconcile(&state, Table::Files, &ChangeEvent::delete("x1"));
    assert_eq!(
        steps,
        vec![Step::Apply(Action::DeleteFile {
            workspace_id: "w1".into(),
            folder_id: "f1".into(),
            file_id: "x1".into()
        })]
    );
    assert!(reconcile(&state, Table::Files, &ChangeEvent::delete("ghost")).is_empty());
}

#[test]
fn test_reconciled_steps_apply_cleanly() {
    let mut store = Store::new(seeded_state());
    let event = insert(json!({ "id": "x2", "workspace_id": "w1", "folder_id": "f1", "title": "Todo" }));
    for step in reconcile(store.state(), Table::Files, &event) {
        if let Step::Apply(action) = step {
            store.dispatch(action);
        }
    }
    assert!(store.state().tree.file("w1", "f1", "x2").is_some());
    assert!(reconcile(store.state(), Table::Files, &event).is_empty());
}
