use super::*;
use serde_json::json;

#[test]
fn test_change_event_uses_wire_field_names() {
    let raw = json!({
        "eventType": "INSERT",
        "new": { "id": "f1", "workspace_id": "w1", "title": "Specs", "icon_id": "📁" },
        "old": {}
    });
    let event: ChangeEvent = serde_json::from_value(raw).unwrap();
    assert_eq!(event.event_type, ChangeKind::Insert);

    let row: FolderRow = event.new_row().unwrap();
    assert_eq!(row.workspace_id, "w1");
    assert_eq!(row.in_trash, None);
}

#[test]
fn test_row_without_parent_column_does_not_decode() {
    let event = ChangeEvent {
        event_type: ChangeKind::Insert,
        new: Some(json!({ "id": "x1", "title": "Orphan" })),
        old: None,
    };
    assert!(event.new_row::<FileRow>().is_none());
}

#[test]
fn test_delete_carries_only_the_key() {
    let event = ChangeEvent::delete("x1");
    assert!(event.new.is_none());
    assert_eq!(event.old_key(), Some(RowKey { id: "x1".into() }));

    let empty_old = ChangeEvent {
        event_type: ChangeKind::Delete,
        new: None,
        old: Some(json!({})),
    };
    assert!(empty_old.old_key().is_none());
}

#[test]
fn test_empty_banner_and_logo_become_none() {
    let row = WorkspaceRow {
        id: "w1".into(),
        created_at: "2024-01-01T00:00:00Z".into(),
        title: "Home".into(),
        icon_id: "🏠".into(),
        data: None,
        in_trash: Some(String::new()),
        banner_url: Some(String::new()),
        logo: Some(String::new()),
        workspace_owner: "u1".into(),
    };
    let workspace = Workspace::from(row);
    assert_eq!(workspace.owner_id, "u1");
    assert_eq!(workspace.banner_url, None);
    assert_eq!(workspace.logo, None);
    assert_eq!(workspace.in_trash.as_deref(), Some(""));
    assert!(workspace.folders.is_empty());
}

#[test]
fn test_update_event_keys_old_record_by_id() {
    let file = File::new("x1", "w1", "f1", "Notes", "📄");
    let event = ChangeEvent::update(&FileRow::from(&file));
    assert_eq!(event.event_type, ChangeKind::Update);
    assert_eq!(event.old_key().map(|k| k.id), Some("x1".to_string()));

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["eventType"], "UPDATE");
    assert_eq!(value["new"]["folder_id"], "f1");
}

#[test]
fn test_table_channels() {
    assert_eq!(Table::Workspaces.channel(), "db-changes-workspace");
    assert_eq!(Table::Folders.channel(), "db-changes-folders");
    assert_eq!(Table::Files.to_string(), "files");
    let parsed: Table = serde_json::from_str("\"folders\"").unwrap();
    assert_eq!(parsed, Table::Folders);
}
