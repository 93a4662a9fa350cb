use super::*;
use crate::models::{File, Folder, Workspace};

fn seeded_state() -> AppState {
    let mut workspace = Workspace::new("w1", "u1", "Home", "🏠");
    let mut specs = Folder::new("f1", "w1", "Specs", "📁");
    specs.files.push(File::new("x1", "w1", "f1", "Notes", "📝"));
    let mut archived = File::new("x2", "w1", "f1", "Old", "📄");
    archived.in_trash = Some("Deleted by ana@example.com".into());
    specs.files.push(archived);
    let mut drafts = Folder::new("f2", "w1", "Drafts", "🗂");
    drafts.in_trash = Some("Deleted by ana@example.com".into());
    workspace.folders.push(specs);
    workspace.folders.push(drafts);
    AppState::new(WorkspaceTree::from_workspaces(vec![workspace]))
}

#[test]
fn test_breadcrumb_joins_resolved_segments() {
    let state = seeded_state();
    assert_eq!(
        breadcrumb(&state.tree, &ViewSelection::file("w1", "f1", "x1")),
        "🏠 Home / 📁 Specs / 📝 Notes"
    );
    assert_eq!(
        breadcrumb(&state.tree, &ViewSelection::folder("w1", "f1")),
        "🏠 Home / 📁 Specs"
    );
    assert_eq!(
        breadcrumb(&state.tree, &ViewSelection::file("w1", "f1", "ghost")),
        "🏠 Home / 📁 Specs"
    );
    assert_eq!(breadcrumb(&state.tree, &ViewSelection::none()), "");
}

#[test]
fn test_current_entity_hides_orphans() {
    let state = seeded_state();
    let entity = current_entity(&state.tree, &ViewSelection::file("w1", "f1", "x1")).unwrap();
    assert_eq!(entity.kind, EntityKind::File);
    assert_eq!(entity.title, "Notes");

    assert!(current_entity(&state.tree, &ViewSelection::file("w1", "f9", "x1")).is_none());
    assert!(current_entity(&state.tree, &ViewSelection::file("w9", "f1", "x1")).is_none());
    assert!(current_entity(&state.tree, &ViewSelection::none()).is_none());
}

#[test]
fn test_directory_listing_per_level() {
    let state = seeded_state();

    let dashboard = directory_listing(&state.tree, &ViewSelection::none());
    assert_eq!(dashboard.len(), 1);
    assert_eq!(dashboard[0].kind, EntityKind::Workspace);

    let folders = directory_listing(&state.tree, &ViewSelection::workspace("w1"));
    let flags: Vec<(&str, bool)> = folders.iter().map(|e| (e.id.as_str(), e.trashed)).collect();
    assert_eq!(flags, [("f1", false), ("f2", true)]);

    let files = directory_listing(&state.tree, &ViewSelection::file("w1", "f1", "x1"));
    let ids: Vec<&str> = files.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["x1", "x2"]);
}

#[test]
fn test_trash_listing_collects_folders_and_files() {
    let state = seeded_state();
    let trash = trash_listing(&state.tree, "w1");
    let ids: Vec<(EntityKind, &str)> = trash.iter().map(|e| (e.kind, e.id.as_str())).collect();
    assert_eq!(ids, [(EntityKind::File, "x2"), (EntityKind::Folder, "f2")]);
    assert!(trash_listing(&state.tree, "w9").is_empty());
}

#[test]
fn test_trash_notice_only_for_trashed_entities() {
    let state = seeded_state();
    let drafts = current_entity(&state.tree, &ViewSelection::folder("w1", "f2")).unwrap();
    assert_eq!(
        trash_notice(&drafts).as_deref(),
        Some("This folder is in the trash. Deleted by ana@example.com")
    );

    let mut specs = current_entity(&state.tree, &ViewSelection::folder("w1", "f1")).unwrap();
    assert_eq!(trash_notice(&specs), None);
    specs.in_trash = Some(String::new());
    assert_eq!(trash_notice(&specs), None);
}

#[test]
fn test_save_status_labels() {
    assert_eq!(save_status(0), SaveStatus::Saved);
    assert_eq!(save_status(3), SaveStatus::Saving);
    assert_eq!(SaveStatus::Saving.label(), "Saving...");
    assert_eq!(SaveStatus::Saved.label(), "Saved");
}

#[test]
fn test_view_cache_recomputes_only_on_revision_or_selection_change() {
    let mut state = seeded_state();
    state.selection = ViewSelection::folder("w1", "f1");
    let mut cache = ViewCache::new();

    assert_eq!(cache.get(&state).breadcrumb, "🏠 Home / 📁 Specs");
    cache.get(&state);
    assert_eq!(cache.recomputes(), 1);

    state.selection = ViewSelection::workspace("w1");
    assert_eq!(cache.get(&state).breadcrumb, "🏠 Home");
    assert_eq!(cache.recomputes(), 2);

    state.revision += 1;
    cache.get(&state);
    cache.get(&state);
    assert_eq!(cache.recomputes(), 3);
}
