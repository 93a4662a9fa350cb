use super::*;

fn folder(ws: &str, id: &str) -> Folder {
    Folder::new(id, ws, id.to_uppercase(), "📁")
}

fn file(ws: &str, folder: &str, id: &str) -> File {
    File::new(id, ws, folder, id.to_uppercase(), "📄")
}

fn tree_with(ws: &str, folders: &[&str]) -> WorkspaceTree {
    let mut tree = WorkspaceTree::new();
    tree.add_workspace(Workspace::new(ws, "owner", "Home", "🏠"));
    for id in folders {
        tree.add_folder(ws, folder(ws, id));
    }
    tree
}

fn folder_ids(tree: &WorkspaceTree, ws: &str) -> Vec<String> {
    tree.workspace(ws)
        .map(|w| w.folders.iter().map(|f| f.id.clone()).collect())
        .unwrap_or_default()
}

fn file_ids(tree: &WorkspaceTree, ws: &str, folder: &str) -> Vec<String> {
    tree.folder(ws, folder)
        .map(|f| f.files.iter().map(|x| x.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_add_folder_is_idempotent() {
    let mut tree = tree_with("w1", &["f1"]);
    let once = tree.clone();

    assert!(!tree.add_folder("w1", folder("w1", "f1")));
    assert_eq!(tree, once);
}

#[test]
fn test_add_folder_rejects_id_used_in_another_workspace() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_workspace(Workspace::new("w2", "owner", "Other", "🏢"));

    assert!(!tree.add_folder("w2", folder("w2", "f1")));
    assert!(tree.folder("w2", "f1").is_none());
    assert_eq!(tree.counts().folders, 1);
}

#[test]
fn test_add_under_missing_parent_is_noop() {
    let mut tree = tree_with("w1", &["f1"]);
    assert!(!tree.add_folder("nope", folder("nope", "f2")));
    assert!(!tree.add_file("w1", "missing", file("w1", "missing", "x1")));
    assert_eq!(tree.counts().folders, 1);
    assert_eq!(tree.counts().files, 0);
}

#[test]
fn test_add_rewrites_back_references() {
    let mut tree = tree_with("w1", &["f1"]);
    let mut stray = file("elsewhere", "other", "x1");
    stray.title = "Notes".into();
    assert!(tree.add_file("w1", "f1", stray));

    let stored = tree.file("w1", "f1", "x1").unwrap();
    assert_eq!(stored.workspace_id, "w1");
    assert_eq!(stored.folder_id, "f1");
}

#[test]
fn test_delete_folder_cascades_files() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_file("w1", "f1", file("w1", "f1", "x1"));
    tree.add_file("w1", "f1", file("w1", "f1", "x2"));

    assert!(tree.delete_folder("w1", "f1"));
    assert!(tree.find_folder("f1").is_none());
    assert!(tree.find_file("x1").is_none());
    assert!(tree.find_file("x2").is_none());
}

#[test]
fn test_update_before_insert_is_noop() {
    let mut tree = tree_with("w1", &[]);
    let patch = FolderPatch {
        title: Some("Renamed".into()),
        ..FolderPatch::default()
    };
    assert!(!tree.update_folder("w1", "f9", patch));
    assert!(tree.find_folder("f9").is_none());
}

#[test]
fn test_update_merges_only_given_fields() {
    let mut tree = tree_with("w1", &["f1"]);
    let patch = FolderPatch {
        banner_url: Some(Some("banner.png".into())),
        ..FolderPatch::default()
    };
    assert!(tree.update_folder("w1", "f1", patch));

    let f1 = tree.folder("w1", "f1").unwrap();
    assert_eq!(f1.title, "F1");
    assert_eq!(f1.banner_url.as_deref(), Some("banner.png"));

    let same = FolderPatch {
        title: Some("F1".into()),
        ..FolderPatch::default()
    };
    assert!(!tree.update_folder("w1", "f1", same));
}

#[test]
fn test_add_file_appends_and_set_files_reorders() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_file("w1", "f1", file("w1", "f1", "a"));
    tree.add_file("w1", "f1", file("w1", "f1", "b"));
    tree.add_file("w1", "f1", file("w1", "f1", "c"));
    assert_eq!(file_ids(&tree, "w1", "f1"), ["a", "b", "c"]);

    let reordered = vec![
        file("w1", "f1", "c"),
        file("w1", "f1", "a"),
        file("w1", "f1", "b"),
    ];
    assert!(tree.set_files("w1", "f1", reordered));
    assert_eq!(file_ids(&tree, "w1", "f1"), ["c", "a", "b"]);
}

#[test]
fn test_trash_then_restore_keeps_position_and_fields() {
    let mut tree = tree_with("w1", &["f1", "f2", "f3"]);
    let original = tree.folder("w1", "f2").unwrap().clone();

    let trash = FolderPatch {
        in_trash: Some(Some("Deleted by ana@example.com".into())),
        ..FolderPatch::default()
    };
    assert!(tree.update_folder("w1", "f2", trash));
    assert!(tree.folder("w1", "f2").unwrap().is_trashed());

    assert!(tree.restore_folder("w1", "f2"));
    let restored = tree.folder("w1", "f2").unwrap();
    assert_eq!(restored.in_trash.as_deref(), Some(""));
    assert_eq!(restored.title, original.title);
    assert_eq!(restored.icon_id, original.icon_id);
    assert_eq!(folder_ids(&tree, "w1"), ["f1", "f2", "f3"]);

    assert!(!tree.restore_folder("w1", "f2"));
}

#[test]
fn test_delete_is_terminal() {
    let mut tree = tree_with("w1", &["f1"]);
    assert!(tree.delete_folder("w1", "f1"));
    assert!(!tree.delete_folder("w1", "f1"));
    assert!(!tree.restore_folder("w1", "f1"));
    assert!(tree.find_folder("f1").is_none());
}

#[test]
fn test_scenario_add_file_then_delete_folder() {
    let mut tree = tree_with("w1", &["f1"]);
    assert!(tree.folder("w1", "f1").unwrap().files.is_empty());

    assert!(tree.add_file("w1", "f1", file("w1", "f1", "x1")));
    assert_eq!(file_ids(&tree, "w1", "f1"), ["x1"]);

    assert!(tree.delete_folder("w1", "f1"));
    assert!(tree.workspace("w1").unwrap().folders.is_empty());
    assert_eq!(tree.counts().files, 0);
}

#[test]
fn test_set_folders_keeps_loaded_files() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_file("w1", "f1", file("w1", "f1", "x1"));

    let mut fresh = folder("w1", "f1");
    fresh.title = "Renamed".into();
    assert!(tree.set_folders("w1", vec![folder("w1", "f0"), fresh]));

    assert_eq!(folder_ids(&tree, "w1"), ["f0", "f1"]);
    let f1 = tree.folder("w1", "f1").unwrap();
    assert_eq!(f1.title, "Renamed");
    assert_eq!(file_ids(&tree, "w1", "f1"), ["x1"]);
}

#[test]
fn test_set_folders_drops_stale_siblings_with_their_files() {
    let mut tree = tree_with("w1", &["f1", "stale"]);
    tree.add_file("w1", "stale", file("w1", "stale", "x_stale"));

    assert!(tree.set_folders("w1", vec![folder("w1", "f1")]));
    assert_eq!(folder_ids(&tree, "w1"), ["f1"]);
    assert!(tree.find_file("x_stale").is_none());
}

#[test]
fn test_set_files_replaces_the_collection() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_file("w1", "f1", file("w1", "f1", "a"));
    tree.add_file("w1", "f1", file("w1", "f1", "gone"));

    assert!(tree.set_files("w1", "f1", vec![file("w1", "f1", "a")]));
    assert_eq!(file_ids(&tree, "w1", "f1"), ["a"]);
}

#[test]
fn test_set_workspaces_drops_workspaces_missing_from_listing() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_workspace(Workspace::new("w2", "owner", "Old", "🏚"));

    assert!(tree.set_workspaces(vec![Workspace::new("w1", "owner", "Home", "🏠")]));
    assert!(tree.workspace("w2").is_none());
    assert_eq!(folder_ids(&tree, "w1"), ["f1"]);
}

#[test]
fn test_set_folders_drops_duplicates_and_foreign_ids() {
    let mut tree = tree_with("w1", &[]);
    tree.add_workspace(Workspace::new("w2", "owner", "Other", "🏢"));
    tree.add_folder("w2", folder("w2", "taken"));

    tree.set_folders(
        "w1",
        vec![folder("w1", "a"), folder("w1", "a"), folder("w1", "taken")],
    );
    assert_eq!(folder_ids(&tree, "w1"), ["a"]);
    assert_eq!(folder_ids(&tree, "w2"), ["taken"]);
}

#[test]
fn test_set_workspaces_is_noop_when_identical() {
    let mut tree = tree_with("w1", &["f1"]);
    let incoming = vec![Workspace::new("w1", "owner", "Home", "🏠")];
    assert!(!tree.set_workspaces(incoming));
    assert_eq!(folder_ids(&tree, "w1"), ["f1"]);
}

#[test]
fn test_resolves_checks_the_full_chain() {
    let mut tree = tree_with("w1", &["f1"]);
    tree.add_file("w1", "f1", file("w1", "f1", "x1"));

    assert!(tree.resolves(&EntityRef::file("w1", "f1", "x1")));
    assert!(!tree.resolves(&EntityRef::file("w1", "f2", "x1")));
    assert!(!tree.resolves(&EntityRef::folder("w2", "f1")));
    assert!(tree.find_file("x1").is_some());
}

#[test]
fn test_delete_workspace_removes_subtree() {
    let mut tree = tree_with("w1", &["f1", "f2"]);
    tree.add_file("w1", "f2", file("w1", "f2", "x1"));
    assert!(tree.delete_workspace("w1"));
    assert!(tree.is_empty());
    assert_eq!(tree.counts(), TreeCounts::default());
}
