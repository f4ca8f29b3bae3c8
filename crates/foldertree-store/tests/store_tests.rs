use std::fs;

use foldertree_core::{ColorTag, FolderTree, SortOrder, SortScope};
use foldertree_store::{
    DEFAULT_STORE_KEY, FolderStore, JsonFileStore, KeyValueStore, MemoryStore, SNAPSHOT_VERSION,
    Snapshot, StoreConfig, StoreError,
};
use tempfile::TempDir;

fn populated_tree() -> FolderTree {
    let mut tree = FolderTree::new();
    let root = tree.root();
    let docs = tree.create(root, "docs").unwrap();
    let music = tree.create(root, "Music").unwrap();
    let drafts = tree.create(docs, "drafts").unwrap();
    tree.create(docs, "archive").unwrap();
    tree.set_color(music, ColorTag::Purple).unwrap();
    tree.sort_children(SortScope::Folder(docs), SortOrder::NameAscending)
        .unwrap();
    tree.navigate(drafts).unwrap();
    tree
}

#[test]
fn test_file_store_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path().join("store.json"));
    let tree = populated_tree();

    let mut store = FolderStore::from_config(&config);
    store.save(&tree).unwrap();

    let reopened = FolderStore::from_config(&config);
    let loaded = reopened.load().unwrap().unwrap();
    assert_eq!(loaded, tree);
    assert_eq!(loaded.current(), tree.current());

    // Order and tags survive, not just membership.
    let loaded_order: Vec<_> = loaded.ids().collect();
    let original_order: Vec<_> = tree.ids().collect();
    assert_eq!(loaded_order, original_order);
    for folder in tree.iter() {
        let other = loaded.get(folder.id()).unwrap();
        assert_eq!(other.children(), folder.children());
        assert_eq!(other.color_tag(), folder.color_tag());
        assert_eq!(other.name(), folder.name());
    }
}

#[test]
fn test_file_layout_is_key_value() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let mut store = FolderStore::new(JsonFileStore::new(&path));
    store.save(&populated_tree()).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let value = map.get(DEFAULT_STORE_KEY).unwrap().as_str().unwrap();
    let snapshot = Snapshot::from_json(value).unwrap();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert_eq!(snapshot.folders.len(), 5);
}

#[test]
fn test_other_keys_are_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let mut backend = JsonFileStore::new(&path);
    backend.set("theme", "dark".to_string()).unwrap();

    let mut store = FolderStore::new(JsonFileStore::new(&path));
    store.save(&FolderTree::new()).unwrap();

    assert_eq!(backend.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_corrupt_snapshot_is_rejected() {
    let tree = populated_tree();
    let mut snapshot = Snapshot::capture(&tree);
    // Drop a folder that is still referenced by its parent.
    let victim = snapshot
        .folders
        .iter()
        .position(|f| f.name() == "archive")
        .unwrap();
    snapshot.folders.remove(victim);

    let mut backend = MemoryStore::new();
    backend
        .set(DEFAULT_STORE_KEY, snapshot.to_json(false).unwrap())
        .unwrap();
    let store = FolderStore::new(backend);

    assert!(matches!(store.load(), Err(StoreError::Tree(_))));
}

#[test]
fn test_malformed_json_is_rejected() {
    let mut backend = MemoryStore::new();
    backend.set(DEFAULT_STORE_KEY, "{ nope".to_string()).unwrap();
    let store = FolderStore::new(backend);
    assert!(matches!(store.load(), Err(StoreError::Serialize { .. })));
}

#[test]
fn test_custom_key_isolated() {
    let mut store_a = FolderStore::with_key(MemoryStore::new(), "a");
    store_a.save(&populated_tree()).unwrap();
    assert_eq!(store_a.key(), "a");
    assert!(store_a.backend().get(DEFAULT_STORE_KEY).unwrap().is_none());
}
