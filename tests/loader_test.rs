//! Tests for ItemLoader reading listings from disk

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use navtree::application::services::NavigationService;
use navtree::config::Settings;
use navtree::domain::TreeSortType;
use navtree::infrastructure::di::ServiceContainer;
use navtree::infrastructure::loader::ItemLoader;
use navtree::infrastructure::traits::{FileSystem, RealFileSystem};
use navtree::infrastructure::InfraError;

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/listings")
        .join(name)
}

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
}

impl MemoryFileSystem {
    fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

// ============================================================
// RealFileSystem
// ============================================================

#[test]
fn given_listing_resource_when_load_then_items_in_listing_order() {
    let loader = ItemLoader::new(Arc::new(RealFileSystem));

    let tree = loader.load(&resource("gazette.toml")).unwrap();

    let labels: Vec<_> = tree.iter().map(|(_, n)| n.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["The Gazette", "No. 412", "No. 187", "No. 1", "Undated supplement"]
    );
    let dated = tree.descendants().filter(|(_, n)| n.nav_date.is_some()).count();
    assert_eq!(dated, 3);
}

#[test]
fn given_listing_resource_when_grouped_then_decades_ascending() {
    let loader = ItemLoader::new(Arc::new(RealFileSystem));
    let source = loader.load(&resource("gazette.toml")).unwrap();

    let tree = NavigationService::default().sorted_tree(source, TreeSortType::Date);

    let root = tree.root().unwrap();
    let decades: Vec<_> = tree
        .children(root)
        .iter()
        .map(|&i| tree.get_node(i).unwrap().label.clone())
        .collect();
    assert_eq!(decades, vec!["1920 - 1929", "1930 - 1939"]);
    // undated supplement is not placed
    assert_eq!(tree.iter().filter(|(_, n)| n.data.is_dated_leaf()).count(), 3);
}

#[test]
fn given_directory_when_load_then_listing_error() {
    let temp = TempDir::new().unwrap();
    let loader = ItemLoader::new(Arc::new(RealFileSystem));

    let result = loader.load(temp.path());

    assert!(matches!(result, Err(InfraError::Listing { .. })));
}

#[test]
fn given_written_listing_when_load_then_parsed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("letters.toml");
    fs::write(
        &path,
        "label = \"Letters\"\n\n[[nodes]]\nid = \"l1\"\nnav_date = \"1850-03-03\"\n",
    )
    .unwrap();
    let loader = ItemLoader::new(Arc::new(RealFileSystem));

    let tree = loader.load(&path).unwrap();

    assert_eq!(tree.len(), 2);
    let (_, letter) = tree.descendants().next().unwrap();
    assert_eq!(letter.label, "l1");
}

// ============================================================
// Injected FileSystem
// ============================================================

#[test]
fn given_memory_fs_when_container_loads_then_uses_injected_fs() {
    let fs = MemoryFileSystem::default().with_file(
        "/virtual/gazette.toml",
        "[[nodes]]\nid = \"a\"\nnav_date = \"1923-05-01\"\n",
    );
    let container = ServiceContainer::with_deps(Settings::default(), Arc::new(fs)).unwrap();

    let source = container.loader.load(Path::new("/virtual/gazette.toml")).unwrap();
    let tree = container.navigation.sorted_tree(source, TreeSortType::Date);

    assert_eq!(tree.leaf_nodes(), vec!["Tue May 01 1923"]);
}

#[test]
fn given_memory_fs_without_file_when_load_then_listing_error() {
    let loader = ItemLoader::new(Arc::new(MemoryFileSystem::default()));

    let result = loader.load(Path::new("/virtual/missing.toml"));

    assert!(matches!(result, Err(InfraError::Listing { .. })));
}

#[test]
fn given_invalid_label_format_in_settings_when_building_container_then_error() {
    let settings = Settings {
        leaf_label_format: "%Q".to_string(),
        ..Settings::default()
    };

    let result = ServiceContainer::with_deps(settings, Arc::new(MemoryFileSystem::default()));

    assert!(matches!(result, Err(InfraError::Application(_))));
}
