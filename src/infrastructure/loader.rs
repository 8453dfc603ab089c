//! Item listing loader
//!
//! Reads a TOML item listing into a source tree:
//!
//! ```toml
//! label = "The Gazette"
//!
//! [[nodes]]
//! id = "https://example.org/iiif/gazette/1923-05-01"
//! label = "Issue 1"
//! type = "manifest"
//! nav_date = "1923-05-01T00:00:00Z"
//!
//! [nodes.properties]
//! publisher = "Gazette Ltd"
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use generational_arena::Index;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::domain::{parse_nav_date, ItemData, ItemKind, TreeArena, TreeNode};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Deserialize)]
struct ItemListing {
    #[serde(default = "default_root_label")]
    label: String,
    #[serde(default)]
    nodes: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    id: Option<String>,
    label: Option<String>,
    #[serde(rename = "type", default)]
    kind: ItemKind,
    nav_date: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    #[serde(default)]
    nodes: Vec<ItemRecord>,
}

fn default_root_label() -> String {
    "root".to_string()
}

impl ItemRecord {
    fn to_node(&self) -> TreeNode {
        let label = self
            .label
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_default();
        let nav_date = self
            .nav_date
            .as_deref()
            .and_then(|value| match parse_nav_date(value) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!("{} ({}): {}", label, self.kind, e);
                    None
                }
            });

        TreeNode {
            id: self.id.clone(),
            nav_date,
            ..TreeNode::item(
                label,
                ItemData {
                    kind: self.kind,
                    properties: self.properties.clone(),
                },
            )
        }
    }
}

/// Loads item listings from disk.
pub struct ItemLoader {
    fs: Arc<dyn FileSystem>,
}

impl ItemLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse an item listing file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> InfraResult<TreeArena> {
        if !self.fs.is_file(path) {
            return Err(InfraError::Listing {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        Self::parse(&content, path)
    }

    /// Parse listing content; `path` is only used for error context.
    pub fn parse(content: &str, path: &Path) -> InfraResult<TreeArena> {
        let listing: ItemListing = toml::from_str(content).map_err(|e| InfraError::Listing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut tree = TreeArena::with_root(TreeNode::root(listing.label.as_str()));
        let Some(root) = tree.root() else {
            return Ok(tree);
        };

        // Children are pushed in reverse so siblings keep their listing order.
        let mut stack: Vec<(&ItemRecord, Index)> =
            listing.nodes.iter().rev().map(|record| (record, root)).collect();
        while let Some((record, parent)) = stack.pop() {
            let idx = tree.insert_node(record.to_node(), Some(parent));
            stack.extend(record.nodes.iter().rev().map(|child| (child, idx)));
        }

        debug!("loaded {} nodes from {}", tree.len(), path.display());
        Ok(tree)
    }
}
