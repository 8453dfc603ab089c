//! Temporal tree builder: groups dated items into decade, year, month and date nodes.
//!
//! The build runs as separate passes. Bucket passes create buckets lazily for the
//! items they see, sort passes order them, and the final prune drops decades that
//! never received a child.

use std::fmt::Write;

use chrono::NaiveDate;
use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{NodeData, TreeArena, TreeNode};
use crate::domain::entities::{
    decade_start, month_name, validate_label_format, DatedItem, ItemKind,
    DEFAULT_LEAF_LABEL_FORMAT,
};
use crate::domain::error::DomainResult;

/// Builds decade / year / month / date navigation trees.
#[derive(Debug, Clone)]
pub struct TemporalTreeBuilder {
    leaf_label_format: String,
}

impl Default for TemporalTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalTreeBuilder {
    pub fn new() -> Self {
        Self {
            leaf_label_format: DEFAULT_LEAF_LABEL_FORMAT.to_string(),
        }
    }

    /// Use a custom strftime pattern for leaf labels.
    pub fn with_leaf_label_format(format: impl Into<String>) -> DomainResult<Self> {
        let format = format.into();
        validate_label_format(&format)?;
        Ok(Self {
            leaf_label_format: format,
        })
    }

    pub fn leaf_label_format(&self) -> &str {
        &self.leaf_label_format
    }

    /// Run the full pipeline over a source tree and return the grouped tree.
    ///
    /// Decade and year buckets come from every dated collection or manifest below
    /// the source root; month buckets and leaves only from dated manifests.
    #[instrument(level = "debug", skip(self, source))]
    pub fn build(&self, source: &TreeArena) -> TreeArena {
        let all: Vec<DatedItem<'_>> = source
            .descendants()
            .filter(|(_, node)| node.data.item().is_some_and(|i| i.kind.is_groupable()))
            .filter_map(|(_, node)| DatedItem::from_node(node))
            .collect();
        let manifests: Vec<DatedItem<'_>> = all
            .iter()
            .copied()
            .filter(|item| {
                item.node()
                    .data
                    .item()
                    .is_some_and(|i| i.kind == ItemKind::Manifest)
            })
            .collect();
        debug!(
            "build: {} dated items, {} dated manifests",
            all.len(),
            manifests.len()
        );

        let mut tree = TreeArena::with_root(TreeNode::root("root"));
        self.build_decade_buckets(&mut tree, &all);
        self.sort_decade_buckets(&mut tree);
        self.build_year_buckets(&mut tree, &all);
        self.sort_year_buckets(&mut tree);
        self.build_month_buckets(&mut tree, &manifests);
        self.sort_month_buckets(&mut tree);
        let placed = self.build_date_leaves(&mut tree, &manifests);
        self.prune_empty_decades(&mut tree);

        if placed < manifests.len() {
            warn!(
                "build: {} of {} dated manifests could not be placed",
                manifests.len() - placed,
                manifests.len()
            );
        }
        tree
    }

    /// Create one decade bucket under the root for every decade an item falls into.
    ///
    /// Returns the number of buckets created.
    #[instrument(level = "debug", skip(self, tree, items))]
    pub fn build_decade_buckets(&self, tree: &mut TreeArena, items: &[DatedItem<'_>]) -> usize {
        let Some(root) = tree.root() else {
            return 0;
        };
        let mut created = 0;
        for item in items {
            let year = item.year();
            if self.find_decade_bucket(tree, year).is_some() {
                continue;
            }
            let start_year = decade_start(year);
            let end_year = start_year + 9;
            let bucket = TreeNode::new(
                format!("{} - {}", start_year, end_year),
                NodeData::Decade {
                    start_year,
                    end_year,
                },
            )
            .with_nav_date(item.date());
            tree.insert_node(bucket, Some(root));
            debug!("decade bucket {}..={}", start_year, end_year);
            created += 1;
        }
        created
    }

    /// Order decade buckets ascending by start year.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn sort_decade_buckets(&self, tree: &mut TreeArena) {
        if let Some(root) = tree.root() {
            tree.sort_children_by_key(root, |node| node.data.decade_range().map(|(start, _)| start));
        }
    }

    /// Create year buckets under the matching decade buckets.
    ///
    /// Items without a decade bucket are skipped.
    #[instrument(level = "debug", skip(self, tree, items))]
    pub fn build_year_buckets(&self, tree: &mut TreeArena, items: &[DatedItem<'_>]) -> usize {
        let mut created = 0;
        for item in items {
            let year = item.year();
            let Some(decade) = self.find_decade_bucket(tree, year) else {
                debug!("no decade bucket for {}, skipping", year);
                continue;
            };
            if self.find_year_bucket(tree, decade, year).is_some() {
                continue;
            }
            let bucket = TreeNode::new(year.to_string(), NodeData::Year { year })
                .with_nav_date(item.date());
            tree.insert_node(bucket, Some(decade));
            debug!("year bucket {}", year);
            created += 1;
        }
        created
    }

    /// Order year buckets ascending within every decade.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn sort_year_buckets(&self, tree: &mut TreeArena) {
        let Some(root) = tree.root() else {
            return;
        };
        for decade in tree.children(root).to_vec() {
            tree.sort_children_by_key(decade, |node| node.data.year());
        }
    }

    /// Create month buckets under the matching year buckets.
    ///
    /// Items whose decade or year bucket is missing are skipped.
    #[instrument(level = "debug", skip(self, tree, items))]
    pub fn build_month_buckets(&self, tree: &mut TreeArena, items: &[DatedItem<'_>]) -> usize {
        let mut created = 0;
        for item in items {
            let (year, month) = (item.year(), item.month());
            let Some(year_bucket) = self
                .find_decade_bucket(tree, year)
                .and_then(|decade| self.find_year_bucket(tree, decade, year))
            else {
                debug!("no year bucket for {}, skipping", year);
                continue;
            };
            if self.find_month_bucket(tree, year_bucket, month).is_some() {
                continue;
            }
            let label = month_name(month).unwrap_or_default();
            let bucket = TreeNode::new(label, NodeData::Month { year, month })
                .with_nav_date(item.date());
            tree.insert_node(bucket, Some(year_bucket));
            debug!("month bucket {} {}", label, year);
            created += 1;
        }
        created
    }

    /// Order month buckets in calendar order within every year.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn sort_month_buckets(&self, tree: &mut TreeArena) {
        let Some(root) = tree.root() else {
            return;
        };
        for decade in tree.children(root).to_vec() {
            for year in tree.children(decade).to_vec() {
                tree.sort_children_by_key(year, |node| node.data.month());
            }
        }
    }

    /// Attach one leaf per item under its month bucket.
    ///
    /// The leaf is a new node copying the item's id and payload; the source item
    /// is left untouched. Items whose bucket chain does not resolve are dropped.
    /// Returns the number of leaves placed.
    #[instrument(level = "debug", skip(self, tree, items))]
    pub fn build_date_leaves(&self, tree: &mut TreeArena, items: &[DatedItem<'_>]) -> usize {
        let mut placed = 0;
        for item in items {
            let (year, month) = (item.year(), item.month());
            let Some(month_bucket) = self
                .find_decade_bucket(tree, year)
                .and_then(|decade| self.find_year_bucket(tree, decade, year))
                .and_then(|year_bucket| self.find_month_bucket(tree, year_bucket, month))
            else {
                debug!("no month bucket for {}-{:02}, dropping leaf", year, month + 1);
                continue;
            };

            let source = item.node();
            let leaf = TreeNode {
                id: source.id.clone(),
                label: self.leaf_label(item.date()),
                nav_date: Some(item.date()),
                data: NodeData::DatedLeaf {
                    item: source.data.item().cloned().unwrap_or_default(),
                    year,
                    month,
                },
                parent: None,
                children: Vec::new(),
            };
            tree.insert_node(leaf, Some(month_bucket));
            placed += 1;
        }
        placed
    }

    /// Remove decade buckets without children. Years and months are left alone.
    ///
    /// Returns the number of decades removed.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn prune_empty_decades(&self, tree: &mut TreeArena) -> usize {
        let Some(root) = tree.root() else {
            return 0;
        };
        let empty: Vec<Index> = tree
            .children(root)
            .iter()
            .copied()
            .filter(|&decade| tree.children(decade).is_empty())
            .collect();
        for &decade in &empty {
            tree.remove_node(decade);
        }
        debug!("pruned {} empty decades", empty.len());
        empty.len()
    }

    /// Decade bucket under the root whose range contains `year`.
    pub fn find_decade_bucket(&self, tree: &TreeArena, year: i32) -> Option<Index> {
        let root = tree.root()?;
        tree.children(root).iter().copied().find(|&idx| {
            tree.get_node(idx)
                .and_then(|node| node.data.decade_range())
                .is_some_and(|(start, end)| start <= year && year <= end)
        })
    }

    /// Year bucket for `year` directly under `decade`.
    pub fn find_year_bucket(&self, tree: &TreeArena, decade: Index, year: i32) -> Option<Index> {
        tree.children(decade).iter().copied().find(|&idx| {
            tree.get_node(idx)
                .is_some_and(|node| matches!(node.data, NodeData::Year { year: y } if y == year))
        })
    }

    /// Month bucket for zero-based `month` directly under `year_bucket`.
    pub fn find_month_bucket(&self, tree: &TreeArena, year_bucket: Index, month: u32) -> Option<Index> {
        tree.children(year_bucket).iter().copied().find(|&idx| {
            tree.get_node(idx).is_some_and(
                |node| matches!(node.data, NodeData::Month { month: m, .. } if m == month),
            )
        })
    }

    fn leaf_label(&self, date: NaiveDate) -> String {
        let mut label = String::new();
        if write!(label, "{}", date.format(&self.leaf_label_format)).is_err() {
            warn!(
                "cannot render leaf label with '{}', using default",
                self.leaf_label_format
            );
            label = date.format(DEFAULT_LEAF_LABEL_FORMAT).to_string();
        }
        label
    }
}

/// Whether any node below the root carries a navigation date.
///
/// Callers use this as the gate for date grouping: without dates the source
/// tree is presented unchanged.
#[instrument(level = "debug", skip(tree))]
pub fn has_temporal_data(tree: &TreeArena) -> bool {
    tree.descendants().any(|(_, node)| node.nav_date.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ItemData;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manifest(id: &str, d: NaiveDate) -> TreeNode {
        TreeNode::item(id, ItemData::new(ItemKind::Manifest))
            .with_id(id)
            .with_nav_date(d)
    }

    fn labels(tree: &TreeArena, idx: Index) -> Vec<String> {
        tree.children(idx)
            .iter()
            .map(|&i| tree.get_node(i).unwrap().label.clone())
            .collect()
    }

    #[test]
    fn test_leaf_label_default_format() {
        let builder = TemporalTreeBuilder::new();
        assert_eq!(builder.leaf_label(date(1923, 5, 1)), "Tue May 01 1923");
    }

    #[test]
    fn test_with_leaf_label_format_rejects_invalid_pattern() {
        assert!(TemporalTreeBuilder::with_leaf_label_format("%Q").is_err());
        let builder = TemporalTreeBuilder::with_leaf_label_format("%Y-%m-%d").unwrap();
        assert_eq!(builder.leaf_label(date(1931, 1, 1)), "1931-01-01");
    }

    #[test]
    fn test_decade_bucket_created_once_per_decade() {
        let builder = TemporalTreeBuilder::new();
        let nodes = [
            manifest("a", date(1923, 5, 1)),
            manifest("b", date(1929, 12, 31)),
            manifest("c", date(1920, 1, 1)),
        ];
        let items: Vec<_> = nodes.iter().filter_map(DatedItem::from_node).collect();
        let mut tree = TreeArena::with_root(TreeNode::root("root"));

        assert_eq!(builder.build_decade_buckets(&mut tree, &items), 1);

        let root = tree.root().unwrap();
        assert_eq!(labels(&tree, root), vec!["1920 - 1929"]);
        let decade = tree.get_node(tree.children(root)[0]).unwrap();
        // nav date comes from the item that triggered the bucket
        assert_eq!(decade.nav_date, Some(date(1923, 5, 1)));
    }

    #[test]
    fn test_month_lookup_requires_year_bucket() {
        let builder = TemporalTreeBuilder::new();
        let decade_nodes = [manifest("a", date(1923, 5, 1))];
        let month_nodes = [manifest("b", date(1924, 2, 1))];
        let decade_items: Vec<_> = decade_nodes.iter().filter_map(DatedItem::from_node).collect();
        let month_items: Vec<_> = month_nodes.iter().filter_map(DatedItem::from_node).collect();
        let mut tree = TreeArena::with_root(TreeNode::root("root"));

        builder.build_decade_buckets(&mut tree, &decade_items);
        builder.build_year_buckets(&mut tree, &decade_items);

        // 1924 shares the decade but has no year bucket
        assert_eq!(builder.build_month_buckets(&mut tree, &month_items), 0);
        assert_eq!(builder.build_date_leaves(&mut tree, &month_items), 0);
    }

    #[test]
    fn test_passes_on_tree_without_root_are_noops() {
        let builder = TemporalTreeBuilder::new();
        let nodes = [manifest("a", date(1923, 5, 1))];
        let items: Vec<_> = nodes.iter().filter_map(DatedItem::from_node).collect();
        let mut tree = TreeArena::new();

        assert_eq!(builder.build_decade_buckets(&mut tree, &items), 0);
        builder.sort_decade_buckets(&mut tree);
        builder.sort_year_buckets(&mut tree);
        builder.sort_month_buckets(&mut tree);
        assert_eq!(builder.prune_empty_decades(&mut tree), 0);
        assert!(tree.is_empty());
    }
}
