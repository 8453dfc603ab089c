//! Arena-backed navigation tree

use std::fmt;

use chrono::NaiveDate;
use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::ItemData;

/// Payload of a tree node.
///
/// Source trees hold `Root` and `Item` nodes. Trees produced by the
/// temporal builder hold `Root`, the three bucket kinds and `DatedLeaf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root,
    Item(ItemData),
    /// Inclusive year range, always exactly one decade
    Decade { start_year: i32, end_year: i32 },
    Year { year: i32 },
    /// `month` is zero-based
    Month { year: i32, month: u32 },
    /// A source item promoted to a leaf under its month bucket
    DatedLeaf { item: ItemData, year: i32, month: u32 },
}

impl NodeData {
    pub fn decade_range(&self) -> Option<(i32, i32)> {
        match self {
            NodeData::Decade {
                start_year,
                end_year,
            } => Some((*start_year, *end_year)),
            _ => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            NodeData::Year { year }
            | NodeData::Month { year, .. }
            | NodeData::DatedLeaf { year, .. } => Some(*year),
            _ => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            NodeData::Month { month, .. } | NodeData::DatedLeaf { month, .. } => Some(*month),
            _ => None,
        }
    }

    /// The source item payload, for item and leaf nodes.
    pub fn item(&self) -> Option<&ItemData> {
        match self {
            NodeData::Item(item) | NodeData::DatedLeaf { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn is_dated_leaf(&self) -> bool {
        matches!(self, NodeData::DatedLeaf { .. })
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Root => write!(f, "root"),
            NodeData::Item(item) => write!(f, "{}", item.kind),
            NodeData::Decade {
                start_year,
                end_year,
            } => write!(f, "decade {}..={}", start_year, end_year),
            NodeData::Year { year } => write!(f, "year {}", year),
            NodeData::Month { year, month } => write!(f, "month {}-{:02}", year, month + 1),
            NodeData::DatedLeaf { year, month, .. } => {
                write!(f, "dated-leaf {}-{:02}", year, month + 1)
            }
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Opaque identifier, propagated from source item to generated leaf
    pub id: Option<String>,
    /// Display string
    pub label: String,
    /// Date used for ordering and bucket matching
    pub nav_date: Option<NaiveDate>,
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root node
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in presentation order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: None,
            label: label.into(),
            nav_date: None,
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn root(label: impl Into<String>) -> Self {
        Self::new(label, NodeData::Root)
    }

    pub fn item(label: impl Into<String>, item: ItemData) -> Self {
        Self::new(label, NodeData::Item(item))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_nav_date(mut self, date: NaiveDate) -> Self {
        self.nav_date = Some(date);
        self
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Arena-based tree structure.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node has exactly one parent, so the structure is acyclic by construction.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Create a tree holding only the given root node.
    pub fn with_root(root: TreeNode) -> Self {
        let mut tree = Self::new();
        tree.insert_node(root, None);
        tree
    }

    /// Insert a node and append it to the parent's child list.
    ///
    /// Without a parent the node becomes the root.
    #[instrument(level = "trace", skip(self, node), fields(label = %node.label))]
    pub fn insert_node(&mut self, mut node: TreeNode, parent: Option<Index>) -> Index {
        node.parent = parent;
        node.children.clear();
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Detach a node from its parent and drop it together with its subtree.
    ///
    /// Returns the removed node, or None for a stale index.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_node(&mut self, idx: Index) -> Option<TreeNode> {
        let parent = self.arena.get(idx)?.parent;
        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.retain(|&child| child != idx);
                }
            }
            None => {
                if self.root == Some(idx) {
                    self.root = None;
                }
            }
        }

        let mut stack = vec![idx];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children.iter().copied());
                if current == idx {
                    removed = Some(node);
                }
            }
        }
        removed
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Ordered child list of a node; empty for stale indices.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Stable-sort the children of `idx` ascending by `key`.
    #[instrument(level = "trace", skip(self, key))]
    pub fn sort_children_by_key<K, F>(&mut self, idx: Index, mut key: F)
    where
        K: Ord,
        F: FnMut(&TreeNode) -> K,
    {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        let mut children = node.children.clone();
        let arena = &self.arena;
        children.sort_by_key(|&child| arena.get(child).map(&mut key));

        if let Some(node) = self.arena.get_mut(idx) {
            node.children = children;
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// All nodes below the root, in pre-order.
    pub fn descendants(&self) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        let root = self.root;
        self.iter().filter(move |(idx, _)| Some(*idx) != root)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Labels of all leaf nodes (nodes with no children), left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.label.clone())
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
