//! Domain entities: item payloads, dated items and date helpers

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::arena::TreeNode;
use crate::domain::error::{DomainError, DomainResult};

/// Default strftime pattern for leaf labels, e.g. `Tue May 01 1923`.
pub const DEFAULT_LEAF_LABEL_FORMAT: &str = "%a %b %d %Y";

/// Kind of a source item in the manifest object model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Collection,
    #[default]
    Manifest,
    Range,
}

impl ItemKind {
    /// Collections and manifests take part in the decade and year passes.
    pub fn is_groupable(self) -> bool {
        matches!(self, ItemKind::Collection | ItemKind::Manifest)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Collection => write!(f, "collection"),
            ItemKind::Manifest => write!(f, "manifest"),
            ItemKind::Range => write!(f, "range"),
        }
    }
}

/// Opaque payload of a source item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub kind: ItemKind,
    /// Free-form item metadata, carried through to the generated leaf
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ItemData {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
        }
    }
}

/// How the navigation tree is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeSortType {
    /// Source tree as-is
    #[default]
    None,
    /// Decade / year / month / date grouping
    Date,
}

impl fmt::Display for TreeSortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSortType::None => write!(f, "none"),
            TreeSortType::Date => write!(f, "date"),
        }
    }
}

impl FromStr for TreeSortType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(TreeSortType::None),
            "date" => Ok(TreeSortType::Date),
            other => Err(DomainError::UnknownSortType(other.to_string())),
        }
    }
}

/// A node that carries a resolved navigation date.
///
/// Only constructible from nodes with a `nav_date`, which makes the
/// "every item has a date" precondition of the build passes hold by type.
#[derive(Debug, Clone, Copy)]
pub struct DatedItem<'a> {
    node: &'a TreeNode,
    date: NaiveDate,
}

impl<'a> DatedItem<'a> {
    pub fn from_node(node: &'a TreeNode) -> Option<Self> {
        node.nav_date.map(|date| Self { node, date })
    }

    pub fn node(&self) -> &'a TreeNode {
        self.node
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Zero-based month (January = 0).
    pub fn month(&self) -> u32 {
        self.date.month0()
    }
}

/// Parse a navigation date.
///
/// Accepts RFC 3339 timestamps (`1923-05-01T00:00:00Z`), naive timestamps
/// (`1923-05-01T00:00:00`) and plain dates (`1923-05-01`).
pub fn parse_nav_date(value: &str) -> DomainResult<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| DomainError::InvalidNavDate {
        value: value.to_string(),
    })
}

/// First year of the decade containing `year` (1923 → 1920, -5 → -10).
pub fn decade_start(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// English month name for a zero-based month.
pub fn month_name(month0: u32) -> Option<&'static str> {
    month0
        .checked_add(1)
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_label_format(format: &str) -> DomainResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DomainError::InvalidLabelFormat(format.to_string()));
    }
    Ok(())
}
