//! Navigation tree service
//!
//! Decides how a source tree is presented: unchanged, or grouped by
//! navigation date into decades, years, months and dates.

use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{has_temporal_data, TemporalTreeBuilder, TreeArena, TreeSortType};

/// Service producing navigation trees for a viewer.
#[derive(Debug, Clone, Default)]
pub struct NavigationService {
    builder: TemporalTreeBuilder,
}

impl NavigationService {
    pub fn new(builder: TemporalTreeBuilder) -> Self {
        Self { builder }
    }

    /// Create a service using the leaf label format from settings.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let builder = TemporalTreeBuilder::with_leaf_label_format(&settings.leaf_label_format)?;
        Ok(Self::new(builder))
    }

    /// Whether the source tree can be grouped by date at all.
    pub fn has_temporal_data(&self, source: &TreeArena) -> bool {
        has_temporal_data(source)
    }

    /// Present `source` according to `sort`.
    ///
    /// `Date` groups by navigation date when any node below the root has one;
    /// otherwise, and for `None`, the source tree is returned unchanged.
    /// Every call performs a full rebuild.
    #[instrument(level = "debug", skip(self, source))]
    pub fn sorted_tree(&self, source: TreeArena, sort: TreeSortType) -> TreeArena {
        match sort {
            TreeSortType::Date if self.has_temporal_data(&source) => {
                let tree = self.builder.build(&source);
                info!(
                    "grouped {} source nodes into {} navigation nodes",
                    source.len(),
                    tree.len()
                );
                tree
            }
            TreeSortType::Date => {
                debug!("no navigation dates, keeping source tree");
                source
            }
            TreeSortType::None => source,
        }
    }
}
