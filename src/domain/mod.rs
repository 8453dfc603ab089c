//! Domain layer: entities and grouping logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod entities;
pub mod error;

pub use arena::{NodeData, TreeArena, TreeNode};
pub use builder::{has_temporal_data, TemporalTreeBuilder};
pub use display::TreeNodeConvert;
pub use entities::*;
pub use error::{DomainError, DomainResult};
