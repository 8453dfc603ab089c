//! navtree: temporal navigation trees for document viewers
//!
//! Groups a flat set of dated items (e.g. periodical issues) into a
//! decade → year → month → date hierarchy.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
