//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod navigation;

pub use navigation::NavigationService;
