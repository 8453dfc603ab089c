//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::NavigationService;
use crate::config::Settings;
use crate::infrastructure::loader::ItemLoader;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub loader: ItemLoader,
    pub navigation: NavigationService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let navigation = NavigationService::from_settings(&settings)?;
        let loader = ItemLoader::new(fs);
        let settings = Arc::new(settings);

        Ok(Self {
            settings,
            loader,
            navigation,
        })
    }
}
