//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::errors::InventoryError;
use crate::icontrol::client::IControlClient;
use crate::icontrol::ApplianceQuery;
use crate::lifecycle::manager::DeviceLifecycleManager;
use crate::query::facade::QueryFacade;
use crate::reconcile::engine::{ReconcileOptions, ReconciliationEngine};
use crate::registry::groups::GroupRegistry;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::store::file::FileStore;
use crate::store::InventoryStore;

/// Shared service wiring for one invocation
pub struct AppState {
    pub registry: Arc<GroupRegistry>,
    pub manager: Arc<DeviceLifecycleManager>,
    pub engine: Arc<ReconciliationEngine>,
    pub facade: Arc<QueryFacade>,
}

impl AppState {
    /// Initialize the production wiring: file-backed store, iControl client
    pub fn init(settings: &Settings, layout: &StorageLayout) -> Result<Self, InventoryError> {
        let store: Arc<dyn InventoryStore> = Arc::new(FileStore::new(layout.inventory_file()));
        let query: Arc<dyn ApplianceQuery> =
            Arc::new(IControlClient::new(&settings.icontrol.client_options())?);
        Ok(Self::with_parts(
            store,
            query,
            settings.icontrol.probe_timeout(),
        ))
    }

    /// Wire the services over caller-supplied collaborators
    pub fn with_parts(
        store: Arc<dyn InventoryStore>,
        query: Arc<dyn ApplianceQuery>,
        probe_timeout: Duration,
    ) -> Self {
        let registry = Arc::new(GroupRegistry::new(store.clone()));
        let manager = Arc::new(DeviceLifecycleManager::new(store.clone(), registry.clone()));
        let engine = Arc::new(ReconciliationEngine::new(
            store.clone(),
            query,
            ReconcileOptions { probe_timeout },
        ));
        let facade = Arc::new(QueryFacade::new(store));

        Self {
            registry,
            manager,
            engine,
            facade,
        }
    }
}
