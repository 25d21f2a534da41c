//! Application state for the server.

use std::sync::Arc;

use qdispatch_adapter_cloud::{CloudBackend, CloudConfig};
use qdispatch_adapter_sim::SimulatorBackend;
use qdispatch_dispatch::{DispatchConfig, Dispatcher};
use qdispatch_hal::BackendRegistry;

/// Shared application state: the dispatcher and everything it owns.
pub struct AppState {
    /// The dispatch engine.
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Build state from configuration: the simulator is always
    /// registered; the cloud backend only when credentials are present.
    pub fn from_config(config: DispatchConfig) -> anyhow::Result<Self> {
        let mut registry = BackendRegistry::with_probe_timeout(config.probe_timeout);
        registry.register(Arc::new(SimulatorBackend::new()));
        tracing::info!("Registered simulator backend");

        if let Some(ref credentials) = config.credentials {
            let cloud = CloudBackend::new(&CloudConfig::new(
                &credentials.endpoint,
                &credentials.token,
            ))?;
            registry.register(Arc::new(cloud));
            tracing::info!("Registered cloud backend at {}", credentials.endpoint);
        } else {
            tracing::info!("No cloud credentials configured; remote dispatch disabled");
        }

        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(registry), config),
        })
    }

    /// Build state around an existing dispatcher. Used by tests to
    /// install scripted registries.
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}
