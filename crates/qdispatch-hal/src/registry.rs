//! Backend registry.
//!
//! The registry is populated once at process start and is read-only
//! afterwards, except for each entry's `reachable` flag, which is
//! refreshed by [`BackendRegistry::probe`] and written atomically per
//! entry. Registration order is preserved: the strategy selector's
//! tie-break is stability, so `list()` must never reorder entries.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::backend::Backend;
use crate::capability::{BackendDescriptor, BackendId};

struct Entry {
    id: BackendId,
    backend: Arc<dyn Backend>,
    reachable: AtomicBool,
}

/// Registration-ordered collection of execution backends.
pub struct BackendRegistry {
    entries: Vec<Entry>,
    probe_timeout: Duration,
}

impl BackendRegistry {
    /// Create an empty registry with the default 2-second probe timeout.
    pub fn new() -> Self {
        Self::with_probe_timeout(Duration::from_secs(2))
    }

    /// Create an empty registry with a custom probe timeout.
    pub fn with_probe_timeout(probe_timeout: Duration) -> Self {
        Self {
            entries: Vec::new(),
            probe_timeout,
        }
    }

    /// Register a backend. Its name becomes its [`BackendId`].
    ///
    /// Local backends start out reachable; remote backends start out
    /// unreachable until a probe says otherwise.
    pub fn register(&mut self, backend: Arc<dyn Backend>) -> BackendId {
        let id = BackendId::new(backend.name());
        debug!("Registering backend: {}", id);
        let reachable = backend.kind().is_local();
        self.entries.push(Entry {
            id: id.clone(),
            backend,
            reachable: AtomicBool::new(reachable),
        });
        id
    }

    /// Descriptors for all backends, in registration order.
    pub fn list(&self) -> Vec<BackendDescriptor> {
        self.entries
            .iter()
            .map(|e| BackendDescriptor {
                id: e.id.clone(),
                kind: e.backend.kind(),
                capabilities: e.backend.capabilities().clone(),
                reachable: e.reachable.load(Ordering::Acquire),
            })
            .collect()
    }

    /// Look up a backend handle by ID.
    pub fn get(&self, id: &BackendId) -> Option<Arc<dyn Backend>> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| Arc::clone(&e.backend))
    }

    /// Check if a backend is registered.
    pub fn has_backend(&self, id: &BackendId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a bounded liveness probe against one backend and refresh its
    /// `reachable` flag.
    ///
    /// A probe that errors or exceeds the probe timeout marks the backend
    /// unreachable; it never blocks a dispatch for longer than the
    /// configured bound. Unknown IDs report unreachable.
    pub async fn probe(&self, id: &BackendId) -> bool {
        let Some(entry) = self.entries.iter().find(|e| &e.id == id) else {
            return false;
        };

        let reachable =
            match tokio::time::timeout(self.probe_timeout, entry.backend.availability()).await {
                Ok(Ok(avail)) => avail.is_available,
                Ok(Err(e)) => {
                    debug!("Probe of backend {} failed: {}", id, e);
                    false
                }
                Err(_) => {
                    debug!(
                        "Probe of backend {} timed out after {:?}",
                        id, self.probe_timeout
                    );
                    false
                }
            };

        entry.reachable.store(reachable, Ordering::Release);
        reachable
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendAvailability;
    use crate::capability::{BackendKind, Capabilities};
    use crate::error::{HalError, HalResult};
    use crate::job::{JobId, JobStatus};
    use crate::result::ExecutionResult;
    use async_trait::async_trait;
    use qdispatch_circuit::Circuit;

    struct StubBackend {
        name: &'static str,
        kind: BackendKind,
        capabilities: Capabilities,
        available: bool,
    }

    impl StubBackend {
        fn local(name: &'static str) -> Self {
            Self {
                name,
                kind: BackendKind::Local,
                capabilities: Capabilities::simulator(20),
                available: true,
            }
        }

        fn remote(name: &'static str, available: bool) -> Self {
            Self {
                name,
                kind: BackendKind::Remote,
                capabilities: Capabilities::cloud(100, 8192),
                available,
            }
        }
    }

    #[async_trait]
    impl Backend for StubBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }

        async fn availability(&self) -> HalResult<BackendAvailability> {
            if self.available {
                Ok(BackendAvailability::always_available())
            } else {
                Ok(BackendAvailability::unavailable("offline"))
            }
        }

        async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
            Err(HalError::Backend("stub".into()))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            Err(HalError::Backend("stub".into()))
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            Err(HalError::Backend("stub".into()))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.has_backend(&BackendId::from("simulator")));
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(StubBackend::local("zebra")));
        registry.register(Arc::new(StubBackend::local("alpha")));

        let ids: Vec<_> = registry.list().into_iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec!["zebra", "alpha"]);
    }

    #[test]
    fn test_initial_reachability() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(StubBackend::local("simulator")));
        registry.register(Arc::new(StubBackend::remote("cloud", true)));

        let descriptors = registry.list();
        assert!(descriptors[0].reachable);
        assert!(!descriptors[1].reachable);
    }

    #[tokio::test]
    async fn test_probe_refreshes_reachability() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(StubBackend::remote("cloud", true)));

        let id = BackendId::from("cloud");
        assert!(registry.probe(&id).await);
        assert!(registry.list()[0].reachable);
    }

    #[tokio::test]
    async fn test_probe_unavailable_backend() {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(StubBackend::remote("cloud", false)));

        let id = BackendId::from("cloud");
        assert!(!registry.probe(&id).await);
        assert!(!registry.list()[0].reachable);
    }

    #[tokio::test]
    async fn test_probe_unknown_backend() {
        let registry = BackendRegistry::new();
        assert!(!registry.probe(&BackendId::from("nope")).await);
    }
}
