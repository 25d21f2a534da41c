//! Execution strategy selector.
//!
//! Decides, deterministically, which backends a dispatch should attempt
//! and in what order. The caller (the orchestrator) refreshes remote
//! reachability before invoking this, so selection itself is a pure
//! function of its inputs.

use tracing::debug;

use qdispatch_circuit::Circuit;
use qdispatch_hal::{BackendDescriptor, BackendId, BackendKind};

use crate::config::{ChannelPreference, DispatchConfig};

/// Compute the ordered list of backends to attempt for a circuit.
///
/// Policy:
/// - A local backend is eligible when the circuit fits its `max_qubits`.
/// - A remote backend is eligible only when credentials are configured,
///   its last probe reported reachable, and the circuit fits.
/// - Eligible backends are grouped by preference class
///   ([`ChannelPreference`]); registration order is preserved within each
///   class, so the result is stable across calls with equal inputs.
/// - An explicit `override_backend` is moved to the front when it is
///   eligible; an ineligible override is ignored.
///
/// An empty result means no backend can accept the circuit; the caller
/// must report a capacity error and create no job.
pub fn select_order(
    circuit: &Circuit,
    backends: &[BackendDescriptor],
    config: &DispatchConfig,
    override_backend: Option<&BackendId>,
) -> Vec<BackendId> {
    let mut locals = Vec::new();
    let mut remotes = Vec::new();

    for descriptor in backends {
        if !descriptor.capabilities.accepts_qubits(circuit.num_qubits()) {
            debug!(
                "Backend {} skipped: circuit needs {} qubits, limit is {}",
                descriptor.id,
                circuit.num_qubits(),
                descriptor.capabilities.max_qubits
            );
            continue;
        }

        match descriptor.kind {
            BackendKind::Local => locals.push(descriptor.id.clone()),
            BackendKind::Remote => {
                if !config.has_credentials() {
                    debug!("Backend {} skipped: no credentials configured", descriptor.id);
                    continue;
                }
                if !descriptor.reachable {
                    debug!("Backend {} skipped: unreachable", descriptor.id);
                    continue;
                }
                remotes.push(descriptor.id.clone());
            }
        }
    }

    let mut order = match config.preference {
        ChannelPreference::PreferLocal => {
            locals.extend(remotes);
            locals
        }
        ChannelPreference::PreferRemote => {
            remotes.extend(locals);
            remotes
        }
    };

    if let Some(wanted) = override_backend {
        if let Some(pos) = order.iter().position(|id| id == wanted) {
            let pinned = order.remove(pos);
            order.insert(0, pinned);
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudCredentials;
    use qdispatch_hal::Capabilities;

    fn local(id: &str, max_qubits: u32) -> BackendDescriptor {
        BackendDescriptor {
            id: BackendId::from(id),
            kind: BackendKind::Local,
            capabilities: Capabilities::simulator(max_qubits),
            reachable: true,
        }
    }

    fn remote(id: &str, max_qubits: u32, reachable: bool) -> BackendDescriptor {
        BackendDescriptor {
            id: BackendId::from(id),
            kind: BackendKind::Remote,
            capabilities: Capabilities::cloud(max_qubits, 8192),
            reachable,
        }
    }

    fn with_credentials() -> DispatchConfig {
        DispatchConfig {
            credentials: Some(CloudCredentials {
                endpoint: "https://api.example.com".into(),
                token: "token".into(),
            }),
            ..DispatchConfig::default()
        }
    }

    fn ids(order: &[BackendId]) -> Vec<&str> {
        order.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_local_first_remote_appended() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];

        let order = select_order(&circuit, &backends, &with_credentials(), None);
        assert_eq!(ids(&order), vec!["simulator", "cloud"]);
    }

    #[test]
    fn test_remote_excluded_without_credentials() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];

        let order = select_order(&circuit, &backends, &DispatchConfig::default(), None);
        assert_eq!(ids(&order), vec!["simulator"]);
    }

    #[test]
    fn test_unreachable_remote_excluded() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, false)];

        let order = select_order(&circuit, &backends, &with_credentials(), None);
        assert_eq!(ids(&order), vec!["simulator"]);
    }

    #[test]
    fn test_oversized_circuit_yields_empty_order() {
        let circuit = Circuit::ghz(200, 100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];

        let order = select_order(&circuit, &backends, &with_credentials(), None);
        assert!(order.is_empty());
    }

    #[test]
    fn test_large_circuit_skips_local_only() {
        let circuit = Circuit::ghz(50, 100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];

        let order = select_order(&circuit, &backends, &with_credentials(), None);
        assert_eq!(ids(&order), vec!["cloud"]);
    }

    #[test]
    fn test_registration_order_stable_within_class() {
        let circuit = Circuit::bell(100);
        let backends = [
            local("sim-b", 24),
            local("sim-a", 24),
            remote("cloud-b", 100, true),
            remote("cloud-a", 100, true),
        ];

        let order = select_order(&circuit, &backends, &with_credentials(), None);
        assert_eq!(ids(&order), vec!["sim-b", "sim-a", "cloud-b", "cloud-a"]);
    }

    #[test]
    fn test_prefer_remote_puts_cloud_first() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];
        let config = DispatchConfig {
            preference: ChannelPreference::PreferRemote,
            ..with_credentials()
        };

        let order = select_order(&circuit, &backends, &config, None);
        assert_eq!(ids(&order), vec!["cloud", "simulator"]);
    }

    #[test]
    fn test_override_pins_eligible_backend() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];
        let wanted = BackendId::from("cloud");

        let order = select_order(&circuit, &backends, &with_credentials(), Some(&wanted));
        assert_eq!(ids(&order), vec!["cloud", "simulator"]);
    }

    #[test]
    fn test_ineligible_override_ignored() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, false)];
        let wanted = BackendId::from("cloud");

        let order = select_order(&circuit, &backends, &with_credentials(), Some(&wanted));
        assert_eq!(ids(&order), vec!["simulator"]);
    }

    #[test]
    fn test_deterministic() {
        let circuit = Circuit::bell(100);
        let backends = [local("simulator", 24), remote("cloud", 100, true)];
        let config = with_credentials();

        let first = select_order(&circuit, &backends, &config, None);
        let second = select_order(&circuit, &backends, &config, None);
        assert_eq!(first, second);
    }
}
