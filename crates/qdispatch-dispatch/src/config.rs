//! Process-wide dispatch configuration.
//!
//! Built once at startup and treated as read-only for the lifetime of the
//! process. Credential-bearing client state is carried here explicitly
//! and threaded into the components that need it; there are no implicit
//! global sessions.

use std::time::Duration;

/// Default hard ceiling on circuit width, enforced during validation.
///
/// This guards the parse path, not any particular backend: a request this
/// wide is rejected before a backend or job exists. Individual backends
/// enforce their own (much smaller) limits via capabilities.
pub const DEFAULT_QUBIT_CEILING: u32 = 512;

/// Default interval between remote status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default total wait budget for a remote job.
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(300);

/// Default bound on a liveness probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Which channel to try first when both are eligible.
///
/// The upstream policy is "primarily local, cloud only if configured and
/// accessible"; the precedence itself is a knob rather than a fixed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPreference {
    /// Local backends first, remote as fallback.
    #[default]
    PreferLocal,
    /// Eligible remote backends first, local as fallback.
    PreferRemote,
}

/// Credentials for the remote cloud service.
#[derive(Clone)]
pub struct CloudCredentials {
    /// API endpoint URL.
    pub endpoint: String,
    /// API token.
    pub token: String,
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Configuration consumed by the dispatch engine.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Hard ceiling on circuit width, checked during validation.
    pub qubit_ceiling: u32,
    /// Channel precedence when both local and remote are eligible.
    pub preference: ChannelPreference,
    /// Cloud credentials; `None` disables remote dispatch entirely.
    pub credentials: Option<CloudCredentials>,
    /// Interval between remote status polls.
    pub poll_interval: Duration,
    /// Total wait budget for one remote job.
    pub wait_budget: Duration,
    /// Bound on a single liveness probe.
    pub probe_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            qubit_ceiling: DEFAULT_QUBIT_CEILING,
            preference: ChannelPreference::default(),
            credentials: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_budget: DEFAULT_WAIT_BUDGET,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl DispatchConfig {
    /// Build configuration from the process environment.
    ///
    /// Reads `QDISPATCH_CLOUD_TOKEN` / `QDISPATCH_CLOUD_ENDPOINT` (both
    /// must be present and non-empty for remote dispatch to be enabled),
    /// `QDISPATCH_PREFER` (`local` | `remote`),
    /// `QDISPATCH_POLL_INTERVAL_MS`, and `QDISPATCH_WAIT_BUDGET_SECS`.
    /// Anything absent or malformed falls back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let token = std::env::var("QDISPATCH_CLOUD_TOKEN").unwrap_or_default();
        let endpoint = std::env::var("QDISPATCH_CLOUD_ENDPOINT").unwrap_or_default();
        if !token.is_empty() && !endpoint.is_empty() {
            config.credentials = Some(CloudCredentials { endpoint, token });
        }

        if let Ok(pref) = std::env::var("QDISPATCH_PREFER") {
            if pref.eq_ignore_ascii_case("remote") {
                config.preference = ChannelPreference::PreferRemote;
            }
        }

        if let Some(ms) = env_u64("QDISPATCH_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64("QDISPATCH_WAIT_BUDGET_SECS") {
            config.wait_budget = Duration::from_secs(secs);
        }

        config
    }

    /// Whether cloud credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
