//! Execution timing policy.
//!
//! Whether an invocation is bracketed by timing logs is decided per request
//! from its `Host` header. The explicit `timing.enabled` flag switches timing
//! off everywhere; otherwise requests addressed to a suppressed host (the
//! managed platform, which records its own execution timing) go unlogged.

use std::fmt;
use std::sync::Arc;

use crate::config::TimingConfig;

/// Host of the managed serverless platform.
pub const MANAGED_PLATFORM_HOST: &str = "cloudfunctions.net";

/// Decides whether timing logs are emitted for a request.
pub trait TimingPolicy: Send + Sync + fmt::Debug {
    /// `host` is the request's `Host` value, if any.
    fn timing_enabled(&self, host: Option<&str>) -> bool;
}

/// Same answer for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTiming(pub bool);

impl TimingPolicy for StaticTiming {
    fn timing_enabled(&self, _host: Option<&str>) -> bool {
        self.0
    }
}

/// Disables timing for requests whose host exactly equals a suppressed host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSuppression {
    suppressed_hosts: Vec<String>,
}

impl HostSuppression {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suppressed_hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Suppresses only the managed platform host.
    pub fn managed_platform() -> Self {
        Self::new([MANAGED_PLATFORM_HOST])
    }
}

impl Default for HostSuppression {
    fn default() -> Self {
        Self::managed_platform()
    }
}

impl TimingPolicy for HostSuppression {
    fn timing_enabled(&self, host: Option<&str>) -> bool {
        match host {
            Some(host) => !self.suppressed_hosts.iter().any(|h| h == host),
            None => true,
        }
    }
}

/// Build the policy described by configuration.
pub fn policy_from_config(config: &TimingConfig) -> Arc<dyn TimingPolicy> {
    if config.enabled {
        Arc::new(HostSuppression::new(config.suppressed_hosts.iter().cloned()))
    } else {
        Arc::new(StaticTiming(false))
    }
}
