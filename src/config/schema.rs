//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Listen port used when neither the arguments nor the environment name one.
pub const DEFAULT_PORT: &str = "8080";

/// Runtime configuration for the service.
///
/// Built once at startup from the process arguments and environment, then
/// never mutated. The coordinator owns it and hands references to the server
/// constructor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// TCP port the HTTP listener binds to.
    pub port: String,

    /// Verbose logging. Set by the lifecycle coordinator from the raw
    /// arguments; the argument parser itself never sees the flag.
    pub verbose: bool,

    /// Network-facing timeout policy.
    pub timeouts: TimeoutConfig,
}

impl Config {
    /// Address the HTTP listener binds to, on all interfaces.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            verbose: false,
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Fixed timeout policy applied to the HTTP listener.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Budget for reading and handling a request, in seconds.
    pub read_secs: u64,

    /// Budget for writing a response, in seconds.
    pub write_secs: u64,

    /// Keep-alive idle timeout, in seconds.
    pub idle_secs: u64,
}

impl TimeoutConfig {
    /// Request read/handling budget.
    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    /// Response write budget.
    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write_secs)
    }

    /// Keep-alive idle budget.
    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 15,
            write_secs: 15,
            idle_secs: 60,
        }
    }
}
