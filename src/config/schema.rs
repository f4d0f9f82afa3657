//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Page protocol settings (mode, template, version).
    pub inertia: InertiaConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// How the HTML template is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Template read on every request and passed through the transform hook.
    #[default]
    Development,
    /// Build artifact read once and cached.
    Production,
}

/// Page protocol configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InertiaConfig {
    pub mode: Mode,

    /// Project root; relative paths below resolve against it.
    pub root: PathBuf,

    /// Template read in development mode.
    pub dev_template: PathBuf,

    /// Built template read once in production mode.
    pub build_template: PathBuf,

    /// Built static assets served in production mode.
    pub assets_dir: PathBuf,

    /// URL prefix the assets are served under.
    pub assets_path: String,

    /// Literal asset version.
    pub version: String,

    /// Derive the version from the hash of this artifact instead.
    pub version_from: Option<PathBuf>,

    /// Id of the element the page object is attached to.
    pub mount_id: String,

    /// Module scripts injected into the development template.
    pub dev_scripts: Vec<String>,
}

impl InertiaConfig {
    /// Template path for the configured mode, resolved against `root`.
    pub fn template_path(&self) -> PathBuf {
        match self.mode {
            Mode::Development => self.root.join(&self.dev_template),
            Mode::Production => self.root.join(&self.build_template),
        }
    }

    pub fn assets_path_on_disk(&self) -> PathBuf {
        self.root.join(&self.assets_dir)
    }
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Development,
            root: PathBuf::from("."),
            dev_template: PathBuf::from("index.html"),
            build_template: PathBuf::from("dist/client/index.html"),
            assets_dir: PathBuf::from("dist/client/assets"),
            assets_path: "/assets".to_string(),
            version: "1.0.0".to_string(),
            version_from: None,
            mount_id: "app".to_string(),
            dev_scripts: Vec::new(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
