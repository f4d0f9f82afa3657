//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the asset version token
//! - Build the template store for the configured mode
//! - Assemble the application state
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The version is resolved once here and never changes afterwards

use std::sync::Arc;
use thiserror::Error;

use crate::app::users::UserDirectory;
use crate::config::{InertiaConfig, Mode, ServerConfig};
use crate::http::server::AppState;
use crate::inertia::{Inertia, ScriptInjector, TemplateStore, VersionToken};

/// Users seeded into the in-memory directory.
pub const SEEDED_USERS: usize = 50;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to derive asset version from {path}: {source}")]
    Version {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve the version token: artifact hash if configured, literal otherwise.
pub fn resolve_version(config: &InertiaConfig) -> Result<VersionToken, StartupError> {
    match &config.version_from {
        Some(artifact) => {
            let path = config.root.join(artifact);
            VersionToken::from_artifact(&path)
                .map_err(|source| StartupError::Version { path, source })
        }
        None => Ok(VersionToken::new(config.version.clone())),
    }
}

/// Template store for the configured mode.
pub fn build_templates(config: &InertiaConfig) -> TemplateStore {
    let path = config.template_path();
    match config.mode {
        Mode::Development => TemplateStore::development(
            path,
            Arc::new(ScriptInjector::new(config.dev_scripts.clone())),
        ),
        Mode::Production => TemplateStore::production(path),
    }
}

pub fn build_renderer(config: &InertiaConfig) -> Result<Inertia, StartupError> {
    let version = resolve_version(config)?;
    tracing::info!(
        version = %version,
        mode = ?config.mode,
        template = %config.template_path().display(),
        "Page renderer ready"
    );
    Ok(Inertia::new(version, build_templates(config)).with_mount_id(config.mount_id.clone()))
}

/// Build the full application state from a validated config.
pub fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let inertia = build_renderer(&config.inertia)?;
    Ok(AppState::new(inertia, UserDirectory::seeded(SEEDED_USERS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_version() {
        let config = InertiaConfig::default();
        assert_eq!(resolve_version(&config).unwrap().as_str(), "1.0.0");
    }

    #[test]
    fn test_artifact_version() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("manifest.json"), b"{}").unwrap();

        let config = InertiaConfig {
            root: dir.path().to_path_buf(),
            version_from: Some("manifest.json".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_version(&config).unwrap(),
            VersionToken::from_bytes(b"{}")
        );

        let missing = InertiaConfig {
            version_from: Some("nope.json".into()),
            ..config
        };
        assert!(matches!(
            resolve_version(&missing),
            Err(StartupError::Version { .. })
        ));
    }

    #[test]
    fn test_templates_follow_mode() {
        let dev = build_templates(&InertiaConfig::default());
        assert!(matches!(dev, TemplateStore::Development { .. }));

        let prod = build_templates(&InertiaConfig {
            mode: Mode::Production,
            ..Default::default()
        });
        assert!(matches!(prod, TemplateStore::Production { .. }));
        assert!(prod.path().ends_with("dist/client/index.html"));
    }

    #[test]
    fn test_state_is_seeded() {
        let state = build_state(&ServerConfig::default()).unwrap();
        assert_eq!(state.users.len(), SEEDED_USERS);
        assert_eq!(state.inertia.version().as_str(), "1.0.0");
    }
}
