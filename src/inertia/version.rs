//! Asset version token.
//!
//! The token is fixed for the lifetime of the process. Clients send back the
//! token they were served; a mismatch on a protocol GET forces a full reload.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Number of hex characters kept from an artifact digest.
const DIGEST_PREFIX_LEN: usize = 16;

/// Opaque identifier of the deployed client bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(Arc<str>);

impl VersionToken {
    /// Create a token from a literal string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    /// Derive a token from the contents of a build artifact.
    ///
    /// The token is the first 16 hex characters of the SHA-256 digest, so a
    /// rebuild that changes the artifact yields a new token.
    pub fn from_artifact(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Derive a token from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let digest = hex::encode(Sha256::digest(bytes));
        Self::new(&digest[..DIGEST_PREFIX_LEN])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the client-supplied version matches this token.
    pub fn matches(&self, client: Option<&str>) -> bool {
        client == Some(self.as_str())
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
