//! Configuration for the beacon fetcher.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::{Figment, Provider};
use serde::{Deserialize, Serialize};

/// Configuration for talking to an L1 beacon node.
///
/// Layered the way the rest of the toolchain layers configuration: compiled
/// defaults, then an optional TOML file, then environment variables
/// (`OP_DERIVE_*`), each overriding the last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Base URL of the beacon node's HTTP API.
    pub beacon_url: String,
    /// Blob indices requested when none are specified per call. `None` means
    /// "every sidecar for the slot".
    pub default_blob_indices: Option<Vec<u64>>,
}

impl BeaconConfig {
    /// Builds a config pointed at `beacon_url` with no default blob index
    /// restriction.
    pub fn new(beacon_url: impl Into<String>) -> Self {
        Self {
            beacon_url: beacon_url.into(),
            default_blob_indices: None,
        }
    }

    /// Sets the blob indices requested per call when the caller doesn't
    /// specify any.
    pub fn with_default_blob_indices(mut self, indices: Vec<u64>) -> Self {
        self.default_blob_indices = Some(indices);
        self
    }

    /// Loads configuration by layering compiled defaults, an optional TOML
    /// file at `config_path`, and `OP_DERIVE_`-prefixed environment
    /// variables over the caller-supplied `overrides`.
    pub fn load(
        config_path: &std::path::Path,
        overrides: impl Provider,
    ) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::new("http://localhost:5052")))
            .merge(Toml::file(config_path).nested())
            .merge(Env::prefixed("OP_DERIVE_"))
            .merge(overrides)
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_default_blob_indices_sets_the_field() {
        let config = BeaconConfig::new("http://example.com").with_default_blob_indices(vec![0, 1]);
        assert_eq!(config.default_blob_indices, Some(vec![0, 1]));
    }

    #[test]
    fn new_leaves_blob_indices_unset() {
        let config = BeaconConfig::new("http://example.com");
        assert_eq!(config.beacon_url, "http://example.com");
        assert!(config.default_blob_indices.is_none());
    }
}
