//! Consensus and runtime configuration for **Obscura** core.
//!
//! Difficulty and the block reward are both fixed
//! ([`crate::pow::hash_is_valid`] and [`crate::state::BLOCK_REWARD`] are not
//! parameterised — this pedagogical chain does not retarget), so [`Config`]
//! only centralises the one knob that genuinely varies between deployments:
//! the network label used to tag peers and genesis files. Built via the
//! fluent [`ConfigBuilder`] so callers can override only the fields they
//! care about.
//!
//! ```
//! use obscura_core::config::Config;
//!
//! let cfg = Config::default();
//! assert_eq!(cfg.network, "main");
//! ```

use serde::{Deserialize, Serialize};

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Human-readable name identifying the network (e.g. "main", "test").
    pub network: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "main".into(),
        }
    }
}

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    inner: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Starts a new builder pre-populated with [`Config::default`].
    pub fn new() -> Self {
        Self {
            inner: Config::default(),
        }
    }

    pub fn network<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.network = name.into();
        self
    }

    /// Consumes the builder returning an immutable configuration value.
    pub fn finish(self) -> Config {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new().network("test").finish();
        assert_eq!(cfg.network, "test");
    }
}
