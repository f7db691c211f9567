//! Runtime configuration with sensible defaults.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
// (none)

/// Whether the debug-only belonging check ([`crate::classify::Owned`]) is
/// enforced. Defaults on — it catches a whole class of isolation bugs for
/// the cost of one id comparison per moved-value access.
pub const DEFAULT_BELONGING_CHECK: bool = true;

/// Whether `select` shuffles its ready set before picking a winner.
/// Defaults off: plain try-order is simpler to reason about and to test.
pub const DEFAULT_FAIR_SELECT: bool = false;

/// Whether to collect [`crate::monitoring`] events at all. Disabled by
/// default — most callers only want it on while debugging a specific
/// Actor interaction.
pub const DEFAULT_ENABLE_MONITORING: bool = false;

/// Runtime-wide configuration.
///
/// # Examples
///
/// ```rust
/// use ractor_rt::system::SystemConfig;
///
/// let config = SystemConfig::default();
/// assert!(config.belonging_check);
/// assert!(!config.fair_select);
///
/// let config = SystemConfig::builder()
///     .with_fair_select(true)
///     .build()
///     .unwrap();
/// assert!(config.fair_select);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Enforce [`crate::classify::Owned`]'s belonging check on moved
    /// values.
    pub belonging_check: bool,
    /// Shuffle `select`'s ready set before picking a winner (§9).
    pub fair_select: bool,
    /// Collect monitoring events.
    pub enable_monitoring: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            belonging_check: DEFAULT_BELONGING_CHECK,
            fair_select: DEFAULT_FAIR_SELECT,
            enable_monitoring: DEFAULT_ENABLE_MONITORING,
        }
    }
}

impl SystemConfig {
    /// Start building a non-default configuration.
    pub fn builder() -> SystemConfigBuilder {
        SystemConfigBuilder::default()
    }

    /// Validate configuration values. Every combination of these three
    /// booleans is currently valid; this exists so a future flag with
    /// real constraints has somewhere to report them, and so callers can
    /// treat construction the same way regardless.
    pub fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Fluent builder for [`SystemConfig`].
#[derive(Debug, Default)]
pub struct SystemConfigBuilder {
    config: SystemConfig,
}

impl SystemConfigBuilder {
    /// Enable or disable the belonging check.
    pub fn with_belonging_check(mut self, enabled: bool) -> Self {
        self.config.belonging_check = enabled;
        self
    }

    /// Enable or disable fair (shuffled) `select`.
    pub fn with_fair_select(mut self, enabled: bool) -> Self {
        self.config.fair_select = enabled;
        self
    }

    /// Enable or disable monitoring event collection.
    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.config.enable_monitoring = enabled;
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<SystemConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = SystemConfig::default();
        assert!(config.belonging_check);
        assert!(!config.fair_select);
        assert!(!config.enable_monitoring);
    }

    #[test]
    fn builder_overrides_only_what_is_set() {
        let config = SystemConfig::builder().with_fair_select(true).build().unwrap();
        assert!(config.fair_select);
        assert!(config.belonging_check);
    }

    #[test]
    fn config_is_serializable() {
        let config = SystemConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.belonging_check, back.belonging_check);
    }
}
