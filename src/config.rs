//! Session configuration - passed from the host application

use serde::{Deserialize, Serialize};

use crate::core::registry::Platform;
use crate::error::ConfigError;

pub const DEFAULT_STORAGE_KEY: &str = "wallet";
pub const DEFAULT_COLLAPSED_COUNT: usize = 4;
pub const DEFAULT_EXPANDED_COUNT: usize = 20;
pub const DEFAULT_NARROW_BUTTON_PX: u32 = 480;
pub const DEFAULT_NARROW_BADGE_PX: u32 = 768;

const ENV_CHAIN_ID: &str = "WALLETLINK_CHAIN_ID";
const ENV_EAGER_RECONNECT: &str = "WALLETLINK_EAGER_RECONNECT";

/// Connection session configuration. Higher layers construct this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectConfig {
    /// Chain the EVM connector switches to before login
    pub chain_id: u64,
    /// Key under which the last EVM connector id is persisted
    pub storage_key: String,
    /// Wallets shown by the picker before "More"
    pub collapsed_count: usize,
    /// Wallets shown by the picker after "More"
    pub expanded_count: usize,
    /// Attempt a silent injected-provider reconnect at mount
    pub eager_reconnect: bool,
    /// Selects mobile or desktop download links
    pub platform: Platform,
    pub narrow_button_px: u32,
    pub narrow_badge_px: u32,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            storage_key: DEFAULT_STORAGE_KEY.into(),
            collapsed_count: DEFAULT_COLLAPSED_COUNT,
            expanded_count: DEFAULT_EXPANDED_COUNT,
            eager_reconnect: true,
            platform: Platform::Desktop,
            narrow_button_px: DEFAULT_NARROW_BUTTON_PX,
            narrow_badge_px: DEFAULT_NARROW_BADGE_PX,
        }
    }
}

impl ConnectConfig {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_eager_reconnect(mut self, enabled: bool) -> Self {
        self.eager_reconnect = enabled;
        self
    }

    pub fn with_picker_counts(mut self, collapsed: usize, expanded: usize) -> Self {
        self.collapsed_count = collapsed;
        self.expanded_count = expanded;
        self
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by `WALLETLINK_CHAIN_ID` and `WALLETLINK_EAGER_RECONNECT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENV_CHAIN_ID) {
            config.chain_id = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_CHAIN_ID,
                value: value.clone(),
            })?;
        }
        if let Ok(value) = std::env::var(ENV_EAGER_RECONNECT) {
            config.eager_reconnect = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                _ => return Err(ConfigError::InvalidEnv { var: ENV_EAGER_RECONNECT, value }),
            };
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ConnectConfig::from_json(r#"{"chain_id": 56, "platform": "mobile"}"#).unwrap();
        assert_eq!(config.chain_id, 56);
        assert_eq!(config.platform, Platform::Mobile);
        assert_eq!(config.storage_key, "wallet");
        assert_eq!(config.collapsed_count, 4);
        assert_eq!(config.expanded_count, 20);
        assert!(config.eager_reconnect);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(ConnectConfig::from_json("{chain"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        std::env::set_var(ENV_CHAIN_ID, "137");
        std::env::set_var(ENV_EAGER_RECONNECT, "off");
        let config = ConnectConfig::from_env().unwrap();
        assert_eq!(config.chain_id, 137);
        assert!(!config.eager_reconnect);

        std::env::set_var(ENV_CHAIN_ID, "polygon");
        let err = ConnectConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_CHAIN_ID));

        std::env::remove_var(ENV_CHAIN_ID);
        std::env::remove_var(ENV_EAGER_RECONNECT);
    }
}
