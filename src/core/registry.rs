//! Wallet Registry - ordered catalogue of supported wallets
//!
//! The catalogue is static configuration: loaded once (usually from JSON),
//! never mutated. Ordering is ascending priority, then installed wallets
//! ahead of uninstalled ones with priority order kept inside each group.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which connection machinery a wallet goes through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WalletFamily {
    /// Delegated to the external EVM connector under this id
    Evm { connector_id: String },
    /// The browser-extension provider injected on `window`
    Injected,
}

impl WalletFamily {
    pub fn is_injected(&self) -> bool {
        matches!(self, WalletFamily::Injected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadLinks {
    pub desktop: String,
    pub mobile: String,
}

impl DownloadLinks {
    pub fn for_platform(&self, platform: Platform) -> &str {
        match platform {
            Platform::Desktop => &self.desktop,
            Platform::Mobile => &self.mobile,
        }
    }
}

/// One supported wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletDescriptor {
    pub id: String,
    pub title: String,
    pub family: WalletFamily,
    #[serde(default)]
    pub installed: bool,
    pub priority: i32,
    #[serde(default)]
    pub download_links: DownloadLinks,
}

impl WalletDescriptor {
    pub fn evm(
        id: impl Into<String>,
        title: impl Into<String>,
        connector_id: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            family: WalletFamily::Evm {
                connector_id: connector_id.into(),
            },
            installed: false,
            priority,
            download_links: DownloadLinks::default(),
        }
    }

    pub fn injected(id: impl Into<String>, title: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            family: WalletFamily::Injected,
            installed: false,
            priority,
            download_links: DownloadLinks::default(),
        }
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    pub fn with_links(mut self, desktop: impl Into<String>, mobile: impl Into<String>) -> Self {
        self.download_links = DownloadLinks {
            desktop: desktop.into(),
            mobile: mobile.into(),
        };
        self
    }

    pub fn download_link(&self, platform: Platform) -> &str {
        self.download_links.for_platform(platform)
    }
}

/// Sorted, immutable wallet catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletRegistry {
    wallets: Vec<WalletDescriptor>,
}

impl WalletRegistry {
    pub fn new(wallets: Vec<WalletDescriptor>) -> Self {
        let mut registry = Self { wallets };
        registry.sort();
        registry
    }

    /// Load a JSON array of descriptors
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let wallets: Vec<WalletDescriptor> = serde_json::from_str(json)?;
        Ok(Self::new(wallets))
    }

    /// Mark injected-family wallets installed iff the provider was detected.
    pub fn with_injected_detection(mut self, detected: bool) -> Self {
        for wallet in self.wallets.iter_mut().filter(|w| w.family.is_injected()) {
            wallet.installed = detected;
        }
        self.sort();
        self
    }

    // Both sorts are stable: the second groups by installed without
    // disturbing priority order inside each group.
    fn sort(&mut self) {
        self.wallets.sort_by_key(|w| w.priority);
        self.wallets.sort_by_key(|w| !w.installed);
    }

    pub fn list(&self) -> &[WalletDescriptor] {
        &self.wallets
    }

    pub fn get(&self, id: &str) -> Option<&WalletDescriptor> {
        self.wallets.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}
