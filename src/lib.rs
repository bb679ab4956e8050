//! Walletlink: wallet connection sessions for web apps.
//!
//! # Architecture
//!
//! ```text
//! View (button / badge / picker) ◄── reads ── Store (wallet type, addresses, prompt)
//!                                                ▲
//!                                                │ dispatch
//! user action ──► SessionController ─────────────┘
//!                   │
//!                   ├── WalletRegistry (sorted catalogue)
//!                   ├── InjectedAdapter ──► InjectedProvider (window.solana)
//!                   │        └── events: connect / disconnect / accountChanged
//!                   ├── EvmConnector (external library: switch network, login, logout)
//!                   ├── KeyValueStorage ("wallet" → last connector id)
//!                   └── Navigator (download links for uninstalled wallets)
//! ```
//!
//! # Features
//!
//! - `native` - `tracing-subscriber` logging setup, file-backed storage
//! - `wasm` - browser bindings (`window.solana`, `localStorage`, `window.open`)
//!   and the JS-facing `WalletSession`
//!
//! # Usage
//!
//! ```ignore
//! use walletlink::{ConnectConfig, SessionController, WalletRegistry};
//!
//! let controller = SessionController::new(config, registry, connector, storage, navigator)
//!     .with_provider(provider);
//! controller.eager_reconnect().await;
//! match controller.request_connect_by_id("phantom").await {
//!     Ok(outcome) => { /* Redirected, Requested or Connected */ }
//!     Err(e) => { /* show e to the user */ }
//! }
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod config;
pub mod core;
pub mod error;
pub mod memory;
pub mod provider;
pub mod session;
pub mod view;

// =============================================================================
// Native-only modules
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod native;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use config::ConnectConfig;
pub use crate::core::{truncate_address, Platform, WalletDescriptor, WalletFamily, WalletRegistry};
pub use error::{ConfigError, ConnectError, ProviderError, StorageError};
pub use provider::{
    detect, EvmConnector, InjectedAdapter, InjectedProvider, KeyValueStorage, Navigator,
    ProviderEvent, ProviderHandle, ProviderProbe,
};
pub use session::{
    AppState, ConnectOutcome, FamilyKind, Session, SessionController, SessionState, WalletType,
};
pub use view::{AccountBadge, ConnectButtonView, Viewport, WalletPicker};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use native::FileStorage;

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(feature = "wasm")]
pub use wasm::WalletSession;
