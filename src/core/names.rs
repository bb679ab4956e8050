//! Name constants for browser globals and provider events
//!
//! Centralized so the browser bindings and the in-memory provider agree on
//! the vocabulary.

/// Injected provider globals on `window`
pub mod global {
    pub const PHANTOM: &str = "phantom";
    pub const SOLANA: &str = "solana";
}

/// Provider event names
pub mod event {
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
    pub const ACCOUNT_CHANGED: &str = "accountChanged";

    pub const ALL: &[&str] = &[CONNECT, DISCONNECT, ACCOUNT_CHANGED];
}

/// Injected provider connect options
pub mod connect_opts {
    pub const ONLY_IF_TRUSTED: &str = "onlyIfTrusted";
    pub const PUBLIC_KEY: &str = "publicKey";
}

/// EIP-1193 "user rejected request" error code
pub const USER_REJECTED_CODE: f64 = 4001.0;
