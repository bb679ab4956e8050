//! Wallet connection session
//!
//! # State machine
//!
//! ```text
//!            request_connect            provider `connect` event / login ok
//!   Idle ─────────────────────→ Connecting(family) ─────────────────────→ Connected(family, address)
//!    ▲                                  │                                        │
//!    │      failure (prior state kept)  │                                        │
//!    ├──────────────────────────────────┘                                        │
//!    └────────────────────── `disconnect` event / logout ────────────────────────┘
//! ```
//!
//! Uninstalled wallets never leave `Idle`: the request opens the download
//! link instead.

mod controller;
mod store;

pub use controller::{ConnectOutcome, SessionController};
pub use store::{Action, AppState, Store, WalletType};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    Evm,
    Injected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting(FamilyKind),
    Connected {
        family: FamilyKind,
        address: Option<String>,
        since: DateTime<Utc>,
    },
}

impl SessionState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, SessionState::Connecting(_))
    }

    /// Family being connected or already connected
    pub fn family(&self) -> Option<FamilyKind> {
        match self {
            SessionState::Idle => None,
            SessionState::Connecting(family) => Some(*family),
            SessionState::Connected { family, .. } => Some(*family),
        }
    }

    pub fn connected_family(&self) -> Option<FamilyKind> {
        match self {
            SessionState::Connected { family, .. } => Some(*family),
            _ => None,
        }
    }

    /// Flattened view of the state
    pub fn session(&self) -> Session {
        match self {
            SessionState::Idle => Session::default(),
            SessionState::Connecting(family) => Session {
                active_family: Some(*family),
                ..Session::default()
            },
            SessionState::Connected { family, address, since } => Session {
                active_family: Some(*family),
                address: address.clone(),
                is_connected: true,
                connected_at: Some(*since),
            },
        }
    }
}

/// What the rest of the app sees of the session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    pub active_family: Option<FamilyKind>,
    pub address: Option<String>,
    pub is_connected: bool,
    pub connected_at: Option<DateTime<Utc>>,
}
