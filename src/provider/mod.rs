//! Provider boundary - everything the session talks to but does not own
//!
//! # Architecture
//!
//! ```text
//! SessionController
//!     │
//!     ├── InjectedAdapter ──→ dyn InjectedProvider   (window.solana / MemoryProvider)
//!     │        └── Subscription (scoped, unregisters on drop)
//!     ├── dyn EvmConnector                           (external connector library)
//!     ├── dyn KeyValueStorage                        (localStorage / file / memory)
//!     └── dyn Navigator                              (window.open)
//! ```
//!
//! Browser objects are `!Send`, so the async traits are `?Send` and handles
//! are `Rc`.

mod adapter;

pub use adapter::{detect, InjectedAdapter, Subscription};

use async_trait::async_trait;
use futures::channel::mpsc;
use std::rc::Rc;

use crate::core::names::event;
use crate::error::{ProviderError, StorageError};

/// Lifecycle events emitted by an injected provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Connect(String),
    Disconnect,
    AccountChanged(Option<String>),
}

impl ProviderEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEvent::Connect(_) => event::CONNECT,
            ProviderEvent::Disconnect => event::DISCONNECT,
            ProviderEvent::AccountChanged(_) => event::ACCOUNT_CHANGED,
        }
    }
}

pub type EventSink = mpsc::UnboundedSender<ProviderEvent>;
pub type EventStream = mpsc::UnboundedReceiver<ProviderEvent>;

/// Identifies one registration made with `InjectedProvider::listen`
pub type ListenerId = u64;

/// Externally-owned injected wallet object
#[async_trait(?Send)]
pub trait InjectedProvider {
    /// Capability marker used by detection
    fn is_phantom(&self) -> bool;

    /// Request authorization. With `trusted_only` the provider must not
    /// prompt and fails unless the page was trusted before.
    async fn connect(&self, trusted_only: bool) -> Result<String, ProviderError>;

    async fn disconnect(&self) -> Result<(), ProviderError>;

    /// Forward all three event kinds into `sink`
    fn listen(&self, sink: EventSink) -> ListenerId;

    fn unlisten(&self, id: ListenerId);
}

pub type ProviderHandle = Rc<dyn InjectedProvider>;

/// Looks for an injected provider in the environment (e.g. `window`)
pub trait ProviderProbe {
    fn probe(&self) -> Option<ProviderHandle>;
}

/// The external EVM connector library, treated as a black box
#[async_trait(?Send)]
pub trait EvmConnector {
    async fn switch_network(&self, chain_id: u64) -> Result<(), ProviderError>;
    async fn login(&self, connector_id: &str, chain_id: u64) -> Result<(), ProviderError>;
    async fn logout(&self) -> Result<(), ProviderError>;
    /// Currently connected EVM account, if any
    fn account(&self) -> Option<String>;
}

/// Browser-local persistent key-value storage
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Opens URLs in a new browsing context
pub trait Navigator {
    fn open_new(&self, url: &str);
}
