//! In-memory boundary implementations
//!
//! Stand-ins for the browser: an injected provider that remembers trust, a
//! scripted EVM connector, a map-backed storage and a navigator that records
//! what it opened. Used by tests and by hosts that render without a browser.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ProviderError, StorageError};
use crate::provider::{
    EventSink, EvmConnector, InjectedProvider, KeyValueStorage, ListenerId, Navigator,
    ProviderEvent, ProviderHandle, ProviderProbe,
};

// =============================================================================
// INJECTED PROVIDER
// =============================================================================

#[derive(Default)]
struct ProviderState {
    address: String,
    marker: bool,
    trusted: bool,
    connected: bool,
    reject_prompts: bool,
    prompts: usize,
    listeners: Vec<(ListenerId, EventSink)>,
    next_id: ListenerId,
}

/// Injected provider that behaves like a browser extension: an explicit
/// connect prompts once and grants trust, a trusted-only connect never prompts.
pub struct MemoryProvider {
    state: RefCell<ProviderState>,
}

impl MemoryProvider {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            state: RefCell::new(ProviderState {
                address: address.into(),
                marker: true,
                ..Default::default()
            }),
        }
    }

    pub fn with_marker(self, marker: bool) -> Self {
        self.state.borrow_mut().marker = marker;
        self
    }

    pub fn trusted(self, trusted: bool) -> Self {
        self.state.borrow_mut().trusted = trusted;
        self
    }

    pub fn rejecting(self, reject: bool) -> Self {
        self.state.borrow_mut().reject_prompts = reject;
        self
    }

    pub fn set_rejecting(&self, reject: bool) {
        self.state.borrow_mut().reject_prompts = reject;
    }

    /// Number of times the user was shown an authorization prompt
    pub fn prompts(&self) -> usize {
        self.state.borrow().prompts
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Simulate the user switching accounts inside the extension
    pub fn switch_account(&self, address: Option<&str>) {
        if let Some(address) = address {
            self.state.borrow_mut().address = address.to_string();
        }
        self.emit(ProviderEvent::AccountChanged(address.map(str::to_string)));
    }

    /// Simulate the extension revoking the session on its own
    pub fn revoke(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.connected = false;
            state.trusted = false;
        }
        self.emit(ProviderEvent::Disconnect);
    }

    fn emit(&self, event: ProviderEvent) {
        let mut state = self.state.borrow_mut();
        state.listeners.retain(|(_, tx)| tx.unbounded_send(event.clone()).is_ok());
    }
}

#[async_trait(?Send)]
impl InjectedProvider for MemoryProvider {
    fn is_phantom(&self) -> bool {
        self.state.borrow().marker
    }

    async fn connect(&self, trusted_only: bool) -> Result<String, ProviderError> {
        let address = {
            let mut state = self.state.borrow_mut();
            if trusted_only {
                if !state.trusted {
                    return Err(ProviderError::NotTrusted);
                }
            } else {
                state.prompts += 1;
                if state.reject_prompts {
                    return Err(ProviderError::UserRejected);
                }
                state.trusted = true;
            }
            state.connected = true;
            state.address.clone()
        };
        self.emit(ProviderEvent::Connect(address.clone()));
        Ok(address)
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.state.borrow_mut().connected = false;
        self.emit(ProviderEvent::Disconnect);
        Ok(())
    }

    fn listen(&self, sink: EventSink) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        state.listeners.push((id, sink));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.retain(|(listener, _)| *listener != id);
    }
}

/// Probe that always finds the same provider (or none)
pub struct StaticProbe {
    handle: Option<ProviderHandle>,
}

impl StaticProbe {
    pub fn new<P: InjectedProvider + 'static>(provider: P) -> Self {
        Self {
            handle: Some(Rc::new(provider)),
        }
    }

    pub fn from_handle(handle: ProviderHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn empty() -> Self {
        Self { handle: None }
    }
}

impl ProviderProbe for StaticProbe {
    fn probe(&self) -> Option<ProviderHandle> {
        self.handle.clone()
    }
}

// =============================================================================
// EVM CONNECTOR
// =============================================================================

/// Scripted EVM connector: records calls, fails on demand
#[derive(Default)]
pub struct MemoryConnector {
    account_on_login: String,
    account: RefCell<Option<String>>,
    fail_switch: Cell<bool>,
    fail_login: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl MemoryConnector {
    pub fn new(account_on_login: impl Into<String>) -> Self {
        Self {
            account_on_login: account_on_login.into(),
            ..Default::default()
        }
    }

    pub fn fail_switch(&self, fail: bool) {
        self.fail_switch.set(fail);
    }

    pub fn fail_login(&self, fail: bool) {
        self.fail_login.set(fail);
    }

    /// Calls in order, e.g. `["switch_network:56", "login:metaMask:56"]`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl EvmConnector for MemoryConnector {
    async fn switch_network(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record(format!("switch_network:{chain_id}"));
        if self.fail_switch.get() {
            return Err(ProviderError::UserRejected);
        }
        Ok(())
    }

    async fn login(&self, connector_id: &str, chain_id: u64) -> Result<(), ProviderError> {
        self.record(format!("login:{connector_id}:{chain_id}"));
        if self.fail_login.get() {
            return Err(ProviderError::Failed(format!("connector {connector_id} unavailable")));
        }
        *self.account.borrow_mut() = Some(self.account_on_login.clone());
        Ok(())
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        self.record("logout".into());
        self.account.borrow_mut().take();
        Ok(())
    }

    fn account(&self) -> Option<String> {
        self.account.borrow().clone()
    }
}

// =============================================================================
// STORAGE + NAVIGATION
// =============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Navigator that only records the URLs it was asked to open
#[derive(Default)]
pub struct RecordingNavigator {
    opened: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_new(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}
