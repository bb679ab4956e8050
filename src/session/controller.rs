//! SessionController - drives connect/disconnect for both wallet families
//!
//! The controller is the only writer of session state. Provider and
//! connector failures are caught here: the prior session is kept and the
//! error comes back as a `ConnectError`, never as a panic.
//!
//! At most one family is live at a time. The EVM connector login is tracked
//! apart from `SessionState`: a provider event can end an EVM session from a
//! synchronous handler, and the connector logout then happens on the next
//! async path (`run_events`, `request_connect` or `logout`).

use chrono::Utc;
use futures::StreamExt;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

use super::store::{Action, AppState, Store, WalletType};
use super::{FamilyKind, Session, SessionState};
use crate::config::ConnectConfig;
use crate::core::registry::{WalletDescriptor, WalletFamily, WalletRegistry};
use crate::error::{ConnectError, ProviderError};
use crate::provider::{
    EventStream, EvmConnector, InjectedAdapter, KeyValueStorage, Navigator, ProviderEvent,
    ProviderHandle,
};

/// Successful result of `request_connect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectOutcome {
    /// Wallet not installed: its download link was opened instead
    Redirected { url: String },
    /// Injected provider accepted the request; its `connect` event is still pending
    Requested,
    Connected { address: Option<String> },
}

pub struct SessionController {
    config: ConnectConfig,
    registry: WalletRegistry,
    store: Store,
    connector: Rc<dyn EvmConnector>,
    storage: Rc<dyn KeyValueStorage>,
    navigator: Rc<dyn Navigator>,
    adapter: RefCell<Option<Rc<InjectedAdapter>>>,
    events: RefCell<Option<EventStream>>,
    state: RefCell<SessionState>,
    eager_attempted: Cell<bool>,
    // The connector holds a login we made and have not logged out yet.
    evm_login: Cell<bool>,
    // Set when we tore the injected session down ourselves. Until the
    // provider connects again, its `disconnect` events refer to that session.
    injected_released: Cell<bool>,
}

impl SessionController {
    pub fn new(
        config: ConnectConfig,
        registry: WalletRegistry,
        connector: Rc<dyn EvmConnector>,
        storage: Rc<dyn KeyValueStorage>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            registry,
            store: Store::new(),
            connector,
            storage,
            navigator,
            adapter: RefCell::new(None),
            events: RefCell::new(None),
            state: RefCell::new(SessionState::Idle),
            eager_attempted: Cell::new(false),
            evm_login: Cell::new(false),
            injected_released: Cell::new(false),
        }
    }

    pub fn with_provider(self, handle: Option<ProviderHandle>) -> Self {
        self.set_provider(handle);
        self
    }

    /// Swap the injected provider. The previous subscription is released
    /// before the new one is registered.
    pub fn set_provider(&self, handle: Option<ProviderHandle>) {
        if let Some(old) = self.adapter.borrow_mut().take() {
            old.unsubscribe();
        }
        let adapter = handle.map(|h| Rc::new(InjectedAdapter::new(h)));
        let events = adapter.as_ref().and_then(|a| a.subscribe());
        debug!(present = adapter.is_some(), "injected provider set");
        *self.adapter.borrow_mut() = adapter;
        *self.events.borrow_mut() = events;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Session {
        self.state.borrow().session()
    }

    pub fn app_state(&self) -> AppState {
        self.store.snapshot()
    }

    pub fn has_provider(&self) -> bool {
        self.adapter.borrow().is_some()
    }

    /// Connector id persisted by the last successful EVM login
    pub fn last_wallet(&self) -> Option<String> {
        match self.storage.get(&self.config.storage_key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "reading last wallet failed");
                None
            }
        }
    }

    pub fn open_prompt(&self) {
        self.store.dispatch(Action::OpenPrompt);
    }

    pub fn dismiss_prompt(&self) {
        self.store.dispatch(Action::DismissPrompt);
    }

    fn adapter(&self) -> Option<Rc<InjectedAdapter>> {
        self.adapter.borrow().clone()
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.borrow_mut();
        if *state != next {
            debug!(from = ?state, to = ?next, "session transition");
        }
        *state = next;
    }

    /// Put back `prior` after a failed attempt, unless an event already
    /// moved the session on.
    fn restore(&self, family: FamilyKind, prior: SessionState) {
        if *self.state.borrow() == SessionState::Connecting(family) {
            self.set_state(prior);
        }
    }

    // =========================================================================
    // CONNECT
    // =========================================================================

    pub async fn request_connect_by_id(&self, id: &str) -> Result<ConnectOutcome, ConnectError> {
        let descriptor = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| ConnectError::UnknownWallet(id.to_string()))?;
        self.request_connect(&descriptor).await
    }

    pub async fn request_connect(
        &self,
        descriptor: &WalletDescriptor,
    ) -> Result<ConnectOutcome, ConnectError> {
        if !descriptor.installed {
            let url = descriptor.download_link(self.config.platform).to_string();
            info!(wallet = %descriptor.id, %url, "wallet not installed, opening download link");
            self.navigator.open_new(&url);
            return Ok(ConnectOutcome::Redirected { url });
        }
        if self.state.borrow().is_connecting() {
            return Err(ConnectError::AlreadyConnecting);
        }

        self.release_orphaned_login().await;
        let requested = match descriptor.family {
            WalletFamily::Evm { .. } => FamilyKind::Evm,
            WalletFamily::Injected => FamilyKind::Injected,
        };
        match requested {
            FamilyKind::Evm if self.injected_live() => self.release(FamilyKind::Injected).await,
            FamilyKind::Injected if self.evm_live() => self.release(FamilyKind::Evm).await,
            _ => {}
        }

        info!(wallet = %descriptor.id, family = ?requested, "connect requested");
        match &descriptor.family {
            WalletFamily::Evm { connector_id } => self.connect_evm(connector_id).await,
            WalletFamily::Injected => self.connect_injected().await,
        }
    }

    fn injected_live(&self) -> bool {
        self.store.snapshot().wallet_type == WalletType::Phantom
            || self.state.borrow().family() == Some(FamilyKind::Injected)
    }

    fn evm_live(&self) -> bool {
        self.evm_login.get()
            || self.store.snapshot().evm_account.is_some()
            || self.state.borrow().family() == Some(FamilyKind::Evm)
    }

    async fn connect_evm(&self, connector_id: &str) -> Result<ConnectOutcome, ConnectError> {
        let chain_id = self.config.chain_id;
        let prior = self.state();
        self.set_state(SessionState::Connecting(FamilyKind::Evm));

        let result = async {
            self.connector
                .switch_network(chain_id)
                .await
                .map_err(|source| ConnectError::NetworkSwitchFailed { chain_id, source })?;
            self.connector.login(connector_id, chain_id).await.map_err(|e| match e {
                ProviderError::UserRejected => ConnectError::UserRejected,
                other => ConnectError::LoginFailed(other),
            })
        }
        .await;

        if let Err(e) = result {
            warn!(connector = connector_id, error = %e, "EVM connect failed");
            self.restore(FamilyKind::Evm, prior);
            return Err(e);
        }

        self.evm_login.set(true);
        if let Err(e) = self.storage.set(&self.config.storage_key, connector_id) {
            warn!(error = %e, "persisting last wallet failed");
        }
        let account = self.connector.account();
        self.store.dispatch(Action::SetEvmAccount(account.clone()));
        self.store.dispatch(Action::DismissPrompt);
        info!(connector = connector_id, account = ?account, "EVM wallet connected");
        self.set_state(SessionState::Connected {
            family: FamilyKind::Evm,
            address: account.clone(),
            since: Utc::now(),
        });
        Ok(ConnectOutcome::Connected { address: account })
    }

    async fn connect_injected(&self) -> Result<ConnectOutcome, ConnectError> {
        let adapter = self.adapter().ok_or(ConnectError::ProviderUnavailable)?;
        let prior = self.state();
        self.set_state(SessionState::Connecting(FamilyKind::Injected));

        match adapter.connect(false).await {
            Ok(address) => {
                debug!(%address, "connect call resolved, waiting for provider event");
                self.pump_events();
                self.release_orphaned_login().await;
                Ok(self.outcome_after_request())
            }
            Err(e) => {
                warn!(error = %e, "injected connect failed");
                self.restore(FamilyKind::Injected, prior);
                Err(e.into())
            }
        }
    }

    fn outcome_after_request(&self) -> ConnectOutcome {
        match &*self.state.borrow() {
            SessionState::Connected { family: FamilyKind::Injected, address, .. } => {
                ConnectOutcome::Connected {
                    address: address.clone(),
                }
            }
            _ => ConnectOutcome::Requested,
        }
    }

    /// Silent reconnect with prior trust only. Runs at most once per
    /// controller; never prompts and never fails.
    pub async fn eager_reconnect(&self) -> bool {
        if !self.config.eager_reconnect || self.eager_attempted.replace(true) {
            return false;
        }
        let Some(adapter) = self.adapter() else {
            return false;
        };
        if *self.state.borrow() != SessionState::Idle {
            return false;
        }
        match adapter.connect(true).await {
            Ok(address) => {
                info!(%address, "eager reconnect accepted");
                self.pump_events();
                true
            }
            Err(e) => {
                debug!(error = %e, "eager reconnect declined");
                false
            }
        }
    }

    // =========================================================================
    // DISCONNECT
    // =========================================================================

    /// Disconnect whichever family is active. The injected family completes
    /// through the provider's `disconnect` event.
    pub async fn logout(&self) -> Result<(), ProviderError> {
        self.release_orphaned_login().await;
        if self.store.snapshot().wallet_type == WalletType::Phantom {
            let adapter = self.adapter().ok_or(ProviderError::Unavailable)?;
            adapter.disconnect().await?;
            self.pump_events();
        } else {
            self.connector.logout().await?;
            self.evm_login.set(false);
            self.store.dispatch(Action::SetEvmAccount(None));
            info!("EVM wallet logged out");
            self.set_state(SessionState::Idle);
        }
        Ok(())
    }

    async fn release(&self, family: FamilyKind) {
        info!(family = ?family, "releasing active session before switching family");
        match family {
            FamilyKind::Injected => {
                if let Some(adapter) = self.adapter() {
                    self.injected_released.set(true);
                    if let Err(e) = adapter.disconnect().await {
                        warn!(error = %e, "injected disconnect failed");
                        self.injected_released.set(false);
                    }
                }
                self.clear_injected();
            }
            FamilyKind::Evm => {
                if let Err(e) = self.connector.logout().await {
                    warn!(error = %e, "EVM logout failed");
                }
                self.evm_login.set(false);
                self.store.dispatch(Action::SetEvmAccount(None));
            }
        }
        self.set_state(SessionState::Idle);
    }

    /// Log the connector out when a provider event ended the EVM session.
    async fn release_orphaned_login(&self) {
        if !self.evm_login.get() || self.state.borrow().family() == Some(FamilyKind::Evm) {
            return;
        }
        info!("logging out EVM connector left over from an ended session");
        if let Err(e) = self.connector.logout().await {
            warn!(error = %e, "EVM logout failed");
        }
        self.evm_login.set(false);
    }

    fn clear_injected(&self) {
        self.store.dispatch(Action::SetWalletType(WalletType::None));
        self.store.dispatch(Action::SetSolanaAddress(String::new()));
    }

    fn clear_evm(&self) {
        if self.store.snapshot().evm_account.is_some() {
            self.store.dispatch(Action::SetEvmAccount(None));
        }
    }

    // =========================================================================
    // PROVIDER EVENTS
    // =========================================================================

    pub fn handle_event(&self, event: ProviderEvent) {
        debug!(event = event.name(), "provider event");
        match event {
            ProviderEvent::Connect(address) => {
                self.injected_released.set(false);
                if self.state.borrow().family() == Some(FamilyKind::Evm) {
                    info!("injected wallet connected over an EVM session");
                }
                self.clear_evm();
                self.apply_injected_address(address);
                self.store.dispatch(Action::DismissPrompt);
            }
            ProviderEvent::Disconnect => {
                self.clear_injected();
                if self.injected_released.get() {
                    debug!("disconnect from released injected session ignored");
                    return;
                }
                info!("wallet disconnected");
                self.clear_evm();
                self.set_state(SessionState::Idle);
            }
            ProviderEvent::AccountChanged(Some(address)) => {
                if self.state.borrow().connected_family() == Some(FamilyKind::Injected) {
                    self.apply_injected_address(address);
                } else {
                    debug!("account change ignored, injected family not active");
                }
            }
            ProviderEvent::AccountChanged(None) => {
                if self.state.borrow().connected_family() == Some(FamilyKind::Injected) {
                    info!("injected account revoked");
                    self.clear_injected();
                    self.set_state(SessionState::Idle);
                }
            }
        }
    }

    fn apply_injected_address(&self, address: String) {
        info!(%address, "injected wallet connected");
        self.store.dispatch(Action::SetWalletType(WalletType::Phantom));
        self.store.dispatch(Action::SetSolanaAddress(address.clone()));
        let since = match &*self.state.borrow() {
            SessionState::Connected { family: FamilyKind::Injected, since, .. } => *since,
            _ => Utc::now(),
        };
        self.set_state(SessionState::Connected {
            family: FamilyKind::Injected,
            address: Some(address),
            since,
        });
    }

    /// Handle every event already queued, without waiting. Returns how many
    /// were handled. Does nothing once `run_events` owns the stream.
    pub fn pump_events(&self) -> usize {
        let mut queued = Vec::new();
        if let Some(rx) = self.events.borrow_mut().as_mut() {
            while let Ok(Some(event)) = rx.try_next() {
                queued.push(event);
            }
        }
        let count = queued.len();
        for event in queued {
            self.handle_event(event);
        }
        count
    }

    /// Take the event stream and handle events until the provider is
    /// replaced or dropped.
    pub async fn run_events(&self) {
        let Some(mut rx) = self.events.borrow_mut().take() else {
            return;
        };
        while let Some(event) = rx.next().await {
            self.handle_event(event);
            self.release_orphaned_login().await;
        }
        debug!("provider event stream closed");
    }
}
