//! InjectedAdapter - bridges one injected provider into session events

use futures::channel::mpsc;
use std::cell::RefCell;

use super::{EventStream, ListenerId, ProviderHandle, ProviderProbe};
use crate::error::ProviderError;

/// Probe the environment for a provider carrying the capability marker.
/// Side-effect free; calling it again yields the same answer.
pub fn detect(probe: &dyn ProviderProbe) -> Option<ProviderHandle> {
    probe.probe().filter(|handle| handle.is_phantom())
}

/// Live listener registration. Dropping it unregisters the listener.
pub struct Subscription {
    handle: ProviderHandle,
    id: ListenerId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(listener = self.id, "provider listener released");
        self.handle.unlisten(self.id);
    }
}

pub struct InjectedAdapter {
    handle: ProviderHandle,
    subscription: RefCell<Option<Subscription>>,
}

impl InjectedAdapter {
    pub fn new(handle: ProviderHandle) -> Self {
        Self {
            handle,
            subscription: RefCell::new(None),
        }
    }

    pub fn detect(probe: &dyn ProviderProbe) -> Option<Self> {
        detect(probe).map(Self::new)
    }

    pub fn handle(&self) -> &ProviderHandle {
        &self.handle
    }

    pub async fn connect(&self, trusted_only: bool) -> Result<String, ProviderError> {
        tracing::debug!(trusted_only, "injected provider connect");
        self.handle.connect(trusted_only).await
    }

    pub async fn disconnect(&self) -> Result<(), ProviderError> {
        tracing::debug!("injected provider disconnect");
        self.handle.disconnect().await
    }

    /// Register for provider events. Returns `None` if a subscription is
    /// already live: registration happens once per handle.
    pub fn subscribe(&self) -> Option<EventStream> {
        let mut slot = self.subscription.borrow_mut();
        if slot.is_some() {
            return None;
        }
        let (tx, rx) = mpsc::unbounded();
        let id = self.handle.listen(tx);
        tracing::debug!(listener = id, "provider listener registered");
        *slot = Some(Subscription {
            handle: self.handle.clone(),
            id,
        });
        Some(rx)
    }

    pub fn unsubscribe(&self) {
        self.subscription.borrow_mut().take();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryProvider, StaticProbe};
    use crate::provider::ProviderEvent;
    use std::rc::Rc;

    const KEY: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    #[test]
    fn detect_requires_marker() {
        assert!(detect(&StaticProbe::empty()).is_none());

        let impostor = MemoryProvider::new(KEY).with_marker(false);
        assert!(detect(&StaticProbe::new(impostor)).is_none());

        let provider = MemoryProvider::new(KEY);
        let probe = StaticProbe::new(provider);
        assert!(detect(&probe).is_some());
        assert!(detect(&probe).is_some());
    }

    #[test]
    fn subscribe_is_idempotent() {
        let provider = Rc::new(MemoryProvider::new(KEY));
        let adapter = InjectedAdapter::new(provider.clone());

        let rx = adapter.subscribe();
        assert!(rx.is_some());
        assert!(adapter.subscribe().is_none());
        assert_eq!(provider.listener_count(), 1);

        adapter.unsubscribe();
        assert_eq!(provider.listener_count(), 0);
        assert!(adapter.subscribe().is_some());
        assert_eq!(provider.listener_count(), 1);
    }

    #[test]
    fn dropping_adapter_releases_listener() {
        let provider = Rc::new(MemoryProvider::new(KEY));
        {
            let adapter = InjectedAdapter::new(provider.clone());
            let _rx = adapter.subscribe();
            assert_eq!(provider.listener_count(), 1);
        }
        assert_eq!(provider.listener_count(), 0);
    }

    #[tokio::test]
    async fn connect_emits_event() {
        let provider = Rc::new(MemoryProvider::new(KEY));
        let adapter = InjectedAdapter::new(provider.clone());
        let mut rx = adapter.subscribe().unwrap();

        let address = adapter.connect(false).await.unwrap();
        assert_eq!(address, KEY);
        assert_eq!(rx.try_next().unwrap(), Some(ProviderEvent::Connect(KEY.into())));
    }

    #[tokio::test]
    async fn trusted_only_never_prompts() {
        let provider = Rc::new(MemoryProvider::new(KEY));
        let adapter = InjectedAdapter::new(provider.clone());

        assert_eq!(adapter.connect(true).await, Err(ProviderError::NotTrusted));
        assert_eq!(provider.prompts(), 0);
    }
}
