//! PhantomProvider - `window.solana` behind the `InjectedProvider` trait

use async_trait::async_trait;
use js_sys::{Function, Object, Promise, Reflect};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{provider_error, settle};
use crate::core::names::{connect_opts, event, global};
use crate::error::ProviderError;
use crate::provider::{
    EventSink, InjectedProvider, ListenerId, ProviderEvent, ProviderHandle, ProviderProbe,
};

#[wasm_bindgen]
extern "C" {
    /// The object the extension injects at `window.solana`
    #[derive(Clone)]
    pub type SolanaProvider;

    #[wasm_bindgen(method, getter, js_name = isPhantom)]
    fn is_phantom(this: &SolanaProvider) -> Option<bool>;

    #[wasm_bindgen(method, catch, js_name = connect)]
    fn connect_raw(this: &SolanaProvider, opts: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = disconnect)]
    fn disconnect_raw(this: &SolanaProvider) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &SolanaProvider, event: &str, callback: &Function);

    #[wasm_bindgen(method, js_name = removeListener)]
    fn remove_listener(this: &SolanaProvider, event: &str, callback: &Function);
}

/// Public keys arrive as `PublicKey` objects; their `toString()` is base58.
fn address_of(value: &JsValue) -> Option<String> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    if let Some(text) = value.as_string() {
        return Some(text);
    }
    let to_string: Function = Reflect::get(value, &"toString".into()).ok()?.dyn_into().ok()?;
    to_string.call0(value).ok()?.as_string()
}

type Listener = (&'static str, Closure<dyn FnMut(JsValue)>);

pub struct PhantomProvider {
    raw: SolanaProvider,
    listeners: RefCell<HashMap<ListenerId, Vec<Listener>>>,
    next_id: Cell<ListenerId>,
}

impl PhantomProvider {
    pub fn new(raw: SolanaProvider) -> Self {
        Self {
            raw,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl InjectedProvider for PhantomProvider {
    fn is_phantom(&self) -> bool {
        self.raw.is_phantom().unwrap_or(false)
    }

    async fn connect(&self, trusted_only: bool) -> Result<String, ProviderError> {
        let opts = Object::new();
        Reflect::set(
            &opts,
            &connect_opts::ONLY_IF_TRUSTED.into(),
            &JsValue::from_bool(trusted_only),
        )
        .map_err(provider_error)?;
        let response = settle(self.raw.connect_raw(&opts)).await.map_err(|e| match e {
            // A trusted-only request is declined silently by the extension
            ProviderError::Failed(_) | ProviderError::UserRejected if trusted_only => {
                ProviderError::NotTrusted
            }
            other => other,
        })?;
        let key =
            Reflect::get(&response, &connect_opts::PUBLIC_KEY.into()).map_err(provider_error)?;
        address_of(&key)
            .ok_or_else(|| ProviderError::Failed("connect response without publicKey".into()))
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        settle(self.raw.disconnect_raw()).await.map(|_| ())
    }

    fn listen(&self, sink: EventSink) -> ListenerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let mut registered = Vec::with_capacity(event::ALL.len());
        for name in event::ALL.iter().copied() {
            let tx = sink.clone();
            let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
                let decoded = match name {
                    event::CONNECT => address_of(&payload).map(ProviderEvent::Connect),
                    event::DISCONNECT => Some(ProviderEvent::Disconnect),
                    _ => Some(ProviderEvent::AccountChanged(address_of(&payload))),
                };
                if let Some(decoded) = decoded {
                    let _ = tx.unbounded_send(decoded);
                }
            });
            self.raw.on(name, callback.as_ref().unchecked_ref());
            registered.push((name, callback));
        }
        self.listeners.borrow_mut().insert(id, registered);
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(registered) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        for (name, callback) in registered {
            self.raw.remove_listener(name, callback.as_ref().unchecked_ref());
        }
    }
}

/// Looks for `window.phantom` and takes `window.solana` as the provider.
/// The capability marker is checked by `provider::detect`.
pub struct WindowProbe;

impl ProviderProbe for WindowProbe {
    fn probe(&self) -> Option<ProviderHandle> {
        let window = web_sys::window()?;
        if !Reflect::has(&window, &global::PHANTOM.into()).unwrap_or(false) {
            return None;
        }
        let solana = Reflect::get(&window, &global::SOLANA.into()).ok()?;
        if solana.is_null() || solana.is_undefined() {
            return None;
        }
        Some(Rc::new(PhantomProvider::new(solana.unchecked_into())))
    }
}
