//! BrowserConnector - the host's JS EVM connector behind `EvmConnector`
//!
//! The host passes an object shaped like:
//!
//! ```javascript
//! {
//!   login: (connectorId, chainId) => Promise<void>,
//!   logout: () => Promise<void>,
//!   switchNetwork: (chainId) => Promise<void>,   // optional
//!   account: () => string | null,
//! }
//! ```

use async_trait::async_trait;
use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;

use super::settle;
use crate::error::ProviderError;
use crate::provider::EvmConnector;

#[wasm_bindgen]
extern "C" {
    pub type JsConnector;

    #[wasm_bindgen(method, catch, js_name = login)]
    fn login_raw(this: &JsConnector, connector_id: &str, chain_id: f64) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = logout)]
    fn logout_raw(this: &JsConnector) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = switchNetwork)]
    fn switch_network_raw(this: &JsConnector, chain_id: f64) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method, js_name = account)]
    fn account_raw(this: &JsConnector) -> Option<String>;
}

pub struct BrowserConnector {
    raw: JsConnector,
}

impl BrowserConnector {
    pub fn new(raw: JsConnector) -> Self {
        Self { raw }
    }

    fn can_switch_network(&self) -> bool {
        Reflect::get(&self.raw, &"switchNetwork".into())
            .map(|f| f.is_function())
            .unwrap_or(false)
    }
}

#[async_trait(?Send)]
impl EvmConnector for BrowserConnector {
    async fn switch_network(&self, chain_id: u64) -> Result<(), ProviderError> {
        // Connectors without network switching log in on whatever chain they are on
        if !self.can_switch_network() {
            return Ok(());
        }
        settle(self.raw.switch_network_raw(chain_id as f64)).await.map(|_| ())
    }

    async fn login(&self, connector_id: &str, chain_id: u64) -> Result<(), ProviderError> {
        settle(self.raw.login_raw(connector_id, chain_id as f64)).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        settle(self.raw.logout_raw()).await.map(|_| ())
    }

    fn account(&self) -> Option<String> {
        self.raw.account_raw().filter(|a| !a.is_empty())
    }
}
