//! WASM module: the wallet session bound to a real browser
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        WalletSession (JS API)           │
//! │  requestConnect, logout, buttonView ... │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │          SessionController              │
//! └───┬──────────────┬──────────────┬───────┘
//!     │              │              │
//! ┌───▼──────┐ ┌─────▼──────┐ ┌─────▼──────────────┐
//! │ Phantom  │ │ Browser    │ │ LocalStorage       │
//! │ Provider │ │ Connector  │ │ BrowserNavigator   │
//! │ (window. │ │ (JS EVM    │ │ (localStorage,     │
//! │  solana) │ │  library)  │ │  window.open)      │
//! └──────────┘ └────────────┘ └────────────────────┘
//! ```

mod browser;
mod connector;
mod phantom;
mod session;

pub use browser::{BrowserNavigator, LocalStorage};
pub use connector::{BrowserConnector, JsConnector};
pub use phantom::{PhantomProvider, SolanaProvider, WindowProbe};
pub use session::WalletSession;

use js_sys::{Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::core::names::USER_REJECTED_CODE;
use crate::error::ProviderError;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;

/// Map a rejected JS promise or thrown value onto `ProviderError`
pub(crate) fn provider_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &"code".into()).ok().and_then(|c| c.as_f64());
    if code == Some(USER_REJECTED_CODE) {
        return ProviderError::UserRejected;
    }
    let message = Reflect::get(&err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ProviderError::Failed(message)
}

/// Await a promise-returning JS call
pub(crate) async fn settle(call: Result<Promise, JsValue>) -> Result<JsValue, ProviderError> {
    let promise = call.map_err(provider_error)?;
    JsFuture::from(promise).await.map_err(provider_error)
}
