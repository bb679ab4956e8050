//! WalletSession: the connection session exposed to JavaScript
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import { WalletSession } from 'walletlink';
//!
//! const session = new WalletSession(
//!     JSON.stringify({ chain_id: 56, platform: isMobile ? 'mobile' : 'desktop' }),
//!     JSON.stringify(wallets),
//!     connector,
//! );
//!
//! // The silent reconnect runs once from the constructor
//! session.watch((state) => render(state));
//!
//! // Picker
//! session.openPrompt();
//! const grid = session.visibleWallets();
//! session.toggleExpanded();
//! try {
//!     await session.requestConnect(grid[0].id);
//! } catch (err) {
//!     showToast(err);
//! }
//! ```

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use super::browser::{BrowserNavigator, LocalStorage};
use super::connector::{BrowserConnector, JsConnector};
use super::log;
use super::phantom::WindowProbe;
use crate::config::ConnectConfig;
use crate::core::registry::WalletRegistry;
use crate::provider::detect;
use crate::session::SessionController;
use crate::view::{self, Viewport, WalletPicker};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(to_js)
}

#[wasm_bindgen]
pub struct WalletSession {
    controller: Rc<SessionController>,
    picker: RefCell<WalletPicker>,
}

#[wasm_bindgen]
impl WalletSession {
    /// Detect the injected provider, load the wallet catalogue, start
    /// listening for provider events and try the silent reconnect once.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        wallets_json: &str,
        connector: JsConnector,
    ) -> Result<WalletSession, JsValue> {
        let config = ConnectConfig::from_json(config_json).map_err(to_js)?;
        let handle = detect(&WindowProbe);
        let registry = WalletRegistry::from_json(wallets_json)
            .map_err(to_js)?
            .with_injected_detection(handle.is_some());
        let storage = LocalStorage::open().map_err(to_js)?;
        log!(
            "[walletlink] {} wallets, injected provider {}",
            registry.len(),
            if handle.is_some() {
                "detected"
            } else {
                "absent"
            }
        );

        let picker = WalletPicker::from_config(&config);
        let controller = Rc::new(
            SessionController::new(
                config,
                registry,
                Rc::new(BrowserConnector::new(connector)),
                Rc::new(storage),
                Rc::new(BrowserNavigator),
            )
            .with_provider(handle),
        );

        let runner = controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            runner.run_events().await;
        });
        let mount = controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if mount.eager_reconnect().await {
                log!("[walletlink] reconnected to trusted injected wallet");
            }
        });

        Ok(Self {
            controller,
            picker: RefCell::new(picker),
        })
    }

    // =========================================================================
    // PICKER
    // =========================================================================

    #[wasm_bindgen]
    pub fn wallets(&self) -> Result<JsValue, JsValue> {
        to_value(&self.controller.registry().list())
    }

    #[wasm_bindgen(js_name = "visibleWallets")]
    pub fn visible_wallets(&self) -> Result<JsValue, JsValue> {
        let picker = self.picker.borrow();
        to_value(&picker.visible(self.controller.registry().list()))
    }

    /// Flip between the short and the full list; returns the new toggle label
    #[wasm_bindgen(js_name = "toggleExpanded")]
    pub fn toggle_expanded(&self) -> String {
        let mut picker = self.picker.borrow_mut();
        picker.toggle();
        picker.toggle_label().to_string()
    }

    #[wasm_bindgen(js_name = "toggleLabel")]
    pub fn toggle_label(&self) -> String {
        self.picker.borrow().toggle_label().to_string()
    }

    #[wasm_bindgen(js_name = "openPrompt")]
    pub fn open_prompt(&self) {
        self.controller.open_prompt();
    }

    #[wasm_bindgen(js_name = "dismissPrompt")]
    pub fn dismiss_prompt(&self) {
        self.controller.dismiss_prompt();
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Connect the wallet with this id. Rejects with a message on failure.
    #[wasm_bindgen(js_name = "requestConnect")]
    pub async fn request_connect(&self, id: String) -> Result<JsValue, JsValue> {
        let controller = self.controller.clone();
        let outcome = controller.request_connect_by_id(&id).await.map_err(to_js)?;
        to_value(&outcome)
    }

    /// Connect the wallet at `index` of the visible grid
    #[wasm_bindgen(js_name = "selectWallet")]
    pub async fn select_wallet(&self, index: usize) -> Result<JsValue, JsValue> {
        let descriptor = {
            let picker = self.picker.borrow();
            picker
                .select(self.controller.registry().list(), index)
                .cloned()
                .ok_or_else(|| JsValue::from_str("no wallet at that position"))?
        };
        let controller = self.controller.clone();
        let outcome = controller.request_connect(&descriptor).await.map_err(to_js)?;
        to_value(&outcome)
    }

    /// Resolves `false` once the constructor's attempt has run
    #[wasm_bindgen(js_name = "eagerReconnect")]
    pub async fn eager_reconnect(&self) -> bool {
        let controller = self.controller.clone();
        controller.eager_reconnect().await
    }

    #[wasm_bindgen]
    pub async fn logout(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        controller.logout().await.map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn session(&self) -> Result<JsValue, JsValue> {
        to_value(&self.controller.session())
    }

    #[wasm_bindgen(js_name = "lastWallet")]
    pub fn last_wallet(&self) -> Option<String> {
        self.controller.last_wallet()
    }

    /// Call `callback(state)` after every store update
    #[wasm_bindgen]
    pub fn watch(&self, callback: js_sys::Function) {
        let rx = self.controller.store().watch();
        let this = JsValue::NULL;
        wasm_bindgen_futures::spawn_local(async move {
            use futures::StreamExt;
            let mut rx = rx;
            while let Some(state) = rx.next().await {
                if let Ok(value) = to_value(&state) {
                    let _ = callback.call1(&this, &value);
                }
            }
        });
    }

    /// Release the provider subscription; ends the event loop
    #[wasm_bindgen]
    pub fn close(&self) {
        self.controller.set_provider(None);
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    #[wasm_bindgen(js_name = "buttonView")]
    pub fn button_view(&self, width_px: u32, short_text: bool) -> Result<JsValue, JsValue> {
        let viewport = Viewport::for_width(width_px, self.controller.config().narrow_button_px);
        to_value(&view::connect_button(&self.controller.app_state(), viewport, short_text))
    }

    #[wasm_bindgen(js_name = "badgeView")]
    pub fn badge_view(&self, width_px: u32) -> Result<JsValue, JsValue> {
        let viewport = Viewport::for_width(width_px, self.controller.config().narrow_badge_px);
        let badge = view::account_badge(&self.controller.app_state(), viewport);
        to_value(&badge)
    }

    #[wasm_bindgen(js_name = "modalCentered")]
    pub fn modal_centered(&self, width_px: u32) -> bool {
        let breakpoint = self.controller.config().narrow_button_px;
        view::modal_centered(Viewport::for_width(width_px, breakpoint))
    }
}
