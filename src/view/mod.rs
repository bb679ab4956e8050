//! Presentation view models
//!
//! Pure functions of store state: the connect button, the account badge and
//! the wallet picker grid. Rendering is left to the host UI.

use serde::Serialize;

use crate::config::ConnectConfig;
use crate::core::registry::WalletDescriptor;
use crate::core::truncate::{truncate_address, DEFAULT_TRUNCATE_LEN};
use crate::session::{AppState, WalletType};

pub const CONNECT_LABEL: &str = "Connect Wallet";
pub const CONNECT_LABEL_SHORT: &str = "Connect";
pub const MORE_LABEL: &str = "More";
pub const LESS_LABEL: &str = "Less";

const WIDE_TRUNCATE_LEN: usize = 6;
const NARROW_TRUNCATE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Wide,
    Narrow,
}

impl Viewport {
    /// Narrow when `width_px` is at or below `breakpoint_px` (a `max-width` query)
    pub fn for_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px <= breakpoint_px {
            Viewport::Narrow
        } else {
            Viewport::Wide
        }
    }
}

/// Connect affordance vs caller-supplied connected content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ConnectButtonView {
    Connect { label: &'static str },
    Connected,
}

/// True when neither family has an account to show
pub fn needs_connect(state: &AppState) -> bool {
    state.evm_account.is_none() && state.wallet_type == WalletType::None
}

pub fn connect_button(state: &AppState, viewport: Viewport, short_text: bool) -> ConnectButtonView {
    if !needs_connect(state) {
        return ConnectButtonView::Connected;
    }
    let label = if viewport == Viewport::Narrow || short_text {
        CONNECT_LABEL_SHORT
    } else {
        CONNECT_LABEL
    };
    ConnectButtonView::Connect { label }
}

/// The picker modal is centred except on narrow screens
pub fn modal_centered(viewport: Viewport) -> bool {
    viewport == Viewport::Wide
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AccountBadge {
    pub evm: Option<String>,
    pub injected: Option<String>,
}

impl AccountBadge {
    pub fn text(&self) -> String {
        [self.evm.as_deref(), self.injected.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .concat()
    }
}

pub fn account_badge(state: &AppState, viewport: Viewport) -> AccountBadge {
    let evm_len = match viewport {
        Viewport::Wide => WIDE_TRUNCATE_LEN,
        Viewport::Narrow => NARROW_TRUNCATE_LEN,
    };
    AccountBadge {
        evm: state.evm_account.as_deref().map(|a| truncate_address(a, evm_len)),
        injected: (state.wallet_type == WalletType::Phantom)
            .then(|| truncate_address(&state.solana_address, DEFAULT_TRUNCATE_LEN)),
    }
}

/// Wallet picker grid: a short list that expands on "More"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletPicker {
    expanded: bool,
    collapsed_count: usize,
    expanded_count: usize,
}

impl WalletPicker {
    pub fn new(collapsed_count: usize, expanded_count: usize) -> Self {
        Self {
            expanded: false,
            collapsed_count,
            expanded_count,
        }
    }

    pub fn from_config(config: &ConnectConfig) -> Self {
        Self::new(config.collapsed_count, config.expanded_count)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.expanded {
            LESS_LABEL
        } else {
            MORE_LABEL
        }
    }

    pub fn visible<'a>(&self, wallets: &'a [WalletDescriptor]) -> &'a [WalletDescriptor] {
        let cap = if self.expanded {
            self.expanded_count
        } else {
            self.collapsed_count
        };
        &wallets[..wallets.len().min(cap)]
    }

    /// Entry at `index` of the visible grid
    pub fn select<'a>(
        &self,
        wallets: &'a [WalletDescriptor],
        index: usize,
    ) -> Option<&'a WalletDescriptor> {
        self.visible(wallets).get(index)
    }
}

impl Default for WalletPicker {
    fn default() -> Self {
        Self::from_config(&ConnectConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const KEY: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    #[test]
    fn connect_shown_only_without_accounts() {
        let mut state = AppState::default();
        assert_eq!(
            connect_button(&state, Viewport::Wide, false),
            ConnectButtonView::Connect {
                label: "Connect Wallet",
            }
        );
        assert_eq!(
            connect_button(&state, Viewport::Narrow, false),
            ConnectButtonView::Connect { label: "Connect" }
        );
        assert_eq!(
            connect_button(&state, Viewport::Wide, true),
            ConnectButtonView::Connect { label: "Connect" }
        );

        state.wallet_type = WalletType::Phantom;
        assert_eq!(connect_button(&state, Viewport::Wide, false), ConnectButtonView::Connected);

        state.wallet_type = WalletType::None;
        state.evm_account = Some(EVM.into());
        assert_eq!(connect_button(&state, Viewport::Wide, false), ConnectButtonView::Connected);
    }

    #[test]
    fn viewport_breakpoints() {
        assert_eq!(Viewport::for_width(480, 480), Viewport::Narrow);
        assert_eq!(Viewport::for_width(481, 480), Viewport::Wide);
        assert!(!modal_centered(Viewport::for_width(320, 480)));
    }

    #[test]
    fn badge_truncates_per_viewport() {
        let state = AppState {
            evm_account: Some(EVM.into()),
            ..Default::default()
        };
        assert_eq!(account_badge(&state, Viewport::Wide).text(), "0x1234...345678");
        assert_eq!(account_badge(&state, Viewport::Narrow).text(), "0x12...5678");
    }

    #[test]
    fn badge_shows_injected_address_with_default_length() {
        let state = AppState {
            wallet_type: WalletType::Phantom,
            solana_address: KEY.into(),
            ..Default::default()
        };
        let badge = account_badge(&state, Viewport::Wide);
        assert_eq!(badge.evm, None);
        assert_eq!(badge.injected.as_deref(), Some("9xQe...VFin"));
    }

    #[test]
    fn picker_caps_and_expands() {
        let wallets: Vec<_> = (0..25)
            .map(|i| {
                WalletDescriptor::evm(format!("w{i}"), format!("Wallet {i}"), format!("c{i}"), i)
            })
            .collect();
        let mut picker = WalletPicker::default();
        assert_eq!(picker.visible(&wallets).len(), 4);
        assert_eq!(picker.toggle_label(), "More");
        assert!(picker.select(&wallets, 4).is_none());

        picker.toggle();
        assert_eq!(picker.visible(&wallets).len(), 20);
        assert_eq!(picker.toggle_label(), "Less");
        assert_eq!(picker.select(&wallets, 4).unwrap().id, "w4");

        assert_eq!(picker.visible(&wallets[..3]).len(), 3);
    }
}
