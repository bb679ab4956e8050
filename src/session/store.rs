//! Store: shared application state written through a closed set of actions
//!
//! Single writer per dispatch; watchers get a snapshot after every action.

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalletType {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "phantom")]
    Phantom,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::None => "",
            WalletType::Phantom => "phantom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub wallet_type: WalletType,
    pub solana_address: String,
    pub evm_account: Option<String>,
    pub prompt_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetWalletType(WalletType),
    SetSolanaAddress(String),
    SetEvmAccount(Option<String>),
    OpenPrompt,
    DismissPrompt,
}

impl AppState {
    fn apply(&mut self, action: Action) {
        match action {
            Action::SetWalletType(wallet_type) => self.wallet_type = wallet_type,
            Action::SetSolanaAddress(address) => self.solana_address = address,
            Action::SetEvmAccount(account) => self.evm_account = account,
            Action::OpenPrompt => self.prompt_open = true,
            Action::DismissPrompt => self.prompt_open = false,
        }
    }
}

#[derive(Clone, Default)]
pub struct Store {
    state: Rc<RefCell<AppState>>,
    watchers: Rc<RefCell<Vec<mpsc::UnboundedSender<AppState>>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn dispatch(&self, action: Action) -> AppState {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.apply(action);
            state.clone()
        };
        self.watchers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
        snapshot
    }

    pub fn watch(&self) -> mpsc::UnboundedReceiver<AppState> {
        let (tx, rx) = mpsc::unbounded();
        self.watchers.borrow_mut().push(tx);
        rx
    }
}
