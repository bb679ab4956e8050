//! Persistence Tests: last-used EVM connector survives a restart
//!
//! Run with: cargo test --test persistence_tests

#![cfg(feature = "native")]

use std::rc::Rc;
use tempfile::TempDir;

use walletlink::memory::{MemoryConnector, RecordingNavigator};
use walletlink::{
    ConnectConfig, FileStorage, KeyValueStorage, SessionController, WalletDescriptor,
    WalletRegistry,
};

fn controller(storage: Rc<FileStorage>, config: ConnectConfig) -> SessionController {
    let registry = WalletRegistry::new(vec![
        WalletDescriptor::evm("metamask", "Metamask", "metaMask", 1).installed(true),
        WalletDescriptor::evm("walletconnect", "WalletConnect", "walletConnect", 2).installed(true),
    ]);
    SessionController::new(
        config,
        registry,
        Rc::new(MemoryConnector::new("0xabc")),
        storage,
        Rc::new(RecordingNavigator::new()),
    )
}

#[tokio::test]
async fn last_wallet_survives_restart() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("walletlink.json");

    {
        let first = controller(Rc::new(FileStorage::open(&path)), ConnectConfig::new(56));
        assert_eq!(first.last_wallet(), None);
        first.request_connect_by_id("walletconnect").await.unwrap();
    }

    let second = controller(Rc::new(FileStorage::open(&path)), ConnectConfig::new(56));
    assert_eq!(second.last_wallet().as_deref(), Some("walletConnect"));
}

#[tokio::test]
async fn custom_storage_key() {
    let dir = TempDir::new().expect("tempdir");
    let storage = Rc::new(FileStorage::open(dir.path().join("walletlink.json")));
    let config = ConnectConfig::new(1).with_storage_key("lastConnector");

    controller(storage.clone(), config).request_connect_by_id("metamask").await.unwrap();

    assert_eq!(storage.get("lastConnector").unwrap().as_deref(), Some("metaMask"));
    assert_eq!(storage.get("wallet").unwrap(), None);
}

#[tokio::test]
async fn corrupt_file_does_not_block_login() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("walletlink.json");
    std::fs::write(&path, "not json").unwrap();

    let controller = controller(Rc::new(FileStorage::open(&path)), ConnectConfig::new(56));
    assert_eq!(controller.last_wallet(), None);

    controller.request_connect_by_id("metamask").await.unwrap();
    assert_eq!(controller.app_state().evm_account.as_deref(), Some("0xabc"));
}
