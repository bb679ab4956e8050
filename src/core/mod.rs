//! Platform-agnostic building blocks shared by native and browser builds

pub mod names;
pub mod registry;
pub mod truncate;

pub use registry::{DownloadLinks, Platform, WalletDescriptor, WalletFamily, WalletRegistry};
pub use truncate::{truncate_address, DEFAULT_TRUNCATE_LEN};
