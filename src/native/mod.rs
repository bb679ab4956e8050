//! Native platform pieces: file-backed persistence for the last-used wallet

mod storage;

pub use storage::FileStorage;
