//! # ledgerhub-storage
//!
//! Backup artifact storage for LedgerHub. The single provided backend
//! keeps artifacts in a flat local directory; the backup service layers
//! snapshot production on top of it.

pub mod local;

pub use local::LocalBackupStore;
