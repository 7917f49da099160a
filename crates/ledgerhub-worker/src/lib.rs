//! # ledgerhub-worker
//!
//! Long-running maintenance workers for LedgerHub:
//!
//! - the scheduled backup orchestrator: schedule resolution from system
//!   settings, a global non-blocking run lock, sequential per-tenant
//!   backups, and age-based retention pruning
//! - the periodic subscription sweep: trial-expiry warnings, per-tenant
//!   status reconciliation, and overdue-payment notices
//!
//! Workers are plain async loops driven by a `watch` shutdown channel;
//! every timed wait observes cancellation.

pub mod backup;
pub mod retention;
pub mod schedule;
pub mod store;
pub mod sweep;

mod wait;

pub use backup::BackupWorker;
pub use store::DatabaseSweepStore;
pub use sweep::SubscriptionSweepWorker;
