//! # ledgerhub-service
//!
//! Business logic services for LedgerHub. Each service implements one of
//! the collaborator contracts from `ledgerhub-core::traits` on top of the
//! repository and storage layers.

pub mod automation;
pub mod backup;
pub mod subscription;

pub use automation::AutomationService;
pub use backup::BackupService;
pub use subscription::SubscriptionService;
