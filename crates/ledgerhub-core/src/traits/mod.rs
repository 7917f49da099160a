//! Collaborator contracts consumed by the maintenance workers.
//!
//! Each trait is defined here in `ledgerhub-core` and implemented by the
//! crate owning the concern: the database crate implements the settings
//! store and tenant registry, the service crate implements the backup
//! producer, the automation sink, and the subscription reconciler.

pub mod automation;
pub mod backup;
pub mod settings;
pub mod subscription;
pub mod tenant;

pub use automation::AutomationSink;
pub use backup::{BackupArtifact, BackupOptions, BackupProvider};
pub use settings::{SettingsStore, SYSTEM_OWNER_ID};
pub use subscription::SubscriptionReconciler;
pub use tenant::TenantRegistry;
