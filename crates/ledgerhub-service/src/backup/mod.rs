//! Tenant backup production.

pub mod service;

pub use service::BackupService;
