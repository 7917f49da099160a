//! # ledgerhub-entity
//!
//! Domain entity models for LedgerHub: tenants, subscriptions, sales,
//! settings, and notifications. Models derive `sqlx::FromRow` and map
//! 1:1 onto the migration schema.

pub mod notification;
pub mod sale;
pub mod setting;
pub mod subscription;
pub mod tenant;
