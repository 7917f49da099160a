//! # ledgerhub-core
//!
//! Core crate for LedgerHub. Contains collaborator traits, configuration
//! schemas, typed identifiers, automation events, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other LedgerHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
