//! Automation event dispatch.

pub mod service;

pub use service::AutomationService;
