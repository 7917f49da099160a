//! Repository implementations for all LedgerHub entities.

pub mod notification;
pub mod sale;
pub mod setting;
pub mod subscription;
pub mod tenant;

pub use notification::NotificationRepository;
pub use sale::SaleRepository;
pub use setting::SettingRepository;
pub use subscription::SubscriptionRepository;
pub use tenant::TenantRepository;
