//! Tenant account status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account status for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "tenant_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    /// Tenant has a paid, active subscription.
    Active,
    /// Tenant is in its evaluation period.
    Trial,
    /// Tenant is suspended and excluded from maintenance work.
    Suspended,
}

impl TenantStatus {
    /// Statuses whose tenants are included in the scheduled backup run.
    pub const BACKUP_ELIGIBLE: [TenantStatus; 2] = [TenantStatus::Active, TenantStatus::Trial];

    /// Check if tenants with this status receive scheduled backups.
    pub fn is_backup_eligible(&self) -> bool {
        matches!(self, Self::Active | Self::Trial)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trial => "trial",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TenantStatus {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "trial" => Ok(Self::Trial),
            "suspended" => Ok(Self::Suspended),
            _ => Err(crate::AppError::validation(format!(
                "Invalid tenant status: '{s}'. Expected one of: active, trial, suspended"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_eligibility() {
        assert!(TenantStatus::Active.is_backup_eligible());
        assert!(TenantStatus::Trial.is_backup_eligible());
        assert!(!TenantStatus::Suspended.is_backup_eligible());
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("Trial".parse::<TenantStatus>().unwrap(), TenantStatus::Trial);
        assert!("unknown".parse::<TenantStatus>().is_err());
    }
}
