//! LedgerHub Server — Multi-Tenant Retail & Billing Platform
//!
//! Main entry point that wires all crates together and runs the
//! background maintenance workers.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use ledgerhub_core::config::AppConfig;
use ledgerhub_core::error::AppError;
use ledgerhub_core::traits::settings::SYSTEM_OWNER_ID;
use ledgerhub_database::repositories::{
    NotificationRepository, SaleRepository, SettingRepository, SubscriptionRepository,
    TenantRepository,
};
use ledgerhub_entity::setting::keys;
use ledgerhub_service::{AutomationService, BackupService, SubscriptionService};
use ledgerhub_storage::LocalBackupStore;
use ledgerhub_worker::{BackupWorker, DatabaseSweepStore, SubscriptionSweepWorker};

#[tokio::main]
async fn main() {
    let env = std::env::var("LEDGERHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LedgerHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = ledgerhub_database::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    ledgerhub_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Initialize repositories ──────────────────────────
    let setting_repo = Arc::new(SettingRepository::new(db.pool().clone()));
    let tenant_repo = Arc::new(TenantRepository::new(db.pool().clone()));
    let subscription_repo = Arc::new(SubscriptionRepository::new(db.pool().clone()));
    let sale_repo = Arc::new(SaleRepository::new(db.pool().clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db.pool().clone()));

    seed_backup_schedule_defaults(&setting_repo).await?;

    // ── Step 3: Initialize backup storage ────────────────────────
    tracing::info!(
        directory = %config.backup.directory,
        "Initializing backup store..."
    );
    let backup_store = Arc::new(LocalBackupStore::new(&config.backup.directory).await?);

    // ── Step 4: Initialize services ──────────────────────────────
    let backup_service = Arc::new(BackupService::new(
        Arc::clone(&tenant_repo),
        Arc::clone(&subscription_repo),
        Arc::clone(&sale_repo),
        Arc::clone(&backup_store),
    ));
    let subscription_service = Arc::new(SubscriptionService::new(Arc::clone(&subscription_repo)));
    let automation_service = Arc::new(AutomationService::new(Arc::clone(&notification_repo)));
    tracing::info!("Services initialized");

    // ── Step 5: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 6: Start background workers ─────────────────────────
    let mut worker_handles = Vec::new();

    if config.worker.backup_enabled {
        let worker = BackupWorker::new(
            Arc::clone(&setting_repo) as _,
            Arc::clone(&tenant_repo) as _,
            Arc::clone(&backup_service) as _,
        );
        let cancel = shutdown_rx.clone();
        worker_handles.push(tokio::spawn(async move {
            worker.run(cancel).await;
        }));
    } else {
        tracing::info!("Backup worker disabled");
    }

    if config.worker.sweep_enabled {
        let sweep_store = Arc::new(DatabaseSweepStore::new(
            Arc::clone(&subscription_repo),
            Arc::clone(&sale_repo),
        ));
        let worker = SubscriptionSweepWorker::new(
            sweep_store as _,
            Arc::clone(&automation_service) as _,
            Arc::clone(&subscription_service) as _,
        );
        let cancel = shutdown_rx.clone();
        worker_handles.push(tokio::spawn(async move {
            worker.run(cancel).await;
        }));
    } else {
        tracing::info!("Subscription sweep worker disabled");
    }

    // ── Step 7: Wait for shutdown signal ─────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping workers...");
    let _ = shutdown_tx.send(true);

    for handle in worker_handles {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    db.close().await;
    tracing::info!("LedgerHub shut down gracefully");
    Ok(())
}

/// Seed the backup schedule settings with safe defaults on first boot.
///
/// Only missing keys are written; operator-set values are never touched.
async fn seed_backup_schedule_defaults(settings: &SettingRepository) -> Result<(), AppError> {
    let defaults = [
        (keys::BACKUP_SCHEDULE_ENABLED, "false"),
        (keys::BACKUP_SCHEDULE_TIME, "21:00"),
        (keys::BACKUP_SCHEDULE_FREQUENCY, "daily"),
        (keys::BACKUP_RETENTION_DAYS, "30"),
    ];

    for (key, value) in defaults {
        if settings.set_if_absent(SYSTEM_OWNER_ID, key, value).await? {
            tracing::info!(key, value, "Seeded default backup setting");
        }
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
