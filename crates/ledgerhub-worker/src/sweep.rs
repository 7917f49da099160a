//! Periodic subscription sweep worker.
//!
//! Runs independently of the backup loop: an initial startle delay, then
//! a fixed hourly cadence. Each cycle warns tenants whose trial is about
//! to end, reconciles every subscribed tenant's status, and flags overdue
//! invoices.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use tokio::sync::watch;
use tracing::{error, info, warn};

use ledgerhub_core::events::AutomationEvent;
use ledgerhub_core::result::AppResult;
use ledgerhub_core::traits::automation::AutomationSink;
use ledgerhub_core::traits::subscription::SubscriptionReconciler;
use ledgerhub_core::types::TenantId;
use ledgerhub_entity::sale::OverdueSummary;
use ledgerhub_entity::subscription::ExpiringTrial;

use crate::wait::sleep_or_shutdown;

/// Delay before the first sweep after startup, giving migrations and the
/// connection pool time to settle.
const STARTUP_DELAY: Duration = Duration::from_secs(2 * 60);

/// Cadence between successful sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shorter backoff when the schema is missing or the store unreachable.
const SCHEMA_BACKOFF: Duration = Duration::from_secs(10 * 60);

/// Backoff after any other cycle error.
const ERROR_BACKOFF: Duration = Duration::from_secs(60 * 60);

/// How many days ahead a trial end date triggers a warning.
const TRIAL_WARNING_DAYS: i64 = 3;

/// Data access needed by the sweep — kept behind a trait so the worker
/// does not depend on a live database.
#[async_trait]
pub trait SweepStore: Send + Sync + std::fmt::Debug {
    /// Check that the subscription schema is present and reachable.
    async fn schema_ready(&self) -> AppResult<bool>;

    /// Trial subscriptions whose end date falls within the window.
    async fn trials_ending_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<ExpiringTrial>>;

    /// Every tenant holding at least one subscription row.
    async fn tenants_with_subscriptions(&self) -> AppResult<Vec<TenantId>>;

    /// Per-tenant overdue invoice counts.
    async fn overdue_counts(&self, now: DateTime<Utc>) -> AppResult<Vec<OverdueSummary>>;
}

/// Outcome of one sweep cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Full pass over trials, reconciliation, and overdue invoices.
    Completed {
        /// Trial-ending events dispatched.
        trial_notices: usize,
        /// Payment-overdue events dispatched.
        overdue_notices: usize,
    },
    /// Schema missing or store unreachable; nothing was swept.
    SchemaNotReady,
}

/// Sweeps tenant subscriptions for time-based conditions.
#[derive(Debug)]
pub struct SubscriptionSweepWorker {
    /// Subscription and sales queries.
    store: Arc<dyn SweepStore>,
    /// Automation event sink.
    sink: Arc<dyn AutomationSink>,
    /// Per-tenant status reconciliation.
    reconciler: Arc<dyn SubscriptionReconciler>,
}

impl SubscriptionSweepWorker {
    /// Create a new sweep worker.
    pub fn new(
        store: Arc<dyn SweepStore>,
        sink: Arc<dyn AutomationSink>,
        reconciler: Arc<dyn SubscriptionReconciler>,
    ) -> Self {
        Self {
            store,
            sink,
            reconciler,
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!("Subscription sweep worker started");

        if sleep_or_shutdown(&mut cancel, STARTUP_DELAY).await {
            info!("Subscription sweep worker stopped");
            return;
        }

        loop {
            if *cancel.borrow() {
                break;
            }

            let wait = match self.sweep_once().await {
                Ok(SweepOutcome::Completed {
                    trial_notices,
                    overdue_notices,
                }) => {
                    info!(trial_notices, overdue_notices, "Subscription sweep finished");
                    SWEEP_INTERVAL
                }
                Ok(SweepOutcome::SchemaNotReady) => SCHEMA_BACKOFF,
                Err(e) => {
                    error!(error = %e, "Subscription sweep failed; backing off");
                    ERROR_BACKOFF
                }
            };

            if sleep_or_shutdown(&mut cancel, wait).await {
                break;
            }
        }

        info!("Subscription sweep worker stopped");
    }

    /// One sweep pass.
    pub async fn sweep_once(&self) -> AppResult<SweepOutcome> {
        match self.store.schema_ready().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Subscription schema not migrated yet; skipping sweep");
                return Ok(SweepOutcome::SchemaNotReady);
            }
            Err(e) => {
                warn!(error = %e, "Data store unreachable; skipping sweep");
                return Ok(SweepOutcome::SchemaNotReady);
            }
        }

        let now = Utc::now();
        let (from, until) = trial_window(now);

        let mut trial_notices = 0usize;
        for trial in self.store.trials_ending_between(from, until).await? {
            let event = AutomationEvent::TrialEnding {
                tenant_id: trial.tenant_id,
                trial_ends_at: trial.trial_ends_at,
            };
            match self.sink.notify(&event).await {
                Ok(()) => trial_notices += 1,
                Err(e) => {
                    warn!(
                        tenant_id = %trial.tenant_id,
                        error = %e,
                        "Failed to dispatch trial-ending event"
                    );
                }
            }
        }

        for tenant_id in self.store.tenants_with_subscriptions().await? {
            if let Err(e) = self.reconciler.check_status(tenant_id).await {
                warn!(%tenant_id, error = %e, "Subscription reconciliation failed");
            }
        }

        let mut overdue_notices = 0usize;
        for summary in self.store.overdue_counts(now).await? {
            if summary.overdue_count <= 0 {
                continue;
            }
            let event = AutomationEvent::PaymentOverdue {
                tenant_id: summary.tenant_id,
                overdue_count: summary.overdue_count as u64,
            };
            match self.sink.notify(&event).await {
                Ok(()) => overdue_notices += 1,
                Err(e) => {
                    warn!(
                        tenant_id = %summary.tenant_id,
                        error = %e,
                        "Failed to dispatch payment-overdue event"
                    );
                }
            }
        }

        Ok(SweepOutcome::Completed {
            trial_notices,
            overdue_notices,
        })
    }
}

/// The `[now, now + warning window]` range for trial-ending notices.
fn trial_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now, now + TimeDelta::days(TRIAL_WARNING_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use ledgerhub_core::error::AppError;

    /// In-memory sweep store; the trial query filters by the window the
    /// worker passes, like the real repository does.
    #[derive(Debug, Default)]
    struct MemorySweepStore {
        ready: bool,
        unreachable: bool,
        trials: Vec<ExpiringTrial>,
        tenants: Vec<TenantId>,
        overdue: Vec<OverdueSummary>,
    }

    #[async_trait]
    impl SweepStore for MemorySweepStore {
        async fn schema_ready(&self) -> AppResult<bool> {
            if self.unreachable {
                return Err(AppError::database("connection refused"));
            }
            Ok(self.ready)
        }

        async fn trials_ending_between(
            &self,
            from: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> AppResult<Vec<ExpiringTrial>> {
            Ok(self
                .trials
                .iter()
                .filter(|t| t.trial_ends_at >= from && t.trial_ends_at <= until)
                .cloned()
                .collect())
        }

        async fn tenants_with_subscriptions(&self) -> AppResult<Vec<TenantId>> {
            Ok(self.tenants.clone())
        }

        async fn overdue_counts(&self, _now: DateTime<Utc>) -> AppResult<Vec<OverdueSummary>> {
            Ok(self.overdue.clone())
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Mutex<Vec<AutomationEvent>>,
    }

    #[async_trait]
    impl AutomationSink for RecordingSink {
        async fn notify(&self, event: &AutomationEvent) -> AppResult<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct RecordingReconciler {
        checked: Mutex<Vec<TenantId>>,
    }

    #[async_trait]
    impl SubscriptionReconciler for RecordingReconciler {
        async fn check_status(&self, tenant_id: TenantId) -> AppResult<()> {
            self.checked.lock().unwrap().push(tenant_id);
            Ok(())
        }
    }

    fn sweep_worker(
        store: MemorySweepStore,
    ) -> (
        SubscriptionSweepWorker,
        Arc<RecordingSink>,
        Arc<RecordingReconciler>,
    ) {
        let sink = Arc::new(RecordingSink::default());
        let reconciler = Arc::new(RecordingReconciler::default());
        let worker = SubscriptionSweepWorker::new(
            Arc::new(store),
            Arc::clone(&sink) as Arc<dyn AutomationSink>,
            Arc::clone(&reconciler) as Arc<dyn SubscriptionReconciler>,
        );
        (worker, sink, reconciler)
    }

    #[tokio::test]
    async fn test_trial_ending_within_window_fires_event() {
        let now = Utc::now();
        let store = MemorySweepStore {
            ready: true,
            trials: vec![
                ExpiringTrial {
                    tenant_id: TenantId::new(1),
                    trial_ends_at: now + TimeDelta::days(2),
                },
                ExpiringTrial {
                    tenant_id: TenantId::new(2),
                    trial_ends_at: now + TimeDelta::days(10),
                },
            ],
            ..Default::default()
        };
        let (worker, sink, _) = sweep_worker(store);

        let outcome = worker.sweep_once().await.unwrap();
        assert_eq!(
            outcome,
            SweepOutcome::Completed {
                trial_notices: 1,
                overdue_notices: 0
            }
        );

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "TrialEnding");
        assert_eq!(events[0].tenant_id(), Some(TenantId::new(1)));
    }

    #[tokio::test]
    async fn test_overdue_counts_fire_events_and_reconciliation_runs() {
        let store = MemorySweepStore {
            ready: true,
            tenants: vec![TenantId::new(1), TenantId::new(2)],
            overdue: vec![
                OverdueSummary {
                    tenant_id: TenantId::new(1),
                    overdue_count: 4,
                },
                OverdueSummary {
                    tenant_id: TenantId::new(2),
                    overdue_count: 0,
                },
            ],
            ..Default::default()
        };
        let (worker, sink, reconciler) = sweep_worker(store);

        let outcome = worker.sweep_once().await.unwrap();
        assert_eq!(
            outcome,
            SweepOutcome::Completed {
                trial_notices: 0,
                overdue_notices: 1
            }
        );

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            AutomationEvent::PaymentOverdue {
                tenant_id: TenantId::new(1),
                overdue_count: 4
            }
        );

        assert_eq!(
            *reconciler.checked.lock().unwrap(),
            vec![TenantId::new(1), TenantId::new(2)]
        );
    }

    #[tokio::test]
    async fn test_missing_schema_skips_cycle() {
        let store = MemorySweepStore {
            ready: false,
            tenants: vec![TenantId::new(1)],
            ..Default::default()
        };
        let (worker, sink, reconciler) = sweep_worker(store);

        let outcome = worker.sweep_once().await.unwrap();
        assert_eq!(outcome, SweepOutcome::SchemaNotReady);
        assert!(sink.events.lock().unwrap().is_empty());
        assert!(reconciler.checked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_store_skips_cycle_without_error() {
        let store = MemorySweepStore {
            unreachable: true,
            ..Default::default()
        };
        let (worker, sink, _) = sweep_worker(store);

        let outcome = worker.sweep_once().await.unwrap();
        assert_eq!(outcome, SweepOutcome::SchemaNotReady);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_trial_window_spans_three_days() {
        let now = Utc::now();
        let (from, until) = trial_window(now);
        assert_eq!(from, now);
        assert_eq!(until - from, TimeDelta::days(3));
    }
}
