//! Cancellation-aware timed waits shared by the workers.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

/// Sleep for `duration` unless the shutdown signal fires first.
///
/// Returns `true` when shutdown was requested (a dropped sender also
/// counts as shutdown), `false` when the full duration elapsed.
pub(crate) async fn sleep_or_shutdown(
    cancel: &mut watch::Receiver<bool>,
    duration: Duration,
) -> bool {
    if *cancel.borrow() {
        return true;
    }
    tokio::select! {
        changed = cancel.changed() => match changed {
            Ok(()) => *cancel.borrow(),
            Err(_) => true,
        },
        _ = time::sleep(duration) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapses_without_signal() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(!sleep_or_shutdown(&mut rx, Duration::from_secs(60)).await);
    }

    #[tokio::test]
    async fn test_returns_on_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).expect("receiver alive");
        assert!(sleep_or_shutdown(&mut rx, Duration::from_secs(3600)).await);
    }

    #[tokio::test]
    async fn test_dropped_sender_counts_as_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        assert!(sleep_or_shutdown(&mut rx, Duration::from_secs(3600)).await);
    }
}
