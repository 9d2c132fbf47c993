//! One-second countdown that gates resubmission.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_secs(1);

/// Owns the ticker task that counts down. Starting again replaces the running
/// ticker; dropping the cooldown aborts it.
#[derive(Default)]
pub struct Cooldown {
    inner: Mutex<Ticker>,
}

#[derive(Default)]
struct Ticker {
    remaining: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u64 {
        self.inner.lock().remaining.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    /// Starts counting down from `seconds`. Must be called inside a tokio
    /// runtime.
    pub fn start(&self, seconds: u64) {
        let mut ticker = self.inner.lock();
        ticker.release();

        // A fresh counter per run, so an aborted ticker can't touch it.
        let remaining = Arc::new(AtomicU64::new(seconds));
        ticker.remaining = remaining.clone();

        if seconds == 0 {
            return;
        }

        ticker.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                let left = remaining
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        Some(n.saturating_sub(1))
                    })
                    .unwrap_or(0)
                    .saturating_sub(1);

                if left == 0 {
                    break;
                }
            }
        }));
    }

    /// Stops the countdown immediately.
    pub fn cancel(&self) {
        let mut ticker = self.inner.lock();
        ticker.release();
        ticker.remaining = Arc::new(AtomicU64::new(0));
    }
}

impl Drop for Cooldown {
    fn drop(&mut self) {
        self.inner.get_mut().release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_to_zero() {
        let cooldown = Cooldown::new();
        assert!(!cooldown.is_active());

        cooldown.start(3);
        assert_eq!(cooldown.remaining(), 3);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cooldown.remaining(), 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(cooldown.remaining(), 0);
        assert!(!cooldown.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_running_ticker() {
        let cooldown = Cooldown::new();
        cooldown.start(5);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(cooldown.remaining(), 3);

        cooldown.start(10);
        assert_eq!(cooldown.remaining(), 10);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(cooldown.remaining(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_zero() {
        let cooldown = Cooldown::new();
        cooldown.start(30);
        cooldown.cancel();
        assert_eq!(cooldown.remaining(), 0);

        cooldown.start(0);
        assert!(!cooldown.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_ticker() {
        let cooldown = Cooldown::new();
        cooldown.start(30);
        let handle = cooldown
            .inner
            .lock()
            .handle
            .as_ref()
            .map(|h| h.abort_handle())
            .unwrap();

        drop(cooldown);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(handle.is_finished());
    }
}
