use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use common::ScanState;

use crate::scanner::ScanCycle;

/// Cloneable view of the scheduler, for observing cycle progress.
#[derive(Clone)]
pub struct SchedulerHandle {
    state: Arc<RwLock<ScanState>>,
    cycles: Arc<AtomicU64>,
}

impl SchedulerHandle {
    pub async fn state(&self) -> ScanState {
        *self.state.read().await
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }
}

/// Runs a scan cycle at startup and then once per period, forever.
///
/// The cycle is awaited inline, so a tick that comes due while a cycle is
/// Running is dropped rather than starting a second scan.
pub struct Scheduler {
    runner: Arc<dyn ScanCycle>,
    period: Duration,
    state: Arc<RwLock<ScanState>>,
    cycles: Arc<AtomicU64>,
}

impl Scheduler {
    pub fn new(runner: Arc<dyn ScanCycle>, period: Duration) -> (Self, SchedulerHandle) {
        let state = Arc::new(RwLock::new(ScanState::Idle));
        let cycles = Arc::new(AtomicU64::new(0));

        let handle = SchedulerHandle {
            state: state.clone(),
            cycles: cycles.clone(),
        };

        let scheduler = Scheduler {
            runner,
            period,
            state,
            cycles,
        };

        (scheduler, handle)
    }

    /// Run the schedule. Never returns; call from `tokio::spawn`.
    pub async fn run(self) {
        info!(period = ?self.period, "Scheduler running");

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            // The first tick completes immediately.
            ticker.tick().await;
            self.run_once().await;
        }
    }

    async fn run_once(&self) {
        *self.state.write().await = ScanState::Running;
        let summary = self.runner.run_cycle().await;
        *self.state.write().await = ScanState::Idle;

        let n = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(cycle = n, analyzed = summary.analyzed, "Scan cycle finished, waiting for next tick");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use chrono::Utc;
    use common::ScanSummary;

    use super::*;

    #[derive(Default)]
    struct SlowCycle {
        delay: Duration,
        active: AtomicUsize,
        max_active: AtomicUsize,
        runs: AtomicUsize,
    }

    #[async_trait]
    impl ScanCycle for SlowCycle {
        async fn run_cycle(&self) -> ScanSummary {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            self.runs.fetch_add(1, Ordering::SeqCst);
            ScanSummary::new(Utc::now())
        }
    }

    #[tokio::test]
    async fn first_cycle_runs_immediately() {
        let cycle = Arc::new(SlowCycle::default());
        let (scheduler, handle) = Scheduler::new(cycle.clone(), Duration::from_secs(3600));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();

        assert_eq!(cycle.runs.load(Ordering::SeqCst), 1);
        assert_eq!(handle.cycles_completed(), 1);
        assert_eq!(handle.state().await, ScanState::Idle);
    }

    #[tokio::test]
    async fn cycles_never_overlap_when_slower_than_period() {
        let cycle = Arc::new(SlowCycle {
            delay: Duration::from_millis(40),
            ..SlowCycle::default()
        });
        let (scheduler, handle) = Scheduler::new(cycle.clone(), Duration::from_millis(5));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(300)).await;
        task.abort();

        assert_eq!(cycle.max_active.load(Ordering::SeqCst), 1);
        assert!(handle.cycles_completed() >= 2, "expected repeated cycles");
    }

    #[tokio::test]
    async fn state_is_running_during_cycle() {
        let cycle = Arc::new(SlowCycle {
            delay: Duration::from_millis(300),
            ..SlowCycle::default()
        });
        let (scheduler, handle) = Scheduler::new(cycle, Duration::from_secs(3600));
        let task = tokio::spawn(scheduler.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.state().await, ScanState::Running);
        assert_eq!(handle.cycles_completed(), 0);
        task.abort();
    }
}
