// ── Periodic scheduler ──
//
// Run-to-completion loop: one cycle, then a sleep measured from the end of
// that cycle. Cycles never overlap and missed ticks are never caught up.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// A unit of periodic work. Implementations contain their own failures.
pub trait CollectionCycle: Send + Sync + 'static {
    fn run_cycle(&self) -> impl Future<Output = ()> + Send;
}

impl CollectionCycle for crate::Collector {
    fn run_cycle(&self) -> impl Future<Output = ()> + Send {
        crate::Collector::run_cycle(self)
    }
}

/// Drive `cycle` until `cancel` fires.
///
/// The first cycle starts immediately. Cancellation is observed before each
/// cycle and while sleeping; a cycle already in flight runs to completion.
/// Each cycle runs on its own task so a panic ends that cycle only.
pub async fn run_periodic<C: CollectionCycle>(
    cycle: Arc<C>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let current = Arc::clone(&cycle);
        let handle = tokio::spawn(async move { current.run_cycle().await });
        if let Err(e) = handle.await {
            error!(error = %e, "collection cycle panicked");
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    debug!("periodic collection stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::Instant;

    use super::*;

    /// Records when each cycle started and how many finished.
    #[derive(Default)]
    struct RecordingCycle {
        work: Duration,
        panic_on_first: bool,
        starts: Mutex<Vec<Instant>>,
        finished: AtomicUsize,
    }

    impl RecordingCycle {
        fn taking(work: Duration) -> Self {
            Self {
                work,
                ..Self::default()
            }
        }

        fn started(&self) -> usize {
            self.starts.lock().unwrap().len()
        }

        fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    impl CollectionCycle for RecordingCycle {
        async fn run_cycle(&self) {
            let first = {
                let mut starts = self.starts.lock().unwrap();
                starts.push(Instant::now());
                starts.len() == 1
            };
            assert!(!(self.panic_on_first && first), "first cycle blew up");
            if !self.work.is_zero() {
                tokio::time::sleep(self.work).await;
            }
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_cycle_is_immediate_then_every_interval() {
        let cycle = Arc::new(RecordingCycle::default());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_periodic(
            Arc::clone(&cycle),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cycle.started(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(cycle.started(), 2);

        cancel.cancel();
        task.await.unwrap();
        assert_eq!(cycle.finished(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_measured_from_cycle_end() {
        let cycle = Arc::new(RecordingCycle::taking(Duration::from_secs(10)));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_periodic(
            Arc::clone(&cycle),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(75)).await;
        cancel.cancel();
        task.await.unwrap();

        let starts = cycle.starts.lock().unwrap().clone();
        assert_eq!(starts.len(), 2);
        let gap = starts[1] - starts[0];
        assert!(gap >= Duration::from_secs(70), "gap was {gap:?}");
        assert!(gap < Duration::from_secs(71), "gap was {gap:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_prevents_any_cycle() {
        let cycle = Arc::new(RecordingCycle::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        run_periodic(Arc::clone(&cycle), Duration::from_secs(60), cancel).await;

        assert_eq!(cycle.started(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_cycle_completes_after_cancel() {
        let cycle = Arc::new(RecordingCycle::taking(Duration::from_secs(10)));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_periodic(
            Arc::clone(&cycle),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(5)).await;
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(cycle.started(), 1);
        assert_eq!(cycle.finished(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_cycle_does_not_stop_the_loop() {
        let cycle = Arc::new(RecordingCycle {
            panic_on_first: true,
            ..RecordingCycle::default()
        });
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_periodic(
            Arc::clone(&cycle),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(61)).await;
        cancel.cancel();
        task.await.unwrap();

        assert_eq!(cycle.started(), 2);
        assert_eq!(cycle.finished(), 1);
    }
}
