use std::time::Instant;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::http::{RequestExecutor, RequestSpec};
use crate::metrics::{
    AbortReason, RequestResult, ResultAggregator, RunOutcome, RunStatistics, Termination,
};
use crate::shutdown::ShutdownReceiver;

use super::policy::AbortPolicy;

const CANCELLED_ERROR: &str = "cancelled";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted(AbortReason),
}

impl RunState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted(_))
    }
}

/// One completed request together with the statistics that include it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSample {
    pub result: RequestResult,
    pub statistics: RunStatistics,
}

/// Drives the requests of one run strictly one after another.
///
/// Samples are pulled with [`RunController::next_sample`] or pushed to a
/// channel with [`RunController::run`]. Once a terminal state is reached the
/// controller yields nothing more.
pub struct RunController<'spec, E> {
    spec: &'spec RequestSpec,
    executor: E,
    policy: AbortPolicy,
    aggregator: ResultAggregator,
    state: RunState,
    next_index: u64,
    shutdown_rx: Option<ShutdownReceiver>,
}

impl<'spec, E> RunController<'spec, E>
where
    E: RequestExecutor,
{
    #[must_use]
    pub fn new(spec: &'spec RequestSpec, executor: E) -> Self {
        let capacity = usize::try_from(spec.count().get()).unwrap_or_default();
        Self {
            spec,
            executor,
            policy: AbortPolicy::default(),
            aggregator: ResultAggregator::with_capacity(capacity),
            state: RunState::Idle,
            next_index: 0,
            shutdown_rx: None,
        }
    }

    /// Stops the run with `Aborted(Cancelled)` once a shutdown is broadcast.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown_rx: ShutdownReceiver) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn statistics(&self) -> RunStatistics {
        self.aggregator.statistics()
    }

    /// How the run ended, or `None` while it can still produce samples.
    #[must_use]
    pub const fn termination(&self) -> Option<Termination> {
        match self.state {
            RunState::Completed => Some(Termination::Completed),
            RunState::Aborted(reason) => Some(Termination::Aborted(reason)),
            RunState::Idle | RunState::Running => None,
        }
    }

    /// Executes the next request and returns it with the updated statistics.
    /// Returns `None` once the run is over.
    pub async fn next_sample(&mut self) -> Option<RunSample> {
        match self.state {
            RunState::Completed | RunState::Aborted(_) => return None,
            RunState::Idle => {
                info!(
                    "Starting run: {} {} x{}",
                    self.spec.method().as_str(),
                    self.spec.url(),
                    self.spec.count().get()
                );
                self.state = RunState::Running;
            }
            RunState::Running => {}
        }

        if self.next_index >= self.spec.count().get() {
            self.finish_with(RunState::Completed);
            return None;
        }
        if self.shutdown_pending() {
            self.finish_with(RunState::Aborted(AbortReason::Cancelled));
            return None;
        }

        let index = self.next_index;
        let (result, cancelled) = self.execute(index).await;
        let statistics = self.aggregator.append(result.clone());

        self.next_index = index.saturating_add(1);
        if cancelled {
            self.finish_with(RunState::Aborted(AbortReason::Cancelled));
        } else if self.next_index >= self.spec.count().get() {
            // Count exhausted: a full run is never reported as aborted.
            self.finish_with(RunState::Completed);
        } else if self.policy.should_abort(index, &statistics) {
            self.finish_with(RunState::Aborted(AbortReason::ErrorRateExceeded {
                error_rate: statistics.error_rate,
                threshold: self.policy.threshold(),
            }));
        }

        Some(RunSample { result, statistics })
    }

    /// Runs to the end, forwarding every sample to `sink`.
    pub async fn run(mut self, sink: mpsc::Sender<RunSample>) -> RunOutcome {
        let mut sink = Some(sink);
        while let Some(sample) = self.next_sample().await {
            if let Some(tx) = sink.as_ref()
                && tx.send(sample).await.is_err()
            {
                debug!("Sample receiver dropped; continuing without it.");
                sink = None;
            }
        }
        self.finish()
    }

    /// Consumes the controller. A run stopped before reaching a terminal
    /// state is reported as cancelled.
    #[must_use]
    pub fn finish(self) -> RunOutcome {
        let termination = self
            .termination()
            .unwrap_or(Termination::Aborted(AbortReason::Cancelled));
        let statistics = self.aggregator.statistics();
        RunOutcome {
            requested: self.spec.count().get(),
            termination,
            statistics,
            results: self.aggregator.into_results(),
        }
    }

    async fn execute(&mut self, index: u64) -> (RequestResult, bool) {
        let Some(shutdown_rx) = self.shutdown_rx.as_mut() else {
            return (self.executor.execute(self.spec, index).await, false);
        };

        let started_at = Utc::now();
        let clock = Instant::now();
        tokio::select! {
            result = self.executor.execute(self.spec, index) => (result, false),
            () = wait_for_shutdown(shutdown_rx) => {
                let result = RequestResult::transport_failure(
                    index,
                    started_at,
                    clock.elapsed(),
                    false,
                    CANCELLED_ERROR.to_owned(),
                );
                (result, true)
            }
        }
    }

    fn shutdown_pending(&mut self) -> bool {
        let Some(shutdown_rx) = self.shutdown_rx.as_mut() else {
            return false;
        };
        match shutdown_rx.try_recv() {
            Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => true,
            Err(
                broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
            ) => false,
        }
    }

    fn finish_with(&mut self, state: RunState) {
        self.state = state;
        let statistics = self.aggregator.statistics();
        match state {
            RunState::Completed => info!(
                "Run completed: {} requests, error rate {:.2}%",
                statistics.total_requests,
                statistics.error_rate * 100.0
            ),
            RunState::Aborted(reason) => warn!(
                "Run aborted after {} of {} requests: {}",
                statistics.total_requests,
                self.spec.count().get(),
                reason
            ),
            RunState::Idle | RunState::Running => {}
        }
    }
}

async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    loop {
        match shutdown_rx.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => return,
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}
