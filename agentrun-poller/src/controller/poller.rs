//! Status polling loop
//!
//! One task per run. The task sleeps, issues one status request, waits for
//! the response, hands it to the state machine, and only then sleeps again.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::Inner;
use super::machine::Verdict;

pub(super) struct PollTask {
    pub run_id: String,
    pub generation: u64,
    pub token: CancellationToken,
    /// Wait one interval before the first request
    pub delay_first: bool,
}

pub(super) fn spawn(inner: Arc<Inner>, task: PollTask) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(inner, task))
}

async fn run(inner: Arc<Inner>, task: PollTask) {
    let PollTask {
        run_id,
        generation,
        token,
        delay_first,
    } = task;

    info!(
        "Polling run {} of {} every {:?}",
        run_id,
        inner.client.agent_name(),
        inner.interval
    );

    let mut wait = delay_first;
    let mut polls: u64 = 0;

    loop {
        if wait {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Polling of run {} cancelled", run_id);
                    return;
                }
                _ = inner.scheduler.sleep(inner.interval) => {}
            }
        }
        wait = true;

        if token.is_cancelled() {
            return;
        }

        polls += 1;
        debug!("Poll #{} for run {}", polls, run_id);

        // Not raced against cancellation: an in-flight request completes and
        // the machine discards its result.
        let result = inner.client.get_status(&run_id).await;

        match result {
            Ok(state) => {
                match inner.accept(generation, &state) {
                    Verdict::Continue | Verdict::Stale => {}
                    Verdict::Finished => {
                        info!(
                            "Run {} finished with status {} after {} poll(s)",
                            run_id, state.status, polls
                        );
                        return;
                    }
                    Verdict::Discarded => return,
                }
            }
            Err(e) => {
                error!("Failed to poll run {}: {}", run_id, e);
                inner.machine().fail(generation, e);
                return;
            }
        }
    }
}
