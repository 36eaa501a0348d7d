use super::poller::{PollRequest, StatusPoller};
use super::types::GetParams;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How a scheduled poll ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    Completed,
    Cancelled,
    /// The poller panicked; none of its handlers may have run.
    Panicked,
}

/// A status poll that starts after a fixed delay.
///
/// Dropping the handle leaves the poll running. Call [`ScheduledPoll::cancel`]
/// when whoever owns the handlers goes away; if that happens before the delay
/// elapses the poller is never invoked.
#[derive(Debug)]
pub struct ScheduledPoll {
    delay: Duration,
    params: GetParams,
    handle: JoinHandle<()>,
}

/// Spawns a task that sleeps for `delay`, then hands `request` to `poller`.
///
/// Must be called from within a tokio runtime.
pub fn schedule_poll(
    poller: Arc<dyn StatusPoller>,
    request: PollRequest,
    delay: Duration,
) -> ScheduledPoll {
    let params = request.get_params.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        debug!(
            job_id = %request.get_params.job_id,
            job_type = %request.get_params.job_type,
            "Starting status poll"
        );
        poller.poll(request).await;
    });

    ScheduledPoll {
        delay,
        params,
        handle,
    }
}

impl ScheduledPoll {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn params(&self) -> &GetParams {
        &self.params
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> PollExit {
        match self.handle.await {
            Ok(()) => PollExit::Completed,
            Err(e) if e.is_cancelled() => PollExit::Cancelled,
            Err(e) => {
                warn!(job_id = %self.params.job_id, error = %e, "Status poll panicked");
                PollExit::Panicked
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::poller::PollHandlers;
    use crate::jobs::JobType;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct ChannelPoller(mpsc::UnboundedSender<GetParams>);

    #[async_trait]
    impl StatusPoller for ChannelPoller {
        async fn poll(&self, request: PollRequest) {
            let _ = self.0.send(request.get_params);
        }
    }

    fn request() -> PollRequest {
        PollRequest {
            api_url: "http://localhost".to_string(),
            get_params: GetParams {
                user_id: "u1".to_string(),
                job_id: "j1".to_string(),
                job_type: JobType::FileExtraction,
            },
            handlers: PollHandlers::noop(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_waits_for_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduled = schedule_poll(Arc::new(ChannelPoller(tx)), request(), Duration::from_secs(5));
        assert_eq!(scheduled.delay(), Duration::from_secs(5));

        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(scheduled.join().await, PollExit::Completed);
        assert_eq!(rx.try_recv().unwrap().job_id, "j1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_delay_skips_poll() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduled = schedule_poll(Arc::new(ChannelPoller(tx)), request(), Duration::from_secs(5));

        tokio::time::advance(Duration::from_secs(1)).await;
        scheduled.cancel();
        assert_eq!(scheduled.join().await, PollExit::Cancelled);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    struct PanickingPoller;

    #[async_trait]
    impl StatusPoller for PanickingPoller {
        async fn poll(&self, _request: PollRequest) {
            panic!("status backend unavailable");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_poller_is_not_reported_as_cancelled() {
        let scheduled = schedule_poll(Arc::new(PanickingPoller), request(), Duration::from_secs(5));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(scheduled.join().await, PollExit::Panicked);
    }
}
