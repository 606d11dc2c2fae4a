//! Handle to a listening server: stop accepting, then drain in-flight
//! requests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long [`crate::HrmsServer::serve_until`] waits for in-flight requests.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// A server task started by [`crate::HrmsServer::listen`].
pub struct ServerHandle {
    addr: SocketAddr,
    task: JoinHandle<()>,
    stop: CancellationToken,
}

impl ServerHandle {
    pub(crate) fn new(addr: SocketAddr, task: JoinHandle<()>, stop: CancellationToken) -> Self {
        Self { addr, task, stop }
    }

    /// Bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait up to `timeout` for open ones.
    ///
    /// Returns `false` if the task had to be aborted.
    pub async fn stop(mut self, timeout: Duration) -> bool {
        self.stop.cancel();
        info!(addr = %self.addr, timeout_secs = timeout.as_secs(), "draining connections");

        if tokio::time::timeout(timeout, &mut self.task).await.is_ok() {
            true
        } else {
            warn!(?timeout, "drain timed out, aborting server task");
            self.task.abort();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 8000))
    }

    #[tokio::test]
    async fn stop_waits_for_task_to_finish() {
        let stop = CancellationToken::new();
        let watched = stop.clone();
        let task = tokio::spawn(async move { watched.cancelled().await });

        let handle = ServerHandle::new(addr(), task, stop);
        assert!(handle.stop(Duration::from_secs(5)).await);
    }

    #[tokio::test]
    async fn stop_aborts_task_that_ignores_cancel() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(300)).await;
        });

        let handle = ServerHandle::new(addr(), task, CancellationToken::new());
        assert!(!handle.stop(Duration::from_millis(50)).await);
    }
}
