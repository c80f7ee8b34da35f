//! Stop signal shared by `main`, the HTTP server and the test harness.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals::shutdown_signal;

/// One-shot stop signal for [`HttpServer::run`](crate::HttpServer::run).
///
/// `main` arms it with [`Shutdown::on_os_signal`]; integration tests call
/// [`Shutdown::trigger`] directly to stop a proxy started on an ephemeral port.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver handed to the server; resolves once the proxy should drain.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask the server to stop accepting and drain. Harmless once it has exited.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger when the process gets Ctrl+C or SIGTERM.
    pub fn on_os_signal(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
