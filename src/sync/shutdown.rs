//! Shutdown Context
//!
//! A once-only shutdown flag shared by every long-running task. Process
//! signals feed it; the first trigger wins and later ones are ignored.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT (Ctrl+C).
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Triggered programmatically.
    Requested,
}

impl ShutdownReason {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Requested => "shutdown request",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a future raced against the shutdown context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GracefulOutcome<T> {
    Completed(T),
    /// Shutdown won; the future was dropped.
    ShutdownSignaled(ShutdownReason),
}

/// Owner side of the shutdown context. Cheap to clone.
#[derive(Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<Option<ShutdownReason>>>,
}

/// Subscriber side, held by long-running tasks.
#[derive(Clone)]
pub struct ShutdownReceiver {
    receiver: watch::Receiver<Option<ShutdownReason>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn subscribe(&self) -> ShutdownReceiver {
        ShutdownReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Triggers shutdown. Returns `true` only for the call that actually
    /// flipped the state.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.sender.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            *state = Some(reason);
            true
        })
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.sender.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.reason().is_some()
    }

    /// Spawns a task that turns SIGINT/SIGTERM into shutdown triggers.
    pub fn listen_for_signals(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if let Err(e) = signal_loop(&shutdown).await {
                tracing::error!("Failed to install signal handlers: {}", e);
            }
        })
    }

    fn on_signal(&self, reason: ShutdownReason) {
        if self.trigger(reason) {
            tracing::info!("Received {}, shutting down", reason);
        } else {
            tracing::warn!("Received {} again, shutdown already in progress", reason);
        }
    }
}

impl ShutdownReceiver {
    pub fn is_shutting_down(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    /// Waits until shutdown is triggered.
    pub async fn wait(&mut self) -> ShutdownReason {
        match self.receiver.wait_for(Option::is_some).await {
            Ok(state) => (*state).unwrap_or(ShutdownReason::Requested),
            // Every owner is gone, nobody can keep us alive.
            Err(_) => ShutdownReason::Requested,
        }
    }
}

/// Races `fut` against the shutdown context. When shutdown wins, `fut` is
/// dropped mid-flight.
pub async fn with_shutdown<F>(fut: F, mut shutdown: ShutdownReceiver) -> GracefulOutcome<F::Output>
where
    F: IntoFuture,
{
    if let Some(reason) = *shutdown.receiver.borrow() {
        return GracefulOutcome::ShutdownSignaled(reason);
    }

    let fut = fut.into_future();
    tokio::select! {
        output = fut => GracefulOutcome::Completed(output),
        reason = shutdown.wait() => GracefulOutcome::ShutdownSignaled(reason),
    }
}

#[cfg(unix)]
async fn signal_loop(shutdown: &Shutdown) -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        let reason = tokio::select! {
            _ = interrupt.recv() => ShutdownReason::Interrupt,
            _ = terminate.recv() => ShutdownReason::Terminate,
        };
        shutdown.on_signal(reason);
    }
}

#[cfg(not(unix))]
async fn signal_loop(shutdown: &Shutdown) -> std::io::Result<()> {
    loop {
        tokio::signal::ctrl_c().await?;
        shutdown.on_signal(ShutdownReason::Interrupt);
    }
}
