//! Process signals that stop the server.

use std::io;

/// Signal handlers installed before serving, so a failure to install them
/// stops startup instead of surfacing mid-run.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// # Errors
    ///
    /// Returns an error if the SIGTERM handler cannot be registered.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            )?,
        })
    }

    /// Wait for Ctrl-C or SIGTERM and return the name of the one received.
    pub async fn recv(mut self) -> &'static str {
        let name = tokio::select! {
            Ok(()) = tokio::signal::ctrl_c() => "SIGINT",
            Some(()) = self.terminate() => "SIGTERM",
            else => "no signal source",
        };
        tracing::info!(signal = name, "shutting down gracefully");
        name
    }

    #[cfg(unix)]
    async fn terminate(&mut self) -> Option<()> {
        self.terminate.recv().await
    }

    #[cfg(not(unix))]
    async fn terminate(&mut self) -> Option<()> {
        std::future::pending().await
    }
}
