use actix_web::dev::ServerHandle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::AppContext;

/// Handles graceful shutdown of the application
///
/// On SIGTERM or CTRL+C the HTTP server stops accepting connections,
/// in-flight requests drain, and the final registry totals are logged.
/// Nothing is persisted: every job lives only for the life of the process.
pub struct ShutdownCoordinator {
    server_handle: ServerHandle,
    server_task: JoinHandle<Result<(), std::io::Error>>,
    context: AppContext,
}

impl ShutdownCoordinator {
    pub fn new(
        server_handle: ServerHandle,
        server_task: JoinHandle<Result<(), std::io::Error>>,
        context: AppContext,
    ) -> Self {
        Self {
            server_handle,
            server_task,
            context,
        }
    }

    /// Block until CTRL+C or SIGTERM (Unix only), then shut down
    pub async fn wait_for_shutdown(self) -> Result<(), std::io::Error> {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for CTRL+C: {:?}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {:?}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received CTRL+C signal, initiating graceful shutdown...");
            }
            _ = terminate => {
                info!("Received SIGTERM signal, initiating graceful shutdown...");
            }
        }

        self.shutdown().await
    }

    async fn shutdown(self) -> Result<(), std::io::Error> {
        info!("Stopping HTTP server (no longer accepting new requests)...");
        self.server_handle.stop(true).await;

        match self.server_task.await {
            Ok(Ok(_)) => info!("HTTP server shut down successfully"),
            Ok(Err(e)) => error!("HTTP server encountered error during shutdown: {:?}", e),
            Err(e) => error!("HTTP server task panicked: {:?}", e),
        }

        let publications = self.context.publications().total().await;
        let videos = self.context.videos().total().await;
        if publications + videos > 0 {
            warn!(
                "Discarding {} publication jobs and {} video jobs held in memory",
                publications, videos
            );
        }

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}
