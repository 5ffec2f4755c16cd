use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use crate::clients::{load_catalog, ChatHost, Clipboard, DataService, OrderingClient};
use crate::config::{AppConfig, ConfigError};
use crate::session_actor::{self, NetworkError, OrderError, SessionState};
use crate::submission::SubmissionPipeline;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The menu could not be loaded; nothing can be ordered. Retry `start`.
    #[error(transparent)]
    CatalogUnavailable(#[from] NetworkError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

/// The runtime orchestrator for one ordering session.
///
/// `OrderSystem` is responsible for:
/// - **Startup load**: reading menu and settings concurrently before the session is usable
/// - **Dependency wiring**: handing the ports to the pipeline and the client
/// - **Lifecycle management**: spawning the session actor and shutting it down
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::start(&config, data_service, host, clipboard).await?;
///
/// system.ordering_client.open_item("c1").await?;
/// // ...
/// let report = system.ordering_client.submit().await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub ordering_client: OrderingClient,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Loads the catalog, spawns the session actor and returns a ready system.
    ///
    /// # Errors
    /// - [`SystemError::Config`] for an unknown vendor timezone
    /// - [`SystemError::CatalogUnavailable`] when the menu read fails or times out.
    ///   Missing or failing settings are not an error; defaults are used.
    pub async fn start(
        config: &AppConfig,
        data_service: Arc<dyn DataService>,
        host: Arc<dyn ChatHost>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Result<Self, SystemError> {
        let timezone = config.timezone()?;
        let timeout = config.request_timeout();

        // 1. Startup load (menu + settings in parallel)
        let (catalog, status) = load_catalog(data_service.as_ref(), timeout).await?;
        info!(
            items = catalog.len(),
            vendor = %status.name,
            is_open = status.is_open,
            "Catalog loaded"
        );

        // 2. Session actor, pickup date defaulting to today at the vendor
        let today = Utc::now().with_timezone(&timezone).date_naive();
        let (actor, session) = session_actor::new(SessionState::new(catalog, status, today));
        let handle = tokio::spawn(actor.run());

        // 3. Client wired to the pipeline and the ports
        let pipeline = SubmissionPipeline::new(data_service.clone(), host, clipboard, config);
        let ordering_client = OrderingClient::new(session, pipeline, data_service, timezone, timeout);

        Ok(Self {
            ordering_client,
            handles: vec![handle],
        })
    }

    /// Re-runs the startup load and swaps in the fresh catalog and settings.
    pub async fn reload(&self) -> Result<usize, SystemError> {
        let items = self.ordering_client.reload().await?;
        info!(items, "Catalog reloaded");
        Ok(items)
    }

    /// Gracefully shuts down the session.
    ///
    /// Dropping the client closes the actor's channel; the actor drains and exits.
    /// Clones of the client held elsewhere keep the actor alive until they drop too.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down ordering session...");
        drop(self.ordering_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Session task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("Shutdown complete.");
        Ok(())
    }
}
