//! Runtime bootstrap shared by the console and REST front ends.
//!
//! [`build_session`] wires a console session from configuration;
//! [`ServerHandle`] runs the REST API until shutdown is signalled.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use crate::application::{IdentityService, ParkingService, SessionController};
use crate::config::AppConfig;
use crate::infrastructure::SystemClock;
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::ShutdownSignal;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ── Wiring ─────────────────────────────────────────────────────────

/// Parking service on the system clock, sized and priced from config.
pub fn build_parking(config: &AppConfig) -> Result<ParkingService, BoxError> {
    let tariff = config.tariff()?;
    Ok(ParkingService::new(
        config.lot.num_slots,
        tariff,
        Arc::new(SystemClock),
    ))
}

pub fn build_identity(config: &AppConfig) -> Result<Arc<IdentityService>, BoxError> {
    let identity = IdentityService::from_config(&config.users, config.security.bcrypt_cost)?;
    Ok(Arc::new(identity))
}

/// Fresh, logged-out console session.
pub fn build_session(config: &AppConfig) -> Result<SessionController, BoxError> {
    Ok(SessionController::new(
        build_parking(config)?,
        build_identity(config)?,
    ))
}

// ── ServerHandle ───────────────────────────────────────────────────

#[derive(Default)]
pub struct ServerOptions {
    pub config: AppConfig,
}

/// Handle to a running REST API server.
pub struct ServerHandle {
    pub config: AppConfig,
    /// Bound address; differs from the config when port 0 was requested.
    pub local_addr: SocketAddr,

    shutdown: ShutdownSignal,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, BoxError> {
        let config = opts.config;
        config.validate()?;
        info!("Starting smart parking API...");

        let state = AppState::new(
            build_parking(&config)?,
            build_identity(&config)?,
            config.jwt_config(),
        );
        let router = create_api_router(state);

        let listener = tokio::net::TcpListener::bind(config.api_address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.install_os_handlers();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for the server task to finish after shutdown was triggered.
    pub async fn wait(self) {
        info!("⏳ Waiting for in-flight requests...");
        match self.api_task.await {
            Ok(()) => info!("REST API server stopped"),
            Err(e) => error!("REST API server task panicked: {}", e),
        }
        info!("👋 Smart parking shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Install the global subscriber; `RUST_LOG` overrides `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    // Console mode shares stdout with the prompt, so logs go to stderr.
    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.api_port = 0;
        config.security.bcrypt_cost = 4;
        config
    }

    #[test]
    fn session_starts_logged_out() {
        let session = build_session(&test_config()).unwrap();
        assert!(session.current_user().is_none());
        assert_eq!(session.parking().num_slots(), 8);
    }

    #[test]
    fn configured_users_can_log_in() {
        let mut session = build_session(&test_config()).unwrap();
        assert!(session.login("admin", "1234").is_ok());
    }

    #[tokio::test]
    async fn server_starts_and_stops() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
        })
        .await
        .unwrap();
        assert_ne!(handle.local_addr.port(), 0);
        assert!(handle.is_running());

        handle.shutdown().await;
    }
}
