//! Server runtime.
//!
//! [`ServerHandle`] owns the lifecycle: database, migrations, bootstrap
//! admin, metrics recorder, REST API and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::{AppConfig, ConfigReport};
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::init_database;
use crate::interfaces::http::{create_api_router, ApiServices};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::{AppError, InfraError};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run pending migrations on startup (default: true)
    pub auto_migrate: bool,
    /// Create the bootstrap admin when no user exists (default: true)
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The global recorder can only be installed once per process
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub services: ApiServices,
    pub config: AppConfig,
    /// Port actually bound (differs from the config when it was 0)
    pub api_port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;
        info!("Starting freight quote service...");

        let prometheus = prometheus_handle();

        let db_config = app_cfg.database.to_database_config();
        let jwt_config = app_cfg.security.to_jwt_config();
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        // ── Database ───────────────────────────────────────────
        let db = init_database(&db_config).await.map_err(InfraError::from)?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await.map_err(InfraError::from)?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = ApiServices::new(
            repos.clone(),
            jwt_config,
            app_cfg.entry_points.clone(),
            app_cfg.freight.volumetric_factor,
        );
        info!(
            volumetric_factor = %app_cfg.freight.volumetric_factor,
            air_entry_points = app_cfg.entry_points.air.len(),
            sea_entry_points = app_cfg.entry_points.sea.len(),
            "Freight settings loaded"
        );

        if opts.create_default_admin {
            let admin = &app_cfg.admin;
            match services
                .users
                .ensure_default_admin(&admin.username, &admin.email, &admin.password)
                .await
            {
                Ok(true) => warn!(
                    username = %admin.username,
                    "Default admin created; change its password immediately"
                ),
                Ok(false) => {}
                Err(e) => error!("Failed to create default admin: {}", e),
            }
        }

        // ── REST API ───────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let router = create_api_router(services.clone(), db.clone(), prometheus);

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr)
            .await
            .map_err(InfraError::from)?;
        let api_port = listener.local_addr().map_err(InfraError::from)?.port();
        info!("REST API listening on http://{}:{}", app_cfg.server.api_host, api_port);
        info!("Swagger UI at http://{}:{}/docs/", app_cfg.server.api_host, api_port);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            services,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for shutdown to be triggered, drain the API within the
    /// configured timeout, then close the pool.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests did not finish before the timeout");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Freight quote service stopped");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Result of the pre-deployment check
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: ConfigReport,
    /// Names of migrations not yet applied to the configured database
    pub pending_migrations: Vec<String>,
}

impl CheckOutcome {
    /// `strict` also fails on security warnings
    pub fn passed(&self, strict: bool) -> bool {
        self.report.is_ok()
            && self.pending_migrations.is_empty()
            && (!strict || self.report.warnings.is_empty())
    }
}

/// Validate the configuration and look for unapplied migrations without
/// starting the server.
pub async fn run_checks(config: &AppConfig) -> Result<CheckOutcome, sea_orm::DbErr> {
    let report = config.validate();
    let db = init_database(&config.database.to_database_config()).await?;
    let pending_migrations = Migrator::get_pending_migrations(&db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    db.close().await?;
    Ok(CheckOutcome {
        report,
        pending_migrations,
    })
}

/// Initialize tracing from the logging section. `RUST_LOG` overrides the
/// configured level. Call once, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;
        ServerOptions {
            config,
            ..ServerOptions::default()
        }
    }

    #[tokio::test]
    async fn check_reports_pending_migrations() {
        let outcome = run_checks(&test_options().config).await.unwrap();
        assert_eq!(outcome.pending_migrations.len(), 6);
        assert!(!outcome.passed(false));
    }

    #[test]
    fn strict_mode_fails_on_warnings() {
        let outcome = CheckOutcome {
            report: AppConfig::default().validate(),
            pending_migrations: Vec::new(),
        };
        assert!(outcome.passed(false));
        assert!(!outcome.passed(true));
    }

    #[tokio::test]
    async fn starts_bootstraps_admin_and_stops() {
        let handle = ServerHandle::start(test_options()).await.unwrap();
        assert_ne!(handle.api_port, 0);
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count_users(None, true).await.unwrap(), 1);
        handle.shutdown().await;
    }
}
