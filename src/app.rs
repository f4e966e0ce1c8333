use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use reqwest::Client;
use sqlx::sqlite::SqlitePool;
use tokio::time::timeout;

use crate::{
    config::AppConfig,
    db::{
        self,
        queue_size::{QueueSizeSource, SqliteQueueSizeSource},
    },
    infrastructure::{directories::ResolvedPaths, mailer::HttpMailGateway},
    report::{mail::DisabledMailGateway, LogSink, MailTransport, TracingLogSink},
    schedule::{configure_watch_jobs, WatchCallback},
    watcher::{QueueStateContainer, QueueWatcher, SiteDirectory},
};

/// Shared collaborators handed to every watch cycle.
#[derive(Clone)]
struct CycleDeps {
    config: Arc<AppConfig>,
    source: Arc<dyn QueueSizeSource>,
    site: Arc<dyn SiteDirectory>,
    log_sink: Arc<dyn LogSink>,
    mail: Arc<dyn MailTransport>,
    timezone: Tz,
}

pub struct WatcherApp {
    deps: CycleDeps,
    pool: SqlitePool,
}

impl WatcherApp {
    pub async fn initialize(config: AppConfig, paths: &ResolvedPaths) -> Result<Self> {
        let config = Arc::new(config);
        let pool = db::init_pool(&paths.db_path).await?;
        let source: Arc<dyn QueueSizeSource> = Arc::new(SqliteQueueSizeSource::new(pool.clone()));
        let site: Arc<dyn SiteDirectory> = Arc::new(config.site.clone());
        let log_sink: Arc<dyn LogSink> = Arc::new(TracingLogSink);

        let http = Client::builder()
            .user_agent(format!("queue-watcher/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let mail: Arc<dyn MailTransport> = match &config.mail.endpoint {
            Some(endpoint) => Arc::new(HttpMailGateway::new(
                http,
                endpoint.clone(),
                config.mail.token.clone(),
            )),
            None => Arc::new(DisabledMailGateway),
        };

        let timezone = match config.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(timezone = %config.timezone, "unknown timezone, falling back to UTC");
                chrono_tz::UTC
            }
        };

        Ok(Self {
            deps: CycleDeps {
                config,
                source,
                site,
                log_sink,
                mail,
                timezone,
            },
            pool,
        })
    }

    /// Runs a single watch cycle, or keeps cycling on the configured cron
    /// specs until a shutdown signal arrives.
    pub async fn run(self) -> Result<()> {
        if self.deps.config.scheduler.cron_specs.is_empty() {
            let result = run_cycle(&self.deps).await;
            self.pool.close().await;
            return result;
        }

        let callback = build_cycle_callback(self.deps.clone());
        let mut scheduler =
            configure_watch_jobs(&self.deps.config.scheduler.cron_specs, callback).await?;

        wait_for_shutdown_signal().await;
        tracing::info!("shutdown signal received");

        let shutdown_timeout = Duration::from_secs(5);
        match timeout(shutdown_timeout, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(?err, "scheduler shutdown failed"),
            Err(_) => tracing::warn!(
                target: "scheduler",
                "scheduler did not stop within {:?}",
                shutdown_timeout
            ),
        }
        if timeout(shutdown_timeout, self.pool.close()).await.is_err() {
            tracing::warn!(
                target: "db",
                "database pool did not close within {:?}",
                shutdown_timeout
            );
        }
        tracing::info!("queue watcher stopped");
        Ok(())
    }
}

/// Builds a fresh container and watcher, then classifies and reports. Each
/// invocation owns its own container, watch list and recipient set.
async fn run_cycle(deps: &CycleDeps) -> Result<()> {
    let container = QueueStateContainer::new(deps.source.clone());
    let mut watcher = QueueWatcher::new(
        deps.config.watcher.clone(),
        container,
        deps.site.clone(),
        deps.log_sink.clone(),
        deps.mail.clone(),
        deps.timezone,
    );

    let result = watcher.lookup().await.context("queue size lookup failed")?;
    tracing::info!(
        queues = result.len(),
        critical = result.critical().len(),
        warning = result.warning().len(),
        undefined = result.undefined().len(),
        "lookup pass complete"
    );

    watcher.report().await;
    Ok(())
}

fn build_cycle_callback(deps: CycleDeps) -> WatchCallback {
    Arc::new(move || {
        let deps = deps.clone();
        tokio::spawn(async move {
            if let Err(err) = run_cycle(&deps).await {
                tracing::error!(target: "watcher", error = %err, "watch cycle failed");
            }
        });
    })
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = term.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
