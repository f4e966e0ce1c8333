use thiserror::Error;

use crate::domain::WatchEntry;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub watcher: WatcherConfig,
    pub site: SiteConfig,
    pub mail: MailGatewayConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub scheduler: SchedulerConfig,
    pub timezone: String,
}

/// The watcher option set, fully typed.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Enables log-sink dispatch of the status summary.
    pub use_logger: bool,
    /// Adds the site address to the report recipients.
    pub use_site_mail: bool,
    /// Adds the administrator address to the report recipients.
    pub use_admin_mail: bool,
    /// Counts queues outside the watch list as a problem.
    pub notify_undefined: bool,
    /// Comma-separated mail addresses.
    pub mail_recipients: String,
    pub watch_queues: Vec<WatchEntry>,
    pub langcode: String,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_mail: Option<String>,
    pub admin_mail: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MailGatewayConfig {
    /// Absent endpoint disables mail delivery entirely.
    pub endpoint: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub db_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cron specs for recurring watch cycles; empty means run once and exit.
    pub cron_specs: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid WATCH_QUEUES entry `{entry}`: {reason}")]
    InvalidWatchEntry { entry: String, reason: String },
}
