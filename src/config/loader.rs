use std::env;

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, MailGatewayConfig, SchedulerConfig,
    SiteConfig, WatcherConfig,
};
use crate::domain::WatchEntry;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let watcher = WatcherConfig {
            use_logger: parse_bool("USE_LOGGER", true),
            use_site_mail: parse_bool("USE_SITE_MAIL", false),
            use_admin_mail: parse_bool("USE_ADMIN_MAIL", false),
            notify_undefined: parse_bool("NOTIFY_UNDEFINED", false),
            mail_recipients: env::var("MAIL_RECIPIENTS").unwrap_or_default(),
            watch_queues: parse_watch_queues(&env::var("WATCH_QUEUES").unwrap_or_default())?,
            langcode: env::var("REPORT_LANGCODE").unwrap_or_else(|_| "en".to_string()),
        };

        let site = SiteConfig {
            site_name: env::var("SITE_NAME").unwrap_or_else(|_| "site".to_string()),
            site_mail: env::var("SITE_MAIL").ok().filter(|v| !v.is_empty()),
            admin_mail: env::var("ADMIN_MAIL").ok().filter(|v| !v.is_empty()),
        };

        let mail = MailGatewayConfig {
            endpoint: env::var("MAIL_GATEWAY_URL").ok().filter(|v| !v.is_empty()),
            token: env::var("MAIL_GATEWAY_TOKEN").ok().filter(|v| !v.is_empty()),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "queue.db".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let scheduler = SchedulerConfig {
            cron_specs: env::var("WATCH_CRONS")
                .map(|value| {
                    value
                        .split(';')
                        .map(str::trim)
                        .filter(|part| !part.is_empty())
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        };

        let timezone = env::var("WATCHER_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());

        Ok(Self {
            watcher,
            site,
            mail,
            directories,
            logging,
            scheduler,
            timezone,
        })
    }
}

fn parse_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

/// Parses the `WATCH_QUEUES` value: semicolon-separated `name:warning:critical`
/// items where either limit may be left empty. Items without a queue name are
/// skipped; a repeated name overwrites the earlier definition in place.
pub(crate) fn parse_watch_queues(raw: &str) -> Result<Vec<WatchEntry>, ConfigError> {
    let mut entries: Vec<WatchEntry> = Vec::new();
    for item in raw.split(';').map(str::trim).filter(|item| !item.is_empty()) {
        let mut parts = item.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            continue;
        }
        let warning = parse_limit(item, parts.next())?;
        let critical = parse_limit(item, parts.next())?;
        let entry = WatchEntry::new(name, warning, critical);
        match entries
            .iter_mut()
            .find(|existing| existing.queue_name == entry.queue_name)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }
    Ok(entries)
}

fn parse_limit(entry: &str, part: Option<&str>) -> Result<Option<u64>, ConfigError> {
    match part.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| ConfigError::InvalidWatchEntry {
                entry: entry.to_string(),
                reason: err.to_string(),
            }),
    }
}
