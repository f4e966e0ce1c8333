pub mod env;
mod loader;

pub use env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, MailGatewayConfig, SchedulerConfig,
    SiteConfig, WatcherConfig,
};
pub use loader::load_config;
