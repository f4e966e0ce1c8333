pub mod catalog;
pub mod mail;
pub mod sink;

pub use catalog::{MessageCatalog, MessageKey};
pub use mail::{MailError, MailMessage, MailTransport};
pub use sink::{LogSink, ReportSeverity, TracingLogSink};
