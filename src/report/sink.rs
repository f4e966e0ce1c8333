use std::fmt;

/// Severity of a dispatched report message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSeverity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for ReportSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportSeverity::Info => "info",
            ReportSeverity::Warning => "warning",
            ReportSeverity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Narrow logging seam for status reports, dispatched under a named channel.
pub trait LogSink: Send + Sync {
    fn log(&self, severity: ReportSeverity, channel: &str, message: &str);
}

/// Forwards report messages to the tracing subscriber.
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, severity: ReportSeverity, channel: &str, message: &str) {
        match severity {
            ReportSeverity::Info => tracing::info!(target: "report", channel, "{message}"),
            ReportSeverity::Warning => tracing::warn!(target: "report", channel, "{message}"),
            ReportSeverity::Critical => tracing::error!(target: "report", channel, "{message}"),
        }
    }
}
