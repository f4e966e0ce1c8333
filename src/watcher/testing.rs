//! In-memory collaborator doubles shared by the watcher test modules.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::queue_size::{QueueSizeRow, QueueSizeSource, SizeSourceError};
use crate::report::{LogSink, MailError, MailMessage, MailTransport, ReportSeverity};

pub(crate) struct MockSizeSource {
    rows: Mutex<Vec<QueueSizeRow>>,
}

impl MockSizeSource {
    pub fn new(rows: Vec<(&str, u64)>) -> Self {
        Self {
            rows: Mutex::new(to_rows(rows)),
        }
    }

    pub fn set_rows(&self, rows: Vec<(&str, u64)>) {
        *self.rows.lock().unwrap() = to_rows(rows);
    }
}

fn to_rows(rows: Vec<(&str, u64)>) -> Vec<QueueSizeRow> {
    rows.into_iter()
        .map(|(queue_name, num_items)| QueueSizeRow {
            queue_name: queue_name.to_string(),
            num_items,
        })
        .collect()
}

#[async_trait]
impl QueueSizeSource for MockSizeSource {
    async fn fetch_counts(
        &self,
        queue_name: Option<&str>,
    ) -> Result<Vec<QueueSizeRow>, SizeSourceError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| queue_name.is_none_or(|name| row.queue_name == name))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct CapturingSink {
    pub entries: Mutex<Vec<(ReportSeverity, String, String)>>,
}

impl LogSink for CapturingSink {
    fn log(&self, severity: ReportSeverity, channel: &str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((severity, channel.to_string(), message.to_string()));
    }
}

#[derive(Default)]
pub(crate) struct CapturingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    failing: Mutex<HashSet<String>>,
}

impl CapturingMailer {
    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }
}

#[async_trait]
impl MailTransport for CapturingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.failing.lock().unwrap().contains(&message.to) {
            return Err(MailError::Rejected(format!(
                "test rejection for {}",
                message.to
            )));
        }
        Ok(())
    }
}
