use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;

use crate::config::{SiteConfig, WatcherConfig};
use crate::db::queue_size::SizeSourceError;
use crate::domain::{QueueState, StateLevel, WatchEntry};
use crate::report::mail::STATUS_REPORT_TEMPLATE;
use crate::report::{
    LogSink, MailMessage, MailTransport, MessageCatalog, MessageKey, ReportSeverity,
};
use crate::watcher::{LookupResult, QueueStateContainer};

/// Site identity and administrator account lookup. Missing addresses are a
/// normal state and simply omit that recipient source.
pub trait SiteDirectory: Send + Sync {
    fn site_name(&self) -> String;
    fn site_mail(&self) -> Option<String>;
    fn admin_mail(&self) -> Option<String>;
}

impl SiteDirectory for SiteConfig {
    fn site_name(&self) -> String {
        self.site_name.clone()
    }

    fn site_mail(&self) -> Option<String> {
        self.site_mail.clone()
    }

    fn admin_mail(&self) -> Option<String> {
        self.admin_mail.clone()
    }
}

/// Orchestrates one watch cycle: drives the state container, classifies
/// every watched and observed queue, and dispatches the consolidated report
/// through the injected log and mail collaborators.
pub struct QueueWatcher {
    config: WatcherConfig,
    container: QueueStateContainer,
    queues_to_watch: Vec<WatchEntry>,
    recipients: BTreeSet<String>,
    lookup_result: LookupResult,
    catalog: MessageCatalog,
    site_name: String,
    log_sink: Arc<dyn LogSink>,
    mail: Arc<dyn MailTransport>,
    timezone: Tz,
}

impl QueueWatcher {
    pub fn new(
        config: WatcherConfig,
        container: QueueStateContainer,
        site: Arc<dyn SiteDirectory>,
        log_sink: Arc<dyn LogSink>,
        mail: Arc<dyn MailTransport>,
        timezone: Tz,
    ) -> Self {
        let queues_to_watch = init_queues_to_watch(&config.watch_queues);
        let recipients = init_recipients_to_report(&config, site.as_ref());
        let site_name = site.site_name();
        Self {
            config,
            container,
            queues_to_watch,
            recipients,
            lookup_result: LookupResult::new(),
            catalog: MessageCatalog::new(),
            site_name,
            log_sink,
            mail,
            timezone,
        }
    }

    /// Runs one classification pass over the current queue snapshot.
    ///
    /// Watched queues absent from the snapshot get a synthesized zero-count
    /// state so they are never silently skipped; queues observed in the data
    /// source but absent from the watch list end up undefined.
    pub async fn lookup(&mut self) -> Result<&LookupResult, SizeSourceError> {
        let mut snapshot: BTreeMap<String, QueueState> =
            self.container.all_states().await?.clone();
        for entry in &self.queues_to_watch {
            let mut state = match snapshot.remove(&entry.queue_name) {
                Some(state) => state,
                None => {
                    self.container.add_empty_state(&entry.queue_name);
                    self.container.state(&entry.queue_name).await?.clone()
                }
            };
            state.set_state_level(classify(&state, entry));
            self.lookup_result.record(state);
        }
        for (_, mut state) in snapshot {
            state.set_state_level(StateLevel::Undefined);
            self.lookup_result.record(state);
        }
        Ok(&self.lookup_result)
    }

    /// True if the last lookup found anything worth flagging. This governs
    /// only the framing of a report, not whether one is generated.
    pub fn found_problems(&self) -> bool {
        if !self.lookup_result.warning().is_empty() || !self.lookup_result.critical().is_empty() {
            return true;
        }
        self.config.notify_undefined && !self.lookup_result.undefined().is_empty()
    }

    /// Dispatches the consolidated status to the log sink and the mail
    /// recipients. Mailing is independent of the logger toggle.
    pub async fn report(&self) {
        if self.config.use_logger {
            let severity = if !self.lookup_result.critical().is_empty() {
                ReportSeverity::Critical
            } else if !self.lookup_result.warning().is_empty() {
                ReportSeverity::Warning
            } else {
                ReportSeverity::Info
            };
            self.log_sink
                .log(severity, "queue_watcher", &self.short_readable_status());
        }
        self.mail_status().await;
    }

    /// Best-effort delivery: a failing recipient is logged and does not stop
    /// the remaining sends. With no recipients this is a no-op.
    async fn mail_status(&self) {
        if self.recipients.is_empty() {
            return;
        }
        let subject = self.mail_subject();
        let body = self.mail_body();
        for recipient in &self.recipients {
            let message = MailMessage {
                template: STATUS_REPORT_TEMPLATE,
                to: recipient.clone(),
                langcode: self.config.langcode.clone(),
                subject: subject.clone(),
                body: body.clone(),
            };
            if let Err(err) = self.mail.send(&message).await {
                tracing::warn!(
                    target: "mail",
                    recipient = %recipient,
                    error = %err,
                    "failed to deliver queue status report"
                );
            }
        }
    }

    /// Detailed multi-line rendering of the current lookup result in the
    /// configured language.
    pub fn readable_status(&self) -> String {
        self.readable_status_in(&self.config.langcode)
    }

    pub fn readable_status_in(&self, langcode: &str) -> String {
        if self.lookup_result.is_empty() {
            return self
                .catalog
                .translate(MessageKey::NoQueuesSentence, langcode, &[]);
        }
        let banner_key = if self.found_problems() {
            MessageKey::ProblemsBanner
        } else {
            MessageKey::NoProblemsBanner
        };
        let banner = self.catalog.translate(
            banner_key,
            langcode,
            &[("@site", self.site_name.clone())],
        );
        let lines: Vec<String> = self
            .lookup_result
            .iter()
            .map(|state| {
                self.catalog.translate(
                    MessageKey::QueueLine,
                    langcode,
                    &[
                        ("@queue", state.queue_name().to_string()),
                        ("@num", state.num_items().to_string()),
                        ("@level", state.state_level().to_string()),
                    ],
                )
            })
            .collect();
        self.catalog.translate(
            MessageKey::StatusDetail,
            langcode,
            &[("@overall", banner), ("@states", lines.join("\n"))],
        )
    }

    /// One-sentence summary of the current lookup result in the configured
    /// language.
    pub fn short_readable_status(&self) -> String {
        self.short_readable_status_in(&self.config.langcode)
    }

    pub fn short_readable_status_in(&self, langcode: &str) -> String {
        if self.lookup_result.is_empty() {
            return self
                .catalog
                .translate(MessageKey::NoQueuesSentence, langcode, &[]);
        }
        let states = self
            .lookup_result
            .iter()
            .map(|state| {
                self.catalog.translate(
                    MessageKey::QueueSentence,
                    langcode,
                    &[
                        ("@queue", state.queue_name().to_string()),
                        ("@level", state.state_level().to_string()),
                    ],
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let key = if self.found_problems() {
            MessageKey::ProblemsSentence
        } else {
            MessageKey::NoProblemsSentence
        };
        self.catalog
            .translate(key, langcode, &[("@states", states)])
    }

    pub fn lookup_result(&self) -> &LookupResult {
        &self.lookup_result
    }

    pub fn queues_to_watch(&self) -> &[WatchEntry] {
        &self.queues_to_watch
    }

    pub fn recipients_to_report(&self) -> &BTreeSet<String> {
        &self.recipients
    }

    /// Adds a further recipient address on top of the configured ones.
    pub fn add_recipient(&mut self, address: impl Into<String>) {
        self.recipients.insert(address.into());
    }

    /// Gives access to the catalog, e.g. to register translations.
    pub fn catalog_mut(&mut self) -> &mut MessageCatalog {
        &mut self.catalog
    }

    fn mail_subject(&self) -> String {
        let key = if self.found_problems() {
            MessageKey::MailSubjectProblems
        } else {
            MessageKey::MailSubjectOk
        };
        self.catalog.translate(
            key,
            &self.config.langcode,
            &[("@site", self.site_name.clone())],
        )
    }

    fn mail_body(&self) -> String {
        let generated = Utc::now()
            .with_timezone(&self.timezone)
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string();
        let generated_line = self.catalog.translate(
            MessageKey::GeneratedLine,
            &self.config.langcode,
            &[("@num", generated)],
        );
        format!("{}\n\n{}", self.readable_status(), generated_line)
    }
}

/// Applies the configured thresholds. Critical is checked before warning,
/// so critical wins whenever both limits are exceeded.
fn classify(state: &QueueState, entry: &WatchEntry) -> StateLevel {
    if entry
        .size_limit_critical
        .is_some_and(|limit| state.exceeds(limit))
    {
        StateLevel::Critical
    } else if entry
        .size_limit_warning
        .is_some_and(|limit| state.exceeds(limit))
    {
        StateLevel::Warning
    } else {
        StateLevel::Sane
    }
}

/// Builds the watch list: entries without a queue name are skipped and a
/// repeated name overwrites the earlier definition in place.
fn init_queues_to_watch(entries: &[WatchEntry]) -> Vec<WatchEntry> {
    let mut to_watch: Vec<WatchEntry> = Vec::new();
    for entry in entries {
        if entry.queue_name.is_empty() {
            continue;
        }
        match to_watch
            .iter_mut()
            .find(|existing| existing.queue_name == entry.queue_name)
        {
            Some(existing) => *existing = entry.clone(),
            None => to_watch.push(entry.clone()),
        }
    }
    to_watch
}

/// Builds the deduplicated recipient set from the configured list plus the
/// optional site and administrator addresses.
fn init_recipients_to_report(config: &WatcherConfig, site: &dyn SiteDirectory) -> BTreeSet<String> {
    let mut recipients: BTreeSet<String> = config
        .mail_recipients
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect();
    if config.use_site_mail {
        if let Some(address) = site.site_mail() {
            recipients.insert(address);
        }
    }
    if config.use_admin_mail {
        if let Some(address) = site.admin_mail() {
            recipients.insert(address);
        }
    }
    recipients
}
