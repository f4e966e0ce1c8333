use std::collections::HashMap;

pub const DEFAULT_LANGCODE: &str = "en";

/// Message keys understood by the report catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ProblemsBanner,
    NoProblemsBanner,
    NoQueuesSentence,
    ProblemsSentence,
    NoProblemsSentence,
    QueueLine,
    QueueSentence,
    StatusDetail,
    MailSubjectProblems,
    MailSubjectOk,
    GeneratedLine,
}

/// Translatable report templates with named `@placeholders`.
///
/// English is built in. Further languages can be registered per key, and a
/// missing translation falls back to the English template.
pub struct MessageCatalog {
    messages: HashMap<(MessageKey, String), String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        let mut catalog = Self {
            messages: HashMap::new(),
        };
        let english: [(MessageKey, &str); 11] = [
            (
                MessageKey::ProblemsBanner,
                "Problems have been found on the queues of @site:",
            ),
            (
                MessageKey::NoProblemsBanner,
                "No problems found on the queues of @site:",
            ),
            (
                MessageKey::NoQueuesSentence,
                "There are currently no queue states known.",
            ),
            (
                MessageKey::ProblemsSentence,
                "Attention, some queues require action: @states.",
            ),
            (
                MessageKey::NoProblemsSentence,
                "All queues are fine: @states.",
            ),
            (
                MessageKey::QueueLine,
                "Queue @queue has @num items and is at @level state",
            ),
            (MessageKey::QueueSentence, "@queue is at @level state"),
            (MessageKey::StatusDetail, "@overall\n@states"),
            (
                MessageKey::MailSubjectProblems,
                "Queue status report of @site: problems found",
            ),
            (
                MessageKey::MailSubjectOk,
                "Queue status report of @site: no problems",
            ),
            (MessageKey::GeneratedLine, "Report generated at @num"),
        ];
        for (key, template) in english {
            catalog.register(DEFAULT_LANGCODE, key, template);
        }
        catalog
    }

    pub fn register(&mut self, langcode: &str, key: MessageKey, template: impl Into<String>) {
        self.messages
            .insert((key, langcode.to_string()), template.into());
    }

    /// Renders the template for the given key and language, falling back to
    /// English when the language has no translation for the key.
    pub fn translate(&self, key: MessageKey, langcode: &str, args: &[(&str, String)]) -> String {
        let template = self
            .messages
            .get(&(key, langcode.to_string()))
            .or_else(|| self.messages.get(&(key, DEFAULT_LANGCODE.to_string())))
            .map(String::as_str)
            .unwrap_or_default();
        render(template, args)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces each named `@placeholder` with its argument. Longer names are
/// replaced first so `@site` cannot clobber `@states`.
fn render(template: &str, args: &[(&str, String)]) -> String {
    let mut args: Vec<&(&str, String)> = args.iter().collect();
    args.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(name, value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_named_placeholders() {
        let catalog = MessageCatalog::new();
        let rendered = catalog.translate(
            MessageKey::QueueLine,
            "en",
            &[
                ("@queue", "mail".to_string()),
                ("@num", "25".to_string()),
                ("@level", "critical".to_string()),
            ],
        );
        assert_eq!(rendered, "Queue mail has 25 items and is at critical state");
    }

    #[test]
    fn site_placeholder_does_not_clobber_states() {
        let mut catalog = MessageCatalog::new();
        catalog.register("en", MessageKey::StatusDetail, "@site says: @states");
        let rendered = catalog.translate(
            MessageKey::StatusDetail,
            "en",
            &[
                ("@site", "example.org".to_string()),
                ("@states", "all fine".to_string()),
            ],
        );
        assert_eq!(rendered, "example.org says: all fine");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let catalog = MessageCatalog::new();
        let rendered = catalog.translate(MessageKey::NoQueuesSentence, "de", &[]);
        assert_eq!(rendered, "There are currently no queue states known.");
    }

    #[test]
    fn registered_translation_wins_over_the_fallback() {
        let mut catalog = MessageCatalog::new();
        catalog.register(
            "de",
            MessageKey::QueueSentence,
            "@queue ist im Zustand @level",
        );
        let rendered = catalog.translate(
            MessageKey::QueueSentence,
            "de",
            &[
                ("@queue", "mail".to_string()),
                ("@level", "sane".to_string()),
            ],
        );
        assert_eq!(rendered, "mail ist im Zustand sane");
    }
}
