//! Per-file message collector handed to checker callbacks.

use std::collections::HashSet;

use crate::analysis::Span;
use crate::checkers::MessageId;

use super::Diagnostic;

/// Where a diagnostic is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// A whole source line (1-indexed).
    Line(usize),
    /// A syntax node or token span.
    Span(Span),
}

impl Anchor {
    fn position(&self) -> (usize, Option<usize>) {
        match self {
            Anchor::Line(line) => (*line, None),
            Anchor::Span(span) => (span.start_line, Some(span.start_col)),
        }
    }
}

/// Which messages are enabled for a run.
///
/// Everything is enabled by default. Enabling wins over disabling, so
/// `disable: [all]` plus `enable: [W1403]` runs a single message.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    disabled: HashSet<MessageId>,
    enabled: HashSet<MessageId>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable every message matched by `selector`. Returns false if the
    /// selector matched nothing.
    pub fn disable(&mut self, selector: &str) -> bool {
        let ids = MessageId::matching(selector);
        self.disabled.extend(ids.iter().copied());
        !ids.is_empty()
    }

    /// Force-enable every message matched by `selector`. Returns false if
    /// the selector matched nothing.
    pub fn enable(&mut self, selector: &str) -> bool {
        let ids = MessageId::matching(selector);
        self.enabled.extend(ids.iter().copied());
        !ids.is_empty()
    }

    pub fn is_enabled(&self, id: MessageId) -> bool {
        self.enabled.contains(&id) || !self.disabled.contains(&id)
    }

    /// Enabled messages, in code order.
    pub fn enabled_ids(&self) -> Vec<MessageId> {
        MessageId::ALL
            .into_iter()
            .filter(|id| self.is_enabled(*id))
            .collect()
    }
}

/// Collects diagnostics for one file.
pub struct MessageCollector<'a> {
    file: &'a str,
    filter: &'a MessageFilter,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> MessageCollector<'a> {
    pub fn new(file: &'a str, filter: &'a MessageFilter) -> Self {
        Self {
            file,
            filter,
            diagnostics: Vec::new(),
        }
    }

    /// Record a message using its standard template.
    pub fn add_message(&mut self, id: MessageId, anchor: Anchor) {
        self.add_message_with_text(id, anchor, id.def().template.to_string());
    }

    /// Record a message with custom text.
    pub fn add_message_with_text(&mut self, id: MessageId, anchor: Anchor, message: String) {
        if !self.filter.is_enabled(id) {
            return;
        }
        let (line, column) = anchor.position();
        self.diagnostics.push(Diagnostic {
            id,
            message,
            file: self.file.to_string(),
            line,
            column,
            severity: id.severity(),
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_enabled() {
        let filter = MessageFilter::new();
        assert_eq!(filter.enabled_ids(), MessageId::ALL.to_vec());
    }

    #[test]
    fn test_enable_wins_over_disable() {
        let mut filter = MessageFilter::new();
        assert!(filter.disable("all"));
        assert!(filter.enable("simple-basestring-literal"));
        assert_eq!(filter.enabled_ids(), vec![MessageId::SimpleBasestringLiteral]);
    }

    #[test]
    fn test_unknown_selector() {
        let mut filter = MessageFilter::new();
        assert!(!filter.disable("W0000"));
        assert_eq!(filter.enabled_ids().len(), MessageId::ALL.len());
    }

    #[test]
    fn test_collector_drops_disabled_messages() {
        let mut filter = MessageFilter::new();
        filter.disable("W1404");
        let mut collector = MessageCollector::new("a.py", &filter);

        collector.add_message(MessageId::StringFormatOperatorDeprecated, Anchor::Line(3));
        collector.add_message(MessageId::SimpleBasestringLiteral, Anchor::Line(4));

        let diagnostics = collector.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, MessageId::SimpleBasestringLiteral);
        assert_eq!(diagnostics[0].line, 4);
        assert_eq!(diagnostics[0].column, None);
        assert_eq!(diagnostics[0].file, "a.py");
    }

    #[test]
    fn test_span_anchor_has_column() {
        let filter = MessageFilter::new();
        let mut collector = MessageCollector::new("a.py", &filter);
        let span = Span::point(12, 2, 5);
        collector.add_message(MessageId::ImplementUnicodeMagicMethod, Anchor::Span(span));

        let d = &collector.diagnostics()[0];
        assert_eq!((d.line, d.column), (2, Some(5)));
        assert_eq!(d.message, "Implement __unicode__ instead of __str__");
    }
}
