//! Message registry.
//!
//! Codes and symbols are a stable contract: configuration files and inline
//! suppressions refer to messages by either one.

use serde::{Deserialize, Serialize};

use crate::lint::Severity;

/// Identifier of every message this linter can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageId {
    #[serde(rename = "syntax-error")]
    SyntaxError,
    #[serde(rename = "simple-basestring-literal")]
    SimpleBasestringLiteral,
    #[serde(rename = "string-format-operator-deprecated")]
    StringFormatOperatorDeprecated,
    #[serde(rename = "implement-unicode-magic-method")]
    ImplementUnicodeMagicMethod,
}

/// Static description of a message.
#[derive(Debug)]
pub struct MessageDef {
    pub id: MessageId,
    pub code: &'static str,
    pub symbol: &'static str,
    /// Text shown for each occurrence.
    pub template: &'static str,
    /// Longer explanation for `list-messages` and SARIF rules.
    pub description: &'static str,
    /// Name of the checker that emits it.
    pub checker: &'static str,
}

pub static SYNTAX_ERROR: MessageDef = MessageDef {
    id: MessageId::SyntaxError,
    code: "E0001",
    symbol: "syntax-error",
    template: "parse error, file could not be analyzed",
    description: "Used when the source cannot be parsed as Python.",
    checker: "main",
};

pub static SIMPLE_BASESTRING_LITERAL: MessageDef = MessageDef {
    id: MessageId::SimpleBasestringLiteral,
    code: "W1403",
    symbol: "simple-basestring-literal",
    template: "simple string literal detected. Use r or u prefix",
    description: "Used when a basestring literal is detected",
    checker: "only_unicode",
};

pub static STRING_FORMAT_OPERATOR_DEPRECATED: MessageDef = MessageDef {
    id: MessageId::StringFormatOperatorDeprecated,
    code: "W1404",
    symbol: "string-format-operator-deprecated",
    template: "% operator is deprecated",
    description: "Used when a string format operator is detected",
    checker: "string-format-deprecated",
};

pub static IMPLEMENT_UNICODE_MAGIC_METHOD: MessageDef = MessageDef {
    id: MessageId::ImplementUnicodeMagicMethod,
    code: "W1405",
    symbol: "implement-unicode-magic-method",
    template: "Implement __unicode__ instead of __str__",
    description: "Used when a __str__ method is detected instead of a __unicode__",
    checker: "unicode-magic-method",
};

impl MessageId {
    /// Every message, in code order.
    pub const ALL: [MessageId; 4] = [
        MessageId::SyntaxError,
        MessageId::SimpleBasestringLiteral,
        MessageId::StringFormatOperatorDeprecated,
        MessageId::ImplementUnicodeMagicMethod,
    ];

    pub fn def(&self) -> &'static MessageDef {
        match self {
            MessageId::SyntaxError => &SYNTAX_ERROR,
            MessageId::SimpleBasestringLiteral => &SIMPLE_BASESTRING_LITERAL,
            MessageId::StringFormatOperatorDeprecated => &STRING_FORMAT_OPERATOR_DEPRECATED,
            MessageId::ImplementUnicodeMagicMethod => &IMPLEMENT_UNICODE_MAGIC_METHOD,
        }
    }

    pub fn code(&self) -> &'static str {
        self.def().code
    }

    pub fn symbol(&self) -> &'static str {
        self.def().symbol
    }

    /// Severity follows the code letter.
    pub fn severity(&self) -> Severity {
        match self.code().chars().next() {
            Some('E') | Some('F') => Severity::Error,
            Some('W') => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Resolve a code (case-insensitive) or symbol.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.code().eq_ignore_ascii_case(s) || id.symbol() == s)
    }

    /// Resolve a selector: a code, a symbol, or `all` / `*`.
    ///
    /// Returns an empty list for unknown selectors.
    pub fn matching(selector: &str) -> Vec<MessageId> {
        match selector.trim() {
            "all" | "*" => Self::ALL.to_vec(),
            other => Self::parse(other).into_iter().collect(),
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
