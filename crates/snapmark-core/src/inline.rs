//! Inline snapshot matching.
//!
//! An inline snapshot is a literal written at the assertion call site. The
//! matcher compares the formatted received value with that literal and, when
//! the literal must change, asks the host to rewrite the call site through
//! [`SnapshotEvents::inline_snapshot_update`]. Source text is never edited
//! here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::errors::Result;
use crate::events::SnapshotEvents;
use crate::options::SnapshotOptions;

/// How an absent expectation is displayed
pub const UNDEFINED_FORMAT: &str = "undefined";

/// A literal that can be written back into source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InlineLiteral {
    Bool(bool),
    Number(Number),
    String(String),
    Null,
}

impl InlineLiteral {
    /// Literal form of a value, if it is a scalar
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(InlineLiteral::Bool(*b)),
            Value::Number(n) => Some(InlineLiteral::Number(n.clone())),
            Value::String(s) => Some(InlineLiteral::String(s.clone())),
            Value::Null => Some(InlineLiteral::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            InlineLiteral::Bool(b) => Value::Bool(*b),
            InlineLiteral::Number(n) => Value::Number(n.clone()),
            InlineLiteral::String(s) => Value::String(s.clone()),
            InlineLiteral::Null => Value::Null,
        }
    }
}

impl From<&str> for InlineLiteral {
    fn from(value: &str) -> Self {
        InlineLiteral::String(value.to_string())
    }
}

impl From<String> for InlineLiteral {
    fn from(value: String) -> Self {
        InlineLiteral::String(value)
    }
}

impl From<bool> for InlineLiteral {
    fn from(value: bool) -> Self {
        InlineLiteral::Bool(value)
    }
}

impl From<i64> for InlineLiteral {
    fn from(value: i64) -> Self {
        InlineLiteral::Number(value.into())
    }
}

impl From<u64> for InlineLiteral {
    fn from(value: u64) -> Self {
        InlineLiteral::Number(value.into())
    }
}

/// Location of the assertion in test source: 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A requested rewrite of one call site, applied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineSnapshotUpdate {
    pub line: u32,
    pub column: u32,
    pub snapshot: InlineLiteral,
}

/// Outcome of comparing a received value with an inline literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineMatch {
    Match,
    /// The literal is being (re)recorded. Reported even in frozen mode, where
    /// the rewrite itself is suppressed.
    Update,
    NoMatch {
        received_format: String,
        expected_format: String,
    },
}

/// Canonical display string of a value.
///
/// Strings pass through untouched; everything else is pretty-printed.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn format_expected(expected: Option<&InlineLiteral>) -> String {
    expected
        .map(|literal| format_value(&literal.to_value()))
        .unwrap_or_else(|| UNDEFINED_FORMAT.to_string())
}

/// Decides MATCH / UPDATE / NO_MATCH for inline snapshots
#[derive(Clone)]
pub struct InlineMatcher {
    options: SnapshotOptions,
    events: Arc<dyn SnapshotEvents>,
}

impl InlineMatcher {
    pub fn new(options: SnapshotOptions, events: Arc<dyn SnapshotEvents>) -> Self {
        Self { options, events }
    }

    pub fn options(&self) -> SnapshotOptions {
        self.options
    }

    /// Compare `received` with the literal at `call_site`.
    ///
    /// `expected == None` means nothing has been recorded yet, which always
    /// stages an update.
    pub fn check(
        &self,
        call_site: CallSite,
        received: &Value,
        expected: Option<&InlineLiteral>,
    ) -> InlineMatch {
        let received_format = format_value(received);
        let expected_format = format_expected(expected);

        if received_format == expected_format {
            return InlineMatch::Match;
        }

        if !self.options.update_snapshots && expected.is_some() {
            return InlineMatch::NoMatch {
                received_format,
                expected_format,
            };
        }

        if !self.options.freeze_snapshots {
            let snapshot = InlineLiteral::from_value(received)
                .unwrap_or(InlineLiteral::String(received_format));
            self.events.inline_snapshot_update(&InlineSnapshotUpdate {
                line: call_site.line,
                column: call_site.column,
                snapshot,
            });
        }

        InlineMatch::Update
    }

    /// [`check`](Self::check) for any serializable value
    ///
    /// # Errors
    ///
    /// `Serialization` when `received` cannot be represented as JSON.
    pub fn check_serialize<T: Serialize + ?Sized>(
        &self,
        call_site: CallSite,
        received: &T,
        expected: Option<&InlineLiteral>,
    ) -> Result<InlineMatch> {
        let value = serde_json::to_value(received)?;
        Ok(self.check(call_site, &value, expected))
    }
}
