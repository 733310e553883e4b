//! Line verdicts and canonical rewrite output
//!
//! Every check the scanner performs ends up as a [`Diagnostic`]. Its
//! [`Severity`] decides whether it flips the file verdict.

use crate::parser::SourceLine;

/// How a diagnostic affects the file verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Reported, verdict unaffected
    Advisory,
    /// Flips the verdict, scanning continues
    Recoverable,
    /// Aborts the scan, no rewrite is produced
    Fatal,
}

/// What went wrong on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Indentation { expected: usize, found: usize },
    /// Code line over the limit; `hard` when beyond the tolerance band
    LineTooLong {
        limit: usize,
        length: usize,
        hard: bool,
    },
    CommentTooLong { limit: usize, length: usize },
    UnbalancedQuotes,
}

/// One finding, tied to a 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    #[must_use]
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::Indentation { .. } | DiagnosticKind::LineTooLong { hard: true, .. } => {
                Severity::Recoverable
            }
            DiagnosticKind::LineTooLong { hard: false, .. }
            | DiagnosticKind::CommentTooLong { .. } => Severity::Advisory,
            DiagnosticKind::UnbalancedQuotes => Severity::Fatal,
        }
    }

    /// Console message for this diagnostic in `source`
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let line = self.line;
        match self.kind {
            DiagnosticKind::Indentation { expected, found } => format!(
                "Indentation error in {source}, line {line}: Expected {expected} spaces, found {found}"
            ),
            DiagnosticKind::LineTooLong { limit, length, .. } => {
                format!("Line {line} in {source} exceeds {limit} characters: {length}")
            }
            DiagnosticKind::CommentTooLong { limit, length } => {
                format!("Comment line {line} in {source} exceeds {limit} characters: {length}")
            }
            DiagnosticKind::UnbalancedQuotes => {
                format!("Unbalanced quotes in {source}, line {line}")
            }
        }
    }
}

/// Line length policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLimits {
    pub max_line_length: usize,
    /// Fraction of `max_line_length` tolerated on code lines as advisory only
    pub tolerance: f64,
}

impl Default for LineLimits {
    fn default() -> Self {
        Self {
            max_line_length: 80,
            tolerance: 0.1,
        }
    }
}

impl LineLimits {
    #[must_use]
    pub fn new(max_line_length: usize, tolerance: f64) -> Self {
        Self {
            max_line_length,
            tolerance,
        }
    }

    /// Columns past the limit that are only advisory: `floor(max * tolerance)`
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn band(&self) -> usize {
        (self.max_line_length as f64 * self.tolerance.max(0.0)).floor() as usize
    }

    /// Length finding for `line`, if it is over the limit
    #[must_use]
    pub fn check(&self, line: &SourceLine<'_>) -> Option<Diagnostic> {
        let limit = self.max_line_length;
        let length = line.length;
        if length <= limit {
            return None;
        }
        let kind = if line.is_comment_only() {
            DiagnosticKind::CommentTooLong { limit, length }
        } else {
            DiagnosticKind::LineTooLong {
                limit,
                length,
                hard: length > limit + self.band(),
            }
        };
        Some(Diagnostic::new(line.number, kind))
    }
}

/// Line terminator used when writing a rewrite back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Terminator of the first line of `source`; LF when it has none
    #[must_use]
    pub fn detect(source: &str) -> Self {
        match source.find('\n') {
            Some(pos) if source[..pos].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Join rewritten lines into file text ending in exactly one line terminator
///
/// Trailing blank lines are dropped; text with no content renders empty.
#[must_use]
pub fn render_rewrite<S: AsRef<str>>(lines: &[S], ending: LineEnding) -> String {
    let Some(last) = lines.iter().rposition(|line| !line.as_ref().is_empty()) else {
        return String::new();
    };
    let mut text = String::new();
    for line in &lines[..=last] {
        text.push_str(line.as_ref());
        text.push_str(ending.as_str());
    }
    text
}
