//! Single-pass indentation scan
//!
//! Folds the physical lines of one file through the quote tracker, the
//! continuation assembler and the block stack in lockstep, checking every
//! line against the indentation the fold infers for it.

use std::io::BufRead;

use tracing::{debug, trace};

use super::report::{
    render_rewrite, Diagnostic, DiagnosticKind, LineEnding, LineLimits, Severity,
};
use crate::error::ScanError;
use crate::format::{starts_with_closer, BlockStack, LogicalStatement};
use crate::parser::{CodeView, LineKind, SourceLine, StringDelimiter};
use crate::scope::{classify_head, StatementHead};
use crate::Result;

/// Outcome of scanning one file
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// No recoverable or fatal diagnostic was raised
    pub passed: bool,
    /// Canonical rewrite, one entry per physical line; `None` after a fatal error
    pub rewritten: Option<Vec<String>>,
    /// All findings in line order
    pub diagnostics: Vec<Diagnostic>,
    pub fatal: Option<ScanError>,
    /// Terminator the rewrite is rendered with
    pub line_ending: LineEnding,
}

impl ScanReport {
    /// Split into the verdict and the rewritten lines
    #[must_use]
    pub fn into_verdict(self) -> (bool, Option<Vec<String>>) {
        (self.passed, self.rewritten)
    }

    /// Rewritten file text, ending in one line terminator
    #[must_use]
    pub fn rewrite_text(&self) -> Option<String> {
        self.rewritten
            .as_deref()
            .map(|lines| render_rewrite(lines, self.line_ending))
    }

    /// Diagnostics of at least `severity`
    pub fn diagnostics_at(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.severity() >= severity)
    }
}

/// Incremental scanner for one file
///
/// Created fresh per file and consumed by [`Scanner::finish`]; nothing is
/// shared between files.
#[derive(Debug)]
pub struct Scanner {
    limits: LineLimits,
    blocks: BlockStack,
    /// Statement whose last physical line ended with `&`
    statement: Option<LogicalStatement>,
    open_quote: StringDelimiter,
    line_number: usize,
    rewritten: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    passed: bool,
    fatal: Option<ScanError>,
    line_ending: LineEnding,
}

impl Scanner {
    #[must_use]
    pub fn new(limits: LineLimits) -> Self {
        Self {
            limits,
            blocks: BlockStack::new(),
            statement: None,
            open_quote: StringDelimiter::None,
            line_number: 0,
            rewritten: Vec::new(),
            diagnostics: Vec::new(),
            passed: true,
            fatal: None,
            line_ending: LineEnding::Lf,
        }
    }

    /// Render the rewrite with `ending` instead of LF
    #[must_use]
    pub fn with_line_ending(mut self, ending: LineEnding) -> Self {
        self.line_ending = ending;
        self
    }

    /// Scan the next physical line
    ///
    /// Lines fed after a fatal error are ignored.
    pub fn feed(&mut self, raw: &str) {
        if self.fatal.is_some() {
            return;
        }
        self.line_number += 1;
        let line = if self.statement.is_some() {
            SourceLine::continuation(raw, self.line_number)
        } else {
            SourceLine::parse(raw, self.line_number)
        };
        trace!(line = line.number, kind = ?line.kind, "scan line");

        if let Some(diag) = self.limits.check(&line) {
            self.record(diag);
        }

        // A literal left open must be carried by a line starting with `&`
        if self.open_quote.is_open() && !line.starts_with_ampersand() {
            self.abort(line.number);
            return;
        }

        match line.kind {
            LineKind::Blank => {
                self.end_statement();
                self.rewritten.push(String::new());
            }
            LineKind::Verbatim => self.rewritten.push(line.text.to_string()),
            LineKind::Comment => {
                let target = match &self.statement {
                    Some(statement) => statement.continuation_indent(false),
                    None => self.blocks.expected_indent(),
                };
                self.emit(&line, target);
            }
            LineKind::Code => self.code_line(&line),
        }
    }

    /// Finish the file and produce the report
    #[must_use]
    pub fn finish(mut self) -> ScanReport {
        if self.fatal.is_none() {
            self.end_statement();
            if self.open_quote.is_open() {
                self.abort(self.line_number);
            }
        }
        debug!(
            lines = self.line_number,
            passed = self.passed,
            diagnostics = self.diagnostics.len(),
            "scan finished"
        );
        ScanReport {
            passed: self.passed,
            rewritten: self.fatal.is_none().then_some(self.rewritten),
            diagnostics: self.diagnostics,
            fatal: self.fatal,
            line_ending: self.line_ending,
        }
    }

    fn code_line(&mut self, line: &SourceLine<'_>) {
        let carried = self.open_quote;
        let view = CodeView::extract(line.content, carried);
        self.open_quote = view.open_quote;

        let statement = if let Some(mut statement) = self.statement.take() {
            let leading_closer = !carried.is_open() && starts_with_closer(line.content);
            let target = statement.continuation_indent(leading_closer);
            self.emit(line, target);
            statement.absorb(&view);
            statement
        } else {
            let head = classify_head(view.body());
            if head.is_closer() {
                self.blocks.close(head);
            }
            let target = match head {
                StatementHead::Specifier(specifier) => self
                    .blocks
                    .specifier_indent(specifier)
                    .unwrap_or_else(|| self.blocks.expected_indent()),
                _ => self.blocks.expected_indent(),
            };
            self.emit(line, target);
            LogicalStatement::begin(head, target, &view)
        };

        if view.continues {
            self.statement = Some(statement);
            return;
        }
        self.blocks.complete(statement.head, &statement.text);
        if view.open_quote.is_open() {
            self.abort(line.number);
        }
    }

    /// Complete the in-flight statement, if any
    fn end_statement(&mut self) {
        if let Some(statement) = self.statement.take() {
            self.blocks.complete(statement.head, &statement.text);
        }
    }

    /// Check a line against `target` and record its rewrite
    fn emit(&mut self, line: &SourceLine<'_>, target: usize) {
        let expected = line.effective_target(target);
        if line.indent != expected {
            self.record(Diagnostic::new(
                line.number,
                DiagnosticKind::Indentation {
                    expected,
                    found: line.indent,
                },
            ));
        }
        self.rewritten.push(line.reindent(target));
    }

    fn record(&mut self, diag: Diagnostic) {
        if diag.severity() >= Severity::Recoverable {
            self.passed = false;
        }
        self.diagnostics.push(diag);
    }

    fn abort(&mut self, line: usize) {
        let err = ScanError::UnbalancedQuotes { line };
        debug!(%err, "scan aborted");
        self.record(Diagnostic::new(line, DiagnosticKind::UnbalancedQuotes));
        self.fatal = Some(err);
        self.statement = None;
    }
}

/// Scan a sequence of physical lines
pub fn scan<I, S>(lines: I, limits: &LineLimits) -> ScanReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = Scanner::new(*limits);
    for line in lines {
        scanner.feed(line.as_ref());
    }
    scanner.finish()
}

/// Scan source text, keeping its line terminator for the rewrite
#[must_use]
pub fn scan_str(source: &str, limits: &LineLimits) -> ScanReport {
    let mut scanner = Scanner::new(*limits).with_line_ending(LineEnding::detect(source));
    for line in source.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Scan a buffered reader line by line
pub fn scan_reader<R: BufRead>(input: R, limits: &LineLimits) -> Result<ScanReport> {
    let mut scanner = Scanner::new(*limits);
    for line in input.lines() {
        scanner.feed(&line?);
    }
    Ok(scanner.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> ScanReport {
        scan_str(source, &LineLimits::default())
    }

    fn indentation_errors(report: &ScanReport) -> Vec<(usize, usize, usize)> {
        report
            .diagnostics
            .iter()
            .filter_map(|diag| match diag.kind {
                DiagnosticKind::Indentation { expected, found } => {
                    Some((diag.line, expected, found))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_simple_if() {
        let report = check("if (x) then\n   y = 1\nend if\n");
        assert!(report.passed);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_if_mismatch() {
        let report = check("if (x) then\n  y = 1\nend if\n");
        assert!(!report.passed);
        assert_eq!(indentation_errors(&report), vec![(2, 3, 2)]);
        assert_eq!(
            report.rewritten.as_deref(),
            Some(&["if (x) then".to_string(), "   y = 1".into(), "end if".into()][..])
        );
    }

    #[test]
    fn test_else_dedent() {
        let report = check("if (x) then\n   a = 1\nelse\n   a = 2\nend if\n");
        assert!(report.passed, "{:?}", report.diagnostics);
    }

    #[test]
    fn test_closer_line_at_parent_level() {
        let report = check("do i = 1, n\n   x = i\n   end do\n");
        assert_eq!(indentation_errors(&report), vec![(3, 0, 3)]);
    }

    #[test]
    fn test_comment_checked_against_target() {
        let report = check("do i = 1, n\n! column one is free\n  ! indented comment\nend do\n");
        assert_eq!(indentation_errors(&report), vec![(3, 3, 2)]);
    }

    #[test]
    fn test_comment_inside_chain_uses_continuation_target() {
        let report = check("call foo(a, &\n     ! the second argument\n     b)\n");
        assert!(report.passed, "{:?}", report.diagnostics);
    }

    #[test]
    fn test_blank_line_ends_chain() {
        let report = check("x = a + &\n\ny = 2\n");
        assert!(report.passed, "{:?}", report.diagnostics);
    }

    #[test]
    fn test_open_quote_needs_ampersand() {
        let report = check("print *, 'broken &\nrest'\n");
        assert!(!report.passed);
        assert_eq!(report.rewritten, None);
        assert_eq!(report.fatal, Some(ScanError::UnbalancedQuotes { line: 2 }));
    }

    #[test]
    fn test_open_quote_carried_by_ampersand() {
        let report = check("print *, 'first half &\n     &second half'\n");
        assert!(report.passed, "{:?}", report.diagnostics);
        assert!(report.fatal.is_none());
    }

    #[test]
    fn test_open_quote_at_statement_end_is_fatal() {
        let report = check("print *, 'never closed\n");
        assert_eq!(report.fatal, Some(ScanError::UnbalancedQuotes { line: 1 }));
        assert!(report.rewritten.is_none());
    }

    #[test]
    fn test_open_quote_at_eof_is_fatal() {
        let report = check("print *, 'never closed &");
        assert_eq!(report.fatal, Some(ScanError::UnbalancedQuotes { line: 1 }));
    }

    #[test]
    fn test_lines_after_fatal_ignored() {
        let report = check("s = 'a\n   badly indented\n");
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_verdict() {
        let (passed, rewritten) = check("x = 1\n").into_verdict();
        assert!(passed);
        assert_eq!(rewritten, Some(vec!["x = 1".to_string()]));
    }

    #[test]
    fn test_crlf_rewrite_keeps_terminator() {
        let report = check("if (x) then\r\n  y = 1\r\nend if\r\n");
        assert_eq!(report.line_ending, LineEnding::CrLf);
        assert_eq!(
            report.rewrite_text().as_deref(),
            Some("if (x) then\r\n   y = 1\r\nend if\r\n")
        );
    }

    #[test]
    fn test_numeric_continuation_is_not_a_label() {
        let report = check("x = [ &\n1.5, 2.5]\n");
        assert_eq!(indentation_errors(&report), vec![(2, 5, 0)]);
        assert_eq!(
            report.rewrite_text().as_deref(),
            Some("x = [ &\n     1.5, 2.5]\n")
        );
    }

    #[test]
    fn test_scan_reader() {
        let input = std::io::Cursor::new("program p\n  x = 1\nend program p\n");
        let report = scan_reader(input, &LineLimits::default()).unwrap();
        assert!(report.passed);
        assert_eq!(
            report.rewrite_text().as_deref(),
            Some("program p\n  x = 1\nend program p\n")
        );
    }
}
