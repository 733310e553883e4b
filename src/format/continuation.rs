//! Continuation chain tracking
//!
//! Joins physical lines ending in `&` into one logical statement and computes
//! the indentation of every continuation line from the bracket balance, the
//! nested split-assignment depth and the read/write control-list extra.

use crate::parser::CodeView;
use crate::scope::{is_readwrite, StatementHead};

/// Indent added per open continuation unit
pub const CONTINUATION_INDENT: usize = 5;

/// Progress of a READ/WRITE control list across the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ReadWrite {
    #[default]
    None,
    /// Control list still open after the first line
    ListOpen,
    /// Control list closed on a continuation line; its unit stays
    ListClosed,
}

/// Net count of unmatched opening brackets in quote-free code
#[must_use]
pub fn bracket_delta(code: &str) -> isize {
    code.chars().fold(0, |acc, c| match c {
        '(' | '[' => acc + 1,
        ')' | ']' => acc - 1,
        _ => acc,
    })
}

/// Whether a continuation line's first code closes a bracket (`)`, `]` or `/)`)
#[must_use]
pub fn starts_with_closer(content: &str) -> bool {
    let rest = content.trim_start();
    let rest = rest.strip_prefix('&').unwrap_or(rest).trim_start();
    rest.starts_with(')') || rest.starts_with(']') || rest.starts_with("/)")
}

/// Whether quote-free code ends in an assignment `=` right before its trailing `&`
///
/// Relational `==`, `/=`, `<=`, `>=` and pointer `=>` never count.
#[must_use]
pub fn ends_with_assignment(code: &str) -> bool {
    let code = code.trim_end();
    let Some(code) = code.strip_suffix('&') else {
        return false;
    };
    let Some(before) = code.trim_end().strip_suffix('=') else {
        return false;
    };
    !before.ends_with(['=', '/', '<', '>'])
}

/// Running state of one continuation chain
#[derive(Debug, Clone, Default)]
pub struct Continuation {
    /// Unmatched brackets so far
    balance: isize,
    /// Balance recorded at each open split assignment, innermost last
    splits: Vec<isize>,
    readwrite: ReadWrite,
}

impl Continuation {
    /// Start a chain from the first physical line of a statement
    ///
    /// A chain that leaves no bracket open on its first line still indents
    /// one unit, so the balance is seeded to 1.
    #[must_use]
    pub fn first_line(code: &str) -> Self {
        let balance = bracket_delta(code);
        let readwrite = if is_readwrite(code) && balance > 0 {
            ReadWrite::ListOpen
        } else {
            ReadWrite::None
        };
        Self {
            balance: balance.max(1),
            splits: Vec::new(),
            readwrite,
        }
    }

    /// Number of continuation units for the next physical line
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn units(&self, leading_closer: bool) -> usize {
        let depth = if leading_closer {
            self.balance - 1
        } else {
            self.balance
        };
        let extra = usize::from(self.readwrite == ReadWrite::ListClosed);
        depth.max(0) as usize + self.splits.len() + extra
    }

    /// Fold a continuation line into the chain
    pub fn absorb(&mut self, code: &str, continues: bool) {
        self.balance += bracket_delta(code);
        if self.readwrite == ReadWrite::ListOpen && self.balance <= 0 {
            self.readwrite = ReadWrite::ListClosed;
        }
        while self.splits.last().is_some_and(|&start| start >= self.balance) {
            self.splits.pop();
        }
        if continues && ends_with_assignment(code) {
            self.splits.push(self.balance);
        }
    }

    #[must_use]
    pub fn split_depth(&self) -> usize {
        self.splits.len()
    }

    #[must_use]
    pub fn balance(&self) -> isize {
        self.balance
    }
}

/// One logical statement being assembled
#[derive(Debug, Clone)]
pub struct LogicalStatement {
    /// Classification of the first physical line
    pub head: StatementHead,
    /// Indentation assigned to the first physical line
    pub indent: usize,
    /// Quote-free code of all physical lines joined by a blank
    pub text: String,
    chain: Continuation,
}

impl LogicalStatement {
    /// Start a statement from its first physical line
    #[must_use]
    pub fn begin(head: StatementHead, indent: usize, view: &CodeView) -> Self {
        let body = view.body();
        Self {
            head,
            indent,
            text: body.to_string(),
            chain: Continuation::first_line(body),
        }
    }

    /// Indentation of the next continuation (or interleaved comment) line
    #[must_use]
    pub fn continuation_indent(&self, leading_closer: bool) -> usize {
        self.indent + self.chain.units(leading_closer) * CONTINUATION_INDENT
    }

    /// Fold a continuation line into the statement
    pub fn absorb(&mut self, view: &CodeView) {
        self.chain.absorb(&view.code, view.continues);
        let body = view.body();
        if !body.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(body);
        }
    }

    #[must_use]
    pub fn chain(&self) -> &Continuation {
        &self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::StringDelimiter;

    fn view(line: &str) -> CodeView {
        CodeView::extract(line, StringDelimiter::None)
    }

    #[test]
    fn test_bracket_delta() {
        assert_eq!(bracket_delta("call foo(a, b(1), &"), 1);
        assert_eq!(bracket_delta("x = [1, 2] + (/ 3 /)"), 0);
        assert_eq!(bracket_delta("fmt) x"), -1);
    }

    #[test]
    fn test_starts_with_closer() {
        assert!(starts_with_closer("   )"));
        assert!(starts_with_closer("& ] + 1"));
        assert!(starts_with_closer("/)"));
        assert!(!starts_with_closer("b)"));
    }

    #[test]
    fn test_ends_with_assignment() {
        assert!(ends_with_assignment("a = &"));
        assert!(ends_with_assignment("b(i) =&"));
        assert!(!ends_with_assignment("x == &"));
        assert!(!ends_with_assignment("x /= &"));
        assert!(!ends_with_assignment("p => &"));
        assert!(!ends_with_assignment("x <= &"));
        assert!(!ends_with_assignment("a ="));
    }

    #[test]
    fn test_seeded_balance() {
        let chain = Continuation::first_line("total = a + &");
        assert_eq!(chain.units(false), 1);
        let chain = Continuation::first_line("call foo(a, (b &");
        assert_eq!(chain.units(false), 2);
        assert_eq!(chain.units(true), 1);
    }

    #[test]
    fn test_depth_law() {
        let first = view("call foo(a, &");
        let mut stmt = LogicalStatement::begin(StatementHead::Plain, 4, &first);
        assert_eq!(stmt.continuation_indent(false), 9);
        stmt.absorb(&view("bar(b, &"));
        assert_eq!(stmt.continuation_indent(false), 14);
        assert_eq!(stmt.continuation_indent(true), 9);
        stmt.absorb(&view("c), &"));
        assert_eq!(stmt.continuation_indent(false), 9);
        assert_eq!(stmt.text, "call foo(a, bar(b, c),");
    }

    #[test]
    fn test_readwrite_extra() {
        let mut stmt =
            LogicalStatement::begin(StatementHead::Plain, 0, &view("read(unit, &"));
        assert_eq!(stmt.continuation_indent(false), 5);
        stmt.absorb(&view("fmt) x, &"));
        assert_eq!(stmt.chain().balance(), 0);
        assert_eq!(stmt.continuation_indent(false), 5);
    }

    #[test]
    fn test_readwrite_closed_on_first_line() {
        let stmt =
            LogicalStatement::begin(StatementHead::Plain, 0, &view("write(*, *) a, &"));
        assert_eq!(stmt.continuation_indent(false), 5);
    }

    #[test]
    fn test_split_assignment() {
        let mut stmt =
            LogicalStatement::begin(StatementHead::Plain, 0, &view("call solve(a, &"));
        stmt.absorb(&view("tol = &"));
        assert_eq!(stmt.chain().split_depth(), 1);
        assert_eq!(stmt.continuation_indent(false), 10);
        // Balance back to the recorded level closes the split
        stmt.absorb(&view("1.0e-6, &"));
        assert_eq!(stmt.chain().split_depth(), 0);
        assert_eq!(stmt.continuation_indent(false), 5);
    }

    #[test]
    fn test_nested_split_assignment() {
        let mut stmt =
            LogicalStatement::begin(StatementHead::Plain, 0, &view("call run(opts = &"));
        stmt.absorb(&view("config(depth = &"));
        assert_eq!(stmt.chain().split_depth(), 1);
        stmt.absorb(&view("inner(level = &"));
        assert_eq!(stmt.chain().split_depth(), 2);
        assert_eq!(stmt.chain().balance(), 3);
        stmt.absorb(&view("3)), &"));
        assert_eq!(stmt.chain().split_depth(), 0);
        assert_eq!(stmt.continuation_indent(false), 5);
    }
}
