/// `BlockStack` - Block-nesting state machine
///
/// Uses a stack of open constructs (IF, DO, MODULE, etc.) and derives the
/// expected body indentation from the increments of the open frames.
use tracing::debug;

use crate::scope::{
    classify_opener, closer_kind, BlockFrame, BlockKind, Specifier, StatementHead,
};

/// `BlockStack` tracks construct nesting for one file
#[derive(Debug, Default, Clone)]
pub struct BlockStack {
    /// Open constructs, innermost last
    frames: Vec<BlockFrame>,
}

impl BlockStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indentation of a plain statement in the innermost body
    #[must_use]
    pub fn expected_indent(&self) -> usize {
        self.frames.iter().map(|frame| frame.increment).sum()
    }

    /// Innermost open construct
    #[must_use]
    pub fn top(&self) -> Option<BlockKind> {
        self.frames.last().map(|frame| frame.kind)
    }

    /// Get current nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a new construct
    pub fn open(&mut self, kind: BlockKind) {
        self.frames.push(BlockFrame::new(kind));
        debug!(
            kind = %kind,
            depth = self.frames.len(),
            indent = self.expected_indent(),
            "open block"
        );
    }

    /// Apply a closer, returning whether any frame was popped
    ///
    /// `END <kind>` pops the innermost frame of that kind together with any
    /// unterminated frames above it. A bare `END` pops the innermost frame.
    /// A closer without a matching frame is ignored.
    pub fn close(&mut self, head: StatementHead) -> bool {
        let keep = match head {
            StatementHead::CloseAny => self.frames.len().checked_sub(1),
            StatementHead::Close(kind) => self.frames.iter().rposition(|frame| frame.kind == kind),
            StatementHead::Specifier(_) | StatementHead::Plain => None,
        };
        let Some(keep) = keep else {
            debug!(?head, "closer without matching block ignored");
            return false;
        };

        let dropped = self.frames.len() - keep;
        if dropped > 1 {
            debug!(?head, unterminated = dropped - 1, "closing unterminated blocks");
        }
        self.frames.truncate(keep);
        debug!(?head, depth = self.frames.len(), "close block");
        true
    }

    /// Indentation of a specifier statement, if it belongs to the innermost construct
    ///
    /// The dedent lasts for that statement only: nothing on the stack changes.
    #[must_use]
    pub fn specifier_indent(&self, specifier: Specifier) -> Option<usize> {
        let frame = self.frames.last()?;
        if !specifier.applies_to(frame.kind) {
            return None;
        }
        let dedent = if specifier == Specifier::Contains {
            frame.kind.specifier_dedent()
        } else {
            frame.increment
        };
        Some(self.expected_indent().saturating_sub(dedent))
    }

    /// Apply the effect of a completed logical statement
    ///
    /// Its `;`-separated parts act in order. The first part may open a block
    /// when the statement head is plain; every later part may close or open
    /// one, so `do i = 1, n; x(i) = 0; end do` leaves the stack unchanged and
    /// `x = 1; if (b) then` opens its IF.
    pub fn complete(&mut self, head: StatementHead, text: &str) {
        let mut parts = text.split(';');
        let first = parts.next().unwrap_or_default();
        if head == StatementHead::Plain {
            if let Some(kind) = classify_opener(first, self.top()) {
                self.open(kind);
            }
        }
        for part in parts.map(str::trim) {
            if let Some(closer) = closer_kind(part) {
                self.close(closer);
            } else if let Some(kind) = classify_opener(part, self.top()) {
                self.open(kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_nesting() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Module);
        stack.open(BlockKind::Procedure);
        stack.open(BlockKind::Loop);
        assert_eq!(stack.expected_indent(), 7);
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.top(), Some(BlockKind::Loop));
    }

    #[test]
    fn test_close_matching_kind() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Procedure);
        stack.open(BlockKind::Conditional);
        assert!(stack.close(StatementHead::Close(BlockKind::Conditional)));
        assert_eq!(stack.expected_indent(), 2);
    }

    #[test]
    fn test_close_pops_unterminated_frames() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Module);
        stack.open(BlockKind::Procedure);
        stack.open(BlockKind::Loop);
        stack.open(BlockKind::Conditional);
        assert!(stack.close(StatementHead::Close(BlockKind::Procedure)));
        assert_eq!(stack.top(), Some(BlockKind::Module));
        assert_eq!(stack.expected_indent(), 2);
    }

    #[test]
    fn test_unmatched_closer_is_ignored() {
        let mut stack = BlockStack::new();
        assert!(!stack.close(StatementHead::Close(BlockKind::Loop)));
        assert!(!stack.close(StatementHead::CloseAny));
        assert_eq!(stack.expected_indent(), 0);

        stack.open(BlockKind::Conditional);
        assert!(!stack.close(StatementHead::Close(BlockKind::Select)));
        assert_eq!(stack.expected_indent(), 3);
    }

    #[test]
    fn test_bare_end() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Program);
        stack.open(BlockKind::Loop);
        assert!(stack.close(StatementHead::CloseAny));
        assert_eq!(stack.top(), Some(BlockKind::Program));
    }

    #[test]
    fn test_specifier_indent() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Procedure);
        stack.open(BlockKind::Conditional);
        assert_eq!(stack.specifier_indent(Specifier::Else), Some(2));
        assert_eq!(stack.specifier_indent(Specifier::Case), None);
        // Stack unchanged: the next statement is back at body level
        assert_eq!(stack.expected_indent(), 5);
    }

    #[test]
    fn test_contains_in_type() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Module);
        stack.open(BlockKind::Type);
        assert_eq!(stack.specifier_indent(Specifier::Contains), Some(3));
        stack.close(StatementHead::Close(BlockKind::Type));
        assert_eq!(stack.specifier_indent(Specifier::Contains), Some(0));
    }

    #[test]
    fn test_complete_opens_block() {
        let mut stack = BlockStack::new();
        stack.complete(StatementHead::Plain, "subroutine step(dt)");
        stack.complete(StatementHead::Plain, "if (dt > 0.0) then");
        assert_eq!(stack.expected_indent(), 5);
        // Specifier and closer statements never open
        stack.complete(StatementHead::Specifier(Specifier::Else), "else if (x) then");
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_complete_one_line_block() {
        let mut stack = BlockStack::new();
        stack.complete(StatementHead::Plain, "do i = 1, n; x(i) = 0; end do");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_complete_trailing_closer_pops() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Conditional);
        stack.complete(StatementHead::Plain, "x = 1; end if");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_complete_opener_in_later_part() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Conditional);
        stack.complete(StatementHead::Plain, "x = 1; if (b) then");
        assert_eq!(stack.depth(), 2);
        assert!(stack.close(StatementHead::Close(BlockKind::Conditional)));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_complete_closer_then_opener() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Loop);
        stack.complete(StatementHead::Plain, "x = 0; end do; do j = 1, m");
        assert_eq!(stack.top(), Some(BlockKind::Loop));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_nested_select_restores() {
        let mut stack = BlockStack::new();
        stack.open(BlockKind::Select);
        assert_eq!(stack.specifier_indent(Specifier::Case), Some(0));
        stack.open(BlockKind::Select);
        assert_eq!(stack.specifier_indent(Specifier::Case), Some(3));
        stack.close(StatementHead::Close(BlockKind::Select));
        assert_eq!(stack.specifier_indent(Specifier::Case), Some(0));
        assert_eq!(stack.expected_indent(), 3);
    }
}
