/// `SourceLine` - One physical line of Fortran source, classified
///
/// This module handles:
/// - Stripping line endings and trailing whitespace
/// - Separating a column-1 statement label from the statement
/// - Classifying blank, verbatim, comment and code lines
/// - Measuring actual indentation and producing the re-indented text
use super::patterns::STATEMENT_LABEL_RE;

/// What the scanner does with a physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after stripping trailing whitespace
    Blank,
    /// Never checked and emitted as-is: column-1 comments, `!###` banners,
    /// and preprocessor directives
    Verbatim,
    /// Comment-only line that is not in column 1
    Comment,
    /// Line carrying Fortran code
    Code,
}

/// A classified physical line
#[derive(Debug, Clone)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Line text without line ending and trailing whitespace
    pub text: &'a str,
    /// Statement label found in column 1 (e.g. `100`)
    pub label: &'a str,
    /// Statement text after the label and leading whitespace
    pub content: &'a str,
    /// Measured indentation: columns before `content`, label included
    pub indent: usize,
    /// Length in characters of the original line, trailing blanks included
    pub length: usize,
    pub kind: LineKind,
}

impl<'a> SourceLine<'a> {
    /// Classify the first physical line of a statement
    #[must_use]
    pub fn parse(raw: &'a str, number: usize) -> Self {
        Self::classify(raw, number, true)
    }

    /// Classify a continuation line; it never carries a statement label
    #[must_use]
    pub fn continuation(raw: &'a str, number: usize) -> Self {
        Self::classify(raw, number, false)
    }

    fn classify(raw: &'a str, number: usize, labelled: bool) -> Self {
        let raw = raw.trim_end_matches(['\n', '\r']);
        let length = raw.chars().count();
        let text = raw.trim_end();

        let label = if labelled {
            STATEMENT_LABEL_RE
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str())
        } else {
            ""
        };
        let rest = &text[label.len()..];
        let content = rest.trim_start();
        let indent = label.len() + rest[..rest.len() - content.len()].chars().count();

        let kind = if text.is_empty() {
            LineKind::Blank
        } else if text.starts_with('!') || content.starts_with("!###") || content.starts_with('#')
        {
            LineKind::Verbatim
        } else if content.starts_with('!') {
            LineKind::Comment
        } else {
            LineKind::Code
        };

        Self {
            number,
            text,
            label,
            content,
            indent,
            length,
            kind,
        }
    }

    /// Whether the line holds nothing but a comment
    #[must_use]
    pub fn is_comment_only(&self) -> bool {
        self.content.starts_with('!')
    }

    /// Whether the first non-blank character is the `&` continuation marker
    #[must_use]
    pub fn starts_with_ampersand(&self) -> bool {
        self.content.starts_with('&')
    }

    /// Indentation the line must have to sit at `target`
    ///
    /// A labelled statement cannot start before the label ends, so it sits one
    /// column past a label that is wider than the target.
    #[must_use]
    pub fn effective_target(&self, target: usize) -> usize {
        if self.label.is_empty() {
            target
        } else {
            target.max(self.label.len() + 1)
        }
    }

    /// The line re-indented so its statement starts at `target`
    #[must_use]
    pub fn reindent(&self, target: usize) -> String {
        match self.kind {
            LineKind::Blank => String::new(),
            LineKind::Verbatim => self.text.to_string(),
            LineKind::Comment | LineKind::Code => {
                if self.content.is_empty() {
                    return self.label.to_string();
                }
                let pad = self.effective_target(target) - self.label.len();
                let mut line = String::with_capacity(self.label.len() + pad + self.content.len());
                line.push_str(self.label);
                line.extend(std::iter::repeat(' ').take(pad));
                line.push_str(self.content);
                line
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_trailing_whitespace() {
        let line = SourceLine::parse("   \r\n", 4);
        assert_eq!(line.kind, LineKind::Blank);
        assert_eq!(line.number, 4);
        assert_eq!(line.reindent(6), "");
    }

    #[test]
    fn test_code_line_indent() {
        let line = SourceLine::parse("   x = 1   ", 1);
        assert_eq!(line.kind, LineKind::Code);
        assert_eq!(line.indent, 3);
        assert_eq!(line.content, "x = 1");
        assert_eq!(line.length, 11);
        assert_eq!(line.reindent(5), "     x = 1");
    }

    #[test]
    fn test_verbatim_lines() {
        assert_eq!(SourceLine::parse("! column one", 1).kind, LineKind::Verbatim);
        assert_eq!(SourceLine::parse("   !### banner", 1).kind, LineKind::Verbatim);
        assert_eq!(SourceLine::parse("#ifdef MPI", 1).kind, LineKind::Verbatim);
        assert_eq!(SourceLine::parse("  #endif  ", 1).reindent(9), "  #endif");
    }

    #[test]
    fn test_indented_comment() {
        let line = SourceLine::parse("    ! note", 1);
        assert_eq!(line.kind, LineKind::Comment);
        assert!(line.is_comment_only());
        assert_eq!(line.reindent(2), "  ! note");
    }

    #[test]
    fn test_statement_label() {
        let line = SourceLine::parse("100   continue", 1);
        assert_eq!(line.label, "100");
        assert_eq!(line.content, "continue");
        assert_eq!(line.indent, 6);
        assert_eq!(line.reindent(7), "100    continue");
        // Target inside the label: one blank after it
        assert_eq!(line.effective_target(2), 4);
        assert_eq!(line.reindent(2), "100 continue");
    }

    #[test]
    fn test_number_is_not_a_label_without_blank() {
        let line = SourceLine::parse("1.5, 2.5]", 2);
        assert_eq!(line.label, "");
        assert_eq!(line.indent, 0);
        assert_eq!(line.reindent(5), "     1.5, 2.5]");
    }

    #[test]
    fn test_continuation_has_no_label() {
        let line = SourceLine::continuation("10 20 30]", 2);
        assert_eq!(line.label, "");
        assert_eq!(line.content, "10 20 30]");
        assert_eq!(line.reindent(5), "     10 20 30]");
    }

    #[test]
    fn test_ampersand_start() {
        assert!(SourceLine::parse("     & 'rest of string'", 3).starts_with_ampersand());
        assert!(!SourceLine::parse("  x = 1 &", 3).starts_with_ampersand());
    }
}
