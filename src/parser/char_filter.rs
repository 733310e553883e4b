/// `CharFilter` - Iterator that filters out strings and comments
///
/// Wraps a line's characters and tracks whether the scan is inside a
/// quoted literal or a trailing comment. The indentation scanner only ever
/// looks at the code that survives this filter, so keywords and brackets
/// inside string literals never reach the keyword or bracket detectors.

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single, // '...'
    Double, // "..."
}

impl StringDelimiter {
    /// Delimiter opened by `c`, if `c` is a quote character
    #[must_use]
    pub fn opened_by(c: char) -> Option<Self> {
        match c {
            '\'' => Some(StringDelimiter::Single),
            '"' => Some(StringDelimiter::Double),
            _ => None,
        }
    }

    /// Whether `c` terminates a literal opened with this delimiter
    #[must_use]
    pub fn is_closed_by(self, c: char) -> bool {
        matches!(
            (self, c),
            (StringDelimiter::Single, '\'') | (StringDelimiter::Double, '"')
        )
    }

    #[must_use]
    pub fn is_open(self) -> bool {
        self != StringDelimiter::None
    }
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (position, character) pairs for the code that remains. A doubled
/// quote inside a literal (`'it''s'`) is read as close-then-reopen, which
/// removes the same characters and leaves the same end state as treating it
/// as an escaped quote.
pub struct CharFilter<'a> {
    chars: std::str::CharIndices<'a>,
    instring: StringDelimiter,
    incomment: bool,
    filter_comments: bool,
    filter_strings: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter` starting outside any string
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to drop comments (from `!` to end of line)
    /// * `filter_strings` - Whether to drop string literals, quotes included
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self::with_string_state(
            content,
            filter_comments,
            filter_strings,
            StringDelimiter::None,
        )
    }

    /// Create a `CharFilter` that starts inside a string carried over from
    /// the previous physical line.
    #[must_use]
    pub fn with_string_state(
        content: &'a str,
        filter_comments: bool,
        filter_strings: bool,
        string_state: StringDelimiter,
    ) -> Self {
        Self {
            chars: content.char_indices(),
            instring: string_state,
            incomment: false,
            filter_comments,
            filter_strings,
        }
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.instring.is_open()
    }

    /// Get the current string delimiter state
    ///
    /// After the iterator is exhausted this is the open-quote state at end of
    /// line, which the caller carries into the next physical line.
    #[must_use]
    pub fn get_string_state(&self) -> StringDelimiter {
        self.instring
    }

    /// Get the filtered content as a string
    pub fn filter_all(&mut self) -> String {
        let mut result = String::with_capacity(self.chars.as_str().len());
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, c) = self.chars.next()?;

            if self.incomment {
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if self.instring.is_open() {
                if self.instring.is_closed_by(c) {
                    self.instring = StringDelimiter::None;
                }
                if self.filter_strings {
                    continue;
                }
                return Some((pos, c));
            }

            if c == '!' {
                self.incomment = true;
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if let Some(delimiter) = StringDelimiter::opened_by(c) {
                self.instring = delimiter;
                if self.filter_strings {
                    continue;
                }
            }

            return Some((pos, c));
        }
    }
}

/// Quote-free, comment-free view of one physical line of code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeView {
    /// Code with string literals and the trailing comment removed
    pub code: String,
    /// Open-quote state at end of line
    pub open_quote: StringDelimiter,
    /// Whether the line ends with the `&` continuation marker
    pub continues: bool,
}

impl CodeView {
    /// Build the view of `content`, starting in `carried` string state
    #[must_use]
    pub fn extract(content: &str, carried: StringDelimiter) -> Self {
        let mut filter = CharFilter::with_string_state(content, true, true, carried);
        let code = filter.filter_all();
        let open_quote = filter.get_string_state();

        // A trailing `&` inside a still-open literal is the marker for a
        // continued character context; a comment cannot start inside it.
        let continues = if open_quote.is_open() {
            content.trim_end().ends_with('&')
        } else {
            code.trim_end().ends_with('&')
        };

        Self {
            code,
            open_quote,
            continues,
        }
    }

    /// Code with any leading and trailing `&` markers and surrounding blanks removed
    #[must_use]
    pub fn body(&self) -> &str {
        let trimmed = self.code.trim();
        let trimmed = trimmed.strip_prefix('&').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix('&').unwrap_or(trimmed);
        trimmed.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filtering() {
        let input = r#"x = "hello" + 5"#;
        let filter = CharFilter::new(input, false, false);
        let result: String = filter.map(|(_, c)| c).collect();
        assert_eq!(result, input);
    }

    #[test]
    fn test_filter_strings() {
        let input = r#"x = "hello" + 5"#;
        let filter = CharFilter::new(input, false, true);
        let result: String = filter.map(|(_, c)| c).collect();
        assert_eq!(result, "x =  + 5");
    }

    #[test]
    fn test_filter_single_quotes() {
        let input = "x = 'hello' + 5";
        let filter = CharFilter::new(input, false, true);
        let result: String = filter.map(|(_, c)| c).collect();
        assert_eq!(result, "x =  + 5");
    }

    #[test]
    fn test_filter_comments() {
        let input = "x = 5 ! this is a comment";
        let filter = CharFilter::new(input, true, false);
        let result: String = filter.map(|(_, c)| c).collect();
        assert_eq!(result, "x = 5 ");
    }

    #[test]
    fn test_bang_inside_string_is_not_a_comment() {
        let mut filter = CharFilter::new("print *, 'hi! there' ! greet", true, true);
        assert_eq!(filter.filter_all(), "print *,  ");
    }

    #[test]
    fn test_doubled_quote_stays_inside_literal() {
        let mut filter = CharFilter::new("msg = 'it''s (not) code'", true, true);
        assert_eq!(filter.filter_all(), "msg = ");
        assert_eq!(filter.get_string_state(), StringDelimiter::None);
    }

    #[test]
    fn test_other_quote_kind_inside_literal() {
        let mut filter = CharFilter::new(r#"c = "'" // x"#, true, true);
        assert_eq!(filter.filter_all(), "c =  // x");
        assert!(!filter.instring());
    }

    #[test]
    fn test_open_string_at_end_of_line() {
        let mut filter = CharFilter::new("print *, 'unterminated (", true, true);
        assert_eq!(filter.filter_all(), "print *, ");
        assert_eq!(filter.get_string_state(), StringDelimiter::Single);
    }

    #[test]
    fn test_carried_string_state() {
        let mut filter =
            CharFilter::with_string_state("  & still text' // tail(", true, true, StringDelimiter::Single);
        assert_eq!(filter.filter_all(), " // tail(");
        assert_eq!(filter.get_string_state(), StringDelimiter::None);
    }

    #[test]
    fn test_position_tracking() {
        let filter = CharFilter::new("x = 5", false, false);
        let positions: Vec<usize> = filter.map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_code_view_continuation() {
        let view = CodeView::extract("call foo(a, & ! more below", StringDelimiter::None);
        assert!(view.continues);
        assert_eq!(view.body(), "call foo(a,");

        let view = CodeView::extract("x = 'a & b'", StringDelimiter::None);
        assert!(!view.continues);
    }

    #[test]
    fn test_code_view_open_string_continues() {
        let view = CodeView::extract("print *, 'first half &", StringDelimiter::None);
        assert!(view.continues);
        assert_eq!(view.open_quote, StringDelimiter::Single);
    }
}
