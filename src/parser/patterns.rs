/// Regex patterns for Fortran syntax
///
/// All patterns are compiled once at first use via `LazyLock`. They are
/// applied to the quote-free, comment-free view of a statement, so they
/// never see string contents.
///
/// All regexes use case-insensitive + unicode flags
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. All patterns in this module are
/// compile-time constants that are exercised by tests, so the panic can only
/// occur on first access during development.
fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// Anchor patterns
const EOL_STR: &str = r"\s*$"; // End of line
const SOL_STR: &str = r"^\s*"; // Start of line
const LABEL_STR: &str = r"(?:\w+\s*:\s*)?"; // Optional construct name

// ===== CLOSERS =====

// END <construct> [name]; the construct word is captured
pub static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}END\s*(DO|IF|WHERE|FORALL|SELECT|BLOCK|ASSOCIATE|INTERFACE|TYPE|ENUM|FUNCTION|SUBROUTINE|PROCEDURE|SUBMODULE|MODULE|PROGRAM)\b"
    ))
});

// Bare END closes whatever is innermost
pub static ENDANY_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}END{EOL_STR}")));

// ===== SPECIFIERS =====

pub static ELSEWHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}ELSE\s*WHERE\b")));
pub static ELSE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}ELSE(\s*IF\b|\b)")));
pub static CASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}((CASE|RANK)\s*(\(|DEFAULT\b)|(TYPE|CLASS)\s+IS\b|CLASS\s+DEFAULT\b)"
    ))
});
pub static CONTAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}CONTAINS{EOL_STR}")));

// ===== OPENERS =====

// MODULE name; `module procedure/function/subroutine` never matches since
// those carry more than one word
pub static MOD_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}MODULE\s+(\w+){EOL_STR}")));
pub static PROG_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}PROGRAM(\s+\w+)?{EOL_STR}")));
pub static SMOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}SUBMODULE\s*\([^()]*\)\s*\w+{EOL_STR}"
    ))
});

// FUNCTION/SUBROUTINE/PROCEDURE with any prefix mix and a name.
// Requiring a name after the keyword rules out `procedure(iface)`,
// `procedure, pointer ::` and `procedure :: name` declarations.
pub static SUBPROGRAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(?:(?:PURE|IMPURE|ELEMENTAL|RECURSIVE|NON_RECURSIVE|MODULE)\s+|(?:INTEGER|REAL|LOGICAL|COMPLEX|CHARACTER|DOUBLE\s*PRECISION|TYPE|CLASS)\s*(?:\((?:[^()]|\([^()]*\))*\)|\*\s*\d+)?\s+)*(?P<kw>FUNCTION|SUBROUTINE|PROCEDURE)\s+\w+"
    ))
});

// TYPE definitions: `type ::`, `type, attr ::`, and `type name`
pub static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}TYPE\s*(,|::)")));
pub static TYPE_NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}TYPE\s+(\w+){EOL_STR}")));

pub static INTERFACE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(ABSTRACT\s+)?INTERFACE\b")));

pub static ASSOCIATE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}ASSOCIATE\s*\(")));

pub static BLK_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}BLOCK{EOL_STR}")));

// DO CONCURRENT is checked before plain DO
pub static DO_CONCURRENT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}DO\s+CONCURRENT\b")));
pub static DO_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}DO\b")));
// Label-terminated DO (`do 10 i = 1, n`) ends on a labelled statement, not END DO
pub static DO_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}DO\s*\d+")));

pub static WHERE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}WHERE\s*\(")));
pub static FORALL_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}{LABEL_STR}FORALL\s*\(")));

pub static IF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}{LABEL_STR}IF\s*\(.*\)\s*THEN{EOL_STR}"
    ))
});

pub static SELCASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}{LABEL_STR}SELECT\s*(CASE|TYPE|RANK)\s*\("
    ))
});

pub static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}ENUM\s*,\s*BIND\s*\(\s*C\s*\){EOL_STR}"
    ))
});

// ===== STATEMENTS =====

// READ/WRITE with a parenthesised control list
pub static READWRITE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(READ|WRITE)\s*\(")));

// Statement label: one to five digits in column 1, then a blank
pub static STATEMENT_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^(\d{1,5})\s"));
