/// Keyword classification of logical statements
///
/// Every function here takes the quote-free, comment-free code produced by
/// [`CodeView`](crate::parser::CodeView), so keywords inside strings or
/// comments are never seen.
use super::types::BlockKind;
use crate::parser::patterns::{
    ASSOCIATE_RE, BLK_RE, CASE_RE, CONTAINS_RE, DO_CONCURRENT_RE, DO_LABEL_RE, DO_RE,
    ELSEWHERE_RE, ELSE_RE, ENDANY_RE, END_RE, ENUM_RE, FORALL_RE, IF_RE, INTERFACE_RE, MOD_RE,
    PROG_RE, READWRITE_RE, SELCASE_RE, SMOD_RE, SUBPROGRAM_RE, TYPE_NAMED_RE, TYPE_RE, WHERE_RE,
};

/// Specifier statements: one level less than the construct body, for one statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    Else,      // ELSE, ELSE IF
    ElseWhere, // ELSEWHERE
    Case,      // CASE, TYPE IS, CLASS IS, CLASS DEFAULT, RANK
    Contains,
}

impl Specifier {
    /// Whether this specifier belongs to an innermost construct of `kind`
    #[must_use]
    pub fn applies_to(self, kind: BlockKind) -> bool {
        match self {
            Specifier::Else => kind == BlockKind::Conditional,
            Specifier::ElseWhere => kind == BlockKind::Loop,
            Specifier::Case => kind == BlockKind::Select,
            Specifier::Contains => matches!(
                kind,
                BlockKind::Module
                    | BlockKind::Program
                    | BlockKind::Submodule
                    | BlockKind::Procedure
                    | BlockKind::Type
            ),
        }
    }
}

/// Classification of the first physical line of a logical statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementHead {
    /// `END <construct>`
    Close(BlockKind),
    /// Bare `END`
    CloseAny,
    Specifier(Specifier),
    Plain,
}

impl StatementHead {
    #[must_use]
    pub fn is_closer(self) -> bool {
        matches!(self, StatementHead::Close(_) | StatementHead::CloseAny)
    }
}

/// Map the construct word of an `END` statement to its block kind
fn end_kind(word: &str) -> Option<BlockKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "do" | "where" | "forall" => BlockKind::Loop,
        "if" => BlockKind::Conditional,
        "select" => BlockKind::Select,
        "block" => BlockKind::Block,
        "associate" => BlockKind::Associate,
        "interface" => BlockKind::Interface,
        "type" => BlockKind::Type,
        "enum" => BlockKind::Enum,
        "function" | "subroutine" | "procedure" => BlockKind::Procedure,
        "submodule" => BlockKind::Submodule,
        "module" => BlockKind::Module,
        "program" => BlockKind::Program,
        _ => return None,
    };
    Some(kind)
}

/// Closer carried by `code`, if any
#[must_use]
pub fn closer_kind(code: &str) -> Option<StatementHead> {
    if let Some(caps) = END_RE.captures(code) {
        return end_kind(&caps[1]).map(StatementHead::Close);
    }
    if ENDANY_RE.is_match(code) {
        return Some(StatementHead::CloseAny);
    }
    None
}

/// Classify the head of a statement from its first physical line
#[must_use]
pub fn classify_head(code: &str) -> StatementHead {
    let first = first_part(code);
    if let Some(head) = closer_kind(first) {
        return head;
    }
    if ELSEWHERE_RE.is_match(first) {
        StatementHead::Specifier(Specifier::ElseWhere)
    } else if ELSE_RE.is_match(first) {
        StatementHead::Specifier(Specifier::Else)
    } else if CASE_RE.is_match(first) {
        StatementHead::Specifier(Specifier::Case)
    } else if CONTAINS_RE.is_match(first) {
        StatementHead::Specifier(Specifier::Contains)
    } else {
        StatementHead::Plain
    }
}

/// Block opened by a complete logical statement
///
/// `statement` is the joined code of every physical line; only its first
/// `;`-separated part is considered. `enclosing` is the innermost open
/// construct, which decides whether `[module] procedure` is a declaration.
#[must_use]
pub fn classify_opener(statement: &str, enclosing: Option<BlockKind>) -> Option<BlockKind> {
    let stmt = first_part(statement).trim();
    if stmt.is_empty() {
        return None;
    }

    if MOD_RE.is_match(stmt) {
        return Some(BlockKind::Module);
    }
    if SMOD_RE.is_match(stmt) {
        return Some(BlockKind::Submodule);
    }
    if PROG_RE.is_match(stmt) {
        return Some(BlockKind::Program);
    }
    if let Some(caps) = SUBPROGRAM_RE.captures(stmt) {
        let in_declaration_scope =
            matches!(enclosing, Some(BlockKind::Interface | BlockKind::Type));
        if caps["kw"].eq_ignore_ascii_case("procedure") && in_declaration_scope {
            return None;
        }
        return Some(BlockKind::Procedure);
    }
    if TYPE_RE.is_match(stmt) {
        return Some(BlockKind::Type);
    }
    if let Some(caps) = TYPE_NAMED_RE.captures(stmt) {
        if !caps[1].eq_ignore_ascii_case("is") {
            return Some(BlockKind::Type);
        }
    }
    if INTERFACE_RE.is_match(stmt) {
        return Some(BlockKind::Interface);
    }
    if ASSOCIATE_RE.is_match(stmt) {
        return Some(BlockKind::Associate);
    }
    if BLK_RE.is_match(stmt) {
        return Some(BlockKind::Block);
    }
    if DO_CONCURRENT_RE.is_match(stmt) {
        return stmt.ends_with(')').then_some(BlockKind::Loop);
    }
    if DO_LABEL_RE.is_match(stmt) {
        return None;
    }
    if DO_RE.is_match(stmt) {
        return Some(BlockKind::Loop);
    }
    if WHERE_RE.is_match(stmt) || FORALL_RE.is_match(stmt) {
        return is_where_forall_block(stmt).then_some(BlockKind::Loop);
    }
    if IF_RE.is_match(stmt) {
        return Some(BlockKind::Conditional);
    }
    if SELCASE_RE.is_match(stmt) {
        return Some(BlockKind::Select);
    }
    if ENUM_RE.is_match(stmt) {
        return Some(BlockKind::Enum);
    }
    None
}

/// Whether the statement is a READ or WRITE with a control list
#[must_use]
pub fn is_readwrite(code: &str) -> bool {
    READWRITE_RE.is_match(code)
}

/// Check if WHERE/FORALL statement is a block construct (not single-line)
///
/// Returns true if there's nothing after the closing parenthesis of the
/// header, false if a statement follows it on the same line.
///
/// Examples:
/// - `WHERE (x > 0)` -> true (block)
/// - `WHERE (x > 0) y = 1` -> false (single-line)
fn is_where_forall_block(stmt: &str) -> bool {
    let mut level = 0usize;
    for (pos, ch) in stmt.char_indices() {
        match ch {
            '(' => level += 1,
            ')' => {
                level = level.saturating_sub(1);
                if level == 0 {
                    return stmt[pos + 1..].trim().is_empty();
                }
            }
            _ => {}
        }
    }
    // Header never closed: treat as block
    true
}

fn first_part(code: &str) -> &str {
    code.split(';').next().unwrap_or(code)
}
