/// Block kinds for Fortran constructs
use std::fmt;

/// Body increment of module-level units, procedures and `block`
pub const MODULE_INDENT: usize = 2;
/// Body increment of loops, conditionals, selects and the remaining constructs
pub const CONDITIONAL_INDENT: usize = 3;

/// Fortran block construct kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Module,
    Program,
    Submodule,
    Procedure, // FUNCTION/SUBROUTINE/PROCEDURE
    Type,
    Interface,
    Associate,
    Block,
    Loop, // DO, DO CONCURRENT, WHERE, FORALL
    Conditional,
    Select, // SELECT CASE/TYPE/RANK
    Enum,
}

impl BlockKind {
    /// Indentation added to the body of this construct
    #[must_use]
    pub fn increment(self) -> usize {
        match self {
            BlockKind::Module
            | BlockKind::Program
            | BlockKind::Submodule
            | BlockKind::Procedure
            | BlockKind::Block => MODULE_INDENT,
            BlockKind::Type
            | BlockKind::Interface
            | BlockKind::Associate
            | BlockKind::Loop
            | BlockKind::Conditional
            | BlockKind::Select
            | BlockKind::Enum => CONDITIONAL_INDENT,
        }
    }

    /// Dedent applied to a specifier line (`else`, `case`, `contains`) of this construct
    ///
    /// `contains` inside a derived type sits one column deeper than the type header.
    #[must_use]
    pub fn specifier_dedent(self) -> usize {
        match self {
            BlockKind::Type => CONDITIONAL_INDENT - 1,
            other => other.increment(),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::Module => "MODULE",
            BlockKind::Program => "PROGRAM",
            BlockKind::Submodule => "SUBMODULE",
            BlockKind::Procedure => "PROCEDURE",
            BlockKind::Type => "TYPE",
            BlockKind::Interface => "INTERFACE",
            BlockKind::Associate => "ASSOCIATE",
            BlockKind::Block => "BLOCK",
            BlockKind::Loop => "DO",
            BlockKind::Conditional => "IF",
            BlockKind::Select => "SELECT",
            BlockKind::Enum => "ENUM",
        };
        write!(f, "{name}")
    }
}

/// One open construct on the nesting stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFrame {
    pub kind: BlockKind,
    pub increment: usize,
}

impl BlockFrame {
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            increment: kind.increment(),
        }
    }
}
