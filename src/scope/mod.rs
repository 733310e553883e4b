//! Fortran block tracking vocabulary.
//!
//! This module names the nested Fortran constructs and classifies statements:
//! - Block constructs: IF/THEN, DO, SELECT CASE/TYPE/RANK, WHERE, FORALL
//! - Program units: MODULE, PROGRAM, SUBMODULE
//! - Subprograms: SUBROUTINE, FUNCTION, separate module PROCEDURE
//! - Other regions: TYPE, INTERFACE, ENUM, ASSOCIATE, BLOCK
//!
//! [`classify_head`] tags the first line of a statement as a closer, a
//! specifier or plain code, and [`classify_opener`] decides which block a
//! completed statement opens. [`BlockKind`] carries the indentation rules.

pub mod classify;
pub mod types;

pub use classify::{
    classify_head, classify_opener, closer_kind, is_readwrite, Specifier,
    StatementHead,
};
pub use types::{BlockFrame, BlockKind, CONDITIONAL_INDENT, MODULE_INDENT};
