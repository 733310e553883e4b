//! Indentation inference.
//!
//! This module contains the core indentation logic organized into submodules:
//! - [`indenter`]: Block-nesting stack that yields the expected body indentation
//! - [`continuation`]: Continuation chains, bracket balance and split assignments

pub mod continuation;
pub mod indenter;

pub use continuation::{
    bracket_delta, ends_with_assignment, starts_with_closer, Continuation, LogicalStatement,
    CONTINUATION_INDENT,
};
pub use indenter::BlockStack;
