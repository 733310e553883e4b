//! Fortran source line handling.
//!
//! This module provides the infrastructure for reading Fortran source lines:
//! - [`CharFilter`]: Iterator adapter that identifies strings, comments, and code regions
//! - [`CodeView`]: Quote-free code of one physical line plus its carried quote state
//! - [`SourceLine`]: Classified physical line with its label and measured indentation
//! - [`patterns`]: Precompiled regex patterns for Fortran syntax elements
//!
//! Nothing here builds a parse tree; every check is local to a line or a
//! logical statement.

pub mod char_filter;
pub mod patterns;
pub mod stream;

pub use char_filter::{CharFilter, CodeView, StringDelimiter};
pub use stream::{LineKind, SourceLine};
