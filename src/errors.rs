// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use thiserror::Error;

use crate::value::Key;

/// The error type shared by the builder, the result model and the
/// facade operations.
///
/// "No match" and "zero replacements" are never errors, they are normal
/// results. Every variant here is fatal to the operation that produced it
/// and is propagated to the caller immediately.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid builder state, e.g. quantifier bounds where `min > max`.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A property of a compiled expression was requested from a
    /// still-open builder.
    #[error("invalid operation on an open builder: {0}")]
    InvalidOperation(String),

    /// The execution primitive rejected the pattern or failed at runtime
    /// while matching.
    #[error("match failed for pattern `{pattern}`: {reason}")]
    Match { pattern: String, reason: String },

    /// The execution primitive rejected the pattern or failed at runtime
    /// while substituting.
    #[error("replacement failed for pattern `{pattern}`: {reason}")]
    Replacement { pattern: String, reason: String },

    /// The execution primitive rejected the pattern or failed at runtime
    /// while splitting.
    #[error("split failed for pattern `{pattern}`: {reason}")]
    Split { pattern: String, reason: String },

    /// The requested group key is well-formed but the pattern declares
    /// no such group.
    #[error("capture group {0} does not exist in the pattern")]
    GroupDoesNotExist(Key),

    /// Strict named access to a name the pattern never declares.
    #[error("named group `{0}` does not exist in the pattern")]
    NamedGroupDoesntExist(String),

    /// The requested group key has the wrong shape, e.g. a nested list.
    #[error("invalid group key: {0}")]
    InvalidGroupIndex(String),
}
