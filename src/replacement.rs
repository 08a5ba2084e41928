// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use crate::value::Subject;

/// The outcome of a substitution: the substituted text (mirroring the
/// subject shape) and the total substitution count across all subject
/// members. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    result: Subject,
    count: usize,
}

impl Replacement {
    pub(crate) fn new(result: Subject, count: usize) -> Replacement {
        Replacement { result, count }
    }

    pub fn result(&self) -> &Subject {
        &self.result
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_result(self) -> Subject {
        self.result
    }
}
