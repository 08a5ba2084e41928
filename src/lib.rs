// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

mod engine;

pub mod builder;
pub mod config;
pub mod errors;
pub mod matches;
pub mod modifiers;
pub mod pattern;
pub mod regex;
pub mod replacement;
pub mod value;

pub use builder::{Builder, Part};
pub use errors::Error;
pub use matches::Matches;
pub use modifiers::{Flags, Modifiers};
pub use pattern::{escape, Delimiter, Pattern};
pub use regex::Regex;
pub use replacement::Replacement;
pub use value::{Key, Subject, Value};
