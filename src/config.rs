// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! Process-wide defaults for newly constructed builders and patterns.
//!
//! The values are sampled once at construction time; changing them never
//! affects an existing `Builder` or `Pattern`.

use std::sync::RwLock;

pub const DEFAULT_DELIMITER: char = '/';
pub const DEFAULT_MODIFIERS: &str = "u";

static DELIMITER: RwLock<Option<char>> = RwLock::new(None);
static MODIFIERS: RwLock<Option<String>> = RwLock::new(None);

/// The current default delimiter, `/` unless overridden.
pub fn default_delimiter() -> char {
    read(&DELIMITER).unwrap_or(DEFAULT_DELIMITER)
}

/// Overrides the default delimiter for subsequently constructed builders
/// and patterns. `None` restores the built-in default. Returns the value
/// now in effect.
pub fn set_default_delimiter(delimiter: Option<char>) -> char {
    *write(&DELIMITER) = delimiter;
    default_delimiter()
}

/// The current default modifier letters, `u` unless overridden.
pub fn default_modifiers() -> String {
    read(&MODIFIERS).unwrap_or_else(|| DEFAULT_MODIFIERS.to_owned())
}

/// Overrides the default modifiers. An explicit `Some("")` means "no
/// modifiers", while `None` restores the built-in default. Returns the
/// value now in effect.
pub fn set_default_modifiers(modifiers: Option<&str>) -> String {
    *write(&MODIFIERS) = modifiers.map(|m| m.to_owned());
    default_modifiers()
}

fn read<T: Clone>(lock: &RwLock<Option<T>>) -> Option<T> {
    lock.read().unwrap_or_else(|e| e.into_inner()).clone()
}

fn write<'a, T>(lock: &'a RwLock<Option<T>>) -> std::sync::RwLockWriteGuard<'a, Option<T>> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
