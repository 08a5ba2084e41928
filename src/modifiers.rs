// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

use std::fmt::Display;
use std::ops::BitOr;

/// An ordered set of single-letter pattern modifiers.
///
/// Duplicates are collapsed on insertion. The first-insertion order is
/// preserved for rendering, but two sets holding the same letters compare
/// equal regardless of order.
#[derive(Debug, Clone, Default)]
pub struct Modifiers {
    letters: Vec<char>,
}

impl Modifiers {
    /// `i`, case-insensitive matching.
    pub const CASELESS: char = 'i';
    /// `m`, `^`/`$` match at line boundaries.
    pub const MULTILINE: char = 'm';
    /// `s`, `.` also matches line breaks.
    pub const DOTALL: char = 's';
    /// `x`, ignore unescaped whitespace in the pattern.
    pub const EXTENDED: char = 'x';
    /// `u`, treat pattern and subject as UTF-8.
    pub const UTF8: char = 'u';
    /// `D`, `$` matches only at the very end of the subject.
    pub const DOLLAR_ENDONLY: char = 'D';
    /// `A`, anchor the match at the start of the subject.
    pub const ANCHORED: char = 'A';
    /// `U`, invert quantifier greediness.
    pub const UNGREEDY: char = 'U';
    /// `X`, strict escape checking.
    pub const EXTRA: char = 'X';
    /// `J`, allow duplicate group names.
    pub const DUPNAMES: char = 'J';

    pub fn new() -> Self {
        Modifiers { letters: Vec::new() }
    }

    /// Builds a set from a string of letters, collapsing duplicates and
    /// keeping the first-insertion order.
    pub fn parse(letters: &str) -> Self {
        let mut modifiers = Modifiers::new();
        modifiers.add(letters);
        modifiers
    }

    /// Unions the given letters into the set.
    pub fn add(&mut self, letters: &str) {
        for letter in letters.chars() {
            if !self.letters.contains(&letter) {
                self.letters.push(letter);
            }
        }
    }

    /// Removes every given letter from the set.
    pub fn remove(&mut self, letters: &str) {
        self.letters.retain(|letter| !letters.contains(*letter));
    }

    /// Replaces the whole set.
    pub fn set(&mut self, letters: &str) {
        self.letters.clear();
        self.add(letters);
    }

    pub fn has(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// True when every one of the given letters is present.
    pub fn has_all(&self, letters: &str) -> bool {
        letters.chars().all(|letter| self.has(letter))
    }

    /// True when at least one of the given letters is present.
    pub fn has_any(&self, letters: &str) -> bool {
        letters.chars().any(|letter| self.has(letter))
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Renders the set in first-insertion order.
    pub fn render(&self) -> String {
        self.letters.iter().collect()
    }
}

impl PartialEq for Modifiers {
    // insertion order is irrelevant for equality
    fn eq(&self, other: &Self) -> bool {
        self.letters.len() == other.letters.len()
            && self.letters.iter().all(|letter| other.has(*letter))
    }
}

impl Eq for Modifiers {}

impl From<&str> for Modifiers {
    fn from(letters: &str) -> Self {
        Modifiers::parse(letters)
    }
}

impl Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Bit flags controlling how the execution primitive runs and how its
/// output is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Flags = Flags(0);

    /// Pair every captured value with its starting byte offset.
    pub const OFFSET_CAPTURE: Flags = Flags(1 << 8);

    /// Drop empty pieces from split results.
    pub const SPLIT_NO_EMPTY: Flags = Flags(1);

    /// Include participating capture groups in split results.
    pub const SPLIT_DELIM_CAPTURE: Flags = Flags(1 << 1);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn has(self, flag: Flags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn insert(self, flag: Flags) -> Flags {
        Flags(self.0 | flag.0)
    }

    pub fn remove(self, flag: Flags) -> Flags {
        Flags(self.0 & !flag.0)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.insert(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Flags, Modifiers};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_modifiers_dedup_and_order() {
        let modifiers = Modifiers::parse("uisu");
        assert_eq!(modifiers.render(), "uis");
        assert_eq!(modifiers.len(), 3);
    }

    #[test]
    fn test_modifiers_add_and_remove() {
        let mut modifiers = Modifiers::parse("ui");
        modifiers.add("sux");
        assert_eq!(modifiers.render(), "uisx");

        modifiers.remove("ix");
        assert_eq!(modifiers.render(), "us");
    }

    #[test]
    fn test_modifiers_equality_ignores_order() {
        assert_eq!(Modifiers::parse("uis"), Modifiers::parse("siu"));
        assert_ne!(Modifiers::parse("uis"), Modifiers::parse("ui"));
    }

    #[test]
    fn test_modifiers_membership() {
        let modifiers = Modifiers::parse("uisDm");
        assert!(modifiers.has_all("us"));
        assert!(!modifiers.has_all("usA"));
        assert!(modifiers.has_any("Axs"));
        assert!(!modifiers.has_any("AxX"));
    }

    #[test]
    fn test_flags() {
        let flags = Flags::OFFSET_CAPTURE | Flags::SPLIT_NO_EMPTY;
        assert!(flags.has(Flags::OFFSET_CAPTURE));
        assert!(flags.has(Flags::SPLIT_NO_EMPTY));
        assert!(!flags.has(Flags::SPLIT_DELIM_CAPTURE));

        let flags = flags.remove(Flags::OFFSET_CAPTURE);
        assert!(!flags.has(Flags::OFFSET_CAPTURE));
        assert_eq!(flags, Flags::SPLIT_NO_EMPTY);
    }
}
