// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The adapter between a `Pattern` and the `fancy-regex` execution
//! primitive.
//!
//! Modifier letters the engine can express (`i`, `m`, `s`, `x`, `U`)
//! are translated into an inline flag prefix. `u` is dropped because
//! the engine is natively Unicode; the remaining PCRE-only letters
//! (`A`, `D`, `X`, `J`) stay on the `Pattern` but are not forwarded.
//!
//! Every failure is reported as a bare reason string; the calling
//! facade operation wraps it in its own typed error.

use fancy_regex::{Captures, Regex};

use crate::modifiers::Flags;
use crate::pattern::Pattern;

const INLINE_FLAG_LETTERS: &str = "imsxU";

/// The capture slots of one match: `(text, byte_offset)` per group,
/// `None` for a group that did not participate.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub groups: Vec<Option<(String, usize)>>,
}

pub struct Engine {
    regex: Regex,
    group_count: usize,
    names: Vec<(String, usize)>,
}

impl Engine {
    pub fn build(pattern: &Pattern) -> Result<Engine, String> {
        let inline: String = pattern
            .modifiers()
            .letters()
            .iter()
            .filter(|letter| INLINE_FLAG_LETTERS.contains(**letter))
            .collect();

        let source = if inline.is_empty() {
            pattern.body().to_owned()
        } else {
            format!("(?{}){}", inline, pattern.body())
        };

        let regex = Regex::new(&source).map_err(|e| e.to_string())?;
        let group_count = regex.captures_len();
        let names = regex
            .capture_names()
            .enumerate()
            .filter_map(|(index, name)| name.map(|name| (name.to_owned(), index)))
            .collect();

        Ok(Engine {
            regex,
            group_count,
            names,
        })
    }

    /// The number of capture slots, group 0 included.
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// The declared group names with their ordinals, in declaration
    /// order.
    pub fn names(&self) -> &[(String, usize)] {
        &self.names
    }

    pub fn is_match(&self, subject: &str) -> Result<bool, String> {
        self.regex.is_match(subject).map_err(|e| e.to_string())
    }

    /// Collects the first match from `offset` on, or every
    /// non-overlapping match when `global` is set. An empty match
    /// advances the scan position by one character so the loop always
    /// terminates.
    pub fn run(&self, subject: &str, offset: usize, global: bool) -> Result<Vec<RawMatch>, String> {
        let mut matches = Vec::new();
        let mut pos = offset.min(subject.len());

        loop {
            let captures = match self
                .regex
                .captures_from_pos(subject, pos)
                .map_err(|e| e.to_string())?
            {
                Some(captures) => captures,
                None => break,
            };

            let (start, end) = match captures.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };

            matches.push(self.raw(&captures));

            if !global {
                break;
            }

            if end == start {
                match subject[end..].chars().next() {
                    Some(c) => pos = end + c.len_utf8(),
                    None => break,
                }
            } else {
                pos = end;
            }
        }

        Ok(matches)
    }

    /// The capture slots of one engine-native match.
    pub fn raw(&self, captures: &Captures<'_>) -> RawMatch {
        let groups = (0..self.group_count)
            .map(|index| {
                captures
                    .get(index)
                    .map(|m| (m.as_str().to_owned(), m.start()))
            })
            .collect();
        RawMatch { groups }
    }

    /// Substitutes up to `limit` occurrences (all when `None`), calling
    /// `replacer` once per match. Returns the substituted text and the
    /// substitution count.
    pub fn run_replace<F>(
        &self,
        subject: &str,
        limit: Option<usize>,
        mut replacer: F,
    ) -> Result<(String, usize), String>
    where
        F: FnMut(&Captures<'_>) -> Result<String, String>,
    {
        let mut substituted = String::with_capacity(subject.len());
        let mut last = 0;
        let mut pos = 0;
        let mut count = 0;

        while limit.map_or(true, |l| count < l) {
            let captures = match self
                .regex
                .captures_from_pos(subject, pos)
                .map_err(|e| e.to_string())?
            {
                Some(captures) => captures,
                None => break,
            };

            let (start, end) = match captures.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };

            substituted.push_str(&subject[last..start]);
            substituted.push_str(&replacer(&captures)?);
            count += 1;
            last = end;

            if end == start {
                match subject[end..].chars().next() {
                    Some(c) => pos = end + c.len_utf8(),
                    None => break,
                }
            } else {
                pos = end;
            }
        }

        substituted.push_str(&subject[last..]);
        Ok((substituted, count))
    }

    /// Splits the subject at every match. `limit` caps the number of
    /// pieces; the last piece carries the unsplit remainder.
    /// `SPLIT_NO_EMPTY` drops empty pieces, `SPLIT_DELIM_CAPTURE` also
    /// emits participating capture groups.
    pub fn run_split(
        &self,
        subject: &str,
        limit: Option<usize>,
        flags: Flags,
    ) -> Result<Vec<String>, String> {
        let no_empty = flags.has(Flags::SPLIT_NO_EMPTY);
        let delim_capture = flags.has(Flags::SPLIT_DELIM_CAPTURE);

        let mut pieces: Vec<String> = Vec::new();
        let push = |pieces: &mut Vec<String>, piece: &str| {
            if !(no_empty && piece.is_empty()) {
                pieces.push(piece.to_owned());
            }
        };

        let mut last = 0;
        let mut pos = 0;

        loop {
            if let Some(l) = limit {
                if pieces.len() + 1 >= l {
                    break;
                }
            }

            let captures = match self
                .regex
                .captures_from_pos(subject, pos)
                .map_err(|e| e.to_string())?
            {
                Some(captures) => captures,
                None => break,
            };

            let (start, end) = match captures.get(0) {
                Some(m) => (m.start(), m.end()),
                None => break,
            };

            push(&mut pieces, &subject[last..start]);
            if delim_capture {
                for index in 1..self.group_count {
                    if let Some(m) = captures.get(index) {
                        push(&mut pieces, m.as_str());
                    }
                }
            }
            last = end;

            if end == start {
                match subject[end..].chars().next() {
                    Some(c) => pos = end + c.len_utf8(),
                    None => break,
                }
            } else {
                pos = end;
            }
        }

        push(&mut pieces, &subject[last..]);
        Ok(pieces)
    }
}
