// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The fluent pattern builder.
//!
//! A `Builder` accumulates a pattern body through chained, semantically
//! named calls and snapshots it into a `Pattern` with `compile()`. The
//! builder itself never validates the final pattern against the engine;
//! a body the engine rejects surfaces as an error from the operation
//! that executes it.
//!
//! Quantifier calls (`min`, `max`, `exactly`) set pending bounds that
//! the *next* fragment-emitting call consumes by wrapping its atom in a
//! `(?:atom{bounds})` repetition. Literal text is escaped with the
//! delimiter current at emission time; changing the delimiter later
//! does not re-escape fragments already emitted.
//!
//! Errors raised mid-chain (for example `min(7).max(2)`) are latched
//! and reported by `compile()`; every call after a latched error is a
//! no-op.

use crate::config;
use crate::errors::Error;
use crate::modifiers::{Flags, Modifiers};
use crate::pattern::{escape, Delimiter, Pattern};

/// Pending quantifier bounds awaiting the next fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    None,
    Exactly(u32),
    Range(Option<u32>, Option<u32>),
}

/// One alternative or sub-expression argument: a literal text or a
/// nested builder whose body is included with its back-references
/// renumbered.
#[derive(Debug, Clone)]
pub enum Part {
    Literal(String),
    Sub(Builder),
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::Literal(text.to_owned())
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Literal(text)
    }
}

impl From<Builder> for Part {
    fn from(builder: Builder) -> Self {
        Part::Sub(builder)
    }
}

impl From<&Builder> for Part {
    fn from(builder: &Builder) -> Self {
        Part::Sub(builder.clone())
    }
}

/// An open `either_find`/`or_find` chain, together with the quantifier
/// that was pending when the chain opened.
#[derive(Debug, Clone)]
struct Alternation {
    alternatives: Vec<String>,
    pending: Pending,
}

#[derive(Debug, Clone)]
pub struct Builder {
    body: String,
    modifiers: Modifiers,
    delimiter: Delimiter,

    // the number of capturing groups emitted so far, i.e. the ordinal
    // base for renumbering an included builder's back-references
    group_count: usize,

    pending: Pending,

    // byte offset of the most recent fragment, for `as_group` and
    // `reluctantly` to rewrite
    last_start: Option<usize>,

    // an open `either_find`/`or_find` chain, flushed as `(?:a|b|c)` by
    // the next non-alternative call
    alternation: Option<Alternation>,

    error: Option<Error>,
}

impl Builder {
    /// A fresh builder with the process-wide default delimiter and
    /// modifiers.
    pub fn new() -> Builder {
        Builder::with(None, None)
    }

    pub fn with(delimiter: Option<Delimiter>, modifiers: Option<&str>) -> Builder {
        let modifiers = match modifiers {
            Some(letters) => Modifiers::parse(letters),
            None => Modifiers::parse(&config::default_modifiers()),
        };

        Builder {
            body: String::new(),
            modifiers,
            delimiter: delimiter.unwrap_or_default(),
            group_count: 0,
            pending: Pending::None,
            last_start: None,
            alternation: None,
            error: None,
        }
    }

    /// A fresh builder sharing this one's delimiter and modifiers.
    pub fn get_new(&self) -> Builder {
        Builder {
            body: String::new(),
            modifiers: self.modifiers.clone(),
            delimiter: self.delimiter,
            group_count: 0,
            pending: Pending::None,
            last_start: None,
            alternation: None,
            error: None,
        }
    }

    // accessors

    /// The accumulated body, including a still-open alternation chain.
    pub fn get_body(&self) -> String {
        self.rendered_body()
    }

    pub fn get_modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn get_delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn get_group_count(&self) -> usize {
        self.group_count
    }

    /// Snapshots the current state into a `Pattern`. The builder stays
    /// usable and unchanged afterwards, and compiling twice without
    /// mutation yields equal patterns.
    ///
    /// A pending quantifier that no fragment consumed is dropped. An
    /// error latched earlier in the chain is returned here.
    pub fn compile(&self) -> Result<Pattern, Error> {
        let mut snapshot = self.clone();
        snapshot.flush_alternation();
        match snapshot.error {
            Some(error) => Err(error),
            None => Ok(Pattern::new(
                snapshot.body,
                snapshot.modifiers,
                snapshot.delimiter,
            )),
        }
    }

    // compiled-expression-only properties

    /// Global-match mode belongs to an executed expression, not to a
    /// builder.
    pub fn global_match(&self) -> Result<bool, Error> {
        Err(Error::InvalidOperation(
            "global_match is a property of a compiled expression".to_owned(),
        ))
    }

    /// Raw engine flags belong to an executed expression, not to a
    /// builder.
    pub fn match_flags(&self) -> Result<Flags, Error> {
        Err(Error::InvalidOperation(
            "match_flags is a property of a compiled expression".to_owned(),
        ))
    }

    /// The engine-ready expression only exists after `compile()`.
    pub fn as_regex(&self) -> Result<Pattern, Error> {
        Err(Error::InvalidOperation(
            "as_regex is a property of a compiled expression".to_owned(),
        ))
    }

    // quantifiers

    /// The next fragment must occur exactly `n` times.
    pub fn exactly(mut self, n: u32) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.pending = Pending::Exactly(n);
        self
    }

    /// The next fragment must occur at least `n` times.
    pub fn min(mut self, n: u32) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.pending = match self.pending {
            Pending::Range(_, max) => Pending::Range(Some(n), max),
            _ => Pending::Range(Some(n), None),
        };
        self
    }

    /// The next fragment must occur at most `n` times.
    pub fn max(mut self, n: u32) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.pending = match self.pending {
            Pending::Range(min, _) => Pending::Range(min, Some(n)),
            _ => Pending::Range(None, Some(n)),
        };
        self
    }

    // literals and sub-expressions

    /// A literal text or sub-expression, escaped for the current
    /// delimiter.
    pub fn find(self, part: impl Into<Part>) -> Self {
        self.add_part(part.into())
    }

    /// Alias of `find`, for chain readability.
    pub fn then(self, part: impl Into<Part>) -> Self {
        self.add_part(part.into())
    }

    /// Alias of `find`, conventionally following a quantifier call.
    pub fn of(self, part: impl Into<Part>) -> Self {
        self.add_part(part.into())
    }

    /// Includes another builder's body, renumbering its back-references
    /// past this builder's groups and advancing the group counter by
    /// the included builder's group count.
    pub fn append(self, part: impl Into<Part>) -> Self {
        self.add_part(part.into())
    }

    /// Alias of `append`, conventionally following a quantifier call.
    pub fn like(self, part: impl Into<Part>) -> Self {
        self.add_part(part.into())
    }

    /// An optional literal, `(?:text)?`.
    pub fn maybe(self, text: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let escaped = escape(text, Some(self.delimiter));
        self.add_atom(&format!("(?:{})?", escaped))
    }

    /// Zero or more characters out of the given set.
    pub fn maybe_some(self, chars: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let class = char_class(chars, false);
        self.add_atom(&format!("{}*", class))
    }

    /// One or more characters out of the given set.
    pub fn some(self, chars: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let class = char_class(chars, false);
        self.add_atom(&format!("{}+", class))
    }

    // wildcards

    /// Any single character.
    pub fn any(self) -> Self {
        self.add_atom(".")
    }

    /// Any single character, as a quantifiable atom.
    pub fn of_any(self) -> Self {
        self.add_atom("(?:.)")
    }

    /// Any text, including none.
    pub fn anything(self) -> Self {
        self.add_atom("(?:.*)")
    }

    /// Any text that does not start with the given literal.
    pub fn anything_but(self, text: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let escaped = escape(text, Some(self.delimiter));
        self.add_atom(&format!("(?:(?!{}).*)", escaped))
    }

    /// At least one character of any text.
    pub fn something(self) -> Self {
        self.add_atom("(?:.+)")
    }

    // character classes

    pub fn letter(self) -> Self {
        self.add_atom("[A-Za-z]")
    }

    /// Same class as `letter`, named for use after a quantifier.
    pub fn letters(self) -> Self {
        self.add_atom("[A-Za-z]")
    }

    pub fn not_letter(self) -> Self {
        self.add_atom("[^A-Za-z]")
    }

    pub fn not_letters(self) -> Self {
        self.add_atom("[^A-Za-z]")
    }

    pub fn lower_case_letter(self) -> Self {
        self.add_atom("[a-z]")
    }

    pub fn lower_case_letters(self) -> Self {
        self.add_atom("[a-z]")
    }

    pub fn upper_case_letter(self) -> Self {
        self.add_atom("[A-Z]")
    }

    pub fn upper_case_letters(self) -> Self {
        self.add_atom("[A-Z]")
    }

    pub fn digit(self) -> Self {
        self.add_atom("\\d")
    }

    pub fn digits(self) -> Self {
        self.add_atom("\\d")
    }

    pub fn not_digit(self) -> Self {
        self.add_atom("\\D")
    }

    pub fn not_digits(self) -> Self {
        self.add_atom("\\D")
    }

    pub fn whitespace(self) -> Self {
        self.add_atom("\\s")
    }

    pub fn not_whitespace(self) -> Self {
        self.add_atom("\\S")
    }

    pub fn tab(self) -> Self {
        self.add_atom("\\t")
    }

    pub fn tabs(self) -> Self {
        self.add_atom("\\t")
    }

    pub fn line_break(self) -> Self {
        self.add_atom("(?:\\r\\n|\\r|\\n)")
    }

    pub fn line_breaks(self) -> Self {
        self.add_atom("(?:\\r\\n|\\r|\\n)")
    }

    /// One character out of the given set.
    pub fn from(self, chars: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let class = char_class(chars, false);
        self.add_atom(&class)
    }

    /// One character outside the given set.
    pub fn not_from(self, chars: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        let class = char_class(chars, true);
        self.add_atom(&class)
    }

    // groups and back-references

    /// A back-reference to the `n`-th capturing group.
    pub fn of_group(self, n: u32) -> Self {
        self.add_atom(&format!("\\{}", n))
    }

    /// Wraps the immediately preceding fragment in a capturing group.
    pub fn as_group(self) -> Self {
        self.wrap_last_group(None)
    }

    /// Wraps the immediately preceding fragment in a named capturing
    /// group.
    pub fn as_named_group(self, name: &str) -> Self {
        self.wrap_last_group(Some(name))
    }

    /// Makes the quantifier of the immediately preceding fragment lazy.
    pub fn reluctantly(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        let offset = self
            .last_start
            .and_then(|start| lazy_marker_offset(&self.body[start..]));
        match (self.last_start, offset) {
            (Some(start), Some(pos)) => self.body.insert(start + pos, '?'),
            _ => {
                self.error = Some(Error::Configuration(
                    "reluctantly() needs a preceding quantified fragment".to_owned(),
                ));
            }
        }
        self
    }

    // alternation

    /// Opens an alternation chain; `or_find` adds further alternatives.
    /// The chain is closed as `(?:a|b|c)` by the next non-alternative
    /// call (or by `compile`), and a quantifier pending when the chain
    /// opened is consumed by the flushed alternation as a whole.
    pub fn either_find(mut self, part: impl Into<Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.flush_alternation();
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        let alternative = self.render_part(part.into());
        self.alternation = Some(Alternation {
            alternatives: vec![alternative],
            pending,
        });
        self
    }

    /// Adds an alternative to the open chain. Without a preceding
    /// `either_find` it opens the chain itself.
    pub fn or_find(mut self, part: impl Into<Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let alternative = self.render_part(part.into());
        match &mut self.alternation {
            Some(chain) => chain.alternatives.push(alternative),
            None => {
                let pending = std::mem::replace(&mut self.pending, Pending::None);
                self.alternation = Some(Alternation {
                    alternatives: vec![alternative],
                    pending,
                });
            }
        }
        self
    }

    /// One of the given literals and sub-expressions. An empty list
    /// emits nothing.
    pub fn any_of(mut self, parts: impl IntoIterator<Item = Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let mut alternatives = Vec::new();
        for part in parts {
            let alternative = self.render_part(part);
            alternatives.push(alternative);
        }
        if alternatives.is_empty() {
            return self;
        }
        self.add_atom(&format!("(?:{})", alternatives.join("|")))
    }

    // lookaround

    /// The sub-expression must follow here, without being consumed.
    pub fn ahead(mut self, part: impl Into<Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let inner = self.render_part(part.into());
        self.add_atom(&format!("(?={})", inner))
    }

    /// The sub-expression must not follow here.
    pub fn not_ahead(mut self, part: impl Into<Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let inner = self.render_part(part.into());
        self.add_atom(&format!("(?!{})", inner))
    }

    /// Alias of `not_ahead`, opening a neither/nor chain.
    pub fn neither(self, part: impl Into<Part>) -> Self {
        self.not_ahead(part)
    }

    /// Alias of `not_ahead`, continuing a neither/nor chain.
    pub fn nor(self, part: impl Into<Part>) -> Self {
        self.not_ahead(part)
    }

    /// An optional sub-expression, `(?:...)?`.
    pub fn optional(mut self, part: impl Into<Part>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let inner = self.render_part(part.into());
        self.add_atom(&format!("(?:{})?", inner))
    }

    // anchors

    pub fn start_of_line(self) -> Self {
        self.add_atom("^")
    }

    pub fn end_of_line(self) -> Self {
        self.add_atom("$")
    }

    pub fn start_of_input(self) -> Self {
        self.add_atom("\\A")
    }

    pub fn end_of_input(self) -> Self {
        self.add_atom("\\z")
    }

    // modifier management

    /// Replaces the whole modifier set.
    pub fn modifiers(mut self, letters: &str) -> Self {
        self.modifiers.set(letters);
        self
    }

    /// Unions the given letters into the modifier set.
    pub fn modifier(mut self, letters: &str) -> Self {
        self.modifiers.add(letters);
        self
    }

    pub fn remove_modifiers(mut self, letters: &str) -> Self {
        self.modifiers.remove(letters);
        self
    }

    pub fn remove_modifier(mut self, letters: &str) -> Self {
        self.modifiers.remove(letters);
        self
    }

    /// True when every one of the given letters is set.
    pub fn has_modifier(&self, letters: &str) -> bool {
        self.modifiers.has_all(letters)
    }

    /// All-of membership by default, any-of when `any` is set.
    pub fn has_modifiers(&self, letters: &str, any: bool) -> bool {
        if any {
            self.modifiers.has_any(letters)
        } else {
            self.modifiers.has_all(letters)
        }
    }

    pub fn ignore_case(mut self, on: bool) -> Self {
        if on {
            self.modifiers.add("i");
        } else {
            self.modifiers.remove("i");
        }
        self
    }

    pub fn multi_line(mut self, on: bool) -> Self {
        if on {
            self.modifiers.add("m");
        } else {
            self.modifiers.remove("m");
        }
        self
    }

    /// Changes the delimiter for subsequently emitted literals. Already
    /// emitted fragments keep the escaping of the delimiter they were
    /// added under.
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    // internals

    fn add_part(mut self, part: Part) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.flush_alternation();
        let inner = self.render_part(part);
        self.add_atom(&format!("(?:{})", inner))
    }

    /// Renders one alternative/sub-expression and advances the group
    /// counter past an included builder's groups.
    fn render_part(&mut self, part: Part) -> String {
        match part {
            Part::Literal(text) => escape(&text, Some(self.delimiter)),
            Part::Sub(builder) => {
                let shifted = shift_backrefs(&builder.rendered_body(), self.group_count);
                self.group_count += builder.group_count;
                format!("(?:{})", shifted)
            }
        }
    }

    /// Appends one atom, consuming a pending quantifier.
    fn add_atom(mut self, atom: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.flush_alternation();
        if self.error.is_some() {
            return self;
        }

        let pending = std::mem::replace(&mut self.pending, Pending::None);
        let fragment = match quantified(atom, pending) {
            Ok(fragment) => fragment,
            Err(error) => {
                self.error = Some(error);
                return self;
            }
        };

        self.last_start = Some(self.body.len());
        self.body.push_str(&fragment);
        self
    }

    fn wrap_last_group(mut self, name: Option<&str>) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.flush_alternation();
        match self.last_start {
            Some(start) => {
                let fragment = self.body.split_off(start);
                let grouped = match name {
                    Some(name) => format!("(?P<{}>{})", name, fragment),
                    None => format!("({})", fragment),
                };
                self.body.push_str(&grouped);
                self.group_count += 1;
            }
            None => {
                self.error = Some(Error::Configuration(
                    "as_group() needs a preceding fragment".to_owned(),
                ));
            }
        }
        self
    }

    fn flush_alternation(&mut self) {
        if let Some(chain) = self.alternation.take() {
            let atom = format!("(?:{})", chain.alternatives.join("|"));
            match quantified(&atom, chain.pending) {
                Ok(fragment) => {
                    self.last_start = Some(self.body.len());
                    self.body.push_str(&fragment);
                }
                Err(error) => self.error = Some(error),
            }
        }
    }

    fn rendered_body(&self) -> String {
        match &self.alternation {
            Some(_) => {
                let mut snapshot = self.clone();
                snapshot.flush_alternation();
                snapshot.body
            }
            None => self.body.clone(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

/// Wraps an atom in the repetition the pending bounds demand.
fn quantified(atom: &str, pending: Pending) -> Result<String, Error> {
    match pending {
        Pending::None | Pending::Range(None, None) => Ok(atom.to_owned()),
        Pending::Exactly(n) => Ok(format!("(?:{}{{{}}})", atom, n)),
        Pending::Range(Some(min), None) => Ok(format!("(?:{}{{{},}})", atom, min)),
        Pending::Range(None, Some(max)) => Ok(format!("(?:{}{{0,{}}})", atom, max)),
        Pending::Range(Some(min), Some(max)) => {
            if min > max {
                Err(Error::Configuration(format!(
                    "quantifier minimum {} exceeds maximum {}",
                    min, max
                )))
            } else {
                Ok(format!("(?:{}{{{},{}}})", atom, min, max))
            }
        }
    }
}

/// The byte offset just past the quantifier of `fragment`: a trailing
/// `*`/`+`/`?`, or the closing brace of the last `{m,n}` repetition.
/// Braces escaped inside a literal do not count. `None` when the
/// fragment carries no quantifier.
fn lazy_marker_offset(fragment: &str) -> Option<usize> {
    if fragment.ends_with(['*', '+', '?']) {
        return Some(fragment.len());
    }
    let bytes = fragment.as_bytes();
    for pos in (0..bytes.len()).rev() {
        if bytes[pos] != b'}' {
            continue;
        }
        let mut backslashes = 0;
        while pos > backslashes && bytes[pos - 1 - backslashes] == b'\\' {
            backslashes += 1;
        }
        if backslashes % 2 == 0 {
            return Some(pos + 1);
        }
    }
    None
}

/// Shifts every numeric back-reference in `body` up by `offset`, so the
/// body can be included after `offset` existing capturing groups.
fn shift_backrefs(body: &str, offset: usize) -> String {
    let mut shifted = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            shifted.push(c);
            continue;
        }

        match chars.peek() {
            Some(d) if d.is_ascii_digit() => {
                let mut number = 0_usize;
                while let Some(d) = chars.peek().and_then(|d| d.to_digit(10)) {
                    number = number * 10 + d as usize;
                    chars.next();
                }
                shifted.push('\\');
                shifted.push_str(&(number + offset).to_string());
            }
            _ => {
                shifted.push(c);
                if let Some(next) = chars.next() {
                    shifted.push(next);
                }
            }
        }
    }

    shifted
}

/// Builds a character class from the given characters, escaping the
/// ones that are special inside brackets.
fn char_class(chars: &str, negated: bool) -> String {
    let mut class = String::from(if negated { "[^" } else { "[" });
    for c in chars.chars() {
        if matches!(c, '\\' | ']' | '^' | '-' | '[') {
            class.push('\\');
        }
        class.push(c);
    }
    class.push(']');
    class
}
