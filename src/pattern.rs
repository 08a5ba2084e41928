// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The compiled pattern value: a pattern body, its modifier letters, and
//! the delimiter it renders with.
//!
//! A `Pattern` is immutable. The `with_*` methods return new values and
//! `render`/`parse` round-trip through the delimited text form
//! `<open><body><close><modifiers>`.

use std::fmt::Display;

use crate::config;
use crate::errors::Error;
use crate::matches::Matches;
use crate::modifiers::{Flags, Modifiers};
use crate::regex::Regex;
use crate::replacement::Replacement;
use crate::value::Subject;

// the characters `escape` always backslash-escapes, i.e. everything that
// carries meaning in a pattern body
const METACHARACTERS: &str = ".\\+*?[^]$(){}=!<>|:-#";

/// A pattern delimiter: either one punctuation character used on both
/// sides, or a bracket pair with distinct open and close characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Char(char),
    Bracket(char, char),
}

impl Delimiter {
    /// Maps an opening character to its delimiter. Bracket openers pair
    /// with their closing partner; any other ASCII punctuation (except
    /// backslash and the closing brackets) delimits with itself.
    pub fn from_open(open: char) -> Option<Delimiter> {
        match open {
            '(' => Some(Delimiter::Bracket('(', ')')),
            '{' => Some(Delimiter::Bracket('{', '}')),
            '[' => Some(Delimiter::Bracket('[', ']')),
            '<' => Some(Delimiter::Bracket('<', '>')),
            '\\' | ')' | '}' | ']' | '>' => None,
            _ if open.is_ascii_punctuation() => Some(Delimiter::Char(open)),
            _ => None,
        }
    }

    pub fn open(&self) -> char {
        match self {
            Delimiter::Char(c) => *c,
            Delimiter::Bracket(open, _) => *open,
        }
    }

    pub fn close(&self) -> char {
        match self {
            Delimiter::Char(c) => *c,
            Delimiter::Bracket(_, close) => *close,
        }
    }

    pub fn contains(&self, c: char) -> bool {
        c == self.open() || c == self.close()
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self, Delimiter::Bracket(..))
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Char(config::default_delimiter())
    }
}

impl From<char> for Delimiter {
    fn from(c: char) -> Self {
        Delimiter::from_open(c).unwrap_or(Delimiter::Char(c))
    }
}

/// A compiled regular expression value.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    body: String,
    modifiers: Modifiers,
    delimiter: Delimiter,
}

impl Pattern {
    pub fn new(body: impl Into<String>, modifiers: Modifiers, delimiter: Delimiter) -> Pattern {
        Pattern {
            body: body.into(),
            modifiers,
            delimiter,
        }
    }

    /// Builds a pattern from a bare body, filling the unspecified parts
    /// from the process-wide defaults.
    pub fn create(
        body: impl Into<String>,
        modifiers: Option<&str>,
        delimiter: Option<Delimiter>,
    ) -> Pattern {
        let modifiers = match modifiers {
            Some(letters) => Modifiers::parse(letters),
            None => Modifiers::parse(&config::default_modifiers()),
        };
        Pattern::new(body, modifiers, delimiter.unwrap_or_default())
    }

    /// Wraps a bare body in the given (or default) delimiter, with no
    /// modifiers. The body is taken as-is, without escaping.
    pub fn wrap(body: impl Into<String>, delimiter: Option<Delimiter>) -> Pattern {
        Pattern::new(body, Modifiers::new(), delimiter.unwrap_or_default())
    }

    /// Re-delimits only when the text is not already in a recognized
    /// delimited form. Bracket-style delimiters are only recognized when
    /// `brackets` is set, because a bare body legitimately starts with
    /// `(`, `[` or `{`.
    pub fn safe_wrap(text: &str, delimiter: Option<Delimiter>, brackets: bool) -> Pattern {
        let recognizable = text
            .chars()
            .next()
            .and_then(Delimiter::from_open)
            .map(|d| brackets || !d.is_bracket())
            .unwrap_or(false);

        if recognizable {
            if let Ok(pattern) = Pattern::parse(text) {
                return pattern;
            }
        }
        Pattern::wrap(text, delimiter)
    }

    /// Parses the delimited text form. The body runs up to the **last**
    /// occurrence of the closing delimiter; the tail is the modifier
    /// letters.
    pub fn parse(text: &str) -> Result<Pattern, Error> {
        let open = text
            .chars()
            .next()
            .ok_or_else(|| Error::Configuration("empty pattern text".to_owned()))?;
        let delimiter = Delimiter::from_open(open).ok_or_else(|| {
            Error::Configuration(format!("`{}` can not start a delimited pattern", open))
        })?;

        let rest = &text[open.len_utf8()..];
        let close = delimiter.close();
        let close_pos = rest.rfind(close).ok_or_else(|| {
            Error::Configuration(format!("missing closing delimiter `{}`", close))
        })?;

        let body = &rest[..close_pos];
        let tail = &rest[close_pos + close.len_utf8()..];
        if !tail.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::Configuration(format!(
                "invalid modifier letters `{}`",
                tail
            )));
        }

        Ok(Pattern::new(body, Modifiers::parse(tail), delimiter))
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn with_modifiers(&self, modifiers: Modifiers) -> Pattern {
        Pattern {
            modifiers,
            ..self.clone()
        }
    }

    pub fn with_delimiter(&self, delimiter: Delimiter) -> Pattern {
        Pattern {
            delimiter,
            ..self.clone()
        }
    }

    /// The delimited text form, `<open><body><close><modifiers>`.
    pub fn render(&self) -> String {
        format!(
            "{}{}{}{}",
            self.delimiter.open(),
            self.body,
            self.delimiter.close(),
            self.modifiers.render()
        )
    }

    // convenience executors, delegating to the facade

    pub fn is_match(&self, subject: &str) -> Result<bool, Error> {
        Regex::is_match(self, subject)
    }

    pub fn find(&self, subject: impl Into<Subject>) -> Result<Matches, Error> {
        Regex::find(self, subject, Flags::NONE, 0)
    }

    pub fn find_all(&self, subject: impl Into<Subject>) -> Result<Matches, Error> {
        Regex::find_all(self, subject, Flags::NONE, 0)
    }

    pub fn replace(
        &self,
        replacement: &str,
        subject: impl Into<Subject>,
    ) -> Result<Replacement, Error> {
        Regex::replace(self, replacement, subject, None)
    }

    pub fn split(&self, subject: &str) -> Result<Vec<String>, Error> {
        Regex::split(self, subject, None, Flags::NONE)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Backslash-escapes every pattern metacharacter, plus the delimiter
/// character(s) when one is given, so the text matches literally.
pub fn escape(text: &str, delimiter: Option<Delimiter>) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if METACHARACTERS.contains(c) || delimiter.map_or(false, |d| d.contains(c)) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, Delimiter, Pattern};
    use crate::modifiers::Modifiers;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render() {
        let pattern = Pattern::new("a+b", Modifiers::parse("ui"), Delimiter::Char('/'));
        assert_eq!(pattern.render(), "/a+b/ui");

        let pattern = Pattern::new("a+b", Modifiers::new(), Delimiter::Bracket('{', '}'));
        assert_eq!(pattern.render(), "{a+b}");
    }

    #[test]
    fn test_parse_round_trip() {
        {
            let pattern = Pattern::new("\\d{2,4}", Modifiers::parse("u"), Delimiter::Char('/'));
            assert_eq!(Pattern::parse(&pattern.render()).unwrap(), pattern);
        }

        {
            // the body may itself contain the closing character, the last
            // occurrence wins
            let pattern = Pattern::new("a}b", Modifiers::parse("i"), Delimiter::Bracket('{', '}'));
            assert_eq!(pattern.render(), "{a}b}i");
            assert_eq!(Pattern::parse(&pattern.render()).unwrap(), pattern);
        }

        {
            let pattern = Pattern::parse("#fo/o#mx").unwrap();
            assert_eq!(pattern.body(), "fo/o");
            assert_eq!(pattern.modifiers(), &Modifiers::parse("mx"));
            assert_eq!(pattern.delimiter(), Delimiter::Char('#'));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(Pattern::parse("").is_err());
        // an alphanumeric first character is never a delimiter
        assert!(Pattern::parse("abc").is_err());
        // unterminated
        assert!(Pattern::parse("/abc").is_err());
        // garbage after the modifiers
        assert!(Pattern::parse("/abc/u!").is_err());
    }

    #[test]
    fn test_safe_wrap() {
        // already-delimited text is parsed, not wrapped again
        let pattern = Pattern::safe_wrap("/foo/m", None, false);
        assert_eq!(pattern.body(), "foo");
        assert_eq!(pattern.modifiers(), &Modifiers::parse("m"));

        // bare text is wrapped with an empty modifier set
        let pattern = Pattern::safe_wrap("foo", Some(Delimiter::Char('#')), false);
        assert_eq!(pattern.render(), "#foo#");

        // bracket recognition is opt-in: a leading `{` is a quantifier-ish
        // body by default
        let pattern = Pattern::safe_wrap("{2,4}", Some(Delimiter::Char('/')), false);
        assert_eq!(pattern.render(), "/{2,4}/");

        let pattern = Pattern::safe_wrap("{foo}i", None, true);
        assert_eq!(pattern.body(), "foo");
        assert_eq!(pattern.delimiter(), Delimiter::Bracket('{', '}'));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("1.5-2", None), "1\\.5\\-2");
        assert_eq!(escape("a/b", None), "a/b");
        assert_eq!(escape("a/b", Some(Delimiter::Char('/'))), "a\\/b");
        assert_eq!(
            escape("(a)[b]", Some(Delimiter::Char('/'))),
            "\\(a\\)\\[b\\]"
        );
    }

    #[test]
    fn test_with_modifiers_returns_a_new_value() {
        let pattern = Pattern::new("x", Modifiers::parse("u"), Delimiter::Char('/'));
        let caseless = pattern.with_modifiers(Modifiers::parse("ui"));
        assert_eq!(pattern.render(), "/x/u");
        assert_eq!(caseless.render(), "/x/ui");
    }
}
