// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The operation facade.
//!
//! Every function validates its arguments, invokes the execution
//! primitive once per subject member, and wraps the raw outcome into
//! `Matches` or `Replacement`. Engine failures (a rejected pattern, an
//! exceeded backtrack limit) surface as the typed error of the calling
//! operation; "no match" and "zero substitutions" are normal results.

use fancy_regex::Captures;

use crate::builder::Builder;
use crate::engine::Engine;
use crate::errors::Error;
use crate::matches::{Matches, RawOutcome};
use crate::modifiers::{Flags, Modifiers};
use crate::pattern::{escape, Delimiter, Pattern};
use crate::replacement::Replacement;
use crate::value::Subject;

pub struct Regex;

impl Regex {
    /// A fresh builder with the process-wide defaults.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// A fresh builder with an explicit delimiter and/or modifiers.
    pub fn builder_with(delimiter: Option<Delimiter>, modifiers: Option<&str>) -> Builder {
        Builder::with(delimiter, modifiers)
    }

    /// A pattern from a bare body, defaults filling the unspecified
    /// parts.
    pub fn create(
        body: impl Into<String>,
        modifiers: Option<&str>,
        delimiter: Option<Delimiter>,
    ) -> Pattern {
        Pattern::create(body, modifiers, delimiter)
    }

    /// A pattern from an already-delimited expression such as
    /// `"#\d+#i"`, keeping its delimiter and modifiers. A text that
    /// does not parse as one is treated as a bare body and wrapped with
    /// the defaults. Explicit arguments override the parsed parts.
    pub fn from(pattern: &str, modifiers: Option<&str>, delimiter: Option<Delimiter>) -> Pattern {
        let mut result = match Pattern::parse(pattern) {
            Ok(parsed) => parsed,
            Err(_) => Pattern::create(pattern, None, None),
        };
        if let Some(letters) = modifiers {
            result = result.with_modifiers(Modifiers::parse(letters));
        }
        if let Some(delimiter) = delimiter {
            result = result.with_delimiter(delimiter);
        }
        result
    }

    /// Backslash-escapes the text so it matches literally.
    pub fn quote(text: &str, delimiter: Option<Delimiter>) -> String {
        escape(text, delimiter)
    }

    /// Wraps a bare body in the given (or default) delimiter.
    pub fn wrap(body: impl Into<String>, delimiter: Option<Delimiter>) -> Pattern {
        Pattern::wrap(body, delimiter)
    }

    /// Re-delimits only when the text is not already in a recognized
    /// delimited form.
    pub fn safe_wrap(text: &str, delimiter: Option<Delimiter>, brackets: bool) -> Pattern {
        Pattern::safe_wrap(text, delimiter, brackets)
    }

    /// Does the pattern match anywhere in the subject.
    pub fn is_match(pattern: &Pattern, subject: &str) -> Result<bool, Error> {
        let engine = Engine::build(pattern).map_err(|reason| match_error(pattern, reason))?;
        engine
            .is_match(subject)
            .map_err(|reason| match_error(pattern, reason))
    }

    /// Alias of `is_match`.
    pub fn matches(pattern: &Pattern, subject: &str) -> Result<bool, Error> {
        Self::is_match(pattern, subject)
    }

    /// The first match from `offset` on. "No match" is a successful
    /// `Matches` with `any() == false`.
    pub fn find(
        pattern: &Pattern,
        subject: impl Into<Subject>,
        flags: Flags,
        offset: usize,
    ) -> Result<Matches, Error> {
        Self::run(pattern, subject.into(), flags, offset, false)
    }

    /// Every non-overlapping match from `offset` on.
    pub fn find_all(
        pattern: &Pattern,
        subject: impl Into<Subject>,
        flags: Flags,
        offset: usize,
    ) -> Result<Matches, Error> {
        Self::run(pattern, subject.into(), flags, offset, true)
    }

    /// Substitutes every occurrence (or up to `limit` per subject
    /// member) with an expansion of the template, where `$1`/`${name}`
    /// refer to capture groups.
    pub fn replace(
        pattern: &Pattern,
        replacement: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Replacement, Error> {
        let engine = Engine::build(pattern).map_err(|reason| replacement_error(pattern, reason))?;
        let mut replacer = template_replacer(replacement);
        replace_members(&engine, subject.into(), limit, &mut replacer)
            .map_err(|reason| replacement_error(pattern, reason))
    }

    /// Like `replace`, but the callback receives a single-occurrence
    /// `Matches` per match and returns the replacement text.
    pub fn replace_callback<F>(
        pattern: &Pattern,
        mut callback: F,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Replacement, Error>
    where
        F: FnMut(&Matches) -> String,
    {
        let engine = Engine::build(pattern).map_err(|reason| replacement_error(pattern, reason))?;
        let pattern_text = pattern.render();
        let group_count = engine.group_count();
        let names = engine.names().to_vec();

        let mut replacer = |captures: &Captures<'_>| -> Result<String, String> {
            let raw = engine.raw(captures);
            let matched = captures
                .get(0)
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default();
            let matches = Matches::new(
                pattern_text.clone(),
                Subject::Text(matched),
                RawOutcome::One(vec![raw]),
                group_count,
                names.clone(),
                Flags::NONE,
                false,
            );
            Ok(callback(&matches))
        };

        replace_members(&engine, subject.into(), limit, &mut replacer)
            .map_err(|reason| replacement_error(pattern, reason))
    }

    /// Like `replace`, but zero total substitutions yield `None`, and
    /// collection members with zero substitutions are omitted from the
    /// result.
    pub fn replaced(
        pattern: &Pattern,
        replacement: &str,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Option<Replacement>, Error> {
        let engine = Engine::build(pattern).map_err(|reason| replacement_error(pattern, reason))?;
        let mut replacer = template_replacer(replacement);
        let map_err = |reason| replacement_error(pattern, reason);

        let replacement = match subject.into() {
            Subject::Text(text) => {
                let (result, count) = engine
                    .run_replace(&text, limit, &mut replacer)
                    .map_err(map_err)?;
                Replacement::new(Subject::Text(result), count)
            }
            Subject::List(items) => {
                let mut kept = Vec::new();
                let mut total = 0;
                for item in items {
                    let (result, count) = engine
                        .run_replace(&item, limit, &mut replacer)
                        .map_err(map_err)?;
                    if count > 0 {
                        total += count;
                        kept.push(result);
                    }
                }
                Replacement::new(Subject::List(kept), total)
            }
            Subject::Map(entries) => {
                let mut kept = Vec::new();
                let mut total = 0;
                for (key, text) in entries {
                    let (result, count) = engine
                        .run_replace(&text, limit, &mut replacer)
                        .map_err(map_err)?;
                    if count > 0 {
                        total += count;
                        kept.push((key, result));
                    }
                }
                Replacement::new(Subject::Map(kept), total)
            }
        };

        if replacement.count() == 0 {
            Ok(None)
        } else {
            Ok(Some(replacement))
        }
    }

    /// Splits the subject at every match, honoring `SPLIT_NO_EMPTY` and
    /// `SPLIT_DELIM_CAPTURE`; `limit` caps the number of pieces.
    pub fn split(
        pattern: &Pattern,
        subject: &str,
        limit: Option<usize>,
        flags: Flags,
    ) -> Result<Vec<String>, Error> {
        let engine = Engine::build(pattern).map_err(|reason| split_error(pattern, reason))?;
        engine
            .run_split(subject, limit, flags)
            .map_err(|reason| split_error(pattern, reason))
    }

    /// Keeps (or, inverted, drops) the collection members that match,
    /// preserving keys. A scalar subject is kept as-is or emptied.
    pub fn filter(
        pattern: &Pattern,
        subject: impl Into<Subject>,
        invert: bool,
    ) -> Result<Subject, Error> {
        let engine = Engine::build(pattern).map_err(|reason| match_error(pattern, reason))?;
        let map_err = |reason| match_error(pattern, reason);

        match subject.into() {
            Subject::Text(text) => {
                let keep = engine.is_match(&text).map_err(map_err)? != invert;
                Ok(Subject::Text(if keep { text } else { String::new() }))
            }
            Subject::List(items) => {
                let mut kept = Vec::new();
                for item in items {
                    if engine.is_match(&item).map_err(map_err)? != invert {
                        kept.push(item);
                    }
                }
                Ok(Subject::List(kept))
            }
            Subject::Map(entries) => {
                let mut kept = Vec::new();
                for (key, text) in entries {
                    if engine.is_match(&text).map_err(map_err)? != invert {
                        kept.push((key, text));
                    }
                }
                Ok(Subject::Map(kept))
            }
        }
    }

    fn run(
        pattern: &Pattern,
        subject: Subject,
        flags: Flags,
        offset: usize,
        global: bool,
    ) -> Result<Matches, Error> {
        let engine = Engine::build(pattern).map_err(|reason| match_error(pattern, reason))?;

        let outcome = match &subject {
            Subject::Text(text) => RawOutcome::One(
                engine
                    .run(text, offset, global)
                    .map_err(|reason| match_error(pattern, reason))?,
            ),
            collection => {
                let mut members = Vec::new();
                for (key, text) in collection.members() {
                    let raws = engine
                        .run(text, offset, global)
                        .map_err(|reason| match_error(pattern, reason))?;
                    members.push((key, raws));
                }
                RawOutcome::Many(members)
            }
        };

        Ok(Matches::new(
            pattern.render(),
            subject,
            outcome,
            engine.group_count(),
            engine.names().to_vec(),
            flags,
            global,
        ))
    }
}

/// A replacer expanding a `$1`/`${name}` template per match.
fn template_replacer(template: &str) -> impl FnMut(&Captures<'_>) -> Result<String, String> + '_ {
    move |captures: &Captures<'_>| {
        let mut expanded = String::new();
        captures.expand(template, &mut expanded);
        Ok(expanded)
    }
}

/// Substitutes per subject member, preserving the subject shape and
/// summing the counts.
fn replace_members<F>(
    engine: &Engine,
    subject: Subject,
    limit: Option<usize>,
    replacer: &mut F,
) -> Result<Replacement, String>
where
    F: FnMut(&Captures<'_>) -> Result<String, String>,
{
    match subject {
        Subject::Text(text) => {
            let (result, count) = engine.run_replace(&text, limit, &mut *replacer)?;
            Ok(Replacement::new(Subject::Text(result), count))
        }
        Subject::List(items) => {
            let mut results = Vec::with_capacity(items.len());
            let mut total = 0;
            for item in items {
                let (result, count) = engine.run_replace(&item, limit, &mut *replacer)?;
                total += count;
                results.push(result);
            }
            Ok(Replacement::new(Subject::List(results), total))
        }
        Subject::Map(entries) => {
            let mut results = Vec::with_capacity(entries.len());
            let mut total = 0;
            for (key, text) in entries {
                let (result, count) = engine.run_replace(&text, limit, &mut *replacer)?;
                total += count;
                results.push((key, result));
            }
            Ok(Replacement::new(Subject::Map(results), total))
        }
    }
}

fn match_error(pattern: &Pattern, reason: String) -> Error {
    Error::Match {
        pattern: pattern.render(),
        reason,
    }
}

fn replacement_error(pattern: &Pattern, reason: String) -> Error {
    Error::Replacement {
        pattern: pattern.render(),
        reason,
    }
}

fn split_error(pattern: &Pattern, reason: String) -> Error {
    Error::Split {
        pattern: pattern.render(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::Regex;
    use crate::errors::Error;
    use crate::modifiers::Flags;
    use crate::pattern::{Delimiter, Pattern};
    use crate::value::{Subject, Value};
    use pretty_assertions::assert_eq;

    fn pattern(body: &str) -> Pattern {
        Pattern::create(body, Some("u"), None)
    }

    #[test]
    fn test_is_match() {
        assert!(Regex::is_match(&pattern("\\d+"), "call 555").unwrap());
        assert!(!Regex::is_match(&pattern("\\d+"), "no numbers").unwrap());
        assert!(Regex::matches(&pattern("^b"), "beer").unwrap());
    }

    #[test]
    fn test_engine_failure_is_typed_per_operation() {
        let broken = pattern("(unclosed");
        assert!(matches!(
            Regex::find(&broken, "x", Flags::NONE, 0),
            Err(Error::Match { .. })
        ));
        assert!(matches!(
            Regex::replace(&broken, "y", "x", None),
            Err(Error::Replacement { .. })
        ));
        assert!(matches!(
            Regex::split(&broken, "x", None, Flags::NONE),
            Err(Error::Split { .. })
        ));
    }

    #[test]
    fn test_replace_with_template() {
        let replacement = Regex::replace(
            &pattern("(?P<last>\\w+), (?P<first>\\w+)"),
            "${first} ${last}",
            "Dursley, Harry",
            None,
        )
        .unwrap();

        assert_eq!(replacement.result(), &Subject::from("Harry Dursley"));
        assert_eq!(replacement.count(), 1);

        let replacement =
            Regex::replace(&pattern("(\\d+)"), "<$1>", "555 and 1212", None).unwrap();
        assert_eq!(replacement.result(), &Subject::from("<555> and <1212>"));
        assert_eq!(replacement.count(), 2);
    }

    #[test]
    fn test_replace_limit() {
        let replacement = Regex::replace(&pattern("a"), "b", "a a a", Some(1)).unwrap();
        assert_eq!(replacement.result(), &Subject::from("b a a"));
        assert_eq!(replacement.count(), 1);
    }

    #[test]
    fn test_replace_collection_preserves_keys() {
        let subject = vec![("home", "tel 111"), ("office", "tel 222")];
        let replacement = Regex::replace(&pattern("\\d+"), "#", subject, None).unwrap();

        assert_eq!(
            replacement.result(),
            &Subject::from(vec![("home", "tel #"), ("office", "tel #")])
        );
        assert_eq!(replacement.count(), 2);
    }

    #[test]
    fn test_replace_callback() {
        let replacement = Regex::replace_callback(
            &pattern("\\w+"),
            |matches| match matches.result() {
                Value::Text(text) => text.to_uppercase(),
                _ => String::new(),
            },
            "hello world",
            None,
        )
        .unwrap();

        assert_eq!(replacement.result(), &Subject::from("HELLO WORLD"));
        assert_eq!(replacement.count(), 2);
    }

    #[test]
    fn test_replaced_none_on_zero_substitutions() {
        let replaced = Regex::replaced(&pattern("\\d+"), "#", "no numbers", None).unwrap();
        assert!(replaced.is_none());

        let replaced = Regex::replaced(&pattern("\\d+"), "#", "tel 555", None)
            .unwrap()
            .unwrap();
        assert_eq!(replaced.result(), &Subject::from("tel #"));
        assert_eq!(replaced.count(), 1);
    }

    #[test]
    fn test_replaced_omits_untouched_members() {
        let subject = vec!["foo", "123", "bar4"];
        let replaced = Regex::replaced(&pattern("\\d+"), "#", subject, None)
            .unwrap()
            .unwrap();

        assert_eq!(replaced.result(), &Subject::from(vec!["#", "bar#"]));
        assert_eq!(replaced.count(), 2);

        let subject = vec![("a", "foo"), ("b", "b123")];
        let replaced = Regex::replaced(&pattern("\\d+"), "#", subject, None)
            .unwrap()
            .unwrap();
        assert_eq!(replaced.result(), &Subject::from(vec![("b", "b#")]));
    }

    #[test]
    fn test_split() {
        let pieces = Regex::split(&pattern(","), "a,b,,c", None, Flags::NONE).unwrap();
        assert_eq!(pieces, vec!["a", "b", "", "c"]);

        let pieces = Regex::split(&pattern(","), "a,b,,c", None, Flags::SPLIT_NO_EMPTY).unwrap();
        assert_eq!(pieces, vec!["a", "b", "c"]);

        let pieces =
            Regex::split(&pattern("(,)"), "a,b", None, Flags::SPLIT_DELIM_CAPTURE).unwrap();
        assert_eq!(pieces, vec!["a", ",", "b"]);

        // the last piece carries the unsplit remainder
        let pieces = Regex::split(&pattern(","), "a,b,,c", Some(2), Flags::NONE).unwrap();
        assert_eq!(pieces, vec!["a", "b,,c"]);
    }

    #[test]
    fn test_filter() {
        let subject = vec![("a", "x1"), ("b", "yy"), ("c", "z3")];

        let kept = Regex::filter(&pattern("\\d"), subject.clone(), false).unwrap();
        assert_eq!(kept, Subject::from(vec![("a", "x1"), ("c", "z3")]));

        let dropped = Regex::filter(&pattern("\\d"), subject, true).unwrap();
        assert_eq!(dropped, Subject::from(vec![("b", "yy")]));
    }

    #[test]
    fn test_quote_and_wrap() {
        assert_eq!(Regex::quote("1.5-2", None), "1\\.5\\-2");
        assert_eq!(
            Regex::wrap("\\d+", Some(Delimiter::Char('#'))).render(),
            "#\\d+#"
        );

        let wrapped = Regex::safe_wrap("/foo/i", None, false);
        assert_eq!(wrapped.body(), "foo");

        let created = Regex::create("\\w+", Some("mi"), Some(Delimiter::Char('~')));
        assert_eq!(created.render(), "~\\w+~mi");
    }

    #[test]
    fn test_from() {
        // an already-delimited expression keeps its parts
        let parsed = Regex::from("#\\d+#ix", None, None);
        assert_eq!(parsed.body(), "\\d+");
        assert_eq!(parsed.delimiter(), Delimiter::Char('#'));
        assert_eq!(parsed.render(), "#\\d+#ix");

        // a text that is not a delimited expression is a bare body
        let wrapped = Regex::from("\\d+", None, None);
        assert_eq!(wrapped.body(), "\\d+");
        assert!(Regex::is_match(&wrapped, "call 555").unwrap());

        // explicit arguments override the parsed parts
        let overridden = Regex::from("#\\d+#i", Some(""), Some(Delimiter::Char('/')));
        assert_eq!(overridden.render(), "/\\d+/");
    }

    #[test]
    fn test_builder_entry_points() {
        let pattern = Regex::builder().find("a").digit().compile().unwrap();
        assert!(Regex::is_match(&pattern, "a5").unwrap());

        let builder = Regex::builder_with(Some(Delimiter::Char('#')), Some("i"));
        assert_eq!(builder.get_delimiter(), Delimiter::Char('#'));
    }
}
