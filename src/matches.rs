// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The normalized match result.
//!
//! The engine's raw output varies along three axes: single vs. global
//! match, scalar vs. collection subject, and bare text vs. offset
//! pairs. `Matches` folds all of it into one group-major form at
//! construction time, so every accessor projects from the same
//! structure instead of re-branching on the raw shape.
//!
//! Group 0 is always the full match. A capturing group declared in the
//! pattern that did not participate in a match reads as the configured
//! default (`Null` unless `set_default` overrides it). For a
//! collection subject every accessor returns a map keyed like the
//! subject, with non-matching members keeping an empty-shaped entry.

use crate::engine::RawMatch;
use crate::errors::Error;
use crate::modifiers::Flags;
use crate::value::{Key, Subject, Value};

/// The occurrences of every capture slot for one subject member,
/// group-major: `groups[g]` lists group `g` across all matches.
#[derive(Debug, Clone)]
struct GroupTable {
    groups: Vec<Vec<Option<(String, usize)>>>,
}

impl GroupTable {
    fn from_raw(raws: &[RawMatch], group_count: usize) -> GroupTable {
        let mut groups = vec![Vec::with_capacity(raws.len()); group_count];
        for raw in raws {
            for (index, slot) in raw.groups.iter().enumerate() {
                if index < group_count {
                    groups[index].push(slot.clone());
                }
            }
        }
        GroupTable { groups }
    }

    fn matched(&self) -> bool {
        self.groups.first().map_or(false, |g| !g.is_empty())
    }
}

/// The per-subject raw outcome handed over by the facade.
#[derive(Debug, Clone)]
pub(crate) enum RawOutcome {
    One(Vec<RawMatch>),
    Many(Vec<(String, Vec<RawMatch>)>),
}

#[derive(Debug, Clone)]
enum MatchData {
    One(GroupTable),
    Many(Vec<(String, GroupTable)>),
}

#[derive(Debug, Clone)]
pub struct Matches {
    pattern: String,
    subject: Subject,
    flags: Flags,
    is_global: bool,
    default: Value,
    group_count: usize,
    names: Vec<(String, usize)>,
    data: MatchData,
}

impl Matches {
    pub(crate) fn new(
        pattern: String,
        subject: Subject,
        outcome: RawOutcome,
        group_count: usize,
        names: Vec<(String, usize)>,
        flags: Flags,
        is_global: bool,
    ) -> Matches {
        let data = match outcome {
            RawOutcome::One(raws) => MatchData::One(GroupTable::from_raw(&raws, group_count)),
            RawOutcome::Many(members) => MatchData::Many(
                members
                    .into_iter()
                    .map(|(key, raws)| (key, GroupTable::from_raw(&raws, group_count)))
                    .collect(),
            ),
        };

        Matches {
            pattern,
            subject,
            flags,
            is_global,
            default: Value::Null,
            group_count,
            names,
            data,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The persistent substitute for non-participating groups, `Null`
    /// unless overridden.
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Overrides the value every subsequent accessor reports for a
    /// group that did not participate. The underlying match data is
    /// untouched.
    pub fn set_default(&mut self, default: Value) {
        self.default = default;
    }

    /// Did the engine report at least one match (for a collection
    /// subject: in any member).
    pub fn any(&self) -> bool {
        match &self.data {
            MatchData::One(table) => table.matched(),
            MatchData::Many(members) => members.iter().any(|(_, table)| table.matched()),
        }
    }

    /// Alias of `any`.
    pub fn has_match(&self) -> bool {
        self.any()
    }

    /// The "natural" shape: the full match when the pattern has no
    /// capturing group, the sole group's value when it has exactly one,
    /// and the full list (group 0 included) otherwise.
    pub fn result(&self) -> Value {
        self.project(|table| match self.group_count {
            1 => self.group_value(table, 0, None),
            2 => self.group_value(table, 1, None),
            _ => Value::List(
                (0..self.group_count)
                    .map(|index| self.group_value(table, index, None))
                    .collect(),
            ),
        })
    }

    /// The combined view: every group by ascending ordinal, with each
    /// named group's name key directly before its numeric key.
    pub fn all(&self) -> Value {
        self.project(|table| {
            let mut entries = Vec::new();
            for index in 0..self.group_count {
                let value = self.group_value(table, index, None);
                if let Some(name) = self.name_of(index) {
                    entries.push((Key::Name(name.to_owned()), value.clone()));
                }
                entries.push((Key::Index(index), value));
            }
            Value::Map(entries)
        })
    }

    /// The numeric view only, group 0 included, name keys stripped.
    pub fn indexed_groups(&self) -> Value {
        self.project(|table| {
            Value::List(
                (0..self.group_count)
                    .map(|index| self.group_value(table, index, None))
                    .collect(),
            )
        })
    }

    /// The named view only, in declaration order.
    pub fn named_groups(&self) -> Value {
        self.project(|table| {
            Value::Map(
                self.names
                    .iter()
                    .map(|(name, index)| {
                        (
                            Key::Name(name.clone()),
                            self.group_value(table, *index, None),
                        )
                    })
                    .collect(),
            )
        })
    }

    /// The numeric groups excluding group 0, with an optional one-shot
    /// default for non-participating groups.
    pub fn groups(&self, default: Option<Value>) -> Value {
        self.project(|table| {
            Value::List(
                (1..self.group_count)
                    .map(|index| self.group_value(table, index, default.as_ref()))
                    .collect(),
            )
        })
    }

    /// The named groups with an optional one-shot default.
    pub fn named(&self, default: Option<Value>) -> Value {
        self.project(|table| {
            Value::Map(
                self.names
                    .iter()
                    .map(|(name, index)| {
                        (
                            Key::Name(name.clone()),
                            self.group_value(table, *index, default.as_ref()),
                        )
                    })
                    .collect(),
            )
        })
    }

    /// Looks up one group by numeric or name key, or several by a flat
    /// key list (which yields a map in the requested order).
    ///
    /// A declared key resolves to its value (or the default when the
    /// group did not participate). An undeclared key is
    /// `GroupDoesNotExist` under `strict`, the default otherwise. A
    /// malformed key shape is `InvalidGroupIndex` regardless.
    pub fn get(
        &self,
        key: impl Into<Key>,
        default: Option<Value>,
        strict: bool,
    ) -> Result<Value, Error> {
        let key = key.into();
        match &key {
            Key::Index(_) | Key::Name(_) => {
                let resolved = self.resolve(&key)?;
                match resolved {
                    Some(index) => {
                        Ok(self.project(|table| self.group_value(table, index, default.as_ref())))
                    }
                    None if strict => Err(Error::GroupDoesNotExist(key)),
                    None => Ok(default.unwrap_or_else(|| self.default.clone())),
                }
            }
            Key::List(keys) => {
                let entries = keys
                    .iter()
                    .map(|inner| {
                        if matches!(inner, Key::List(_)) {
                            return Err(Error::InvalidGroupIndex(
                                "a group key list must be flat".to_owned(),
                            ));
                        }
                        let value = self.get(inner.clone(), default.clone(), strict)?;
                        Ok((inner.clone(), value))
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(Value::Map(entries))
            }
        }
    }

    /// Strict lookup of one or more groups; several keys yield a map in
    /// the requested order.
    pub fn group(&self, keys: impl IntoIterator<Item = Key>) -> Result<Value, Error> {
        let mut keys: Vec<Key> = keys.into_iter().collect();
        match keys.len() {
            0 => Err(Error::InvalidGroupIndex(
                "group() needs at least one key".to_owned(),
            )),
            1 => self.get(keys.remove(0), None, true),
            _ => self.get(Key::List(keys), None, true),
        }
    }

    /// Strict named access; an undeclared name is
    /// `NamedGroupDoesntExist`.
    pub fn named_group(&self, name: &str) -> Result<Value, Error> {
        match self.names.iter().find(|(n, _)| n == name) {
            Some((_, index)) => {
                let index = *index;
                Ok(self.project(|table| self.group_value(table, index, None)))
            }
            None => Err(Error::NamedGroupDoesntExist(name.to_owned())),
        }
    }

    /// Is the key declared in the pattern, regardless of participation.
    pub fn has(&self, key: impl Into<Key>) -> Result<bool, Error> {
        let key = key.into();
        Ok(self.resolve(&key)?.is_some())
    }

    /// The number of entries in the combined `all()` view.
    pub fn count(&self) -> usize {
        match self.all() {
            Value::Map(entries) => entries.len(),
            Value::List(items) => items.len(),
            _ => 0,
        }
    }

    /// Iterates the numeric view in ascending group order, group 0
    /// included.
    pub fn iter(&self) -> std::vec::IntoIter<Value> {
        match self.indexed_groups() {
            Value::List(items) => items.into_iter(),
            other => vec![other].into_iter(),
        }
    }

    // internals

    fn name_of(&self, index: usize) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(name, _)| name.as_str())
    }

    /// Maps a well-formed key to its group ordinal, `None` when the
    /// pattern declares no such group. Numeric strings stay in the name
    /// key space: `"2"` never resolves to group 2.
    fn resolve(&self, key: &Key) -> Result<Option<usize>, Error> {
        match key {
            Key::Index(index) => Ok((*index < self.group_count).then_some(*index)),
            Key::Name(name) => Ok(self
                .names
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, index)| *index)),
            Key::List(_) => Err(Error::InvalidGroupIndex(
                "a key list is only valid as the top-level group() argument".to_owned(),
            )),
        }
    }

    /// Applies one per-member projection, wrapping collection subjects
    /// into a same-keyed map.
    fn project<F>(&self, f: F) -> Value
    where
        F: Fn(&GroupTable) -> Value,
    {
        match &self.data {
            MatchData::One(table) => f(table),
            MatchData::Many(members) => Value::Map(
                members
                    .iter()
                    .map(|(key, table)| (Key::Name(key.clone()), f(table)))
                    .collect(),
            ),
        }
    }

    /// The value of group `index` for one member: a scalar for a single
    /// match, a per-occurrence list in global mode. `one_shot` takes
    /// precedence over the persistent default for non-participating
    /// slots.
    fn group_value(&self, table: &GroupTable, index: usize, one_shot: Option<&Value>) -> Value {
        let substitute =
            || one_shot.cloned().unwrap_or_else(|| self.default.clone());
        let located = self.flags.has(Flags::OFFSET_CAPTURE);
        let slot_value = |slot: &Option<(String, usize)>| match slot {
            Some((text, offset)) => {
                if located {
                    Value::Located(text.clone(), *offset)
                } else {
                    Value::Text(text.clone())
                }
            }
            None => substitute(),
        };

        let occurrences = match table.groups.get(index) {
            Some(occurrences) => occurrences,
            None => return substitute(),
        };

        if self.is_global {
            Value::List(occurrences.iter().map(slot_value).collect())
        } else {
            match occurrences.first() {
                Some(slot) => slot_value(slot),
                None => substitute(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::modifiers::Flags;
    use crate::pattern::Pattern;
    use crate::regex::Regex;
    use crate::value::{Key, Value};
    use pretty_assertions::assert_eq;

    fn pattern(body: &str) -> Pattern {
        Pattern::create(body, Some("u"), None)
    }

    #[test]
    fn test_single_match_normalization() {
        let matches = Regex::find(&pattern("(\\d+)"), "Call 555-1212", Flags::NONE, 0).unwrap();

        assert!(matches.any());
        // exactly one capturing group: result() unwraps it
        assert_eq!(matches.result(), Value::text("555"));
        assert_eq!(
            matches.all(),
            Value::Map(vec![
                (Key::Index(0), Value::text("555")),
                (Key::Index(1), Value::text("555")),
            ])
        );
        assert_eq!(matches.count(), 2);
    }

    #[test]
    fn test_result_shapes() {
        // no capturing group: the full match
        let matches = Regex::find(&pattern("\\d+"), "Call 555-1212", Flags::NONE, 0).unwrap();
        assert_eq!(matches.result(), Value::text("555"));

        // two groups: group 0 plus both groups
        let matches =
            Regex::find(&pattern("(\\d+)-(\\d+)"), "Call 555-1212", Flags::NONE, 0).unwrap();
        assert_eq!(
            matches.result(),
            Value::list([
                Value::text("555-1212"),
                Value::text("555"),
                Value::text("1212"),
            ])
        );
    }

    #[test]
    fn test_named_and_indexed_parity() {
        let matches = Regex::find(
            &pattern("(?P<phone>\\d+)"),
            "555-1212 or 1212",
            Flags::NONE,
            0,
        )
        .unwrap();

        assert_eq!(
            matches.named_groups(),
            Value::Map(vec![(Key::from("phone"), Value::text("555"))])
        );
        assert_eq!(
            matches.indexed_groups(),
            Value::list([Value::text("555"), Value::text("555")])
        );
        // the combined view lists the name key directly before its ordinal
        assert_eq!(
            matches.all(),
            Value::Map(vec![
                (Key::Index(0), Value::text("555")),
                (Key::from("phone"), Value::text("555")),
                (Key::Index(1), Value::text("555")),
            ])
        );
    }

    #[test]
    fn test_global_match_collects_occurrences() {
        let matches =
            Regex::find_all(&pattern("(\\d+)"), "555-1212 or 1212", Flags::NONE, 0).unwrap();

        assert_eq!(
            matches.indexed_groups(),
            Value::list([
                Value::list([
                    Value::text("555"),
                    Value::text("1212"),
                    Value::text("1212"),
                ]),
                Value::list([
                    Value::text("555"),
                    Value::text("1212"),
                    Value::text("1212"),
                ]),
            ])
        );
    }

    #[test]
    fn test_offset_capture() {
        let matches = Regex::find(
            &pattern("(\\d+)"),
            "Call 555-1212",
            Flags::OFFSET_CAPTURE,
            0,
        )
        .unwrap();

        assert_eq!(matches.result(), Value::Located("555".to_owned(), 5));
    }

    #[test]
    fn test_match_offset_argument() {
        let matches = Regex::find(&pattern("\\d+"), "555-1212", Flags::NONE, 4).unwrap();
        assert_eq!(matches.result(), Value::text("1212"));
    }

    #[test]
    fn test_non_participating_group_defaults() {
        // the second alternative leaves group 1 non-participating
        let mut matches =
            Regex::find(&pattern("(?:(a)|b)"), "b", Flags::NONE, 0).unwrap();

        assert!(matches.any());
        assert_eq!(matches.get(1_usize, None, false).unwrap(), Value::Null);

        matches.set_default(Value::text("absent"));
        assert_eq!(
            matches.get(1_usize, None, false).unwrap(),
            Value::text("absent")
        );

        // a one-shot default takes precedence over the persistent one
        assert_eq!(
            matches.groups(Some(Value::text("-"))),
            Value::list([Value::text("-")])
        );
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let matches = Regex::find(&pattern("\\d+"), "no numbers here", Flags::NONE, 0).unwrap();
        assert!(!matches.any());
        assert!(!matches.has_match());
        assert_eq!(matches.result(), Value::Null);
    }

    #[test]
    fn test_get_errors() {
        let matches = Regex::find(&pattern("(\\d+)"), "555", Flags::NONE, 0).unwrap();

        // a well-formed but undeclared key
        assert_eq!(
            matches.get("missing", None, true),
            Err(Error::GroupDoesNotExist(Key::from("missing")))
        );
        assert_eq!(matches.get(7_usize, None, true), Err(Error::GroupDoesNotExist(Key::Index(7))));
        assert_eq!(
            matches.get(7_usize, Some(Value::text("x")), false).unwrap(),
            Value::text("x")
        );

        // numeric strings stay in the name key space
        assert_eq!(
            matches.get("1", None, true),
            Err(Error::GroupDoesNotExist(Key::from("1")))
        );

        // a nested key list is malformed
        let nested = Key::List(vec![Key::Index(0), Key::List(vec![Key::Index(1)])]);
        assert!(matches!(
            matches.get(nested, None, true),
            Err(Error::InvalidGroupIndex(_))
        ));
    }

    #[test]
    fn test_group_lookup() {
        let matches =
            Regex::find(&pattern("(\\d+)-(\\d+)"), "555-1212", Flags::NONE, 0).unwrap();

        assert_eq!(
            matches.group([Key::Index(1)]).unwrap(),
            Value::text("555")
        );
        assert_eq!(
            matches.group([Key::Index(2), Key::Index(1)]).unwrap(),
            Value::Map(vec![
                (Key::Index(2), Value::text("1212")),
                (Key::Index(1), Value::text("555")),
            ])
        );
        assert!(matches!(
            matches.group([Key::Index(9)]),
            Err(Error::GroupDoesNotExist(_))
        ));
    }

    #[test]
    fn test_named_group_strict_access() {
        let matches = Regex::find(
            &pattern("(?P<phone>\\d+)"),
            "555-1212",
            Flags::NONE,
            0,
        )
        .unwrap();

        assert_eq!(matches.named_group("phone").unwrap(), Value::text("555"));
        assert_eq!(
            matches.named_group("fax"),
            Err(Error::NamedGroupDoesntExist("fax".to_owned()))
        );
    }

    #[test]
    fn test_has() {
        let matches = Regex::find(
            &pattern("(?P<phone>\\d+)"),
            "555-1212",
            Flags::NONE,
            0,
        )
        .unwrap();

        assert!(matches.has(0_usize).unwrap());
        assert!(matches.has(1_usize).unwrap());
        assert!(matches.has("phone").unwrap());
        assert!(!matches.has(2_usize).unwrap());
        assert!(!matches.has("fax").unwrap());
        assert!(matches!(
            matches.has(Key::List(vec![])),
            Err(Error::InvalidGroupIndex(_))
        ));
    }

    #[test]
    fn test_iteration_ascends_numeric_indices() {
        let matches =
            Regex::find(&pattern("(\\d+)-(\\d+)"), "555-1212", Flags::NONE, 0).unwrap();

        let collected: Vec<Value> = matches.iter().collect();
        assert_eq!(
            collected,
            vec![
                Value::text("555-1212"),
                Value::text("555"),
                Value::text("1212"),
            ]
        );
    }

    #[test]
    fn test_collection_subject_preserves_keys() {
        let subject = vec![("home", "tel 111"), ("office", "tel 222"), ("none", "-")];
        let matches = Regex::find(&pattern("(\\d+)"), subject, Flags::NONE, 0).unwrap();

        assert!(matches.any());
        assert_eq!(
            matches.result(),
            Value::Map(vec![
                (Key::from("home"), Value::text("111")),
                (Key::from("office"), Value::text("222")),
                // a non-matching member keeps an empty-shaped entry
                (Key::from("none"), Value::Null),
            ])
        );
    }
}
