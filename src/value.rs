// Copyright (c) 2025 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions.
// For more details, see the LICENSE, LICENSE.additional, and CONTRIBUTING files.

//! The shared value model of match results.
//!
//! The underlying engine produces heterogeneous shapes: a single match or
//! a list of matches, a scalar subject or a keyed collection of subjects,
//! bare text or (text, offset) pairs. Everything is normalized into the
//! one tagged `Value` representation so that accessors never branch on
//! the raw shape.

use std::fmt::Display;

/// A capture-group lookup key.
///
/// Integer and string keys are two distinct key spaces: `Key::Name("2")`
/// never resolves to group 2. A `List` is only meaningful as the
/// top-level argument of a multi-group lookup; nested anywhere else it is
/// rejected as an invalid group index.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Index(usize),
    Name(String),
    List(Vec<Key>),
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_owned())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<Vec<Key>> for Key {
    fn from(keys: Vec<Key>) -> Self {
        Key::List(keys)
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Index(index) => write!(f, "{}", index),
            Key::Name(name) => f.write_str(name),
            Key::List(keys) => {
                let items: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// One normalized result value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A group that did not participate in the match (or a caller-supplied
    /// default standing in for one).
    Null,
    /// A captured text.
    Text(String),
    /// A captured text paired with its starting byte offset, produced
    /// under the offset-capture flag.
    Located(String, usize),
    /// An ordered list, e.g. the per-occurrence values of a group in a
    /// global match.
    List(Vec<Value>),
    /// An ordered key/value mapping, e.g. named groups or per-subject
    /// results of a collection subject.
    Map(Vec<(Key, Value)>),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Value {
        Value::Text(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The captured text of a `Text` or `Located` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            Value::Located(text, _) => Some(text),
            _ => None,
        }
    }

    /// The captured text, with `Null` reading as an empty string. This is
    /// the convenient form inside replacement callbacks.
    pub fn text_or_empty(&self) -> &str {
        self.as_text().unwrap_or("")
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up an entry of a `Map` value.
    pub fn entry(&self, key: &Key) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries
                .iter()
                .find(|(entry_key, _)| entry_key == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

/// A subject (or replacement result): a scalar string, an ordered list,
/// or an ordered string-keyed mapping. Collection shapes are preserved
/// through every operation, including the original keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    Text(String),
    List(Vec<String>),
    Map(Vec<(String, String)>),
}

impl Subject {
    pub fn is_collection(&self) -> bool {
        !matches!(self, Subject::Text(_))
    }

    /// The members of the subject as (key, text) pairs. A scalar subject
    /// has no keys and yields nothing.
    pub fn members(&self) -> Vec<(String, &str)> {
        match self {
            Subject::Text(_) => Vec::new(),
            Subject::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, text)| (index.to_string(), text.as_str()))
                .collect(),
            Subject::Map(entries) => entries
                .iter()
                .map(|(key, text)| (key.clone(), text.as_str()))
                .collect(),
        }
    }
}

impl From<&str> for Subject {
    fn from(text: &str) -> Self {
        Subject::Text(text.to_owned())
    }
}

impl From<String> for Subject {
    fn from(text: String) -> Self {
        Subject::Text(text)
    }
}

impl From<Vec<String>> for Subject {
    fn from(items: Vec<String>) -> Self {
        Subject::List(items)
    }
}

impl From<Vec<&str>> for Subject {
    fn from(items: Vec<&str>) -> Self {
        Subject::List(items.into_iter().map(|item| item.to_owned()).collect())
    }
}

impl From<Vec<(String, String)>> for Subject {
    fn from(entries: Vec<(String, String)>) -> Self {
        Subject::Map(entries)
    }
}

impl From<Vec<(&str, &str)>> for Subject {
    fn from(entries: Vec<(&str, &str)>) -> Self {
        Subject::Map(
            entries
                .into_iter()
                .map(|(key, text)| (key.to_owned(), text.to_owned()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, Subject, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_spaces_are_distinct() {
        assert_ne!(Key::from(2_usize), Key::from("2"));
        assert_eq!(Key::from("phone"), Key::Name("phone".to_owned()));
    }

    #[test]
    fn test_value_text_access() {
        assert_eq!(Value::text("abc").as_text(), Some("abc"));
        assert_eq!(Value::Located("abc".to_owned(), 7).as_text(), Some("abc"));
        assert_eq!(Value::Null.as_text(), None);
        assert_eq!(Value::Null.text_or_empty(), "");
    }

    #[test]
    fn test_map_entry_lookup() {
        let map = Value::Map(vec![
            (Key::from(0_usize), Value::text("whole")),
            (Key::from("phone"), Value::text("555")),
        ]);
        assert_eq!(map.entry(&Key::from("phone")), Some(&Value::text("555")));
        assert_eq!(map.entry(&Key::from(1_usize)), None);
    }

    #[test]
    fn test_subject_members_keep_keys() {
        let subject = Subject::from(vec![("home", "a"), ("office", "b")]);
        let members = subject.members();
        assert_eq!(members[0], ("home".to_owned(), "a"));
        assert_eq!(members[1], ("office".to_owned(), "b"));

        let subject = Subject::from(vec!["x", "y"]);
        let members = subject.members();
        assert_eq!(members[0], ("0".to_owned(), "x"));
        assert_eq!(members[1], ("1".to_owned(), "y"));
    }
}
