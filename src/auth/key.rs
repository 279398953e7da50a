use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Canonical identifier used for usernames, resource keys and privilege
/// tokens.
///
/// Every textual input goes through one of the `From` impls below, so `"get"`,
/// `String::from("get")` and an existing `Key` all land on the same value.
/// Case is preserved and nothing is trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(value: impl Into<Key>) -> Self {
        value.into()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key(value.clone())
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

impl From<Key> for String {
    fn from(value: Key) -> Self {
        value.0
    }
}

// Lets `HashMap<Key, _>` and `HashSet<Key>` be queried with a plain `&str`.
impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Key {
    fn eq(
        &self,
        other: &str,
    ) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(
        &self,
        other: &&str,
    ) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Key {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_all_textual_inputs_normalize_to_same_key() {
        let owned = String::from("channel_set");
        let a = Key::from("channel_set");
        let b = Key::from(owned.clone());
        let c = Key::from(&owned);
        let d = Key::new(&a);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(c, d);
    }

    #[test]
    fn test_case_and_whitespace_preserved() {
        assert_ne!(Key::from("Admin"), Key::from("admin"));
        assert_ne!(Key::from(" admin"), Key::from("admin"));
        assert_eq!(Key::from("Admin").as_str(), "Admin");
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Key::from("test"), 1);
        assert_eq!(map.get("test"), Some(&1));
        assert_eq!(map.get("toast"), None);
    }

    #[test]
    fn test_empty_key() {
        assert!(Key::default().is_empty());
        assert!(Key::from("").is_empty());
        assert!(!Key::from("x").is_empty());
    }

    #[test]
    fn test_serde_is_transparent() {
        let key: Key = serde_json::from_str("\"foo\"").unwrap();
        assert_eq!(key, "foo");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"foo\"");
    }
}
