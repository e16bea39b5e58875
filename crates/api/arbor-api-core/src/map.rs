//! Ordered key/value container for `PropertyValue`. Keys are strings or
//! integer tokens; insertion order is preserved.

use serde::{Deserialize, Serialize};

use crate::value::PropertyValue;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MapKey {
    Str(String),
    Token(i32),
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

impl From<i32> for MapKey {
    fn from(t: i32) -> Self {
        MapKey::Token(t)
    }
}

/// Insertion-ordered map. Entry count stays small in practice, so lookup is a
/// linear scan over a pair vector.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PropertyMap {
    entries: Vec<(MapKey, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: PropertyValue) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &MapKey) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| if k == key { Some(v) } else { None })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(MapKey, PropertyValue)> {
        self.entries.iter()
    }
}
