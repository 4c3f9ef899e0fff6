use formwork_domain::constants::PATH_SEPARATOR;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Validation messages keyed by field path.
///
/// Paths keep the order they were first reported in until a contract orders them
/// by property declaration.
///
/// Nested failures use dotted paths (`hit.rating`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: Vec<(String, Vec<String>)>,
}

impl Errors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` under `path`.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some((_, messages)) => messages.push(message),
            None => self.entries.push((path, vec![message])),
        }
    }

    /// Merges `nested` under `prefix`, skipping messages already recorded for the same path.
    pub fn merge_nested(&mut self, prefix: &str, nested: &Self) {
        for (path, messages) in &nested.entries {
            let full = format!("{prefix}{PATH_SEPARATOR}{path}");
            for message in messages {
                if !self.get(&full).is_some_and(|m| m.contains(message)) {
                    self.add(full.clone(), message.clone());
                }
            }
        }
    }

    /// Appends every entry of `other` unchanged.
    pub fn extend(&mut self, other: Self) {
        for (path, messages) in other.entries {
            for message in messages {
                self.add(path.clone(), message);
            }
        }
    }

    /// Stable sort of the paths by the rank of their first segment.
    pub(crate) fn order_by<F>(&mut self, mut rank: F)
    where
        F: FnMut(&str) -> usize,
    {
        self.entries.sort_by_cached_key(|(path, _)| {
            rank(path.split(PATH_SEPARATOR).next().unwrap_or(path.as_str()))
        });
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries.iter().find(|(p, _)| p == path).map(|(_, m)| m.as_slice())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failing paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(p, m)| (p.as_str(), m.as_slice()))
    }

    /// Failing paths in report order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Sorted snapshot, convenient for comparisons.
    #[must_use]
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.entries.iter().cloned().collect()
    }

    /// `"<path> <message>"` for every message.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(path, messages)| messages.iter().map(move |m| format!("{path} {m}")))
            .collect()
    }
}

impl Serialize for Errors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, messages) in &self.entries {
            map.serialize_entry(path, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_groups_messages_by_path_in_report_order() {
        let mut errors = Errors::new();
        errors.add("title", "can't be blank");
        errors.add("rating", "is not a number");
        errors.add("title", "is too short (minimum is 2 characters)");

        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["title", "rating"]);
        assert_eq!(errors.get("title").map(<[String]>::len), Some(2));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn merge_nested_prefixes_and_skips_repeats() {
        let mut nested = Errors::new();
        nested.add("title", "can't be blank");

        let mut errors = Errors::new();
        errors.merge_nested("songs", &nested);
        errors.merge_nested("songs", &nested);

        assert_eq!(errors.get("songs.title"), Some(&["can't be blank".to_owned()][..]));
        assert_eq!(errors.full_messages(), vec!["songs.title can't be blank".to_owned()]);
    }

    #[test]
    fn order_by_ranks_the_first_segment_and_keeps_ties_stable() {
        let mut errors = Errors::new();
        errors.add("year", "is not a valid integer");
        errors.add("title", "can't be blank");
        errors.add("hit", "is invalid");
        errors.add("hit.title", "can't be blank");

        let order = ["hit", "title", "year"];
        errors.order_by(|head| order.iter().position(|n| *n == head).unwrap_or(order.len()));

        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["hit", "hit.title", "title", "year"]);
    }

    #[test]
    fn serializes_as_json_object() {
        let mut errors = Errors::new();
        errors.add("hit.title", "can't be blank");

        let json = serde_json::to_value(&errors).expect("errors serialize");
        assert_eq!(json, serde_json::json!({ "hit.title": ["can't be blank"] }));
    }
}
