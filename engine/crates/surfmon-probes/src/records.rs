//! Keyed records parsed from line-oriented captures

use std::collections::HashMap;

/// Ordered collection of records keyed by a string.
///
/// Order is first-insertion order; a repeated key replaces the earlier value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Records<T> {
    items: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Records<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => self.items[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.items.len());
                self.items.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&pos| &self.items[pos].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parse one record per non-blank line; lines the parser rejects are skipped
    pub fn from_lines<F>(raw: &str, mut parse_line: F) -> Self
    where
        F: FnMut(&str) -> Option<(String, T)>,
    {
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| parse_line(l))
            .collect()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Records<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut records = Records::new();
        for (k, v) in iter {
            records.insert(k, v);
        }
        records
    }
}

/// Difference between an older and a newer set of records
#[derive(Debug)]
pub struct RecordDiff<'a, T> {
    /// Keys only in the newer set, in newer order
    pub added: Vec<(&'a str, &'a T)>,
    /// Keys only in the older set, in older order
    pub removed: Vec<(&'a str, &'a T)>,
    /// Keys in both whose values differ, in newer order: (key, old, new)
    pub modified: Vec<(&'a str, &'a T, &'a T)>,
}

impl<'a, T: PartialEq> RecordDiff<'a, T> {
    pub fn between(old: &'a Records<T>, new: &'a Records<T>) -> Self {
        let mut added = Vec::new();
        let mut modified = Vec::new();
        for (key, value) in new.iter() {
            match old.get(key) {
                None => added.push((key, value)),
                Some(prev) if prev != value => modified.push((key, prev, value)),
                Some(_) => {}
            }
        }

        let removed = old.iter().filter(|(key, _)| !new.contains(key)).collect();

        Self {
            added,
            removed,
            modified,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// First non-blank line of a capture, trimmed
pub fn first_line(raw: &str) -> Option<String> {
    raw.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &str) -> Records<()> {
        Records::from_lines(raw, |l| Some((l.to_string(), ())))
    }

    #[test]
    fn test_from_lines_skips_blank_and_rejected() {
        let records: Records<u32> = Records::from_lines("a 1\n\n  b 2 \nc x\n", |l| {
            let (k, v) = l.split_once(' ')?;
            Some((k.to_string(), v.parse().ok()?))
        });

        assert_eq!(records.len(), 2);
        assert_eq!(records.get("b"), Some(&2));
        assert!(!records.contains("c"));
    }

    #[test]
    fn test_repeated_key_replaces_in_place() {
        let records: Records<u32> = [("x", 1), ("y", 2), ("x", 3)].into_iter().collect();
        let keys: Vec<_> = records.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(records.get("x"), Some(&3));
    }

    #[test]
    fn test_diff_orders() {
        let old = names("a\nb\nc");
        let new = names("d\nc\ne");
        let diff = RecordDiff::between(&old, &new);

        let added: Vec<_> = diff.added.iter().map(|(k, _)| *k).collect();
        let removed: Vec<_> = diff.removed.iter().map(|(k, _)| *k).collect();
        assert_eq!(added, vec!["d", "e"]);
        assert_eq!(removed, vec!["a", "b"]);
        assert!(diff.modified.is_empty());
    }

    #[test]
    fn test_diff_modified() {
        let old: Records<u32> = [("a", 1), ("b", 2)].into_iter().collect();
        let new: Records<u32> = [("b", 3), ("a", 1)].into_iter().collect();
        let diff = RecordDiff::between(&old, &new);

        assert_eq!(diff.modified, vec![("b", &2, &3)]);
        assert!(diff.added.is_empty() && diff.removed.is_empty());
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  Linux 6.1 \nmore"), Some("Linux 6.1".to_string()));
        assert_eq!(first_line("  \n"), None);
    }
}
