//! Field-name wildcard patterns
//!
//! `*` matches any sequence and `?` a single character; everything else is
//! literal. Patterns only anchor at the start, so `"count"` also matches
//! `"count_total"`.

use crate::error::{DataError, DataResult};
use regex::Regex;

/// Set of compiled patterns; matches when any pattern matches
#[derive(Debug, Clone, Default)]
pub struct WildcardSet {
    patterns: Vec<Regex>,
}

impl WildcardSet {
    pub fn new<I, S>(specs: I) -> DataResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = specs
            .into_iter()
            .map(|spec| compile(spec.as_ref()))
            .collect::<DataResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Use regular expressions as they are
    pub fn from_regexes(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    pub fn is_match(&self, field: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(field))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Translate a wildcard spec into a start-anchored regular expression source
pub fn glob_to_regex(spec: &str) -> String {
    let mut source = String::with_capacity(spec.len() + 4);
    source.push('^');
    for c in spec.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source
}

fn compile(spec: &str) -> DataResult<Regex> {
    Regex::new(&glob_to_regex(spec)).map_err(|source| DataError::InvalidPattern {
        pattern: spec.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_to_regex() {
        assert_eq!(glob_to_regex("*"), "^.*");
        assert_eq!(glob_to_regex("a?c"), "^a.c");
        assert_eq!(glob_to_regex("a.b*"), r"^a\.b.*");
    }

    #[test]
    fn test_every_wildcard_is_replaced() {
        let set = WildcardSet::new(["*_*_total"]).unwrap();
        assert!(set.is_match("a_b_total"));
        assert!(!set.is_match("a_total"));
    }

    #[test]
    fn test_prefix_anchored() {
        let set = WildcardSet::new(["count"]).unwrap();
        assert!(set.is_match("count"));
        assert!(set.is_match("count_total"));
        assert!(!set.is_match("total_count"));
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        let set = WildcardSet::new(["a.b"]).unwrap();
        assert!(set.is_match("a.b"));
        assert!(!set.is_match("axb"));
    }

    #[test]
    fn test_any_pattern_matches() {
        let set = WildcardSet::new(["x", "y?"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_match("x"));
        assert!(set.is_match("yz"));
        assert!(!set.is_match("z"));
        assert!(!WildcardSet::default().is_match("x"));
    }

    #[test]
    fn test_from_regexes() {
        let set = WildcardSet::from_regexes(vec![Regex::new("_sum$").unwrap()]);
        assert!(set.is_match("a_sum"));
        assert!(!set.is_empty());
    }
}
