//! Text criteria for harness filters.

use crate::result::HarnessResult;
use regex::Regex;
use std::fmt;

/// A criterion compared against a piece of text read from the tree
#[derive(Clone)]
pub enum TextPattern {
    /// Exact string equality
    Exact(String),
    /// Regex search over the whole text (unanchored, like `RegExp.test`)
    Regex(Regex),
    /// Matches only when the value is missing
    Absent,
}

impl TextPattern {
    /// Exact-match criterion
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Compile a regex criterion
    pub fn regex(pattern: &str) -> HarnessResult<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// Test a value against this criterion
    #[must_use]
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match (self, actual) {
            (Self::Exact(expected), Some(actual)) => expected == actual,
            (Self::Regex(re), Some(actual)) => re.is_match(actual),
            (Self::Absent, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text:?}"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
            Self::Absent => write!(f, "null"),
        }
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<&str> for TextPattern {
    fn from(text: &str) -> Self {
        Self::exact(text)
    }
}

impl From<String> for TextPattern {
    fn from(text: String) -> Self {
        Self::Exact(text)
    }
}

impl From<Regex> for TextPattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

/// Compare a value against an optional criterion.
///
/// An unset criterion is satisfied by anything.
#[must_use]
pub fn string_matches(actual: Option<&str>, pattern: Option<&TextPattern>) -> bool {
    pattern.map_or(true, |pattern| pattern.matches(actual))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_is_not_substring() {
        let pattern = TextPattern::from("Save");
        assert!(pattern.matches(Some("Save")));
        assert!(!pattern.matches(Some("Save all")));
        assert!(!pattern.matches(Some("save")));
        assert!(!pattern.matches(None));
    }

    #[test]
    fn test_regex_searches_full_text() {
        let pattern = TextPattern::regex("av").unwrap();
        assert!(pattern.matches(Some("Save")));
        let anchored = TextPattern::regex("^S.*e$").unwrap();
        assert!(anchored.matches(Some("Save")));
        assert!(!anchored.matches(Some("Saved")));
        assert!(!anchored.matches(None));
    }

    #[test]
    fn test_absent_matches_only_missing() {
        assert!(TextPattern::Absent.matches(None));
        assert!(!TextPattern::Absent.matches(Some("")));
    }

    #[test]
    fn test_unset_is_vacuous() {
        assert!(string_matches(None, None));
        assert!(string_matches(Some("anything"), None));
    }

    #[test]
    fn test_invalid_regex_is_error() {
        assert!(TextPattern::regex("[").is_err());
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", TextPattern::from("Save")), "\"Save\"");
        assert_eq!(format!("{}", TextPattern::regex("a+").unwrap()), "/a+/");
        assert_eq!(format!("{:?}", TextPattern::Absent), "null");
    }
}
