//! Resource patterns: one glob, or a comma-separated list of globs.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PolicyError;

const WILDCARD: &str = "*";
const LIST_SEPARATOR: char = ',';

/// A single glob, where `*` stands for any run of characters, line breaks included.
#[derive(Debug, Clone)]
struct Glob {
    pattern: String,
    /// The literal text between the stars; a pattern without `*` has one part.
    parts: Vec<String>,
}

impl Glob {
    fn new(pattern: &str) -> Self {
        Glob {
            pattern: pattern.to_string(),
            parts: pattern.split('*').map(str::to_string).collect(),
        }
    }

    /// The first part anchors the start, the last part anchors the end, and the
    /// parts in between are found left to right in what remains.
    fn is_match(&self, candidate: &str) -> bool {
        let Some((first, rest)) = self.parts.split_first() else {
            return false;
        };
        let Some((last, middle)) = rest.split_last() else {
            return candidate == first;
        };
        let Some(remaining) = candidate.strip_prefix(first.as_str()) else {
            return false;
        };
        let Some(mut remaining) = remaining.strip_suffix(last.as_str()) else {
            return false;
        };

        for part in middle.iter().filter(|p| !p.is_empty()) {
            match remaining.find(part.as_str()) {
                Some(pos) => remaining = &remaining[pos + part.len()..],
                None => return false,
            }
        }
        true
    }
}

/// The resources a policy applies to, e.g. `payment:*` or
/// `account:1, account:2`.
///
/// Any non-blank string is accepted. Globs are split once here and matched
/// case-sensitively against the whole candidate, in time linear in its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePattern {
    value: String,
    globs: Vec<Glob>,
}

impl ResourcePattern {
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        if text.trim().is_empty() {
            debug!(event = "ResourcePattern", phase = "Parse", "rejected blank resource");
            return Err(PolicyError::validation("Resource cannot be null or blank"));
        }

        let globs = text
            .split(LIST_SEPARATOR)
            .map(|p| Glob::new(p.trim()))
            .collect();

        Ok(ResourcePattern {
            value: text.to_string(),
            globs,
        })
    }

    /// Join resource identifiers into a list pattern (`a, b, c`).
    pub fn of_list<I, S>(identifiers: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = identifiers
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .join(", ");
        ResourcePattern::parse(&joined)
    }

    /// The pattern `*`, matching every resource.
    pub fn wildcard_all() -> Self {
        ResourcePattern {
            value: WILDCARD.to_string(),
            globs: vec![Glob::new(WILDCARD)],
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_wildcard_all(&self) -> bool {
        self.value == WILDCARD
    }

    /// The trimmed sub-patterns, in the order written, duplicates included.
    pub fn patterns(&self) -> Vec<&str> {
        self.globs.iter().map(|g| g.pattern.as_str()).collect()
    }

    /// True if any sub-pattern matches `candidate` in full.
    pub fn matches(&self, candidate: &str) -> bool {
        self.is_wildcard_all() || self.globs.iter().any(|g| g.is_match(candidate))
    }
}

impl PartialEq for ResourcePattern {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ResourcePattern {}

impl Hash for ResourcePattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl Display for ResourcePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}

impl FromStr for ResourcePattern {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourcePattern::parse(s)
    }
}

impl TryFrom<String> for ResourcePattern {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResourcePattern::parse(&value)
    }
}

impl From<ResourcePattern> for String {
    fn from(resource: ResourcePattern) -> Self {
        resource.value
    }
}
