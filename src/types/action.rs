//! Action patterns, e.g. `payment.approve`, `security.*` or `*.view`.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PolicyError;

const WILDCARD: &str = "*";
const SEPARATOR: char = '.';

static VALID_ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*|[a-z][a-z0-9-]*)(\.(\*|[a-z][a-z0-9-]*))*$").expect("valid action grammar")
});

/// Which rule made an action pattern match a concrete action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionMatchKind {
    /// The pattern is `*`.
    Any,
    /// No wildcard, the strings are equal.
    Exact,
    /// `head.*`, the concrete action lives below the prefix.
    Prefix,
    /// `*.tail`, the concrete action ends in the tail after one leading segment.
    Suffix,
}

/// A dot-separated action, optionally wildcarded in its first or last segment.
///
/// Each segment is either `*` or matches `[a-z][a-z0-9-]*`. The same type is
/// used for stored patterns and for the concrete action being checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionPattern {
    value: String,
}

impl ActionPattern {
    /// Parse and validate an action pattern.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        if text.trim().is_empty() {
            debug!(event = "ActionPattern", phase = "Parse", "rejected blank action");
            return Err(PolicyError::validation("Action cannot be null or blank"));
        }
        if !VALID_ACTION.is_match(text) {
            debug!(event = "ActionPattern", phase = "Parse", action = text, "rejected action");
            return Err(PolicyError::validation(format!("Invalid action format: {text}")));
        }
        Ok(ActionPattern {
            value: text.to_string(),
        })
    }

    /// Skips validation; only for built-in patterns known to be well formed.
    pub(crate) fn new_unchecked(value: &str) -> Self {
        ActionPattern {
            value: value.to_string(),
        }
    }

    /// The pattern `*`, matching every action.
    pub fn wildcard_all() -> Self {
        ActionPattern {
            value: WILDCARD.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_wildcard_all(&self) -> bool {
        self.value == WILDCARD
    }

    /// Check whether this pattern covers the concrete `action`.
    pub fn matches(&self, action: &ActionPattern) -> bool {
        self.match_kind(action).is_some()
    }

    /// Like [`ActionPattern::matches`], but reports which rule matched.
    ///
    /// Wildcards embedded in the middle of a pattern are only ever compared
    /// literally, so in practice they never match.
    pub fn match_kind(&self, action: &ActionPattern) -> Option<ActionMatchKind> {
        if self.is_wildcard_all() {
            return Some(ActionMatchKind::Any);
        }

        let pattern: Vec<&str> = self.value.split(SEPARATOR).collect();
        let concrete: Vec<&str> = action.value.split(SEPARATOR).collect();

        match (pattern.first(), pattern.last()) {
            (Some(&WILDCARD), _) => (concrete.len() >= 2 && concrete[1..] == pattern[1..])
                .then_some(ActionMatchKind::Suffix),
            (_, Some(&WILDCARD)) => {
                let prefix = &pattern[..pattern.len() - 1];
                (concrete.len() > prefix.len() && concrete[..prefix.len()] == *prefix)
                    .then_some(ActionMatchKind::Prefix)
            }
            _ => (self.value == action.value).then_some(ActionMatchKind::Exact),
        }
    }
}

impl Display for ActionPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}

impl FromStr for ActionPattern {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionPattern::parse(s)
    }
}

impl TryFrom<String> for ActionPattern {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ActionPattern::parse(&value)
    }
}

impl From<ActionPattern> for String {
    fn from(action: ActionPattern) -> Self {
        action.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::{assert_json_snapshot, assert_snapshot};
    use yare::parameterized;

    fn action(s: &str) -> ActionPattern {
        ActionPattern::parse(s).unwrap()
    }

    #[parameterized(
        two_segments = { "service.create" },
        payment = { "payment.process" },
        three_segments = { "security.admin.manage" },
        hyphenated = { "service-group.service.resource.operation" },
        multi_word = { "multi-word-service.create" },
        single_segment = { "admin" },
        digits = { "v2.create" },
        wildcard_all = { "*" },
        suffix_wildcard = { "*.create" },
        prefix_wildcard = { "service.*" },
        double_wildcard = { "*.*.create" },
    )]
    fn test_parse_accepts(input: &str) {
        assert_eq!(action(input).value(), input);
    }

    #[parameterized(
        empty = { "" },
        spaces = { "   " },
        uppercase = { "Service.Create" },
        leading_digit = { "123service.create" },
        inner_space = { "service .create" },
        special_char = { "service@create" },
        trailing_dot = { "service." },
        leading_dot = { ".service" },
        empty_segment = { "service..create" },
        partial_wildcard = { "serv*.create" },
        underscore = { "service_group.create" },
    )]
    fn test_parse_rejects(input: &str) {
        let err = ActionPattern::parse(input).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[test]
    fn test_blank_message() {
        let err = ActionPattern::parse(" ").unwrap_err();
        assert!(err.to_string().contains("Action cannot be null or blank"));
    }

    #[test]
    fn test_invalid_format_message_echoes_input() {
        let err = ActionPattern::parse("Service.Create").unwrap_err();
        assert_snapshot!(err.to_string(), @"Validation error: Invalid action format: Service.Create");
    }

    #[test]
    fn test_wildcard_all_factory() {
        let all = ActionPattern::wildcard_all();
        assert_eq!(all.value(), "*");
        assert!(all.is_wildcard_all());
        assert_eq!(all, action("*"));
    }

    #[parameterized(
        exact = { "service.create", "service.create", Some(ActionMatchKind::Exact) },
        exact_multi_segment = { "security.admin.users.create", "security.admin.users.create", Some(ActionMatchKind::Exact) },
        exact_single_segment = { "admin", "admin", Some(ActionMatchKind::Exact) },
        exact_different = { "service.create", "service.delete", None },
        any_two = { "*", "service.create", Some(ActionMatchKind::Any) },
        any_deep = { "*", "any.random.action.here", Some(ActionMatchKind::Any) },
        any_single = { "*", "admin", Some(ActionMatchKind::Any) },
        suffix = { "*.create", "service.create", Some(ActionMatchKind::Suffix) },
        suffix_payment = { "*.approve", "transaction.approve", Some(ActionMatchKind::Suffix) },
        suffix_other_operation = { "*.create", "service.delete", None },
        suffix_single_segment = { "*.create", "create", None },
        suffix_replaces_one_segment = { "*.create", "security.admin.create", None },
        suffix_multi_tail = { "*.users.create", "admin.users.create", Some(ActionMatchKind::Suffix) },
        suffix_multi_tail_mismatch = { "*.users.create", "admin.roles.create", None },
        prefix = { "service.*", "service.create", Some(ActionMatchKind::Prefix) },
        prefix_nested = { "service.*", "service.admin.users.create", Some(ActionMatchKind::Prefix) },
        prefix_security = { "security.*", "security.roles.assign", Some(ActionMatchKind::Prefix) },
        prefix_other = { "service.*", "payment.create", None },
        prefix_needs_segment = { "service.*", "service", None },
        prefix_partial_token = { "service.*", "services.create", None },
        prefix_two_levels = { "security.admin.*", "security.admin.users", Some(ActionMatchKind::Prefix) },
        prefix_two_levels_mismatch = { "security.admin.*", "security.users.admin", None },
        middle_wildcard = { "service.*.create", "service.users.create", None },
    )]
    fn test_match_kind(pattern: &str, concrete: &str, expected: Option<ActionMatchKind>) {
        let pattern = action(pattern);
        let concrete = action(concrete);
        assert_eq!(pattern.match_kind(&concrete), expected);
        assert_eq!(pattern.matches(&concrete), expected.is_some());
    }

    #[test]
    fn test_wildcard_all_matches_everything() {
        let all = ActionPattern::wildcard_all();
        for concrete in ["a", "service.create", "service-group.service.resource.operation"] {
            assert!(all.matches(&action(concrete)));
        }
    }

    #[test]
    fn test_equality_and_hash() {
        use std::collections::HashSet;

        let set: HashSet<ActionPattern> = [action("service.create"), action("service.create")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
        assert_ne!(action("service.create"), action("service.delete"));
    }

    #[test]
    fn test_from_str_and_display() {
        let parsed: ActionPattern = "payment.*".parse().unwrap();
        assert_eq!(parsed.to_string(), "payment.*");
    }

    #[test]
    fn test_serialization_round_trip() {
        let pattern = action("*.approve");
        assert_json_snapshot!(pattern, @r#""*.approve""#);
        let back: ActionPattern = serde_json::from_value(serde_json::json!("*.approve")).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn test_deserialization_validates() {
        let result = serde_json::from_value::<ActionPattern>(serde_json::json!("Bad.Action"));
        assert!(result.is_err());
    }
}
