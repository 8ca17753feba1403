//! Subjects a policy applies to: users, groups and roles.
//!
//! URN forms:
//! - `user:550e8400-e29b-41d4-a716-446655440000`
//! - `group:7c9e6679-7425-40de-944b-e07fc1f90ae7`
//! - `role:SECURITY_ADMIN`
//!
//! The kind prefix is parsed case-insensitively; the identifier is kept
//! exactly as supplied.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};
use tracing::debug;
use uuid::Uuid;

use crate::error::PolicyError;

static ROLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid role name grammar"));

/// Length of the hyphenated 8-4-4-4-12 UUID form.
const HYPHENATED_UUID_LEN: usize = 36;

const URN_SEPARATOR: char = ':';

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectKind {
    User,
    Group,
    Role,
}

impl SubjectKind {
    fn validate(self, identifier: &str) -> Result<(), PolicyError> {
        match self {
            SubjectKind::User | SubjectKind::Group => {
                if identifier.len() != HYPHENATED_UUID_LEN || Uuid::parse_str(identifier).is_err() {
                    return Err(PolicyError::validation(format!(
                        "Invalid UUID for {self}: {identifier}"
                    )));
                }
            }
            SubjectKind::Role => {
                if !ROLE_NAME.is_match(identifier) {
                    return Err(PolicyError::validation(format!("Invalid role name: {identifier}")));
                }
            }
        }
        Ok(())
    }
}

/// A typed reference to a principal. Equal iff kind and identifier are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectRef {
    kind: SubjectKind,
    identifier: String,
}

impl SubjectRef {
    /// Build a subject, checking the identifier against the kind's grammar.
    pub fn new(kind: SubjectKind, identifier: impl Into<String>) -> Result<Self, PolicyError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            debug!(event = "SubjectRef", phase = "Parse", kind = %kind, "rejected blank identifier");
            return Err(PolicyError::validation(
                "Subject identifier cannot be null or blank",
            ));
        }
        if let Err(e) = kind.validate(&identifier) {
            debug!(event = "SubjectRef", phase = "Parse", kind = %kind, identifier = %identifier, "rejected identifier");
            return Err(e);
        }
        Ok(SubjectRef { kind, identifier })
    }

    /// Skips validation; only for identifiers known to satisfy the grammar.
    pub(crate) fn new_unchecked(kind: SubjectKind, identifier: impl Into<String>) -> Self {
        SubjectRef {
            kind,
            identifier: identifier.into(),
        }
    }

    /// A user subject, from a [`Uuid`] or its string form.
    pub fn user(id: impl ToString) -> Result<Self, PolicyError> {
        SubjectRef::new(SubjectKind::User, id.to_string())
    }

    /// A group subject, from a [`Uuid`] or its string form.
    pub fn group(id: impl ToString) -> Result<Self, PolicyError> {
        SubjectRef::new(SubjectKind::Group, id.to_string())
    }

    /// A role subject; names look like `SECURITY_ADMIN`.
    pub fn role(name: impl Into<String>) -> Result<Self, PolicyError> {
        SubjectRef::new(SubjectKind::Role, name)
    }

    /// Parse `kind:identifier`.
    pub fn from_urn(text: &str) -> Result<Self, PolicyError> {
        let Some((prefix, identifier)) = text.split_once(URN_SEPARATOR) else {
            debug!(event = "SubjectRef", phase = "Parse", urn = text, "rejected urn");
            return Err(PolicyError::validation(format!("Invalid subject URN: {text}")));
        };
        let kind = SubjectKind::from_str(prefix).map_err(|_| {
            PolicyError::validation(format!("Unknown subject type: {prefix}"))
        })?;
        SubjectRef::new(kind, identifier)
    }

    pub fn to_urn(&self) -> String {
        format!("{}{URN_SEPARATOR}{}", self.kind, self.identifier)
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Display for SubjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_urn())
    }
}

impl FromStr for SubjectRef {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectRef::from_urn(s)
    }
}

impl TryFrom<String> for SubjectRef {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubjectRef::from_urn(&value)
    }
}

impl From<SubjectRef> for String {
    fn from(subject: SubjectRef) -> Self {
        subject.to_urn()
    }
}
