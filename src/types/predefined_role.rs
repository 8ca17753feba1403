//! Built-in roles and their default action patterns.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

use crate::error::PolicyError;

use super::action::ActionPattern;
use super::subject::{SubjectKind, SubjectRef};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredefinedRole {
    SecurityAdmin,
    ServiceAdmin,
    Reader,
    Creator,
    Approver,
}

impl PredefinedRole {
    /// The role name as it appears in `role:` URNs, e.g. `SECURITY_ADMIN`.
    pub fn role_name(&self) -> &'static str {
        self.into()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SecurityAdmin => "All security-related actions",
            Self::ServiceAdmin => "Full access to all services and settings",
            Self::Reader => "View all resources",
            Self::Creator => "Create, update, and delete resources",
            Self::Approver => "Approve pending items",
        }
    }

    fn raw_action_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::SecurityAdmin => &["security.*"],
            Self::ServiceAdmin => &["*"],
            Self::Reader => &["*.view"],
            Self::Creator => &["*.create", "*.update", "*.delete"],
            Self::Approver => &["*.approve"],
        }
    }

    /// Default action patterns granted by this role.
    pub fn action_patterns(&self) -> Vec<ActionPattern> {
        self.raw_action_patterns()
            .iter()
            .copied()
            .map(ActionPattern::new_unchecked)
            .collect()
    }

    /// The `role:<NAME>` subject for this role.
    pub fn subject(&self) -> SubjectRef {
        SubjectRef::new_unchecked(SubjectKind::Role, self.role_name())
    }

    /// Look up a role by its exact name.
    pub fn from_name(name: &str) -> Result<Self, PolicyError> {
        PredefinedRole::from_str(name).map_err(|_| PolicyError::UnknownRole(name.to_string()))
    }

    pub fn is_predefined(name: &str) -> bool {
        PredefinedRole::from_str(name).is_ok()
    }

    pub fn all() -> impl Iterator<Item = PredefinedRole> {
        PredefinedRole::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        security_admin = { PredefinedRole::SecurityAdmin, "SECURITY_ADMIN", &["security.*"] },
        service_admin = { PredefinedRole::ServiceAdmin, "SERVICE_ADMIN", &["*"] },
        reader = { PredefinedRole::Reader, "READER", &["*.view"] },
        creator = { PredefinedRole::Creator, "CREATOR", &["*.create", "*.update", "*.delete"] },
        approver = { PredefinedRole::Approver, "APPROVER", &["*.approve"] },
    )]
    fn test_role_table(role: PredefinedRole, name: &str, patterns: &[&str]) {
        assert_eq!(role.role_name(), name);
        assert_eq!(role.to_string(), name);
        assert_eq!(PredefinedRole::from_name(name).unwrap(), role);
        assert!(PredefinedRole::is_predefined(name));
        let granted = role.action_patterns();
        let actual: Vec<&str> = granted.iter().map(|p| p.value()).collect();
        assert_eq!(actual, patterns);
        assert_eq!(role.subject().to_urn(), format!("role:{name}"));
    }

    #[parameterized(
        unknown = { "AUDITOR" },
        lowercase = { "reader" },
        empty = { "" },
    )]
    fn test_from_name_rejects(name: &str) {
        assert_eq!(
            PredefinedRole::from_name(name),
            Err(PolicyError::UnknownRole(name.to_string()))
        );
        assert!(!PredefinedRole::is_predefined(name));
    }

    #[test]
    fn test_all_roles() {
        assert_eq!(PredefinedRole::all().count(), 5);
        for role in PredefinedRole::all() {
            assert!(!role.description().is_empty());
            assert!(!role.action_patterns().is_empty());
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(PredefinedRole::SecurityAdmin).unwrap();
        assert_eq!(json, serde_json::json!("SECURITY_ADMIN"));
    }
}
