//! The flat, string-typed view of a policy exposed to API callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::policy::Effect;

fn default_resource_pattern() -> String {
    "*".to_string()
}

/// A permission policy as stored and listed.
///
/// Patterns are kept as plain strings here; converting into a
/// [`PermissionPolicy`](super::PermissionPolicy) validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    pub id: String,
    /// `None` for system policies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// e.g. `role:APPROVER`
    pub subject_urn: String,
    /// e.g. `*.approve`
    pub action_pattern: String,
    /// e.g. `payment:*`; defaults to `*`
    #[serde(default = "default_resource_pattern")]
    pub resource_pattern: String,
    #[serde(default)]
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub system_policy: bool,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_optional_fields_missing() {
        let doc: PolicyDocument = serde_json::from_value(json!({
            "id": "p1",
            "subjectUrn": "role:READER",
            "actionPattern": "*.view",
            "createdBy": "admin"
        }))
        .unwrap();

        assert_eq!(doc.resource_pattern, "*");
        assert_eq!(doc.effect, Effect::Allow);
        assert_eq!(doc.profile_id, None);
        assert!(!doc.system_policy);
        assert_eq!(doc.created_at, None);
    }

    #[test]
    fn test_camel_case_fields() {
        let doc = PolicyDocument {
            id: "p1".to_string(),
            profile_id: Some("profile-1".to_string()),
            subject_urn: "role:APPROVER".to_string(),
            action_pattern: "*.approve".to_string(),
            resource_pattern: "payment:*".to_string(),
            effect: Effect::Deny,
            description: None,
            system_policy: false,
            created_by: "admin".to_string(),
            created_at: Some("2024-03-01T09:30:00Z".parse().unwrap()),
            updated_at: None,
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["profileId"], "profile-1");
        assert_eq!(value["subjectUrn"], "role:APPROVER");
        assert_eq!(value["actionPattern"], "*.approve");
        assert_eq!(value["resourcePattern"], "payment:*");
        assert_eq!(value["effect"], "DENY");
        assert!(value.get("description").is_none());
        assert_eq!(value["createdAt"], "2024-03-01T09:30:00Z");
        assert!(value.get("updatedAt").is_none());

        let back: PolicyDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
