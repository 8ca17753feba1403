//! Permission policies: who may (or may not) do what, on which resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, trace};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::PolicyError;

use super::action::ActionPattern;
use super::document::PolicyDocument;
use super::predefined_role::PredefinedRole;
use super::resource::ResourcePattern;
use super::subject::SubjectRef;

const SYSTEM_CREATOR: &str = "SYSTEM";

#[derive(
    Debug,
    Default,
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
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// A policy binding one subject to an action pattern and a resource pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPolicy {
    id: String,
    profile_id: Option<String>,
    subject: SubjectRef,
    action: ActionPattern,
    resource: ResourcePattern,
    effect: Effect,
    description: Option<String>,
    system_policy: bool,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PermissionPolicy {
    /// Create a custom policy for a profile.
    ///
    /// `resource` defaults to `*` and `effect` to [`Effect::Allow`].
    pub fn create(
        profile_id: &str,
        subject: SubjectRef,
        action: ActionPattern,
        resource: Option<ResourcePattern>,
        effect: Option<Effect>,
        description: Option<String>,
        created_by: &str,
    ) -> Result<Self, PolicyError> {
        if profile_id.trim().is_empty() {
            return Err(PolicyError::validation(
                "profileId is required for custom policies",
            ));
        }
        if created_by.trim().is_empty() {
            return Err(PolicyError::validation("createdBy is required"));
        }

        let now = Utc::now();
        Ok(PermissionPolicy {
            id: Uuid::new_v4().to_string(),
            profile_id: Some(profile_id.to_string()),
            subject,
            action,
            resource: resource.unwrap_or_else(ResourcePattern::wildcard_all),
            effect: effect.unwrap_or_default(),
            description,
            system_policy: false,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// A copy of this policy with new rules but the same identity and creation time.
    pub fn updated(
        &self,
        action: ActionPattern,
        resource: ResourcePattern,
        effect: Effect,
        description: Option<String>,
    ) -> Result<Self, PolicyError> {
        if self.system_policy {
            return Err(PolicyError::validation(format!(
                "Cannot update system policy: {}",
                self.id
            )));
        }
        Ok(PermissionPolicy {
            action,
            resource,
            effect,
            description,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    fn system(role: PredefinedRole, suffix: &str, action: &str, description: &str) -> Self {
        let now = Utc::now();
        PermissionPolicy {
            id: format!("system:role:{}:{suffix}", role.role_name()),
            profile_id: None,
            subject: role.subject(),
            action: ActionPattern::new_unchecked(action),
            resource: ResourcePattern::wildcard_all(),
            effect: Effect::Allow,
            description: Some(description.to_string()),
            system_policy: true,
            created_by: SYSTEM_CREATOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The in-memory system policies granting a predefined role its defaults.
    pub fn for_role(role: PredefinedRole) -> Vec<Self> {
        let grants: &[(&str, &str, &str)] = match role {
            PredefinedRole::SecurityAdmin => &[(
                "security",
                "security.*",
                "Security admin can perform all security-related actions",
            )],
            PredefinedRole::ServiceAdmin => &[(
                "all",
                "*",
                "Service admin has full access to all services and settings",
            )],
            PredefinedRole::Reader => &[("view", "*.view", "Reader can view all resources")],
            PredefinedRole::Creator => &[
                ("create", "*.create", "Creator can create resources"),
                ("update", "*.update", "Creator can update resources"),
                ("delete", "*.delete", "Creator can delete resources"),
            ],
            PredefinedRole::Approver => &[(
                "approve",
                "*.approve",
                "Approver can approve pending items",
            )],
        };

        grants
            .iter()
            .map(|(suffix, action, description)| Self::system(role, suffix, action, description))
            .collect()
    }

    pub fn for_role_name(name: &str) -> Result<Vec<Self>, PolicyError> {
        Ok(Self::for_role(PredefinedRole::from_name(name)?))
    }

    /// System policies for every predefined role among `names`; other names are skipped.
    pub fn for_role_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| match PredefinedRole::from_name(name.as_ref()) {
                Ok(role) => Some(Self::for_role(role)),
                Err(_) => {
                    debug!(role = name.as_ref(), "skipping role without system policies");
                    None
                }
            })
            .flatten()
            .collect()
    }

    pub fn for_roles<I>(roles: I) -> Vec<Self>
    where
        I: IntoIterator<Item = PredefinedRole>,
    {
        roles.into_iter().flat_map(Self::for_role).collect()
    }

    /// True if both the action and the resource are covered.
    pub fn matches(&self, action: &ActionPattern, resource_id: &str) -> bool {
        let matched = self.action.matches(action) && self.resource.matches(resource_id);
        trace!(
            policy = %self.id,
            action = %action,
            resource = resource_id,
            matched,
            "policy match"
        );
        matched
    }

    pub fn matches_action(&self, action: &ActionPattern) -> bool {
        self.action.matches(action)
    }

    pub fn applies_to(&self, subject: &SubjectRef) -> bool {
        self.subject == *subject
    }

    pub fn applies_to_any<'a, I>(&self, subjects: I) -> bool
    where
        I: IntoIterator<Item = &'a SubjectRef>,
    {
        subjects.into_iter().any(|s| self.applies_to(s))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    pub fn subject(&self) -> &SubjectRef {
        &self.subject
    }

    pub fn action(&self) -> &ActionPattern {
        &self.action
    }

    pub fn resource(&self) -> &ResourcePattern {
        &self.resource
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_system_policy(&self) -> bool {
        self.system_policy
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn to_document(&self) -> PolicyDocument {
        PolicyDocument {
            id: self.id.clone(),
            profile_id: self.profile_id.clone(),
            subject_urn: self.subject.to_urn(),
            action_pattern: self.action.value().to_string(),
            resource_pattern: self.resource.value().to_string(),
            effect: self.effect,
            description: self.description.clone(),
            system_policy: self.system_policy,
            created_by: self.created_by.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Rebuild a stored policy, validating every pattern.
///
/// A document without timestamps is treated as created now; a missing
/// `updatedAt` falls back to `createdAt`.
impl TryFrom<PolicyDocument> for PermissionPolicy {
    type Error = PolicyError;

    fn try_from(doc: PolicyDocument) -> Result<Self, Self::Error> {
        if doc.id.trim().is_empty() {
            return Err(PolicyError::validation("Policy id cannot be blank"));
        }
        let created_at = doc.created_at.unwrap_or_else(Utc::now);
        Ok(PermissionPolicy {
            subject: SubjectRef::from_urn(&doc.subject_urn)?,
            action: ActionPattern::parse(&doc.action_pattern)?,
            resource: ResourcePattern::parse(&doc.resource_pattern)?,
            id: doc.id,
            profile_id: doc.profile_id,
            effect: doc.effect,
            description: doc.description,
            system_policy: doc.system_policy,
            created_by: doc.created_by,
            created_at,
            updated_at: doc.updated_at.unwrap_or(created_at),
        })
    }
}
