//! Listing the policies that cover a request, with the reasons they matched.
//!
//! This only selects policies. Combining their effects into a single
//! allow/deny decision is left to the caller.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use utoipa::ToSchema;

use crate::types::{ActionMatchKind, ActionPattern, Effect, PermissionPolicy, SubjectRef};

/// Why a policy was selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PolicyMatchReason {
    SubjectEq,
    ActionAny,
    ActionExact,
    ActionPrefix,
    ActionSuffix,
    ResourceAny,
    ResourceGlob,
}

/// Restrict a listing to one effect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PolicyEffectFilter {
    #[default]
    Any,
    Allow,
    Deny,
}

/// A selected policy and the reasons it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMatch {
    pub policy_id: String,
    pub effect: Effect,
    pub reasons: Vec<PolicyMatchReason>,
}

pub(crate) fn action_match_reason(
    policy: &PermissionPolicy,
    action: &ActionPattern,
) -> Option<PolicyMatchReason> {
    policy.action().match_kind(action).map(|kind| match kind {
        ActionMatchKind::Any => PolicyMatchReason::ActionAny,
        ActionMatchKind::Exact => PolicyMatchReason::ActionExact,
        ActionMatchKind::Prefix => PolicyMatchReason::ActionPrefix,
        ActionMatchKind::Suffix => PolicyMatchReason::ActionSuffix,
    })
}

/// `Some(None)` when no resource was asked about.
pub(crate) fn resource_match_reason(
    policy: &PermissionPolicy,
    resource: Option<&str>,
) -> Option<Option<PolicyMatchReason>> {
    let Some(resource) = resource else {
        return Some(None);
    };

    let pattern = policy.resource();
    if pattern.is_wildcard_all() {
        Some(Some(PolicyMatchReason::ResourceAny))
    } else if pattern.matches(resource) {
        Some(Some(PolicyMatchReason::ResourceGlob))
    } else {
        None
    }
}

pub(crate) fn matches_effect(effect: Effect, filter: PolicyEffectFilter) -> bool {
    match filter {
        PolicyEffectFilter::Any => true,
        PolicyEffectFilter::Allow => effect == Effect::Allow,
        PolicyEffectFilter::Deny => effect == Effect::Deny,
    }
}

/// Every policy, in input order, that applies to one of `subjects` and
/// covers `action` (and `resource`, when given).
pub fn find_matching_policies(
    policies: &[PermissionPolicy],
    subjects: &[SubjectRef],
    action: &ActionPattern,
    resource: Option<&str>,
    filter: PolicyEffectFilter,
) -> Vec<PolicyMatch> {
    let matches: Vec<PolicyMatch> = policies
        .iter()
        .filter(|policy| matches_effect(policy.effect(), filter))
        .filter(|policy| policy.applies_to_any(subjects))
        .filter_map(|policy| {
            let action_reason = action_match_reason(policy, action)?;
            let resource_reason = resource_match_reason(policy, resource)?;
            trace!(policy = policy.id(), ?action_reason, ?resource_reason, "policy selected");

            let mut reasons = vec![PolicyMatchReason::SubjectEq, action_reason];
            reasons.extend(resource_reason);
            Some(PolicyMatch {
                policy_id: policy.id().to_string(),
                effect: policy.effect(),
                reasons,
            })
        })
        .collect();

    debug!(
        event = "PolicyMatch",
        action = %action,
        resource = resource.unwrap_or("-"),
        candidates = policies.len(),
        matched = matches.len()
    );
    matches
}

/// The distinct action patterns granted by `Allow` policies, sorted.
pub fn allowed_action_patterns(policies: &[PermissionPolicy]) -> Vec<String> {
    policies
        .iter()
        .filter(|p| p.effect() == Effect::Allow)
        .map(|p| p.action().value().to_string())
        .sorted()
        .dedup()
        .collect()
}
