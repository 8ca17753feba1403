use tracing::{debug, info};

use crate::error::PolicyError;
use crate::types::{PermissionPolicy, PolicyDocument};

/// Load stored policies from a JSON array of [`PolicyDocument`]s.
///
/// Malformed JSON maps to `PolicyError::ParseError`; a document whose
/// subject or patterns fail validation maps to `PolicyError::Validation`
/// naming the document.
///
/// Example:
/// ```rust
/// use permission_core::load_policies;
/// let json = r#"[
///     {"id": "p1", "subjectUrn": "role:APPROVER", "actionPattern": "*.approve",
///      "resourcePattern": "payment:*", "createdBy": "admin"}
/// ]"#;
/// let policies = load_policies(json).unwrap();
/// assert_eq!(policies.len(), 1);
/// ```
pub fn load_policies(json: &str) -> Result<Vec<PermissionPolicy>, PolicyError> {
    let documents: Vec<PolicyDocument> = serde_json::from_str(json)?;
    debug!(event = "Load", phase = "Parsed", documents = documents.len());

    let policies = documents
        .into_iter()
        .map(|doc| {
            let id = doc.id.clone();
            PermissionPolicy::try_from(doc).map_err(|e| match e {
                PolicyError::Validation(msg) => {
                    PolicyError::Validation(format!("policy '{id}': {msg}"))
                }
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(event = "Load", phase = "Done", policies = policies.len());
    Ok(policies)
}

/// Serialize policies back to the JSON document form.
pub fn dump_policies(policies: &[PermissionPolicy]) -> Result<String, PolicyError> {
    let documents: Vec<PolicyDocument> = policies.iter().map(|p| p.to_document()).collect();
    Ok(serde_json::to_string_pretty(&documents)?)
}
