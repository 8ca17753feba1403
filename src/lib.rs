// src/lib.rs
pub use error::PolicyError;
pub use loader::{dump_policies, load_policies};
pub use policy_match::{
    PolicyEffectFilter, PolicyMatch, PolicyMatchReason, allowed_action_patterns,
    find_matching_policies,
};
pub use types::{
    ActionMatchKind, ActionPattern, Effect, PermissionPolicy, PolicyDocument, PredefinedRole,
    ResourcePattern, SubjectKind, SubjectRef,
};

mod error;
mod loader;
mod policy_match;
pub mod types;
