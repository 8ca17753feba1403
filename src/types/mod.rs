//! Value types for permission policies.
//!
//! Canonical string forms:
//! - Action: `service.resource.operation`, with `*` as the first or last segment
//!   (`*.approve`, `security.*`) or on its own (`*`)
//! - Resource: a glob such as `payment:*`, or a comma-separated list of globs
//! - Subject: `user:<uuid>`, `group:<uuid>` or `role:<ROLE_NAME>`
//!
//! All of them are immutable once parsed and serialize as their string form.

mod action;
mod document;
mod policy;
mod predefined_role;
mod resource;
mod subject;

pub use action::{ActionMatchKind, ActionPattern};
pub use document::PolicyDocument;
pub use policy::{Effect, PermissionPolicy};
pub use predefined_role::PredefinedRole;
pub use resource::ResourcePattern;
pub use subject::{SubjectKind, SubjectRef};
