//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod container;
mod release;
mod template;
mod workflow;

pub use access::{AccessGrant, AccessLevel, AgentType, RESERVED_READ_GROUPS, Visibility};
pub use container::{AccessControlList, Container};
pub use release::ReleasePeriod;
pub use template::PermissionTemplate;
pub use workflow::WorkflowTemplate;
