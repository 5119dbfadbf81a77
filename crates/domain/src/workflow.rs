use curatia_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// One workflow a permission template could activate.
///
/// At most one workflow per template is active at a time; the activation
/// service enforces this, storage does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    /// Stable workflow name, unique within one permission template.
    pub name: NonEmptyString,
    /// Whether this workflow is the template's active workflow.
    pub active: bool,
}

impl WorkflowTemplate {
    /// Creates an inactive workflow with the given name.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            active: false,
        })
    }
}
