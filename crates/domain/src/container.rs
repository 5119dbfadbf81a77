use std::collections::BTreeSet;

use curatia_core::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::Visibility;

/// The four effective access lists written onto a container in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlList {
    /// Users with edit rights.
    pub edit_users: BTreeSet<String>,
    /// Groups with edit rights.
    pub edit_groups: BTreeSet<String>,
    /// Users with read rights.
    pub read_users: BTreeSet<String>,
    /// Groups with read rights, including at most one reserved marker.
    pub read_groups: BTreeSet<String>,
}

impl AccessControlList {
    /// Returns true when no user and no group holds edit rights.
    #[must_use]
    pub fn is_unmanaged(&self) -> bool {
        self.edit_users.is_empty() && self.edit_groups.is_empty()
    }
}

/// Snapshot of the collection-like container a permission template governs.
///
/// The container is an external resource; the template only reads its
/// current visibility and replaces its access lists on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// External container identifier, referenced by template source ids.
    pub id: NonEmptyString,
    /// The container's own current visibility.
    pub visibility: Visibility,
    /// The container's current access lists.
    pub access: AccessControlList,
}
