use std::collections::BTreeSet;

use chrono::{Months, NaiveDate};
use curatia_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{
    AccessControlList, AccessGrant, AccessLevel, AgentType, RESERVED_READ_GROUPS, ReleasePeriod,
    Visibility,
};

/// Default access policy stamped on items deposited into one container.
///
/// A template exclusively owns its access grants; deleting the template
/// drops the grants with it. The `source_id` is a back-reference to the
/// governed container, not an ownership edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionTemplate {
    /// Identifier of the container this template governs.
    pub source_id: NonEmptyString,
    /// Release period tag; `None` means "varies" and imposes no policy.
    pub release_period: Option<ReleasePeriod>,
    /// Stored release date, meaningful for fixed and before-date periods.
    pub release_date: Option<NaiveDate>,
    /// Required visibility; `None` means any visibility is acceptable.
    pub visibility: Option<Visibility>,
    /// Discrete access grants owned by this template.
    pub access_grants: Vec<AccessGrant>,
}

impl PermissionTemplate {
    /// Creates an unconstrained template for the given container.
    pub fn new(source_id: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            source_id: NonEmptyString::new(source_id)?,
            release_period: None,
            release_date: None,
            visibility: None,
            access_grants: Vec::new(),
        })
    }

    /// Returns raw agent ids matching the given agent type and access
    /// level. Duplicates are preserved; aggregation deduplicates.
    #[must_use]
    pub fn agent_ids_for(&self, agent_type: AgentType, access: AccessLevel) -> Vec<&str> {
        self.access_grants
            .iter()
            .filter(|grant| grant.agent_type == agent_type && grant.access == access)
            .map(|grant| grant.agent_id.as_str())
            .collect()
    }

    /// Distinct users holding manage grants.
    #[must_use]
    pub fn edit_users(&self) -> BTreeSet<String> {
        self.distinct_ids(AgentType::User, &[AccessLevel::Manage])
    }

    /// Distinct groups holding manage grants.
    #[must_use]
    pub fn edit_groups(&self) -> BTreeSet<String> {
        self.distinct_ids(AgentType::Group, &[AccessLevel::Manage])
    }

    /// Distinct users holding view or deposit grants. Manage grants never
    /// feed the read lists; edit and read are derived independently.
    #[must_use]
    pub fn read_users(&self) -> BTreeSet<String> {
        self.distinct_ids(AgentType::User, &[AccessLevel::View, AccessLevel::Deposit])
    }

    /// Distinct groups holding view or deposit grants, always excluding
    /// the reserved read-group markers even when a grant names one.
    #[must_use]
    pub fn read_groups(&self) -> BTreeSet<String> {
        let mut groups =
            self.distinct_ids(AgentType::Group, &[AccessLevel::View, AccessLevel::Deposit]);
        for reserved in RESERVED_READ_GROUPS {
            groups.remove(reserved);
        }
        groups
    }

    /// Computes all four effective access lists from the grant set.
    #[must_use]
    pub fn access_control_list(&self) -> AccessControlList {
        AccessControlList {
            edit_users: self.edit_users(),
            edit_groups: self.edit_groups(),
            read_users: self.read_users(),
            read_groups: self.read_groups(),
        }
    }

    /// Does this template require one exact release date for all items?
    #[must_use]
    pub fn release_fixed_date(&self) -> bool {
        self.release_period == Some(ReleasePeriod::Fixed)
    }

    /// Does this template forbid any release delay?
    #[must_use]
    pub fn release_no_delay(&self) -> bool {
        self.release_period == Some(ReleasePeriod::NoDelay)
    }

    /// Does this template cap the embargo at a named maximum period?
    #[must_use]
    pub fn release_max_embargo(&self) -> bool {
        self.release_period
            .and_then(|period| period.embargo_months())
            .is_some()
    }

    /// Does this template require release before a date? Every maximum
    /// embargo is a dynamically computed before-date policy.
    #[must_use]
    pub fn release_before_date(&self) -> bool {
        self.release_period == Some(ReleasePeriod::BeforeDate) || self.release_max_embargo()
    }

    /// Returns the effective release date for the given current date.
    ///
    /// No-delay templates release today, maximum-embargo templates release
    /// the configured number of months from today, and every other
    /// template returns the stored date unchanged (possibly absent).
    #[must_use]
    pub fn release_date_for(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.release_no_delay() {
            return Some(today);
        }

        match self.release_period.and_then(|period| period.embargo_months()) {
            Some(months) => today.checked_add_months(Months::new(months)),
            None => self.release_date,
        }
    }

    /// Validates a candidate release date against this template.
    ///
    /// The result is the conjunction of the three independent checks, each
    /// vacuously true when its governing policy kind does not apply. All
    /// three are evaluated against the same `today` snapshot.
    #[must_use]
    pub fn valid_release_date(&self, candidate: NaiveDate, today: NaiveDate) -> bool {
        self.check_no_delay(candidate, today)
            && self.check_before_date(candidate, today)
            && self.check_fixed_date(candidate, today)
    }

    /// Validates a candidate visibility against this template. A template
    /// without a visibility requirement accepts any candidate; otherwise
    /// the candidate must match exactly.
    #[must_use]
    pub fn valid_visibility(&self, candidate: Visibility) -> bool {
        match self.visibility {
            None => true,
            Some(required) => required == candidate,
        }
    }

    fn distinct_ids(&self, agent_type: AgentType, levels: &[AccessLevel]) -> BTreeSet<String> {
        levels
            .iter()
            .flat_map(|access| self.agent_ids_for(agent_type, *access))
            .map(str::to_owned)
            .collect()
    }

    fn check_no_delay(&self, candidate: NaiveDate, today: NaiveDate) -> bool {
        if !self.release_no_delay() {
            return true;
        }
        candidate == today
    }

    fn check_before_date(&self, candidate: NaiveDate, today: NaiveDate) -> bool {
        if !self.release_before_date() {
            return true;
        }
        match self.release_date_for(today) {
            Some(latest) => candidate <= latest,
            None => true,
        }
    }

    fn check_fixed_date(&self, candidate: NaiveDate, today: NaiveDate) -> bool {
        if !self.release_fixed_date() {
            return true;
        }
        match self.release_date_for(today) {
            Some(required) => candidate == required,
            None => true,
        }
    }
}
