//! Project aggregate root and membership rules.

use super::{ProjectDomainError, ProjectId, ProjectKey, User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of a leadership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadChange {
    /// Lead before the change, if any.
    pub previous_lead: Option<UserId>,
    /// New lead.
    pub new_lead: UserId,
    /// Whether the new lead had to be added to the member set.
    pub membership_added: bool,
}

/// Validated, user-editable project details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    name: String,
    key: ProjectKey,
    description: Option<String>,
}

impl ProjectDetails {
    /// Creates validated project details.
    ///
    /// Blank descriptions are stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] for a blank name or
    /// [`ProjectDomainError::InvalidProjectKey`] for a malformed key.
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ProjectDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyProjectName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            key: ProjectKey::new(key)?,
            description: description
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
        })
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Project aggregate root.
///
/// Invariant: when a lead is set, the lead is also a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    key: ProjectKey,
    name: String,
    description: Option<String>,
    lead: Option<UserId>,
    members: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted project key.
    pub key: ProjectKey,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted lead reference.
    pub lead: Option<UserId>,
    /// Persisted member references.
    pub members: BTreeSet<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project led by its creator, who is also its only member.
    #[must_use]
    pub fn create(details: ProjectDetails, creator: &User, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let ProjectDetails {
            name,
            key,
            description,
        } = details;

        Self {
            id: ProjectId::new(),
            key,
            name,
            description,
            lead: Some(creator.id()),
            members: BTreeSet::from([creator.id()]),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    ///
    /// A stored lead missing from the member set is re-added so the
    /// aggregate invariant holds for every loaded project.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        let mut members = data.members;
        if let Some(lead) = data.lead {
            members.insert(lead);
        }
        Self {
            id: data.id,
            key: data.key,
            name: data.name,
            description: data.description,
            lead: data.lead,
            members,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the current lead, if any.
    #[must_use]
    pub const fn lead(&self) -> Option<UserId> {
        self.lead
    }

    /// Returns the member set.
    #[must_use]
    pub const fn members(&self) -> &BTreeSet<UserId> {
        &self.members
    }

    /// Returns the number of members.
    #[must_use]
    pub fn team_size(&self) -> usize {
        self.members.len()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` if the user is a member.
    #[must_use]
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Returns `true` if the user is the current lead.
    #[must_use]
    pub fn is_lead(&self, user: UserId) -> bool {
        self.lead == Some(user)
    }

    /// Returns `true` if the user is a member or the lead.
    #[must_use]
    pub fn is_associated(&self, user: UserId) -> bool {
        self.is_member(user) || self.is_lead(user)
    }

    /// Adds a member.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::DuplicateMember`] if the user already
    /// belongs to the project.
    pub fn add_member(
        &mut self,
        user: UserId,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if !self.members.insert(user) {
            return Err(ProjectDomainError::DuplicateMember {
                project: self.id,
                user,
            });
        }
        self.touch(clock);
        Ok(())
    }

    /// Removes a member.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::NotAMember`] if the user is absent or
    /// [`ProjectDomainError::CannotRemoveLead`] if the user leads the
    /// project. The aggregate is unchanged on error.
    pub fn remove_member(
        &mut self,
        user: UserId,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        if !self.is_member(user) {
            return Err(ProjectDomainError::NotAMember {
                project: self.id,
                user,
            });
        }
        if self.is_lead(user) {
            return Err(ProjectDomainError::CannotRemoveLead {
                project: self.id,
                user,
            });
        }
        self.members.remove(&user);
        self.touch(clock);
        Ok(())
    }

    /// Makes the user the project lead, adding them as a member first when
    /// needed. Never fails: leadership implies membership.
    pub fn change_lead(&mut self, user: UserId, clock: &impl Clock) -> LeadChange {
        let membership_added = self.members.insert(user);
        let previous_lead = self.lead.replace(user);
        self.touch(clock);
        LeadChange {
            previous_lead,
            new_lead: user,
            membership_added,
        }
    }

    /// Replaces name, key and description.
    ///
    /// Key uniqueness across projects is checked by the caller against the
    /// repository. Existing task keys are unaffected.
    pub fn update_details(&mut self, details: ProjectDetails, clock: &impl Clock) {
        let ProjectDetails {
            name,
            key,
            description,
        } = details;
        self.name = name;
        self.key = key;
        self.description = description;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
