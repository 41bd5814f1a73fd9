use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, Entity, EntityId, UserId};

/// Customer identifier (user-scoped via the entity's `user_id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub EntityId);

impl CustomerId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Contact information for a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Schema-validated input for creating or replacing a customer's details.
///
/// Optional text fields are normalized on apply: trimmed, and empty-after-trim
/// becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    user_id: UserId,
    name: String,
    contact: ContactDetails,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Customer {
    /// Validate a draft and create the customer record.
    pub fn create(
        id: CustomerId,
        user_id: UserId,
        draft: CustomerDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let (name, contact, notes) = normalize(draft)?;
        Ok(Self {
            id,
            user_id,
            name,
            contact,
            notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the customer's details with a new draft (full replace, like the
    /// create path; there is no field-level merge).
    pub fn apply(&mut self, draft: CustomerDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let (name, contact, notes) = normalize(draft)?;
        self.name = name;
        self.contact = contact;
        self.notes = notes;
        self.updated_at = now;
        Ok(())
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn email(&self) -> Option<&str> {
        self.contact.email.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn normalize(draft: CustomerDraft) -> DomainResult<(String, ContactDetails, Option<String>)> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }

    let contact = ContactDetails {
        email: normalize_optional(draft.email),
        phone: normalize_optional(draft.phone),
        address: normalize_optional(draft.address),
    };

    Ok((name.to_string(), contact, normalize_optional(draft.notes)))
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
