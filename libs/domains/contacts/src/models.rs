//! Contact entity and request/response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A contact owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(user_id: Uuid, input: CreateContactRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            birthday: input.birthday,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, leaving absent fields untouched
    pub fn apply(&mut self, input: UpdateContactRequest) {
        if let Some(first_name) = input.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = input.email {
            self.email = email;
        }
        if let Some(phone) = input.phone {
            self.phone = phone;
        }
        if let Some(birthday) = input.birthday {
            self.birthday = birthday;
        }
        if let Some(notes) = input.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

/// Contact payload returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            birthday: contact.birthday,
            notes: contact.notes,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

/// New contact request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 30))]
    pub phone: String,
    pub birthday: NaiveDate,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Partial contact update, absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateContactRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 3, max = 30))]
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

fn default_limit() -> u64 {
    100
}

/// Listing parameters: pagination plus an optional substring search
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ContactFilter {
    /// Case-insensitive substring matched against first name, last name,
    /// and email
    pub query: Option<String>,
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for ContactFilter {
    fn default() -> Self {
        Self {
            query: None,
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_days() -> i64 {
    7
}

/// Upcoming-birthdays window, inclusive on both ends
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BirthdayQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

impl Default for BirthdayQuery {
    fn default() -> Self {
        Self {
            days: default_days(),
        }
    }
}
