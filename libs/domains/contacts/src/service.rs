//! Owner-scoped contact logic on top of the repository

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ContactResult;
use crate::models::{Contact, ContactFilter, CreateContactRequest, UpdateContactRequest};
use crate::repository::ContactRepository;

pub struct ContactService<R: ContactRepository> {
    repository: Arc<R>,
}

impl<R: ContactRepository> Clone for ContactService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: ContactRepository> ContactService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, owner: Uuid, input: CreateContactRequest) -> ContactResult<Contact> {
        let contact = self.repository.create(Contact::new(owner, input)).await?;
        info!(user_id = %owner, contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> ContactResult<Contact> {
        self.repository.get(owner, id).await
    }

    pub async fn list(&self, owner: Uuid, filter: &ContactFilter) -> ContactResult<Vec<Contact>> {
        self.repository.list(owner, filter).await
    }

    /// Contacts whose stored birthday falls within `[today, today + days]`,
    /// both ends inclusive. The comparison is on the literal date, so
    /// birthdays never wrap around a year boundary.
    pub async fn upcoming_birthdays(&self, owner: Uuid, days: i64) -> ContactResult<Vec<Contact>> {
        let today = Utc::now().date_naive();
        // Spans past the representable date range saturate instead of panicking
        let end = Duration::try_days(days)
            .and_then(|span| today.checked_add_signed(span))
            .unwrap_or(if days > 0 { NaiveDate::MAX } else { NaiveDate::MIN });
        self.repository.birthdays_between(owner, today, end).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        input: UpdateContactRequest,
    ) -> ContactResult<Contact> {
        let mut contact = self.repository.get(owner, id).await?;
        contact.apply(input);
        self.repository.update(contact).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ContactResult<()> {
        self.repository.delete(owner, id).await?;
        info!(user_id = %owner, contact_id = %id, "Contact deleted");
        Ok(())
    }
}
