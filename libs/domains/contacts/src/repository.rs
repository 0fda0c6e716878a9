//! Contact persistence behind a trait, so services and handlers can be
//! exercised against an in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ContactError, ContactResult};
use crate::models::{Contact, ContactFilter};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a new contact. Fails with `DuplicateEmail` or
    /// `DuplicatePhone` when another contact already holds that value.
    async fn create(&self, contact: Contact) -> ContactResult<Contact>;

    /// Fetch a contact by id, scoped to its owner. A contact belonging to
    /// another user is `NotFound`.
    async fn get(&self, owner: Uuid, id: Uuid) -> ContactResult<Contact>;

    /// List the owner's contacts with pagination and an optional
    /// case-insensitive substring match over first name, last name, email.
    async fn list(&self, owner: Uuid, filter: &ContactFilter) -> ContactResult<Vec<Contact>>;

    /// The owner's contacts whose birthday falls in `[start, end]`,
    /// both ends inclusive.
    async fn birthdays_between(
        &self,
        owner: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ContactResult<Vec<Contact>>;

    /// Persist an updated contact, re-checking email/phone uniqueness
    async fn update(&self, contact: Contact) -> ContactResult<Contact>;

    /// Delete a contact by id, scoped to its owner
    async fn delete(&self, owner: Uuid, id: Uuid) -> ContactResult<()>;
}

/// In-memory store for tests and local development
#[derive(Clone, Default)]
pub struct InMemoryContactRepository {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    contacts: &HashMap<Uuid, Contact>,
    candidate: &Contact,
) -> ContactResult<()> {
    for existing in contacts.values() {
        if existing.id == candidate.id {
            continue;
        }
        if existing.email == candidate.email {
            return Err(ContactError::DuplicateEmail(candidate.email.clone()));
        }
        if existing.phone == candidate.phone {
            return Err(ContactError::DuplicatePhone(candidate.phone.clone()));
        }
    }
    Ok(())
}

fn matches_query(contact: &Contact, query: &str) -> bool {
    let needle = query.to_lowercase();
    contact.first_name.to_lowercase().contains(&needle)
        || contact.last_name.to_lowercase().contains(&needle)
        || contact.email.to_lowercase().contains(&needle)
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, contact: Contact) -> ContactResult<Contact> {
        let mut contacts = self.contacts.write().await;
        check_unique(&contacts, &contact)?;
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> ContactResult<Contact> {
        self.contacts
            .read()
            .await
            .get(&id)
            .filter(|c| c.user_id == owner)
            .cloned()
            .ok_or(ContactError::NotFound(id))
    }

    async fn list(&self, owner: Uuid, filter: &ContactFilter) -> ContactResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let mut matched: Vec<Contact> = contacts
            .values()
            .filter(|c| c.user_id == owner)
            .filter(|c| match &filter.query {
                Some(query) => matches_query(c, query),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.id);

        Ok(matched
            .into_iter()
            .skip(filter.skip as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn birthdays_between(
        &self,
        owner: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ContactResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let mut matched: Vec<Contact> = contacts
            .values()
            .filter(|c| c.user_id == owner && c.birthday >= start && c.birthday <= end)
            .cloned()
            .collect();
        matched.sort_by_key(|c| c.birthday);
        Ok(matched)
    }

    async fn update(&self, mut contact: Contact) -> ContactResult<Contact> {
        let mut contacts = self.contacts.write().await;
        if !contacts
            .get(&contact.id)
            .is_some_and(|c| c.user_id == contact.user_id)
        {
            return Err(ContactError::NotFound(contact.id));
        }
        check_unique(&contacts, &contact)?;

        contact.updated_at = Utc::now();
        contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> ContactResult<()> {
        let mut contacts = self.contacts.write().await;
        if !contacts.get(&id).is_some_and(|c| c.user_id == owner) {
            return Err(ContactError::NotFound(id));
        }
        contacts.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateContactRequest;

    fn contact(owner: Uuid, first: &str, email: &str, phone: &str) -> Contact {
        Contact::new(
            owner,
            CreateContactRequest {
                first_name: first.to_string(),
                last_name: "Tester".to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                birthday: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
                notes: None,
            },
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();

        let created = repo
            .create(contact(owner, "Ada", "ada@example.com", "+1"))
            .await
            .unwrap();
        let fetched = repo.get(owner, created.id).await.unwrap();
        assert_eq!(fetched.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_and_phone_rejected() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();
        repo.create(contact(owner, "Ada", "ada@example.com", "+1"))
            .await
            .unwrap();

        let err = repo
            .create(contact(owner, "Bob", "ada@example.com", "+2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::DuplicateEmail(_)));

        let err = repo
            .create(contact(owner, "Bob", "bob@example.com", "+1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContactError::DuplicatePhone(_)));
    }

    #[tokio::test]
    async fn test_contacts_are_owner_scoped() {
        let repo = InMemoryContactRepository::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let created = repo
            .create(contact(alice, "Ada", "ada@example.com", "+1"))
            .await
            .unwrap();

        assert!(matches!(
            repo.get(bob, created.id).await.unwrap_err(),
            ContactError::NotFound(_)
        ));
        assert!(repo.delete(bob, created.id).await.is_err());
        assert!(repo.list(bob, &ContactFilter::default()).await.unwrap().is_empty());

        // Still there for the real owner
        assert!(repo.get(alice, created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();
        repo.create(contact(owner, "Ada", "ada@example.com", "+1"))
            .await
            .unwrap();
        repo.create(contact(owner, "Grace", "grace@example.com", "+2"))
            .await
            .unwrap();

        let filter = ContactFilter {
            query: Some("ADA".to_string()),
            ..Default::default()
        };
        let found = repo.list(owner, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "Ada");

        // Substring of the email matches too
        let filter = ContactFilter {
            query: Some("race@EX".to_string()),
            ..Default::default()
        };
        let found = repo.list(owner, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].first_name, "Grace");
    }

    #[tokio::test]
    async fn test_pagination() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();
        for i in 0..5 {
            repo.create(contact(
                owner,
                "C",
                &format!("c{}@example.com", i),
                &format!("+{}", i),
            ))
            .await
            .unwrap();
        }

        let filter = ContactFilter {
            skip: 2,
            limit: 2,
            ..Default::default()
        };
        assert_eq!(repo.list(owner, &filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_birthday_window_ends_inclusive() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();
        let start = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let end = start + chrono::Days::new(7);

        let mut on_start = contact(owner, "Start", "s@example.com", "+1");
        on_start.birthday = start;
        let mut on_end = contact(owner, "End", "e@example.com", "+2");
        on_end.birthday = end;
        let mut after = contact(owner, "After", "a@example.com", "+3");
        after.birthday = end + chrono::Days::new(1);

        repo.create(on_start).await.unwrap();
        repo.create(on_end).await.unwrap();
        repo.create(after).await.unwrap();

        let found = repo.birthdays_between(owner, start, end).await.unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Start", "End"]);
    }

    #[tokio::test]
    async fn test_update_rechecks_uniqueness() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::now_v7();
        repo.create(contact(owner, "Ada", "ada@example.com", "+1"))
            .await
            .unwrap();
        let mut second = repo
            .create(contact(owner, "Bob", "bob@example.com", "+2"))
            .await
            .unwrap();

        second.email = "ada@example.com".to_string();
        assert!(matches!(
            repo.update(second).await.unwrap_err(),
            ContactError::DuplicateEmail(_)
        ));
    }
}
