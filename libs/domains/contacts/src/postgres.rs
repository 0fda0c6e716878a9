//! Postgres-backed contact repository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity;
use crate::error::{ContactError, ContactResult};
use crate::models::{Contact, ContactFilter};
use crate::repository::ContactRepository;

#[derive(Clone)]
pub struct PgContactRepository {
    db: DatabaseConnection,
}

impl PgContactRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a unique-index violation to the conflicting field
fn map_unique_violation(err: DbErr, contact: &Contact) -> ContactError {
    let text = err.to_string();
    if text.contains("duplicate key") {
        if text.contains("phone") {
            return ContactError::DuplicatePhone(contact.phone.clone());
        }
        return ContactError::DuplicateEmail(contact.email.clone());
    }
    ContactError::from(err)
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: Contact) -> ContactResult<Contact> {
        let model = entity::ActiveModel::from(contact.clone())
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &contact))?;

        Ok(model.into())
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> ContactResult<Contact> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::UserId.eq(owner))
            .one(&self.db)
            .await?;

        model.map(Contact::from).ok_or(ContactError::NotFound(id))
    }

    async fn list(&self, owner: Uuid, filter: &ContactFilter) -> ContactResult<Vec<Contact>> {
        let mut select = entity::Entity::find().filter(entity::Column::UserId.eq(owner));

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            use sea_orm::sea_query::extension::postgres::PgExpr;


            let pattern = format!("%{}%", query);
            select = select.filter(
                Condition::any()
                    .add(Expr::col(entity::Column::FirstName).ilike(&pattern))
                    .add(Expr::col(entity::Column::LastName).ilike(&pattern))
                    .add(Expr::col(entity::Column::Email).ilike(&pattern)),
            );
        }

        let models = select
            .order_by_asc(entity::Column::Id)
            .offset(filter.skip)
            .limit(filter.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Contact::from).collect())
    }

    async fn birthdays_between(
        &self,
        owner: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ContactResult<Vec<Contact>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(owner))
            .filter(entity::Column::Birthday.gte(start))
            .filter(entity::Column::Birthday.lte(end))
            .order_by_asc(entity::Column::Birthday)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Contact::from).collect())
    }

    async fn update(&self, mut contact: Contact) -> ContactResult<Contact> {
        // Ownership check first so a foreign id surfaces as NotFound
        let owned = entity::Entity::find_by_id(contact.id)
            .filter(entity::Column::UserId.eq(contact.user_id))
            .count(&self.db)
            .await?;
        if owned == 0 {
            return Err(ContactError::NotFound(contact.id));
        }

        contact.updated_at = Utc::now();
        let id = contact.id;

        let model = entity::ActiveModel::from(contact.clone())
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => ContactError::NotFound(id),
                other => map_unique_violation(other, &contact),
            })?;

        Ok(model.into())
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> ContactResult<()> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::UserId.eq(owner))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ContactError::NotFound(id));
        }
        Ok(())
    }
}
