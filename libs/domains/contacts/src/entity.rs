//! SeaORM entity for the `contacts` table

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::Contact;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub birthday: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            birthday: model.birthday,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<Contact> for ActiveModel {
    fn from(contact: Contact) -> Self {
        ActiveModel {
            id: Set(contact.id),
            user_id: Set(contact.user_id),
            first_name: Set(contact.first_name),
            last_name: Set(contact.last_name),
            email: Set(contact.email),
            phone: Set(contact.phone),
            birthday: Set(contact.birthday),
            notes: Set(contact.notes),
            created_at: Set(contact.created_at.fixed_offset()),
            updated_at: Set(contact.updated_at.fixed_offset()),
        }
    }
}
