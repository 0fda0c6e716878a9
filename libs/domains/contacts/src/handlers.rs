//! HTTP endpoints for the contact book.
//!
//! Every route runs behind the auth middleware; the handler reads the
//! authenticated owner from [`CurrentUser`].

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_helpers::{CurrentUser, UuidPath, ValidatedJson};
use std::sync::Arc;

use crate::error::ContactResult;
use crate::models::{
    BirthdayQuery, ContactFilter, ContactResponse, CreateContactRequest, UpdateContactRequest,
};
use crate::rate_limit::RateLimitLayer;
use crate::repository::ContactRepository;
use crate::service::ContactService;

pub struct ContactsState<R: ContactRepository> {
    pub service: ContactService<R>,
}

impl<R: ContactRepository> Clone for ContactsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<R: ContactRepository> ContactsState<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            service: ContactService::new(repository),
        }
    }
}

#[utoipa::path(
    post,
    path = "/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = ContactResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Duplicate email or phone"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn create_contact<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateContactRequest>,
) -> ContactResult<(StatusCode, Json<ContactResponse>)> {
    let contact = state.service.create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(
    get,
    path = "/contacts",
    params(ContactFilter),
    responses(
        (status = 200, description = "The owner's contacts", body = [ContactResponse]),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn list_contacts<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    Query(filter): Query<ContactFilter>,
) -> ContactResult<Json<Vec<ContactResponse>>> {
    let contacts = state.service.list(user.id, &filter).await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/contacts/upcoming_birthdays",
    params(BirthdayQuery),
    responses(
        (status = 200, description = "Contacts with a birthday in the window", body = [ContactResponse]),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn upcoming_birthdays<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    Query(query): Query<BirthdayQuery>,
) -> ContactResult<Json<Vec<ContactResponse>>> {
    let contacts = state.service.upcoming_birthdays(user.id, query.days).await?;
    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact", body = ContactResponse),
        (status = 404, description = "No such contact for this owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn get_contact<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ContactResult<Json<ContactResponse>> {
    let contact = state.service.get(user.id, id).await?;
    Ok(Json(contact.into()))
}

#[utoipa::path(
    put,
    path = "/contacts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Contact id")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ContactResponse),
        (status = 404, description = "No such contact for this owner"),
        (status = 409, description = "Duplicate email or phone"),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn update_contact<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateContactRequest>,
) -> ContactResult<Json<ContactResponse>> {
    let contact = state.service.update(user.id, id, input).await?;
    Ok(Json(contact.into()))
}

#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    params(("id" = uuid::Uuid, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "No such contact for this owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "contacts"
)]
async fn delete_contact<R: ContactRepository>(
    State(state): State<ContactsState<R>>,
    user: CurrentUser,
    UuidPath(id): UuidPath,
) -> ContactResult<StatusCode> {
    state.service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// OpenAPI documentation for the contact endpoints
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        create_contact,
        list_contacts,
        upcoming_birthdays,
        get_contact,
        update_contact,
        delete_contact,
    ),
    components(schemas(ContactResponse, CreateContactRequest, UpdateContactRequest))
)]
pub struct ApiDoc;

/// Contact routes. The rate limiter, when present, gates only creation.
pub fn contacts_router<R>(state: ContactsState<R>, create_limit: Option<RateLimitLayer>) -> Router
where
    R: ContactRepository + 'static,
{
    let mut create = post(create_contact::<R>);
    if let Some(limit) = create_limit {
        create = create.layer(limit);
    }

    Router::new()
        .route("/contacts", create.get(list_contacts::<R>))
        .route("/contacts/upcoming_birthdays", get(upcoming_birthdays::<R>))
        .route(
            "/contacts/{id}",
            get(get_contact::<R>)
                .put(update_contact::<R>)
                .delete(delete_contact::<R>),
        )
        .with_state(state)
}
