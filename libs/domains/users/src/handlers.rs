//! Authenticated user routes: profile lookup and avatar upload.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use axum_helpers::CurrentUser;
use std::sync::Arc;
use tracing::info;

use crate::avatar::AvatarStorage;
use crate::error::{UserError, UserResult};
use crate::models::UserResponse;
use crate::repository::UserRepository;
use crate::service::UserService;

pub struct UsersState<R: UserRepository, S: AvatarStorage> {
    pub service: UserService<R>,
    pub storage: Arc<S>,
}

impl<R: UserRepository, S: AvatarStorage> Clone for UsersState<R, S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl<R: UserRepository, S: AvatarStorage> UsersState<R, S> {
    /// Store the uploaded bytes and persist the resulting URL
    pub async fn upload_avatar(
        &self,
        user: &CurrentUser,
        content_type: &str,
        bytes: &[u8],
    ) -> UserResult<UserResponse> {
        let url = self.storage.store(user.id, content_type, bytes).await?;
        info!(user_id = %user.id, url = %url, "Avatar updated");

        let updated = self.service.set_avatar_url(user.id, url).await?;
        Ok(updated.into())
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
async fn me<R: UserRepository, S: AvatarStorage>(
    State(state): State<UsersState<R, S>>,
    user: CurrentUser,
) -> UserResult<Json<UserResponse>> {
    // The cache only carries identity; the profile comes from the store
    let full = state.service.get_user(user.id).await?;
    Ok(Json(full.into()))
}

#[utoipa::path(
    post,
    path = "/users/avatar",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar stored", body = UserResponse),
        (status = 400, description = "Missing file or unsupported image type"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
async fn upload_avatar<R: UserRepository, S: AvatarStorage>(
    State(state): State<UsersState<R, S>>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> UserResult<Json<UserResponse>> {
    let field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| UserError::Validation(format!("Invalid multipart body: {}", e)))?
        {
            Some(field) if field.name() == Some("file") => break field,
            Some(_) => continue,
            None => return Err(UserError::Validation("Missing file field".to_string())),
        }
    };

    let content_type = field
        .content_type()
        .ok_or_else(|| UserError::Validation("Missing file content type".to_string()))?
        .to_string();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| UserError::Validation(format!("Could not read upload: {}", e)))?;

    let updated = state.upload_avatar(&user, &content_type, &bytes).await?;
    Ok(Json(updated))
}

/// OpenAPI documentation for the user profile endpoints
#[derive(utoipa::OpenApi)]
#[openapi(paths(me, upload_avatar), components(schemas(UserResponse)))]
pub struct ApiDoc;

/// Routes that require an authenticated user.
///
/// The caller is expected to layer `require_auth` on top.
pub fn users_router<R, S>(state: UsersState<R, S>) -> Router
where
    R: UserRepository + 'static,
    S: AvatarStorage + 'static,
{
    Router::new()
        .route("/users/me", get(me::<R, S>))
        .route("/users/avatar", post(upload_avatar::<R, S>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::InMemoryAvatarStorage;
    use crate::models::RegisterRequest;
    use crate::repository::InMemoryUserRepository;

    fn state() -> UsersState<InMemoryUserRepository, InMemoryAvatarStorage> {
        UsersState {
            service: UserService::new(Arc::new(InMemoryUserRepository::new())),
            storage: Arc::new(InMemoryAvatarStorage::new()),
        }
    }

    async fn registered_user(
        state: &UsersState<InMemoryUserRepository, InMemoryAvatarStorage>,
    ) -> CurrentUser {
        let user = state
            .service
            .register(RegisterRequest {
                email: "a@example.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        CurrentUser {
            id: user.id,
            email: user.email,
        }
    }

    #[tokio::test]
    async fn test_upload_avatar_stores_and_persists_url() {
        let state = state();
        let user = registered_user(&state).await;

        let updated = state
            .upload_avatar(&user, "image/png", &[0x89, 0x50, 0x4e, 0x47])
            .await
            .unwrap();

        assert!(updated.avatar_url.is_some());
        assert!(state.storage.contains(user.id).await);

        let stored = state.service.get_user(user.id).await.unwrap();
        assert_eq!(stored.avatar_url, updated.avatar_url);
    }

    #[tokio::test]
    async fn test_upload_avatar_rejects_non_image() {
        let state = state();
        let user = registered_user(&state).await;

        let err = state
            .upload_avatar(&user, "application/pdf", b"%PDF-")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidFileType(_)));
        assert!(!state.storage.contains(user.id).await);
    }
}
