//! Registration, verification, login, refresh, and password-reset flows.
//!
//! All collaborators are injected through [`AuthState`]; handlers stay
//! thin wrappers over the flow methods so the flows are testable against
//! in-memory implementations.

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use axum_helpers::{CurrentUser, ValidatedJson};
use email::{Email, EmailPriority, EmailQueue};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::SessionCache;
use crate::error::{UserError, UserResult};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, TokenResponse, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;
use crate::token::{TokenPurpose, TokenService};

/// Everything the auth flows need, injected explicitly
pub struct AuthState<R: UserRepository, C: SessionCache> {
    pub service: UserService<R>,
    pub tokens: TokenService,
    pub cache: Arc<C>,
    pub mailer: EmailQueue,
    /// Base URL used in verification and reset links
    pub frontend_url: String,
}

impl<R: UserRepository, C: SessionCache> Clone for AuthState<R, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            tokens: self.tokens.clone(),
            cache: self.cache.clone(),
            mailer: self.mailer.clone(),
            frontend_url: self.frontend_url.clone(),
        }
    }
}

impl<R: UserRepository, C: SessionCache> AuthState<R, C> {
    /// Register a new account and queue the verification email.
    ///
    /// Email delivery is fire-and-forget: a full queue is logged and the
    /// registration still succeeds.
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        let user = self.service.register(input).await?;

        let token = self.tokens.issue(user.id, TokenPurpose::VerifyEmail)?;
        let link = format!("{}/verify-email?token={}", self.frontend_url, token);
        let email = Email::new(&user.email, "Verify your email address")
            .with_text(format!("Open this link to verify your account: {}", link))
            .with_html(format!(
                "<p>Welcome! Click <a href=\"{}\">here</a> to verify your account.</p>",
                link
            ));

        if let Err(e) = self.mailer.enqueue(email) {
            warn!(user_id = %user.id, "Could not queue verification email: {}", e);
        }

        Ok(user.into())
    }

    /// Consume a verification token and mark the account verified
    pub async fn verify_email(&self, token: &str) -> UserResult<MessageResponse> {
        let user_id = self.tokens.validate(token, TokenPurpose::VerifyEmail)?;
        // A valid token whose account is gone surfaces as NotFound
        self.service.mark_verified(user_id).await?;

        Ok(MessageResponse::new("Email verified"))
    }

    /// Exchange credentials for an access/refresh token pair
    pub async fn login(&self, input: LoginRequest) -> UserResult<TokenResponse> {
        let user = self
            .service
            .verify_credentials(&input.email, &input.password)
            .await?;

        self.cache.set(user.id, &user.email).await;

        let access = self.tokens.issue(user.id, TokenPurpose::Access)?;
        let refresh = self.tokens.issue(user.id, TokenPurpose::Refresh)?;

        info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse::bearer(access, refresh))
    }

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// The account must still exist; a deleted account's refresh tokens
    /// stop working immediately.
    pub async fn refresh(&self, input: RefreshRequest) -> UserResult<TokenResponse> {
        let user_id = self
            .tokens
            .validate(&input.refresh_token, TokenPurpose::Refresh)
            .map_err(|_| UserError::Unauthorized)?;

        let user = self
            .service
            .get_user(user_id)
            .await
            .map_err(|_| UserError::Unauthorized)?;

        let access = self.tokens.issue(user.id, TokenPurpose::Access)?;
        let refresh = self.tokens.issue(user.id, TokenPurpose::Refresh)?;

        Ok(TokenResponse::bearer(access, refresh))
    }

    /// Queue a password-reset email for a known account
    pub async fn forgot_password(&self, input: ForgotPasswordRequest) -> UserResult<MessageResponse> {
        let user = self
            .service
            .get_by_email(&input.email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(input.email.clone()))?;

        let token = self.tokens.issue(user.id, TokenPurpose::ResetPassword)?;
        let link = format!("{}/reset-password?token={}", self.frontend_url, token);
        let email = Email::new(&user.email, "Reset your password")
            .with_priority(EmailPriority::High)
            .with_text(format!("Open this link to reset your password: {}", link))
            .with_html(format!(
                "<p>Click <a href=\"{}\">here</a> to reset your password. The link expires in one hour.</p>",
                link
            ));

        if let Err(e) = self.mailer.enqueue(email) {
            warn!(user_id = %user.id, "Could not queue password-reset email: {}", e);
        }

        Ok(MessageResponse::new("Password reset email sent"))
    }

    /// Consume a reset token, set the new password, and drop the cached
    /// session so stale identity data cannot outlive the reset
    pub async fn reset_password(
        &self,
        token: &str,
        input: ResetPasswordRequest,
    ) -> UserResult<MessageResponse> {
        let user_id = self.tokens.validate(token, TokenPurpose::ResetPassword)?;

        self.service.reset_password(user_id, &input.password).await?;

        self.cache.invalidate(user_id).await;

        Ok(MessageResponse::new("Password updated"))
    }

    /// Resolve an access token to the calling user, cache first.
    ///
    /// A cached email is resolved back through the store; if that lookup
    /// comes up empty the id path below takes over instead of failing.
    /// On a cache miss the user is loaded by id and re-cached. A token whose
    /// account no longer exists is treated as unauthorized.
    pub async fn authenticate(&self, token: &str) -> UserResult<CurrentUser> {
        let user_id = self
            .tokens
            .validate(token, TokenPurpose::Access)
            .map_err(|_| UserError::Unauthorized)?;

        if let Some(email) = self.cache.get(user_id).await {
            if let Ok(Some(user)) = self.service.get_by_email(&email).await {
                return Ok(CurrentUser {
                    id: user.id,
                    email: user.email,
                });
            }
        }

        let user = self
            .service
            .get_user(user_id)
            .await
            .map_err(|_| UserError::Unauthorized)?;
        self.cache.set(user.id, &user.email).await;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
        })
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware that requires a valid access token.
///
/// Inserts [`CurrentUser`] into the request extensions on success.
pub async fn require_auth<R, C>(
    State(state): State<AuthState<R, C>>,
    mut request: Request,
    next: Next,
) -> Result<Response, UserError>
where
    R: UserRepository,
    C: SessionCache,
{
    let token = bearer_token(&request).ok_or(UserError::Unauthorized)?;
    let current = state.authenticate(token).await?;

    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "auth"
)]
async fn register<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<(StatusCode, Json<UserResponse>)> {
    let user = state.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/auth/verify/{token}",
    params(("token" = String, Path, description = "Email verification token")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token"),
        (status = 404, description = "Account no longer exists"),
    ),
    tag = "auth"
)]
async fn verify_email<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    Path(token): Path<String>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.verify_email(&token).await?))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified"),
    ),
    tag = "auth"
)]
async fn login<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    Ok(Json(state.login(input).await?))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token"),
    ),
    tag = "auth"
)]
async fn refresh<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> UserResult<Json<TokenResponse>> {
    Ok(Json(state.refresh(input).await?))
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email queued", body = MessageResponse),
        (status = 404, description = "No account for that email"),
    ),
    tag = "auth"
)]
async fn forgot_password<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.forgot_password(input).await?))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    params(("token" = String, Path, description = "Password reset token")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired token"),
        (status = 404, description = "Account no longer exists"),
    ),
    tag = "auth"
)]
async fn reset_password<R: UserRepository, C: SessionCache>(
    State(state): State<AuthState<R, C>>,
    Path(token): Path<String>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    Ok(Json(state.reset_password(&token, input).await?))
}

/// OpenAPI documentation for the auth endpoints
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        register,
        verify_email,
        login,
        refresh,
        forgot_password,
        reset_password,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        TokenResponse,
        UserResponse,
        MessageResponse,
    ))
)]
pub struct ApiDoc;

/// Public auth routes (no authentication required)
pub fn auth_router<R, C>(state: AuthState<R, C>) -> Router
where
    R: UserRepository + 'static,
    C: SessionCache + 'static,
{
    Router::new()
        .route("/auth/register", post(register::<R, C>))
        .route("/auth/verify/{token}", get(verify_email::<R, C>))
        .route("/auth/login", post(login::<R, C>))
        .route("/auth/refresh", post(refresh::<R, C>))
        .route("/auth/forgot-password", post(forgot_password::<R, C>))
        .route("/auth/reset-password/{token}", post(reset_password::<R, C>))
        .with_state(state)
}
