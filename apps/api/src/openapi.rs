//! OpenAPI documentation configuration

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for the Contacts API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contacts API",
        version = "0.1.0",
        description = "Contact management API with JWT authentication"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_users::auth_handlers::ApiDoc),
        (path = "/api", api = domain_users::handlers::ApiDoc),
        (path = "/api", api = domain_contacts::handlers::ApiDoc)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and token flows"),
        (name = "users", description = "Current-user profile endpoints"),
        (name = "contacts", description = "Contact management endpoints")
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme the protected endpoints reference
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
