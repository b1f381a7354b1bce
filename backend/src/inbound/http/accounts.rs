//! Authentication and account handlers.
//!
//! ```text
//! POST  /api/v1/auth/register
//! POST  /api/v1/auth/login
//! POST  /api/v1/auth/logout
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me
//! GET   /api/v1/users?role=
//! PUT   /api/v1/users/{id}/role
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::formatting::normalize_optional_url;
use crate::domain::{
    CredentialsValidationError, DisplayName, Error, LoginCredentials, ProfileUpdate,
    Registration, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, parse_user_id, require};

/// Registration payload. `role` defaults to `CLIENT`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub display_name: Option<String>,
    #[schema(example = "CLIENT")]
    pub role: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Profile patch; absent fields are unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

/// `?role=` filter for the admin user listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// ADMIN, BARBER, STYLIST or CLIENT.
    pub role: Option<String>,
}

/// New role for a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangeRoleRequest {
    #[schema(example = "BARBER")]
    pub role: String,
}

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const DISPLAY_NAME: FieldName = FieldName::new("displayName");
const ROLE: FieldName = FieldName::new("role");

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let field = match &err {
        CredentialsValidationError::InvalidEmail => EMAIL,
        CredentialsValidationError::EmptyPassword
        | CredentialsValidationError::PasswordTooShort { .. }
        | CredentialsValidationError::PasswordTooLong { .. } => PASSWORD,
        CredentialsValidationError::DisplayName(_) => DISPLAY_NAME,
    };
    invalid_field_error(field, err)
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse::<Role>()
        .map_err(|err| invalid_field_error(ROLE, err))
}

fn parse_registration(payload: RegisterRequest) -> Result<Registration, Error> {
    let email = require(payload.email, EMAIL)?;
    let password = require(payload.password, PASSWORD)?;
    let display_name = require(payload.display_name, DISPLAY_NAME)?;
    let role = payload.role.as_deref().map(parse_role).transpose()?;
    Registration::try_from_parts(&email, &password, &display_name, role)
        .map_err(map_credentials_error)
}

fn parse_profile_update(payload: UpdateProfileRequest) -> Result<ProfileUpdate, Error> {
    let display_name = payload
        .display_name
        .map(DisplayName::new)
        .transpose()
        .map_err(|err| invalid_field_error(DISPLAY_NAME, err))?;
    let image_url = normalize_optional_url(payload.image_url.as_deref())
        .map_err(|err| invalid_field_error(FieldName::new("imageUrl"), err))?;
    let phone = payload
        .phone
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty());
    Ok(ProfileUpdate {
        display_name,
        phone,
        image_url,
    })
}

/// Create an account.
///
/// Anonymous callers may only register clients and are logged in on
/// success. Admins may create any role and keep their own session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Role requires an admin", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    let caller = session.principal()?;
    let user = state.accounts.register(caller, registration).await?;
    if caller.is_none() {
        session.persist_principal(&user)?;
    }
    info!(user_id = %user.id, role = %user.role, "account registered");
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let user = state.accounts.login(credentials).await?;
    session.persist_principal(&user)?;
    Ok(HttpResponse::Ok().json(user))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let user = state.accounts.current_user(&caller).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(user))
}

/// Update the caller's display name, phone or avatar.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let update = parse_profile_update(payload.into_inner())?;
    let user = state.accounts.update_profile(&caller, update).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// List accounts, optionally by role. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let role = query.role.as_deref().map(parse_role).transpose()?;
    let users = state.accounts.list_users(&caller, role).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(users))
}

/// Change a user's role. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    params(("id" = String, Path, description = "User id")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "changeUserRole"
)]
#[put("/users/{id}/role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ChangeRoleRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_principal()?;
    let user_id = parse_user_id(&path, FieldName::new("id"))?;
    let role = parse_role(&payload.role)?;
    let user = state.accounts.change_role(&caller, user_id, role).await?;
    info!(user_id = %user.id, role = %user.role, "role changed");
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
