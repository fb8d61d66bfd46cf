//! Handlers for account registration, login and the current-user profile.
//!
//! Mounted at both `/users` and `/auth`.

use axum::extract::State;
use axum::http::StatusCode;
use realty_core::error::CoreError;
use realty_core::inquiry::require_fields;
use realty_core::roles::{is_admin, ROLE_ADMIN, ROLE_USER};
use realty_db::models::user::{CreateUser, User, UserResponse};
use realty_db::repositories::UserRepo;
use realty_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::config::AdminSeed;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::auth::AuthUser;
use crate::response::Success;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 30, message = "Name cannot exceed 30 characters."))]
    pub name: Option<String>,
    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 100, message = "Email cannot exceed 100 characters.")
    )]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// Request body for `POST /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthBody {
    pub message: &'static str,
    pub token: String,
    pub user: UserResponse,
}

/// Body returned by `GET /me`.
#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub message: &'static str,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/register
///
/// Create a plain `user` account and return a token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Success<AuthBody>>)> {
    require_fields(&[
        ("name", input.name.as_deref()),
        ("email", input.email.as_deref()),
        ("password", input.password.as_deref()),
    ])?;

    let input = RegisterRequest {
        name: input.name.map(|n| n.trim().to_string()),
        email: input.email.map(|e| normalize_email(&e)),
        password: input.password,
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    };
    input
        .validate()
        .map_err(|e| CoreError::Validation(first_message(&e, &["name", "email", "password"])))?;

    let email = input.email.unwrap_or_default();
    if UserRepo::email_exists(&state.pool, &email).await? {
        return Err(CoreError::Conflict("User already exists with this email.".into()).into());
    }

    let password_hash = hash_password(input.password.as_deref().unwrap_or_default())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.unwrap_or_default(),
            email,
            password_hash,
            phone: input.phone,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered");

    let body = auth_body(&state, &user, "User registered successfully")?;
    Ok((StatusCode::CREATED, Json(Success::new(body))))
}

/// POST /api/users/login
///
/// Exchange email + password for a token. Unknown email and wrong password
/// get the same answer.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<Success<AuthBody>>> {
    require_fields(&[
        ("email", input.email.as_deref()),
        ("password", input.password.as_deref()),
    ])?;
    let email = normalize_email(input.email.as_deref().unwrap_or_default());
    let password = input.password.unwrap_or_default();

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    let body = auth_body(&state, &user, "Login successful")?;
    Ok(Json(Success::new(body)))
}

/// GET /api/users/me
pub async fn me(user: AuthUser) -> Json<Success<ProfileBody>> {
    Json(Success::new(ProfileBody {
        message: "User profile fetched successfully",
        user: UserResponse {
            is_admin: is_admin(&user.role),
            id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        },
    }))
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Create the configured administrator unless the email is already taken.
///
/// Returns `true` when a new account was created. An existing account is left
/// untouched, whatever its role.
pub async fn ensure_admin_account(pool: &DbPool, seed: &AdminSeed) -> AppResult<bool> {
    let email = normalize_email(&seed.email);
    if UserRepo::email_exists(pool, &email).await? {
        tracing::debug!(%email, "Admin account already present");
        return Ok(false);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            name: seed.name.clone(),
            email,
            password_hash,
            phone: None,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;
    tracing::info!(user_id = admin.id, "Admin account created");
    Ok(true)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn auth_body(state: &AppState, user: &User, message: &'static str) -> AppResult<AuthBody> {
    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthBody {
        message,
        token,
        user: UserResponse::from(user),
    })
}

/// The message of the first failing field, checked in `order`.
fn first_message(errors: &ValidationErrors, order: &[&str]) -> String {
    let fields = errors.field_errors();
    order
        .iter()
        .filter_map(|name| fields.get(*name))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid registration details.".to_string())
}
