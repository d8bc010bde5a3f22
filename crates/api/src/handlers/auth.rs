//! Registration, login, token refresh, and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use filature_core::error::CoreError;
use filature_db::models::agency::CreateAgency;
use filature_db::models::investigator::CreateInvestigator;
use filature_db::models::user::{
    CreateUser, RefreshRequest, User, ROLE_AGENCY, ROLE_INVESTIGATOR,
};
use filature_db::repositories::{AgencyRepo, InvestigatorRepo, RefreshTokenRepo, UserRepo};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token,
};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Registration payload. Role-specific fields are required for the
/// matching role and ignored otherwise.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    /// `"agency"` or `"investigator"`. Admin accounts are provisioned
    /// out of band.
    pub role: String,
    /// Agency fields.
    pub agency_name: Option<String>,
    pub permit_number: Option<String>,
    /// Investigator fields.
    pub display_name: Option<String>,
    /// Shared optional profile fields.
    pub phone: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned by register, login, and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// POST /api/v1/auth/register
///
/// Create a user account plus its role-specific profile, and sign the
/// new user in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_password_strength(&input.password).map_err(AppError::BadRequest)?;

    if input.role != ROLE_AGENCY && input.role != ROLE_INVESTIGATOR {
        return Err(AppError::BadRequest(format!(
            "Role must be '{ROLE_AGENCY}' or '{ROLE_INVESTIGATOR}'"
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            password_hash,
            role: input.role.clone(),
            full_name: input.full_name.clone(),
        },
    )
    .await?;

    if input.role == ROLE_AGENCY {
        let name = input
            .agency_name
            .clone()
            .ok_or_else(|| AppError::BadRequest("agency_name is required".into()))?;
        let permit_number = input
            .permit_number
            .clone()
            .ok_or_else(|| AppError::BadRequest("permit_number is required".into()))?;
        AgencyRepo::create(
            &state.pool,
            &CreateAgency {
                user_id: user.id,
                name,
                permit_number,
                phone: input.phone.clone(),
                city: input.city.clone(),
                region: input.region.clone(),
            },
        )
        .await?;
    } else {
        InvestigatorRepo::create(
            &state.pool,
            &CreateInvestigator {
                user_id: user.id,
                display_name: input
                    .display_name
                    .clone()
                    .unwrap_or_else(|| input.full_name.clone()),
                phone: input.phone.clone(),
                city: input.city.clone(),
                region: input.region.clone(),
                specialities: None,
            },
        )
        .await?;
    }

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let tokens = issue_tokens(&state, user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tokens })))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("password verification failed: {e}")))?;
    if !matches {
        return Err(invalid_credentials());
    }
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    tracing::info!(user_id = user.id, "User logged in");

    let tokens = issue_tokens(&state, user).await?;
    Ok(Json(DataResponse { data: tokens }))
}

/// POST /api/v1/auth/refresh
///
/// Rotate a refresh token: the presented token is revoked and a fresh
/// pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    let stored = RefreshTokenRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    RefreshTokenRepo::revoke(&state.pool, &token_hash).await?;

    let tokens = issue_tokens(&state, user).await?;
    Ok(Json(DataResponse { data: tokens }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token. The access token simply expires.
pub async fn logout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);
    let revoked = RefreshTokenRepo::revoke(&state.pool, &token_hash).await?;

    tracing::info!(user_id = auth.user_id, revoked, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

/// Create an access/refresh token pair and persist the refresh hash.
async fn issue_tokens(state: &AppState, user: User) -> Result<TokenResponse, AppError> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("token generation failed: {e}")))?;

    let refresh_token = generate_refresh_token();
    let expires_at =
        Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);
    RefreshTokenRepo::create(
        &state.pool,
        user.id,
        &hash_refresh_token(&refresh_token),
        expires_at,
    )
    .await?;

    Ok(TokenResponse {
        access_token,
        refresh_token,
        user,
    })
}
