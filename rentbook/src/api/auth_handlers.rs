use axum::{extract::State, http::StatusCode, response::Json};

use super::{
    ApiErr, AppState,
    dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
    extract::{AuthUser, JsonBody},
};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiErr> {
    let reg = body.validate()?;

    let user = state
        .credentials
        .register(&reg.email, &reg.password, &reg.name)
        .await?;
    let token = state.tokens.issue(user.id)?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiErr> {
    let (email, password) = body.validate()?;

    let user = state
        .credentials
        .authenticate(&email, &password)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "login rejected"))?;
    let token = state.tokens.issue(user.id)?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub async fn me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
