use axum::{
    Json,
    extract::{FromRef, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use serde::de::DeserializeOwned;

use super::{ApiErr, AppState};
use crate::auth::AuthError;
use crate::entity::app_user;

fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extractor: validates the Bearer token and loads the user it names.
///
/// A correctly signed token for a user that no longer exists is rejected.
pub struct AuthUser(pub app_user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiErr;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = extract_bearer(parts)
            .ok_or_else(|| ApiErr::unauthorized("Missing or invalid Authorization header"))?;

        let user_id = state.tokens.verify(token)?;

        match state.credentials.find_by_id(user_id).await {
            Ok(user) => Ok(AuthUser(user)),
            Err(AuthError::NotFound) => {
                tracing::warn!(user_id, "token presented for unknown user");
                Err(ApiErr::unauthorized("Invalid or expired token"))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Extractor: a JSON object body deserialized into `T`.
///
/// A missing, unparseable, non-object or empty body is answered with
/// `400 {"error": "No data provided"}`; a well-formed object whose fields
/// have the wrong types gets a 400 naming the problem.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiErr;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "unreadable request body");
                ApiErr::no_data()
            })?;

        match &value {
            serde_json::Value::Object(map) if !map.is_empty() => {}
            _ => return Err(ApiErr::no_data()),
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| ApiErr::bad_request(format!("Invalid request body: {e}")))
    }
}
