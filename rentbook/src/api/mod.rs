use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::response::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthError, CredentialStore, Hasher};
use crate::session::{SessionError, TokenCodec};
use crate::store::StoreError;
use crate::validation::ValidationError;

pub mod auth_handlers;
pub mod dashboard_handlers;
pub mod dto;
pub mod extract;
pub mod payment_handlers;
pub mod property_handlers;
pub mod tenant_handlers;

// ---------- shared state ----------

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<dyn TokenCodec>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, hasher: Arc<dyn Hasher>, tokens: Arc<dyn TokenCodec>) -> Self {
        Self {
            credentials: Arc::new(CredentialStore::new(db.clone(), hasher)),
            db,
            tokens,
        }
    }
}

// ---------- error type ----------

/// A JSON error response: `{"error": "..."}` with an HTTP status.
#[derive(Debug)]
pub struct ApiErr(StatusCode, String);

impl ApiErr {
    /// Log the cause and answer with a generic 500; storage details never reach the client.
    pub fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "request failed");
        Self(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(StatusCode::UNAUTHORIZED, msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(StatusCode::NOT_FOUND, msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self(StatusCode::CONFLICT, msg.into())
    }

    /// Body absent, unparseable, or an empty object.
    pub fn no_data() -> Self {
        Self::bad_request("No data provided")
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.1 });
        (self.0, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiErr {
    fn from(e: ValidationError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<AuthError> for ApiErr {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(v) => v.into(),
            AuthError::DuplicateEmail => Self::bad_request(e.to_string()),
            AuthError::InvalidCredentials => Self::unauthorized(e.to_string()),
            AuthError::NotFound => Self::not_found(e.to_string()),
            AuthError::Db(_) | AuthError::Hash(_) => Self::internal(e),
        }
    }
}

impl From<SessionError> for ApiErr {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Unauthenticated => Self::unauthorized(e.to_string()),
            SessionError::ExpiryOutOfRange(_) | SessionError::Encode(_) => Self::internal(e),
        }
    }
}

impl From<StoreError> for ApiErr {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::not_found(e.to_string()),
            StoreError::Duplicate(_) => Self::bad_request(e.to_string()),
            StoreError::Referenced(_) => Self::conflict(e.to_string()),
            StoreError::Db(_) => Self::internal(e),
        }
    }
}

/// Ids travel as decimal strings; anything that is not one cannot name a record.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i32, ApiErr> {
    raw.trim()
        .parse()
        .map_err(|_| ApiErr::not_found(format!("{entity} not found")))
}

// ---------- router ----------

pub fn app_router(state: AppState, allowed_origins: &[String]) -> Router {
    let allowed_origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new() // no origins allowed = same-origin only
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    routes()
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        // auth
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/me", get(auth_handlers::me))
        // properties
        .route(
            "/properties",
            get(property_handlers::list_properties).post(property_handlers::create_property),
        )
        .route(
            "/properties/{id}",
            get(property_handlers::get_property)
                .put(property_handlers::update_property)
                .delete(property_handlers::delete_property),
        )
        // tenants
        .route(
            "/tenants",
            get(tenant_handlers::list_tenants).post(tenant_handlers::create_tenant),
        )
        // payments
        .route(
            "/payments",
            get(payment_handlers::list_payments).post(payment_handlers::create_payment),
        )
        // dashboard
        .route("/dashboard/stats", get(dashboard_handlers::portfolio_stats))
}
