use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::store::properties;

use super::{
    ApiErr, AppState,
    dto::{CreatePropertyRequest, MessageResponse, PropertyResponse, UpdatePropertyRequest},
    extract::{AuthUser, JsonBody},
    parse_id,
};

// ---------- GET /properties ----------

pub async fn list_properties(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyResponse>>, ApiErr> {
    let items = properties::list(&state.db).await?;
    Ok(Json(items.into_iter().map(PropertyResponse::from).collect()))
}

// ---------- POST /properties ----------

pub async fn create_property(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>), ApiErr> {
    let input = body.validate()?;
    let model = properties::create(&state.db, input).await?;

    tracing::info!(property_id = model.id, user_id = user.id, "property created");

    Ok((StatusCode::CREATED, Json(PropertyResponse::from(model))))
}

// ---------- GET /properties/{id} ----------

pub async fn get_property(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyResponse>, ApiErr> {
    let id = parse_id(&id, "Property")?;
    let model = properties::get(&state.db, id).await?;
    Ok(Json(PropertyResponse::from(model)))
}

// ---------- PUT /properties/{id} ----------

pub async fn update_property(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdatePropertyRequest>,
) -> Result<Json<PropertyResponse>, ApiErr> {
    let id = parse_id(&id, "Property")?;
    let patch = body.validate()?;
    let model = properties::update(&state.db, id, patch).await?;
    Ok(Json(PropertyResponse::from(model)))
}

// ---------- DELETE /properties/{id} ----------

pub async fn delete_property(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiErr> {
    let id = parse_id(&id, "Property")?;
    properties::delete(&state.db, id).await?;

    tracing::info!(property_id = id, user_id = user.id, "property deleted");

    Ok(Json(MessageResponse {
        message: "Property deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2Hasher;
    use crate::session::JwtCodec;
    use crate::store::properties::NewProperty;
    use crate::store::tenants::{self, NewTenant};
    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::get,
    };
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use std::sync::Arc;
    use tower::ServiceExt;

    const JWT_SECRET: &str = "test-jwt-secret-key-32-chars-pad";

    async fn setup() -> (AppState, String) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let state = AppState::new(
            db,
            Arc::new(Argon2Hasher),
            Arc::new(JwtCodec::new(JWT_SECRET, None)),
        );
        let user = state
            .credentials
            .register("owner@example.com", "pw", "Owner")
            .await
            .unwrap();
        let token = state.tokens.issue(user.id).unwrap();
        (state, token)
    }

    fn make_router(state: AppState) -> Router {
        Router::new()
            .route("/properties", get(list_properties).post(create_property))
            .route(
                "/properties/{id}",
                get(get_property).put(update_property).delete(delete_property),
            )
            .with_state(state)
    }

    fn request(method: Method, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"));
        match body {
            Some(v) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_echoes_input_with_defaults() {
        let (state, token) = setup().await;
        let res = make_router(state)
            .oneshot(request(
                Method::POST,
                "/properties",
                &token,
                Some(serde_json::json!({"address": "123 Main", "monthlyRent": 1000})),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert_eq!(body["address"], "123 Main");
        assert_eq!(body["monthlyRent"].as_f64(), Some(1000.0));
        assert_eq!(body["status"], "vacant");
        assert_eq!(body["unitCount"], 1);
        assert_eq!(body["type"], "Residential");
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn create_missing_fields_creates_nothing() {
        let (state, token) = setup().await;
        let db = state.db.clone();

        let res = make_router(state)
            .oneshot(request(
                Method::POST,
                "/properties",
                &token,
                Some(serde_json::json!({"unitCount": 2})),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["error"], "Missing required field(s): address, monthlyRent");
        assert!(properties::list(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_field_type_is_400() {
        let (state, token) = setup().await;
        let res = make_router(state)
            .oneshot(request(
                Method::POST,
                "/properties",
                &token,
                Some(serde_json::json!({"address": "1 A", "monthlyRent": "lots"})),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn update_unknown_or_non_numeric_id_is_404() {
        let (state, token) = setup().await;
        let router = make_router(state);

        for uri in ["/properties/42", "/properties/abc"] {
            let res = router
                .clone()
                .oneshot(request(
                    Method::PUT,
                    uri,
                    &token,
                    Some(serde_json::json!({"status": "occupied"})),
                ))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn delete_referenced_property_is_409() {
        let (state, token) = setup().await;
        let p = properties::create(&state.db, NewProperty::new("Held", 900.0))
            .await
            .unwrap();
        let mut t = NewTenant::new("Holder");
        t.property_id = Some(p.id);
        tenants::create(&state.db, t).await.unwrap();

        let res = make_router(state)
            .oneshot(request(Method::DELETE, &format!("/properties/{}", p.id), &token, None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_returns_message() {
        let (state, token) = setup().await;
        let p = properties::create(&state.db, NewProperty::new("Free", 900.0))
            .await
            .unwrap();

        let res = make_router(state)
            .oneshot(request(Method::DELETE, &format!("/properties/{}", p.id), &token, None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["message"], "Property deleted");
    }

    #[tokio::test]
    async fn missing_or_bad_token_is_401() {
        let (state, _) = setup().await;
        let router = make_router(state);

        let res = router
            .clone()
            .oneshot(Request::builder().uri("/properties").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = router
            .oneshot(request(Method::GET, "/properties", "not.a.token", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
