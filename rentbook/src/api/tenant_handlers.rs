use axum::{extract::State, http::StatusCode, response::Json};

use crate::store::tenants;

use super::{
    ApiErr, AppState,
    dto::{CreateTenantRequest, TenantResponse},
    extract::{AuthUser, JsonBody},
};

pub async fn list_tenants(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, ApiErr> {
    let items = tenants::list(&state.db).await?;
    Ok(Json(items.into_iter().map(TenantResponse::from).collect()))
}

/// Creating a tenant linked to a property also marks that property occupied.
pub async fn create_tenant(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), ApiErr> {
    let input = body.validate()?;
    let model = tenants::create(&state.db, input).await?;

    tracing::info!(
        tenant_id = model.id,
        property_id = ?model.property_id,
        user_id = user.id,
        "tenant created"
    );

    Ok((StatusCode::CREATED, Json(TenantResponse::from(model))))
}
