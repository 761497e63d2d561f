use axum::{extract::State, http::StatusCode, response::Json};

use crate::store::payments;

use super::{
    ApiErr, AppState,
    dto::{CreatePaymentRequest, PaymentResponse},
    extract::{AuthUser, JsonBody},
};

pub async fn list_payments(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentResponse>>, ApiErr> {
    let items = payments::list(&state.db).await?;
    Ok(Json(items.into_iter().map(PaymentResponse::from).collect()))
}

pub async fn create_payment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiErr> {
    let input = body.validate()?;
    let model = payments::create(&state.db, input).await?;

    tracing::info!(payment_id = model.id, user_id = user.id, "payment recorded");

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(model))))
}
