use axum::{extract::State, response::Json};

use crate::store::summary;

use super::{ApiErr, AppState, dto::PortfolioStatsResponse, extract::AuthUser};

pub async fn portfolio_stats(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PortfolioStatsResponse>, ApiErr> {
    let stats = summary::portfolio(&state.db).await?;
    Ok(Json(PortfolioStatsResponse::from(stats)))
}
