//! Admin-only handlers over every owner's seasons.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use farmlog_core::error::CoreError;
use farmlog_core::types::DbId;
use farmlog_db::models::season::Season;
use farmlog_db::repositories::SeasonRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

/// GET /admin/seasons
///
/// Every season of every owner.
pub async fn list_all_seasons(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<Season>>> {
    let seasons = SeasonRepo::list_all(&state.pool).await?;
    Ok(Json(seasons))
}

/// DELETE /admin/seasons
///
/// Remove every season; dependent records cascade.
pub async fn delete_all_seasons(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<StatusCode> {
    let removed = SeasonRepo::delete_all(&state.pool).await?;
    tracing::warn!(removed, admin_id = admin.user_id, "All seasons deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/seasons/{id}
///
/// Remove any season by database id, regardless of owner.
pub async fn delete_season_by_id(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let season = SeasonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Season",
                id,
            })
        })?;

    SeasonRepo::delete(&state.pool, season.id).await?;
    tracing::warn!(season_id = id, admin_id = admin.user_id, "Season deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}
