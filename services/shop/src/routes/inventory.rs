//! Inventory routes (login required)

use axum::{Extension, extract::State, response::Response};

use crate::AppState;
use crate::error::ApiResult;
use crate::models::User;
use crate::response::ok;

/// GET /api/inventory: the user's owned-item ledger
pub async fn get_my_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Response> {
    let entries = state.inventory_repository.list(user.id).await?;
    Ok(ok(entries))
}
