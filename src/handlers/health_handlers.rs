use crate::error::Result;
use crate::AppState;
use axum::{extract::State, response::Json};
use serde_json::{json, Value};

/// GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(json!({
        "success": true,
        "status": "ok",
    })))
}
