use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Liveness plus whether the form can already create playlists.
pub async fn health(Extension(app): Extension<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": app.pipeline.initialized(),
    }))
}
