//! Routes and handlers.

use crate::domain::config::BlocksApiConfig;
use crate::domain::errors::ApiResult;
use crate::domain::snapshot::Snapshot;
use crate::http::cors::create_cors_layer;
use crate::http::form::MarkForm;
use crate::http::response::Envelope;
use crate::ports::inbound::BlocksApi;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn BlocksApi>,
    pub flags: Arc<BTreeMap<String, String>>,
}

/// Query string of `GET /blocks`.
#[derive(Debug, Default, Deserialize)]
pub struct BlocksQuery {
    pub view: Option<String>,
}

/// Build the blocks API router.
pub fn build_router(api: Arc<dyn BlocksApi>, config: &BlocksApiConfig) -> Router {
    let state = AppState {
        api,
        flags: Arc::new(config.flags.clone()),
    };

    let v1 = Router::new()
        .route("/blocks", get(blocks))
        .route("/blocks/mark", post(mark_block))
        .route("/blocks/plan", get(planned_blocks))
        .route("/status/flags", get(flags));

    let router = Router::new()
        .nest("/api/v1", v1)
        .route("/-/healthy", get(healthy))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.disable_cors {
        router
    } else {
        router.layer(create_cors_layer())
    }
}

async fn blocks(
    State(state): State<AppState>,
    Query(query): Query<BlocksQuery>,
) -> Json<Envelope<Snapshot>> {
    Json(Envelope::success(state.api.blocks(query.view.as_deref())))
}

async fn planned_blocks(State(state): State<AppState>) -> Json<Envelope<Snapshot>> {
    Json(Envelope::success(state.api.plan_blocks().await))
}

async fn mark_block(
    State(state): State<AppState>,
    MarkForm(request): MarkForm,
) -> ApiResult<Json<Envelope<()>>> {
    state.api.mark(&request).await?;
    Ok(Json(Envelope::empty()))
}

async fn flags(State(state): State<AppState>) -> Json<Envelope<BTreeMap<String, String>>> {
    Json(Envelope::success(state.flags.as_ref().clone()))
}

async fn healthy() -> &'static str {
    "OK"
}
