use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics;
use crate::repository::BuildRepository;
use crate::sync::UpdatingService;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct ApiState {
    pub repository: Arc<dyn BuildRepository>,
    pub updater: Arc<UpdatingService>,
}

/// Bind the listener and serve the API until the process exits.
pub async fn start_api(state: ApiState, host: &str, port: u16) -> Result<()> {
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("fourkeys listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/build", post(update_builds))
        .route("/api/deployment-frequency", get(deployment_frequency))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedBuildsResponse {
    update_timestamp: i64,
}

/// `POST /api/build`
///
/// Synchronously refreshes build data for all configured pipelines. Responds
/// with the completion timestamp, or a bare 500 when the refresh failed as a
/// whole; the cause stays in the server log.
async fn update_builds(
    State(state): State<ApiState>,
) -> std::result::Result<Json<UpdatedBuildsResponse>, StatusCode> {
    match state.updater.update().await {
        Ok(update_timestamp) => Ok(Json(UpdatedBuildsResponse { update_timestamp })),
        Err(e) => {
            error!("Build update failed: {e}");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentFrequencyQuery {
    pipeline_id: String,
    target_stage: String,
    start_time: i64,
    end_time: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentFrequencyResponse {
    deployment_count: usize,
}

/// `GET /api/deployment-frequency`
///
/// Counts effective deployments for one pipeline over a closed time window.
/// Unknown pipelines and empty windows yield a count of zero, never an error.
async fn deployment_frequency(
    State(state): State<ApiState>,
    Query(query): Query<DeploymentFrequencyQuery>,
) -> Json<DeploymentFrequencyResponse> {
    let deployment_count = metrics::deployment_count(
        state.repository.as_ref(),
        &query.pipeline_id,
        &query.target_stage,
        query.start_time,
        query.end_time,
    );

    Json(DeploymentFrequencyResponse { deployment_count })
}
