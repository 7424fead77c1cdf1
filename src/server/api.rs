//! HTTP server implementation.
//!
//! axum routes mapping the task API onto the repository and the insight
//! generator, plus the UI page and a health check.

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::templates;
use crate::config::InsightsConfig;
use crate::db::Database;
use crate::error::ApiError;
use crate::types::{
    CreateTaskRequest, DeleteConfirmation, Insights, ListTasksQuery, Task, UpdateTaskRequest,
};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Task store handle.
    db: Arc<Database>,
    /// Insight generator settings.
    insights: InsightsConfig,
}

impl AppState {
    pub fn new(db: Arc<Database>, insights: InsightsConfig) -> Self {
        Self { db, insights }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Extractor results; rejections surface as `ApiError` via `?`.
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type TaskId = Result<Path<i64>, PathRejection>;

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Root endpoint - serves the UI page.
async fn root() -> Html<&'static str> {
    Html(templates::INDEX_TEMPLATE)
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /tasks?status=&priority=&sortBy=`
async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;
    let filter = query.validate()?;
    Ok(Json(state.db().list_tasks(&filter)?))
}

/// `POST /tasks`
async fn create_task(
    State(state): State<AppState>,
    body: JsonBody<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(body) = body?;
    let new_task = body.validate()?;
    let task = state.db().create_task(&new_task)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /tasks/{id}`
async fn get_task(
    State(state): State<AppState>,
    task_id: TaskId,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = task_id?;
    Ok(Json(state.db().get_task(task_id)?))
}

/// `PATCH /tasks/{id}`
async fn update_task(
    State(state): State<AppState>,
    task_id: TaskId,
    body: JsonBody<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let Path(task_id) = task_id?;
    let Json(body) = body?;
    let update = body.validate()?;
    Ok(Json(state.db().update_task(task_id, &update)?))
}

/// `DELETE /tasks/{id}`
async fn delete_task(
    State(state): State<AppState>,
    task_id: TaskId,
) -> ApiResult<Json<DeleteConfirmation>> {
    let Path(task_id) = task_id?;
    Ok(Json(state.db().delete_task(task_id)?))
}

/// `GET /insights` - recomputed on every call.
async fn insights(State(state): State<AppState>) -> ApiResult<Json<Insights>> {
    let insights = state
        .db()
        .compute_insights(state.insights.due_soon_days)?;
    Ok(Json(insights))
}

/// Build the router with all routes.
pub fn build_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/insights", get(insights));

    let router = if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: SocketAddr, cors: bool, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    info!("Task tracker listening on http://{}", bound_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Task tracker server stopped");
    Ok(())
}
