use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// A payload accepted by the webhook, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Submission {
    Food {
        food: String,
        food_amount: String,
        #[serde(rename = "eatenAt")]
        eaten_at: String,
    },
    Drink {
        drink: String,
        amount: String,
        #[serde(rename = "drunkAt")]
        drunk_at: String,
    },
    Toilet {
        action: String,
        time: String,
    },
}

impl Submission {
    pub fn kind(&self) -> &'static str {
        match self {
            Submission::Food { .. } => "food",
            Submission::Drink { .. } => "drink",
            Submission::Toilet { .. } => "toilet",
        }
    }
}

/// Received submissions in arrival order.
pub type Store = Arc<RwLock<Vec<Submission>>>;

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    Router::new()
        .route("/data/", get(list_submissions).post(record_submission))
        .route("/status/{code}", post(reply_with_status))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_store(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

async fn list_submissions(State(store): State<Store>) -> Json<Vec<Submission>> {
    Json(store.read().await.clone())
}

async fn record_submission(State(store): State<Store>, Json(submission): Json<Submission>) -> StatusCode {
    info!(kind = submission.kind(), "submission received");
    store.write().await.push(submission);
    StatusCode::OK
}

/// Accepts any body and answers with `code`, recording nothing.
async fn reply_with_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
