use crate::{
    app::{App, AppError},
    chat::Message,
    ranker::{InvestorMatch, RankOutcome},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    app: Arc<App>,
}

async fn start_app(app: App, listen_addr: &str) {
    let shared_state = Arc::new(SharedState { app: Arc::new(app) });

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let router = Router::new()
        .route("/api/predict", post(predict))
        .route("/api/investors", post(investors))
        .route("/api/chat/send", post(send_message))
        .route("/api/chat/:user1/:user2", get(chat_history))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await.unwrap();
    log::info!("listening on {listen_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

pub fn start_daemon(app: App, listen_addr: &str) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(app, listen_addr).await });
}

// Wrapper so `?` converts AppError into an HTTP response.
#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            AppError::EmptyDescription | AppError::EmptyDomain | AppError::EmptyMessageField => (
                axum::http::StatusCode::BAD_REQUEST,
                json!({"error": self.0.to_string()}).to_string(),
            ),
            AppError::Configuration(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
            AppError::Embedding(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
            AppError::Other(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
        }
        .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    description: String,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_domains: Vec<String>,
    confidence_scores: Vec<f32>,
}

async fn predict(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, HttpError> {
    log::debug!("payload: {payload:?}");
    let app = state.app.clone();

    // Model inference is synchronous and can take tens of milliseconds
    tokio::task::block_in_place(move || {
        let predictions = app.predict_domain(&payload.description)?;

        let (predicted_domains, confidence_scores) = predictions
            .into_iter()
            .map(|p| (p.label, p.distance))
            .unzip();

        Ok(Json(PredictResponse {
            predicted_domains,
            confidence_scores,
        }))
    })
}

#[derive(Debug, Deserialize)]
struct InvestorsRequest {
    selected_domain: String,
    #[serde(default)]
    investor_type: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum InvestorsResponse {
    Matches(Vec<InvestorMatch>),
    NoMatch { message: String },
}

async fn investors(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<InvestorsRequest>,
) -> Result<Json<InvestorsResponse>, HttpError> {
    log::debug!("payload: {payload:?}");

    let outcome = state
        .app
        .find_investors(&payload.selected_domain, payload.investor_type.as_deref())?;

    let response = match outcome {
        RankOutcome::Matches(matches) => InvestorsResponse::Matches(matches),
        RankOutcome::NoMatch { domain } => InvestorsResponse::NoMatch {
            message: format!("No investors found for domain: {domain}"),
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    sender: String,
    receiver: String,
    message: String,
}

#[derive(Serialize)]
struct SendMessageResponse {
    message: String,
    chat_history: Vec<Message>,
}

async fn send_message(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, HttpError> {
    log::debug!("payload: {payload:?}");

    let chat_history =
        state
            .app
            .send_message(&payload.sender, &payload.receiver, &payload.message)?;

    Ok(Json(SendMessageResponse {
        message: "Message sent successfully".to_string(),
        chat_history,
    }))
}

#[derive(Serialize)]
struct ChatHistoryResponse {
    chat_history: Vec<Message>,
}

async fn chat_history(
    State(state): State<Arc<SharedState>>,
    Path((user1, user2)): Path<(String, String)>,
) -> Json<ChatHistoryResponse> {
    Json(ChatHistoryResponse {
        chat_history: state.app.get_messages(&user1, &user2),
    })
}
