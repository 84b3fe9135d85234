//! HTTP front end: `POST /chat` with `{"message": ...}` in and
//! `{"response": ...}` out.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::relay::ChatRelay;

pub const DEFAULT_PORT: u16 = 5005;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: &'static str,
}

pub enum ChatError {
    MissingMessage,
    Relay,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ChatError::MissingMessage => (StatusCode::BAD_REQUEST, "Message is required"),
            ChatError::Relay => (StatusCode::INTERNAL_SERVER_ERROR, "Chatbot service error"),
        };
        (status, Json(ErrorReply { error })).into_response()
    }
}

pub fn router(relay: Arc<ChatRelay>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(relay)
}

async fn chat(
    State(relay): State<Arc<ChatRelay>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ChatError> {
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(ChatError::MissingMessage)?;

    match relay.get_chat_response(&message).await {
        Ok(response) => Ok(Json(ChatReply { response })),
        Err(e) => {
            error!("Chatbot error: {}", e);
            Err(ChatError::Relay)
        }
    }
}

pub async fn serve(relay: Arc<ChatRelay>, host: &str, port: u16) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!("Serving {} on http://{}", relay.model(), listener.local_addr()?);
    axum::serve(listener, router(relay)).await?;
    Ok(())
}
