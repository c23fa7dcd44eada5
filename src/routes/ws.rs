//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "judge_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "judge_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "judge_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => {
            debug!(target: "judge_backend", payload = %trunc_for_log(&txt, 120), "WS message rejected");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) })
            .to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "judge_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => {
        let _ = socket.send(Message::Pong(payload)).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "judge_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, msg))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Generate { request } => match generate_problem(state, request).await {
      Ok(out) => {
        tracing::info!(target: "problem", id = %out.view.id, "WS generate served");
        ServerWsMessage::Problem { problem: out }
      }
      Err(message) => ServerWsMessage::Error { message },
    },

    ClientWsMessage::LoadWorkspace { problem_id, language } => {
      match load_workspace(state, &problem_id, language.as_deref()).await {
        Ok(workspace) => {
          tracing::info!(target: "problem", id = %problem_id, language = %workspace.language, "WS workspace served");
          ServerWsMessage::Workspace { workspace }
        }
        Err(message) => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::SwitchLanguage { problem_id, language } => {
      match switch_language(state, &problem_id, &language).await {
        Ok(workspace) => ServerWsMessage::Workspace { workspace },
        Err(message) => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::EditCode { problem_id, language, code } => {
      edit_code(state, &problem_id, &language, &code);
      ServerWsMessage::CodeSaved { problem_id, language }
    }
  }
}
