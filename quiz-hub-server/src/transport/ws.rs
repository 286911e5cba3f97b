/*
 *   Copyright (c) 2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use quiz_hub_core::{ConnId, Hub, OutboundEvent, RawAnswer, Transport};

/// Every inbound message a client may send, framed the same way as
/// [`OutboundEvent`]: `{ "event": "<name>", "payload": { ... } }`.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
enum InboundEvent {
    SubmitAnswer {
        #[serde(default)]
        answer: Option<RawAnswer>,
    },
    RequestQuestion,
}

/// Fan-out side of the [`quiz_hub_core::Transport`] contract: one
/// `mpsc::UnboundedSender` per live connection, reachable both from inside
/// the Hub (via the clone it owns) and from each connection's own task (via
/// the clone in [`AppState`]) — registration happens outside the Hub, so the
/// registry is the shared `Arc`, not the `WsTransport` value itself.
///
/// `send_to`/`broadcast` are synchronous and fire-and-forget, as the Hub's
/// critical section requires: a full channel or a closed receiver is
/// dropped silently rather than blocking or erroring back into the Hub.
#[derive(Clone)]
pub struct WsTransport {
    connections: Arc<Mutex<HashMap<ConnId, mpsc::UnboundedSender<Message>>>>,
}

impl WsTransport {
    pub fn new() -> Self {
        WsTransport { connections: Arc::new(Mutex::new(HashMap::new())) }
    }

    fn register(&self, conn_id: ConnId, sender: mpsc::UnboundedSender<Message>) {
        self.connections.lock().unwrap().insert(conn_id, sender);
    }

    fn unregister(&self, conn_id: &ConnId) {
        self.connections.lock().unwrap().remove(conn_id);
    }
}

impl Default for WsTransport {
    fn default() -> Self { Self::new() }
}

impl Transport for WsTransport {
    fn send_to(&self, conn_id: &ConnId, event: OutboundEvent) {
        let connections = self.connections.lock().unwrap();
        let Some(sender) = connections.get(conn_id) else {
            tracing::warn!(%conn_id, "send_to: connection is no longer registered");
            return;
        };
        match serde_json::to_string(&event) {
            Ok(text) => {
                let _ = sender.send(Message::Text(text));
            },
            Err(error) => tracing::error!(%error, "failed to serialize outbound event"),
        }
    }

    fn broadcast(&self, event: OutboundEvent) {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(%error, "failed to serialize outbound event for broadcast");
                return;
            },
        };
        let connections = self.connections.lock().unwrap();
        for sender in connections.values() {
            let _ = sender.send(Message::Text(text.clone()));
        }
    }
}

/// Shared application state handed to every axum route: the Hub itself, and
/// a handle to the same connection registry the Hub sends through.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub<WsTransport>>,
    pub transport: WsTransport,
}

pub async fn ws_handler(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = ConnId::from(Uuid::new_v4().to_string());
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    state.transport.register(conn_id.clone(), outbound_tx);

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    state.hub.connect(conn_id.clone()).await;

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else { continue };
        match serde_json::from_str::<InboundEvent>(&text) {
            Ok(InboundEvent::SubmitAnswer { answer }) => {
                state.hub.submit_answer(conn_id.clone(), answer).await;
            },
            Ok(InboundEvent::RequestQuestion) => {
                state.hub.request_question(conn_id.clone()).await;
            },
            Err(error) => tracing::warn!(%conn_id, %error, "received a malformed inbound event"),
        }
    }

    state.hub.disconnect(conn_id.clone()).await;
    state.transport.unregister(&conn_id);
    writer.abort();
}
