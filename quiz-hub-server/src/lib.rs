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

//! Websocket host for `quiz_hub_core`: an `axum` transport adapter, a
//! `clap`-driven CLI, `.env` loading, admin HTTP routes and `tracing`
//! subscriber setup. None of this is part of the core — see
//! [`quiz_hub_core::transport::Transport`] for the boundary.

pub mod admin;
pub mod config;
pub mod logging;
pub mod transport;

use std::sync::Arc;

use axum::Router;
use quiz_hub_core::Hub;

use crate::transport::ws::{ws_handler, AppState};
use crate::transport::WsTransport;

/// Builds the router with the websocket upgrade route and the admin routes
/// mounted over the same [`AppState`], and starts the Hub's rotation by
/// calling [`Hub::start`]. Returns the router; binding and serving is left
/// to `main` so tests can construct a router without opening a socket.
pub async fn build_app(config: &config::Config) -> Router {
    let transport = WsTransport::new();
    let hub = Hub::new(config.hub_config(), transport.clone());
    hub.start().await;

    let state = AppState { hub: Arc::clone(&hub), transport };

    Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .merge(admin::routes())
        .with_state(state)
}
