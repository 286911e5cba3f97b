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

//! Operator-facing HTTP routes over the Hub's admin hooks (`spec.md` §6's
//! `forceNewQuestion`, `resetRound`, `getSnapshot`, promoted to a real
//! surface per `SPEC_FULL.md`'s SUPPLEMENTED FEATURES section).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::transport::ws::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/force-new-question", post(force_new_question))
        .route("/admin/reset", post(reset))
        .route("/admin/snapshot", get(snapshot))
}

#[derive(Debug, Deserialize, Default)]
pub struct ForceNewQuestionBody {
    #[serde(default)]
    pub difficulty: Option<crate::config::DifficultyArg>,
}

async fn force_new_question(
    State(state): State<AppState>,
    body: Option<Json<ForceNewQuestionBody>>,
) -> impl IntoResponse {
    let difficulty = body.and_then(|Json(body)| body.difficulty).map(Into::into);
    state.hub.force_new_question(difficulty).await;
    axum::http::StatusCode::NO_CONTENT
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.hub.reset_round().await;
    axum::http::StatusCode::NO_CONTENT
}

async fn snapshot(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.hub.snapshot().await)
}
