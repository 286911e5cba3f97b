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

use std::time::Duration;

use clap::{Parser, ValueEnum};
use quiz_hub_core::{Difficulty, HubConfig};
use serde::Deserialize;

/// CLI flags, each overridable by the matching environment variable
/// (loaded from `.env` first, so a flag always wins over an env var).
#[derive(Debug, Parser)]
#[command(name = "quiz-hub-server")]
#[command(about = "Websocket host for a live competitive quiz hub")]
#[command(version)]
pub struct Config {
    /// Address the websocket server binds to.
    #[arg(long, env = "QUIZ_HUB_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Allowed CORS origins for the websocket upgrade and admin routes.
    /// Empty means same-origin only.
    #[arg(long, env = "QUIZ_HUB_ALLOWED_ORIGIN", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Milliseconds a winner's answer stays on screen before the next
    /// question is issued.
    #[arg(long, env = "QUIZ_HUB_WINNER_DISPLAY_MS", default_value_t = 3000)]
    pub winner_display_ms: u64,

    /// Milliseconds between LOCKED and TRANSITIONING.
    #[arg(long, env = "QUIZ_HUB_HANDOFF_DELAY_MS", default_value_t = 100)]
    pub post_lock_handoff_delay_ms: u64,

    /// Milliseconds defining the diagnostic grace-period submission window.
    #[arg(long, env = "QUIZ_HUB_GRACE_PERIOD_MS", default_value_t = 100)]
    pub grace_period_ms: u64,

    /// Difficulty used for the first question and every rotation.
    #[arg(long, env = "QUIZ_HUB_DEFAULT_DIFFICULTY", default_value = "medium")]
    pub default_difficulty: DifficultyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

impl Config {
    /// Loads `.env` (if present) then parses CLI args/env vars. A missing
    /// `.env` file is not an error — it's normal in production.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Config::parse()
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            winner_display_duration: Duration::from_millis(self.winner_display_ms),
            post_lock_handoff_delay: Duration::from_millis(self.post_lock_handoff_delay_ms),
            default_difficulty: self.default_difficulty.into(),
            grace_period: Duration::from_millis(self.grace_period_ms),
        }
    }
}
