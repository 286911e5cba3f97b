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

use crate::question::Difficulty;

/// The Hub's enumerated configuration knobs (`spec.md` §4.4).
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Time between a winner being declared and the next question being
    /// issued. Default 3000ms.
    pub winner_display_duration: Duration,
    /// Time between the LOCKED transition and the TRANSITIONING transition.
    /// Purely observational — the next-question timer begins at LOCKED
    /// entry, not at TRANSITIONING entry. Default 100ms.
    pub post_lock_handoff_delay: Duration,
    /// Difficulty used for the first question and for every subsequent
    /// round unless overridden via `forceNewQuestion`. Default `medium`.
    pub default_difficulty: Difficulty,
    /// Forwarded to `RoundState::set_grace_period` at Hub construction.
    /// Default 100ms.
    pub grace_period: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            winner_display_duration: Duration::from_millis(3000),
            post_lock_handoff_delay: Duration::from_millis(100),
            default_difficulty: Difficulty::Medium,
            grace_period: Duration::from_millis(100),
        }
    }
}
