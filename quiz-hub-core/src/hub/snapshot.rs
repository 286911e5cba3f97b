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
use std::time::Duration;

use serde::Serialize;

use crate::lifecycle::LifecycleState;
use crate::question::QuestionId;
use crate::transport::ConnId;

/// Diagnostic view of `RoundState`, returned by `Hub::snapshot`.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub question_id: Option<QuestionId>,
    /// The canonical answer to the current question. Only ever exposed
    /// through the administrative snapshot, never to participants.
    pub answer: Option<i64>,
    pub locked: bool,
    pub winner: Option<ConnId>,
    pub submission_count: usize,
}

/// Diagnostic view of `ParticipantRegistry`.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStats {
    pub online_count: usize,
}

/// Diagnostic view of `LifecycleMachine`.
#[derive(Debug, Clone, Serialize)]
pub struct MachineSnapshot {
    pub current_state: LifecycleState,
    pub visit_counts: HashMap<LifecycleState, usize>,
    pub mean_dwell_time: HashMap<LifecycleState, Duration>,
}

/// `{ round, stats, machine }` as named in `spec.md` §6's admin hooks.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub round: RoundSnapshot,
    pub stats: ParticipantStats,
    pub machine: MachineSnapshot,
}
