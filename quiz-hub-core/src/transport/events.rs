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

use serde::{Deserialize, Serialize};

use super::ConnId;
use crate::question::{Difficulty, Question, QuestionId};
use crate::round::SubmitRejection;

/// Every event the Hub ever asks the transport to deliver, per-connection or
/// broadcast (`spec.md` §6). Tagged as `{ "event": "<name>", "payload": {..} }`
/// when serialized by a JSON-based host such as `quiz-hub-server`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum OutboundEvent {
    /// Sent on connect or on request, only if a question is active.
    CurrentQuestion {
        question: String,
        question_id: QuestionId,
        difficulty: Difficulty,
        timestamp: u64,
    },
    /// Sent on connect or on request, when no question is active.
    WaitingForQuestion { message: String, timestamp: u64 },
    /// Sent to the winner only.
    YouWon {
        message: String,
        correct_answer: i64,
        question: String,
        timestamp: u64,
    },
    /// Sent to non-winning submitters.
    SubmissionResult {
        correct: bool,
        winner: bool,
        message: String,
        timestamp: u64,
    },
    /// Sent when a submission is rejected for policy reasons.
    SubmissionRejected {
        reason: SubmitRejection,
        message: String,
        timestamp: u64,
    },
    /// Sent on malformed input.
    SubmissionError { error: String, message: String, timestamp: u64 },
    /// Broadcast at each round start.
    NewQuestion {
        question: String,
        question_id: QuestionId,
        difficulty: Difficulty,
        timestamp: u64,
    },
    /// Broadcast at LOCKED entry.
    WinnerDeclared {
        winner_id: ConnId,
        correct_answer: i64,
        question: String,
        question_id: QuestionId,
        submission_time: u64,
        next_question_in: u64,
        timestamp: u64,
    },
    /// Broadcast at every `ParticipantRegistry` mutation.
    UserCount { count: usize },
}

impl Question {
    /// Shared by [`OutboundEvent::CurrentQuestion`] and
    /// [`OutboundEvent::NewQuestion`] construction sites in `hub`.
    pub(crate) fn as_current_question_event(&self) -> OutboundEvent {
        OutboundEvent::CurrentQuestion {
            question: self.expression.clone(),
            question_id: self.id.clone(),
            difficulty: self.difficulty,
            timestamp: crate::epoch_millis(),
        }
    }

    pub(crate) fn as_new_question_event(&self) -> OutboundEvent {
        OutboundEvent::NewQuestion {
            question: self.expression.clone(),
            question_id: self.id.clone(),
            difficulty: self.difficulty,
            timestamp: crate::epoch_millis(),
        }
    }
}
