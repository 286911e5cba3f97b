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

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::config::HubConfig;
use super::snapshot::{MachineSnapshot, ParticipantStats, RoundSnapshot, Snapshot};
use crate::epoch_millis;
use crate::lifecycle::{LifecycleMachine, LifecycleState};
use crate::question::{self, Difficulty, RawAnswer};
use crate::registry::ParticipantRegistry;
use crate::round::RoundState;
use crate::transport::{ConnId, OutboundEvent, Transport};

struct HubState {
    round: RoundState,
    machine: LifecycleMachine,
    registry: ParticipantRegistry,
    rotation_timer: Option<JoinHandle<()>>,
    config: HubConfig,
}

/// The sole writer to `RoundState` and `LifecycleMachine` (`spec.md` §4.4).
/// All mutation is serialized behind one `tokio::sync::Mutex`, held for the
/// entire synchronous handling of each inbound event — realization (b) of
/// the single-writer contract in `spec.md` §5.
///
/// Always constructed as an `Arc<Hub<T>>` ([`Hub::new`]) since the rotation
/// timer needs to call back into the Hub from a spawned task after the
/// triggering event's handler has already returned.
pub struct Hub<T: Transport + 'static> {
    state: Mutex<HubState>,
    transport: T,
}

impl<T: Transport + 'static> Hub<T> {
    pub fn new(config: HubConfig, transport: T) -> Arc<Self> {
        let mut round = RoundState::new();
        round
            .set_grace_period(config.grace_period.as_millis() as i64)
            .expect("default grace period is non-negative");
        Arc::new(Hub {
            state: Mutex::new(HubState {
                round,
                machine: LifecycleMachine::new(),
                registry: ParticipantRegistry::new(),
                rotation_timer: None,
                config,
            }),
            transport,
        })
    }

    /// Startup (`spec.md` §4.4): produce the first question, install it,
    /// transition IDLE→ACTIVE, broadcast `new-question`.
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        let question = question::generate(state.config.default_difficulty);
        state.round.set_question(question.clone());
        let _ = state.machine.transition(LifecycleState::Active, "startup");
        tracing::info!(question_id = ?question.id, "round started");
        self.transport.broadcast(question.as_new_question_event());
    }

    /// `connect(connId)` (`spec.md` §4.4 item 1). Does not reset the round.
    pub async fn connect(&self, conn_id: ConnId) {
        let mut state = self.state.lock().await;
        state.registry.insert(conn_id.clone());
        let count = state.registry.len();
        self.transport.broadcast(OutboundEvent::UserCount { count });
        self.send_question_state(&state, &conn_id);
    }

    /// `disconnect(connId)` (`spec.md` §4.4 item 2). The participant's
    /// submission, if any, is retained for the current round.
    pub async fn disconnect(&self, conn_id: ConnId) {
        let mut state = self.state.lock().await;
        state.registry.remove(&conn_id);
        let count = state.registry.len();
        self.transport.broadcast(OutboundEvent::UserCount { count });
    }

    /// `request-question(connId)` (`spec.md` §4.4 item 4).
    pub async fn request_question(&self, conn_id: ConnId) {
        let state = self.state.lock().await;
        self.send_question_state(&state, &conn_id);
    }

    fn send_question_state(&self, state: &HubState, conn_id: &ConnId) {
        match state.round.current_question() {
            Some(question) => self.transport.send_to(conn_id, question.as_current_question_event()),
            None => self.transport.send_to(
                conn_id,
                OutboundEvent::WaitingForQuestion {
                    message: "waiting for the next question".to_string(),
                    timestamp: epoch_millis(),
                },
            ),
        }
    }

    /// `submit-answer(connId, rawAnswer)` (`spec.md` §4.4 item 3). This is
    /// where the fairness guarantees in `spec.md` §5 are realized: `t` is
    /// stamped here, before the writer lock is acquired, and `attempt_win`
    /// is the single indivisible check-and-set per round.
    pub async fn submit_answer(self: &Arc<Self>, conn_id: ConnId, raw_answer: Option<RawAnswer>) {
        let received_at = Instant::now();
        let received_at_epoch_ms = epoch_millis();

        if raw_answer.as_ref().map(RawAnswer::is_blank).unwrap_or(true) {
            self.transport.send_to(
                &conn_id,
                OutboundEvent::SubmissionError {
                    error: "empty-answer".to_string(),
                    message: "submit a non-empty answer".to_string(),
                    timestamp: epoch_millis(),
                },
            );
            return;
        }
        let raw_answer = raw_answer.expect("checked non-blank above");

        let mut state = self.state.lock().await;

        if let Err(reason) = state.round.record_submission(conn_id.clone(), raw_answer.clone(), received_at) {
            let message = reason.to_string();
            self.transport.send_to(
                &conn_id,
                OutboundEvent::SubmissionRejected { reason, message, timestamp: epoch_millis() },
            );
            return;
        }

        let canonical = state
            .round
            .current_question()
            .map(|q| q.answer)
            .expect("record_submission only succeeds when a question is active");
        let is_correct = question::validate(&raw_answer, canonical);
        let won = state.round.attempt_win(conn_id.clone(), is_correct);

        if won {
            self.on_winner(&mut state, conn_id, received_at_epoch_ms);
        } else if is_correct {
            self.transport.send_to(
                &conn_id,
                OutboundEvent::SubmissionResult {
                    correct: true,
                    winner: false,
                    message: "correct, but someone already won this round".to_string(),
                    timestamp: epoch_millis(),
                },
            );
        } else {
            self.transport.send_to(
                &conn_id,
                OutboundEvent::SubmissionResult {
                    correct: false,
                    winner: false,
                    message: "incorrect".to_string(),
                    timestamp: epoch_millis(),
                },
            );
        }
    }

    /// Called with the writer lock already held, immediately after
    /// `attempt_win` returns `true`. Transitions ACTIVE→LOCKED, broadcasts
    /// `winner-declared`, sends `you-won` to the winner, and arms the
    /// rotation timer, cancelling any previously pending one first.
    fn on_winner(self: &Arc<Self>, state: &mut HubState, winner: ConnId, submission_time: u64) {
        let question = state
            .round
            .current_question()
            .cloned()
            .expect("winner implies an active question");
        let _ = state.machine.transition(LifecycleState::Locked, format!("winner={winner}"));
        tracing::info!(winner = %winner, question_id = ?question.id, "winner declared");

        let winner_display_duration = state.config.winner_display_duration;
        let post_lock_handoff_delay = state.config.post_lock_handoff_delay.min(winner_display_duration);

        self.transport.broadcast(OutboundEvent::WinnerDeclared {
            winner_id: winner.clone(),
            correct_answer: question.answer,
            question: question.expression.clone(),
            question_id: question.id.clone(),
            submission_time,
            next_question_in: winner_display_duration.as_millis() as u64,
            timestamp: epoch_millis(),
        });
        self.transport.send_to(
            &winner,
            OutboundEvent::YouWon {
                message: "you won this round!".to_string(),
                correct_answer: question.answer,
                question: question.expression,
                timestamp: epoch_millis(),
            },
        );

        if let Some(handle) = state.rotation_timer.take() {
            handle.abort();
        }
        let remaining = winner_display_duration.saturating_sub(post_lock_handoff_delay);
        let hub = Arc::clone(self);
        state.rotation_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(post_lock_handoff_delay).await;
            hub.on_handoff().await;
            tokio::time::sleep(remaining).await;
            hub.on_rotate().await;
        }));
    }

    /// Purely observational LOCKED→TRANSITIONING transition, `spec.md`
    /// §4.4's `postLockHandoffDelay` after the LOCKED moment.
    async fn on_handoff(&self) {
        let mut state = self.state.lock().await;
        let _ = state.machine.transition(LifecycleState::Transitioning, "post-lock-handoff");
    }

    /// Generates the next question, installs it, transitions
    /// TRANSITIONING→ACTIVE, and broadcasts `new-question`.
    async fn on_rotate(&self) {
        let mut state = self.state.lock().await;
        let question = question::generate(state.config.default_difficulty);
        state.round.set_question(question.clone());
        let _ = state.machine.transition(LifecycleState::Active, "rotate");
        state.rotation_timer = None;
        tracing::info!(question_id = ?question.id, "round rotated");
        self.transport.broadcast(question.as_new_question_event());
    }

    /// Administrative escape hatch (`spec.md` §6): force a new question
    /// regardless of the current phase, cancelling any pending rotation.
    pub async fn force_new_question(self: &Arc<Self>, difficulty: Option<Difficulty>) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.rotation_timer.take() {
            handle.abort();
        }
        let difficulty = difficulty.unwrap_or(state.config.default_difficulty);
        let question = question::generate(difficulty);
        state.round.set_question(question.clone());
        Self::route_to_active(&mut state.machine);
        tracing::info!(question_id = ?question.id, "admin forced a new question");
        self.transport.broadcast(question.as_new_question_event());
    }

    /// Administrative escape hatch: discard the in-flight round and return
    /// to IDLE without installing a new question.
    pub async fn reset_round(&self) {
        let mut state = self.state.lock().await;
        if let Some(handle) = state.rotation_timer.take() {
            handle.abort();
        }
        state.round.reset();
        Self::route_to_idle(&mut state.machine);
        tracing::info!("admin reset the round");
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        Snapshot {
            round: RoundSnapshot {
                question_id: state.round.current_question().map(|q| q.id.clone()),
                answer: state.round.current_question().map(|q| q.answer),
                locked: state.round.locked(),
                winner: state.round.winner().cloned(),
                submission_count: state.round.submissions_ordered().len(),
            },
            stats: ParticipantStats { online_count: state.registry.len() },
            machine: MachineSnapshot {
                current_state: state.machine.state(),
                visit_counts: state.machine.visit_counts(),
                mean_dwell_time: state.machine.mean_dwell_time(),
            },
        }
    }

    /// Drives the machine to ACTIVE via whichever legal edge its current
    /// state allows. `spec.md` leaves `forceNewQuestion`'s interaction with
    /// the lifecycle machine unspecified (an Open Question, see
    /// DESIGN.md) — we resolve it by routing through TRANSITIONING when
    /// coming from LOCKED, and through IDLE when coming from ACTIVE itself,
    /// so every step stays within the allowed-transition table.
    fn route_to_active(machine: &mut LifecycleMachine) {
        match machine.state() {
            LifecycleState::Idle | LifecycleState::Transitioning => {
                let _ = machine.transition(LifecycleState::Active, "admin-force-new-question");
            },
            LifecycleState::Active => {},
            LifecycleState::Locked => {
                let _ = machine.transition(LifecycleState::Transitioning, "admin-force-new-question");
                let _ = machine.transition(LifecycleState::Active, "admin-force-new-question");
            },
        }
    }

    fn route_to_idle(machine: &mut LifecycleMachine) {
        match machine.state() {
            LifecycleState::Idle => {},
            LifecycleState::Active | LifecycleState::Transitioning => {
                let _ = machine.transition(LifecycleState::Idle, "admin-reset-round");
            },
            LifecycleState::Locked => {
                let _ = machine.transition(LifecycleState::Transitioning, "admin-reset-round");
                let _ = machine.transition(LifecycleState::Idle, "admin-reset-round");
            },
        }
    }
}
