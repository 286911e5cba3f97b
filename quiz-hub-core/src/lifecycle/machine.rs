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
use std::time::{Duration, Instant};

use serde::Serialize;

/// One of the four round phases (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifecycleState {
    Idle,
    Active,
    Locked,
    Transitioning,
}

/// Appended to [`LifecycleMachine::history`] on every successful transition.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub at: Instant,
    pub context: String,
}

/// Raised by [`LifecycleMachine::transition`] when `(from, to)` is not in the
/// allowed set. This is a logic bug, not a participant-facing error — the
/// machine logs a warning and keeps its previous state rather than crash or
/// silently corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal lifecycle transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Thin wrapper enforcing the allowed-transition table:
/// IDLE→ACTIVE, ACTIVE→LOCKED, ACTIVE→IDLE, LOCKED→TRANSITIONING,
/// TRANSITIONING→ACTIVE, TRANSITIONING→IDLE.
#[derive(Debug)]
pub struct LifecycleMachine {
    state: LifecycleState,
    history: Vec<TransitionRecord>,
    created_at: Instant,
}

impl Default for LifecycleMachine {
    fn default() -> Self { Self::new() }
}

impl LifecycleMachine {
    pub fn new() -> Self {
        LifecycleMachine { state: LifecycleState::Idle, history: Vec::new(), created_at: Instant::now() }
    }

    pub fn state(&self) -> LifecycleState { self.state }

    pub fn history(&self) -> &[TransitionRecord] { &self.history }

    /// Attempts `from -> target`. On an illegal pair, logs a warning via
    /// `tracing` and returns `Err` without mutating `self.state` — the
    /// caller (the Hub) is expected to treat this as "keep prior state; do
    /// not crash" per `spec.md` §7.
    pub fn transition(
        &mut self,
        target: LifecycleState,
        context: impl Into<String>,
    ) -> Result<(), TransitionError> {
        let from = self.state;
        if !Self::is_allowed(from, target) {
            let context = context.into();
            tracing::warn!(?from, to = ?target, %context, "rejected illegal lifecycle transition");
            return Err(TransitionError { from, to: target });
        }
        self.history.push(TransitionRecord { from, to: target, at: Instant::now(), context: context.into() });
        self.state = target;
        Ok(())
    }

    fn is_allowed(from: LifecycleState, to: LifecycleState) -> bool {
        use LifecycleState::{Active, Idle, Locked, Transitioning};
        matches!(
            (from, to),
            (Idle, Active)
                | (Active, Locked)
                | (Active, Idle)
                | (Locked, Transitioning)
                | (Transitioning, Active)
                | (Transitioning, Idle)
        )
    }

    /// How many times each state has been entered, including the implicit
    /// initial `IDLE` at construction.
    pub fn visit_counts(&self) -> HashMap<LifecycleState, usize> {
        let mut counts = HashMap::new();
        *counts.entry(LifecycleState::Idle).or_insert(0) += 1;
        for record in &self.history {
            *counts.entry(record.to).or_insert(0) += 1;
        }
        counts
    }

    /// Mean time spent in each state across completed dwells (a dwell still
    /// in progress — the current state — is not counted). Diagnostic only.
    pub fn mean_dwell_time(&self) -> HashMap<LifecycleState, Duration> {
        let mut totals: HashMap<LifecycleState, Duration> = HashMap::new();
        let mut counts: HashMap<LifecycleState, u32> = HashMap::new();
        let mut prev_time = self.created_at;
        let mut prev_state = LifecycleState::Idle;
        for record in &self.history {
            let dwell = record.at.saturating_duration_since(prev_time);
            *totals.entry(prev_state).or_insert(Duration::ZERO) += dwell;
            *counts.entry(prev_state).or_insert(0) += 1;
            prev_time = record.at;
            prev_state = record.to;
        }
        totals
            .into_iter()
            .map(|(state, total)| {
                let n = counts.get(&state).copied().unwrap_or(1).max(1);
                (state, total / n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions_succeed_in_sequence() {
        let mut machine = LifecycleMachine::new();
        assert!(machine.transition(LifecycleState::Active, "start").is_ok());
        assert!(machine.transition(LifecycleState::Locked, "winner").is_ok());
        assert!(machine.transition(LifecycleState::Transitioning, "handoff").is_ok());
        assert!(machine.transition(LifecycleState::Active, "rotate").is_ok());
        pretty_assertions::assert_eq!(machine.state(), LifecycleState::Active);
        pretty_assertions::assert_eq!(machine.history().len(), 4);
    }

    #[test]
    fn illegal_transition_is_rejected_and_state_is_unchanged() {
        let mut machine = LifecycleMachine::new();
        machine.transition(LifecycleState::Active, "start").unwrap();
        let result = machine.transition(LifecycleState::Transitioning, "bogus");
        assert!(result.is_err());
        pretty_assertions::assert_eq!(machine.state(), LifecycleState::Active);
        pretty_assertions::assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn every_recorded_transition_is_in_the_allowed_set() {
        let mut machine = LifecycleMachine::new();
        let _ = machine.transition(LifecycleState::Active, "1");
        let _ = machine.transition(LifecycleState::Locked, "2");
        let _ = machine.transition(LifecycleState::Idle, "bad"); // rejected, not recorded
        let _ = machine.transition(LifecycleState::Transitioning, "3");
        let _ = machine.transition(LifecycleState::Idle, "4");

        for record in machine.history() {
            assert!(LifecycleMachine::is_allowed(record.from, record.to));
        }
    }

    #[test]
    fn visit_counts_include_the_implicit_initial_idle() {
        let mut machine = LifecycleMachine::new();
        machine.transition(LifecycleState::Active, "1").unwrap();
        machine.transition(LifecycleState::Idle, "2").unwrap();
        machine.transition(LifecycleState::Active, "3").unwrap();

        let counts = machine.visit_counts();
        pretty_assertions::assert_eq!(counts[&LifecycleState::Idle], 2);
        pretty_assertions::assert_eq!(counts[&LifecycleState::Active], 2);
    }
}
