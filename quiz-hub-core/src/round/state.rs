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

use serde::{Deserialize, Serialize};

use super::submission::Submission;
use crate::question::{Question, RawAnswer};
use crate::transport::ConnId;

/// Reason a [`RoundState::record_submission`] call was rejected. Matches the
/// `reason` strings `spec.md` §6 puts on the outbound `submission-rejected`
/// event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitRejection {
    #[error("the question is already locked")]
    QuestionLocked,
    #[error("this connection already submitted an answer this round")]
    AlreadySubmitted,
    #[error("there is no active question")]
    NoQuestion,
}

/// Returned by [`RoundState::set_grace_period`] when asked for a negative
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("grace period must not be negative, got {0}ms")]
pub struct GracePeriodError(pub i64);

const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(100);

/// The mutable heart of the core (`spec.md` §3). Owns the current question,
/// the per-connection submission map, submission arrival order, the lock,
/// and the winner.
///
/// Invariants (see `spec.md` §3 I1–I4) are maintained by construction: every
/// mutating method re-establishes them before returning.
#[derive(Debug)]
pub struct RoundState {
    question: Option<Question>,
    submissions: HashMap<ConnId, Submission>,
    order: Vec<(ConnId, Instant)>,
    locked: bool,
    winner: Option<ConnId>,
    grace_period: Duration,
}

impl Default for RoundState {
    fn default() -> Self { Self::new() }
}

impl RoundState {
    pub fn new() -> Self {
        RoundState {
            question: None,
            submissions: HashMap::new(),
            order: Vec::new(),
            locked: false,
            winner: None,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    /// Atomic swap: installs `question`, clears submissions, the order
    /// list, the lock and the winner. Re-establishes I1–I4.
    pub fn set_question(&mut self, question: Question) {
        self.question = Some(question);
        self.submissions.clear();
        self.order.clear();
        self.locked = false;
        self.winner = None;
    }

    /// Returns to a fully empty state (I4).
    pub fn reset(&mut self) {
        self.question = None;
        self.submissions.clear();
        self.order.clear();
        self.locked = false;
        self.winner = None;
    }

    /// Records a submission if none of the rejection preconditions hold.
    /// Preconditions are checked in the order `spec.md` §4.2 specifies:
    /// locked, then already-submitted, then no-question.
    pub fn record_submission(
        &mut self,
        conn_id: ConnId,
        raw_answer: RawAnswer,
        received_at: Instant,
    ) -> Result<(), SubmitRejection> {
        if self.locked {
            return Err(SubmitRejection::QuestionLocked);
        }
        if self.submissions.contains_key(&conn_id) {
            return Err(SubmitRejection::AlreadySubmitted);
        }
        if self.question.is_none() {
            return Err(SubmitRejection::NoQuestion);
        }
        self.order.push((conn_id.clone(), received_at));
        self.submissions.insert(
            conn_id.clone(),
            Submission { conn_id, raw_answer, received_at },
        );
        Ok(())
    }

    /// The critical section (`spec.md` §4.2, §5): check-and-set must be
    /// indivisible with respect to other `attempt_win` calls in this round.
    /// Callers serialize this themselves (the Hub holds its single writer
    /// lock across the call) — this method does not take its own lock.
    pub fn attempt_win(&mut self, conn_id: ConnId, is_correct: bool) -> bool {
        if self.locked || !is_correct {
            return false;
        }
        self.locked = true;
        self.winner = Some(conn_id);
        true
    }

    pub fn current_question(&self) -> Option<&Question> { self.question.as_ref() }

    pub fn has_submitted(&self, conn_id: &ConnId) -> bool {
        self.submissions.contains_key(conn_id)
    }

    pub fn submission(&self, conn_id: &ConnId) -> Option<&Submission> {
        self.submissions.get(conn_id)
    }

    pub fn winner(&self) -> Option<&ConnId> { self.winner.as_ref() }

    pub fn locked(&self) -> bool { self.locked }

    /// Submissions sorted by timestamp ascending; ties broken by insertion
    /// order. `order` is already insertion-ordered, so a stable sort is
    /// sufficient to satisfy the tie-break rule.
    pub fn submissions_ordered(&self) -> Vec<&Submission> {
        let mut entries: Vec<&(ConnId, Instant)> = self.order.iter().collect();
        entries.sort_by_key(|(_, t)| *t);
        entries
            .into_iter()
            .filter_map(|(conn_id, _)| self.submissions.get(conn_id))
            .collect()
    }

    /// Prefix of [`Self::submissions_ordered`] whose timestamps lie within
    /// `first_timestamp + grace_period` inclusive. Diagnostic only — winner
    /// selection never consults this (`spec.md` §9).
    pub fn grace_period_submissions(&self) -> Vec<&Submission> {
        let ordered = self.submissions_ordered();
        let Some(first) = ordered.first() else { return Vec::new() };
        let deadline = first.received_at + self.grace_period;
        ordered
            .into_iter()
            .take_while(|s| s.received_at <= deadline)
            .collect()
    }

    pub fn grace_period(&self) -> Duration { self.grace_period }

    /// Rejects negative durations with an error (`spec.md` §4.2).
    pub fn set_grace_period(&mut self, ms: i64) -> Result<(), GracePeriodError> {
        if ms < 0 {
            return Err(GracePeriodError(ms));
        }
        self.grace_period = Duration::from_millis(ms as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{Difficulty, Operator, Question};

    fn sample_question(answer: i64) -> Question {
        Question {
            id: crate::question::QuestionId("q-test".to_string()),
            expression: format!("{answer} + 0"),
            answer,
            difficulty: Difficulty::Easy,
            created_at_epoch_ms: 0,
        }
    }

    #[test]
    fn new_question_resets_everything() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        round
            .record_submission(ConnId("a".into()), RawAnswer::Number(1.0), Instant::now())
            .unwrap();
        round.attempt_win(ConnId("a".into()), true);
        assert!(round.locked());

        round.set_question(sample_question(20));
        assert!(!round.locked());
        assert!(round.winner().is_none());
        assert!(round.submissions_ordered().is_empty());
    }

    #[test]
    fn no_question_rejects_submission() {
        let mut round = RoundState::new();
        let result = round.record_submission(ConnId("a".into()), RawAnswer::Number(1.0), Instant::now());
        pretty_assertions::assert_eq!(result, Err(SubmitRejection::NoQuestion));
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        round
            .record_submission(ConnId("a".into()), RawAnswer::Number(1.0), Instant::now())
            .unwrap();
        let result = round.record_submission(ConnId("a".into()), RawAnswer::Number(2.0), Instant::now());
        pretty_assertions::assert_eq!(result, Err(SubmitRejection::AlreadySubmitted));
    }

    #[test]
    fn locked_round_rejects_further_submissions() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        round
            .record_submission(ConnId("a".into()), RawAnswer::Number(15.0), Instant::now())
            .unwrap();
        assert!(round.attempt_win(ConnId("a".into()), true));

        let result = round.record_submission(ConnId("b".into()), RawAnswer::Number(15.0), Instant::now());
        pretty_assertions::assert_eq!(result, Err(SubmitRejection::QuestionLocked));
    }

    #[test]
    fn only_first_correct_attempt_wins() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        assert!(round.attempt_win(ConnId("a".into()), true));
        assert!(!round.attempt_win(ConnId("b".into()), true));
        pretty_assertions::assert_eq!(round.winner(), Some(&ConnId("a".into())));
    }

    #[test]
    fn wrong_answer_never_wins_and_does_not_lock() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        assert!(!round.attempt_win(ConnId("a".into()), false));
        assert!(!round.locked());
    }

    #[test]
    fn grace_period_rejects_negative_durations() {
        let mut round = RoundState::new();
        pretty_assertions::assert_eq!(round.set_grace_period(-1), Err(GracePeriodError(-1)));
        assert!(round.set_grace_period(250).is_ok());
        pretty_assertions::assert_eq!(round.grace_period(), Duration::from_millis(250));
    }

    #[test]
    fn grace_period_submissions_is_a_prefix_within_the_window() {
        let mut round = RoundState::new();
        round.set_question(sample_question(15));
        round.set_grace_period(50).unwrap();

        let t0 = Instant::now();
        round.record_submission(ConnId("a".into()), RawAnswer::Number(1.0), t0).unwrap();
        round
            .record_submission(ConnId("b".into()), RawAnswer::Number(2.0), t0 + Duration::from_millis(10))
            .unwrap();
        round
            .record_submission(ConnId("c".into()), RawAnswer::Number(3.0), t0 + Duration::from_millis(200))
            .unwrap();

        let within = round.grace_period_submissions();
        pretty_assertions::assert_eq!(within.len(), 2);
        pretty_assertions::assert_eq!(within[0].conn_id, ConnId("a".into()));
        pretty_assertions::assert_eq!(within[1].conn_id, ConnId("b".into()));
    }
}
