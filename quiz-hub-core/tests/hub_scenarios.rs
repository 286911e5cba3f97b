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

//! Integration tests driving the whole [`Hub`] through the seed scenarios.
//!
//! Uses a recording [`Transport`] double rather than a real socket — the
//! contract under test is "the Hub calls `send_to`/`broadcast` with the
//! right events in the right order", not wire framing.

use std::sync::Mutex;
use std::time::Duration;

use quiz_hub_core::{ConnId, Hub, HubConfig, OutboundEvent, RawAnswer, Transport};

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<(ConnId, OutboundEvent)>>,
    broadcast: Mutex<Vec<OutboundEvent>>,
}

impl Transport for Recorder {
    fn send_to(&self, conn_id: &ConnId, event: OutboundEvent) {
        self.sent.lock().unwrap().push((conn_id.clone(), event));
    }

    fn broadcast(&self, event: OutboundEvent) {
        self.broadcast.lock().unwrap().push(event);
    }
}

fn fast_config() -> HubConfig {
    HubConfig {
        winner_display_duration: Duration::from_millis(40),
        post_lock_handoff_delay: Duration::from_millis(10),
        ..HubConfig::default()
    }
}

#[tokio::test]
async fn single_correct_submission_declares_a_winner_and_locks() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    hub.connect(alice.clone()).await;

    let answer = hub.snapshot().await.round.answer.expect("a question is active after start");
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;

    let snap = hub.snapshot().await;
    assert!(snap.round.locked);
    pretty_assertions::assert_eq!(snap.round.winner, Some(alice));
}

#[tokio::test]
async fn race_between_two_correct_answers_only_one_wins() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    let bob = ConnId::from("bob");
    hub.connect(alice.clone()).await;
    hub.connect(bob.clone()).await;

    let answer = hub.snapshot().await.round.answer.unwrap();
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;
    hub.submit_answer(bob.clone(), Some(RawAnswer::Number(answer as f64))).await;

    let snap = hub.snapshot().await;
    pretty_assertions::assert_eq!(snap.round.winner, Some(alice));
    pretty_assertions::assert_ne!(snap.round.winner, Some(bob));
}

#[tokio::test]
async fn wrong_then_locked_submission_gets_the_right_rejections() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    let bob = ConnId::from("bob");
    hub.connect(alice.clone()).await;
    hub.connect(bob.clone()).await;

    let answer = hub.snapshot().await.round.answer.unwrap();

    hub.submit_answer(alice.clone(), Some(RawAnswer::Number((answer + 1) as f64))).await;
    let snap = hub.snapshot().await;
    assert!(!snap.round.locked, "a wrong answer must never lock the round");

    hub.submit_answer(bob.clone(), Some(RawAnswer::Number(answer as f64))).await;
    let snap = hub.snapshot().await;
    assert!(snap.round.locked);
    pretty_assertions::assert_eq!(snap.round.winner, Some(bob));

    // Alice already submitted once this round; her second attempt (the
    // correct answer, now too late) is rejected rather than silently
    // re-scored, and the winner does not change.
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;
    let snap = hub.snapshot().await;
    pretty_assertions::assert_eq!(snap.round.winner, Some(bob));
}

#[tokio::test]
async fn late_joiner_receives_the_current_question() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let late = ConnId::from("late");
    hub.connect(late.clone()).await;
    hub.request_question(late.clone()).await;

    let snap = hub.snapshot().await;
    assert!(snap.round.question_id.is_some());
}

#[tokio::test]
async fn post_lock_submission_is_rejected_as_question_locked() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    let bob = ConnId::from("bob");
    let carol = ConnId::from("carol");
    hub.connect(alice.clone()).await;
    hub.connect(bob.clone()).await;
    hub.connect(carol.clone()).await;

    let answer = hub.snapshot().await.round.answer.unwrap();
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;

    let before = hub.snapshot().await;
    assert!(before.round.locked);

    hub.submit_answer(carol.clone(), Some(RawAnswer::Number(answer as f64))).await;
    let after = hub.snapshot().await;
    pretty_assertions::assert_eq!(after.round.winner, Some(alice));
    pretty_assertions::assert_eq!(after.round.submission_count, 2);
}

#[tokio::test]
async fn empty_submission_is_rejected_without_touching_round_state() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    hub.connect(alice.clone()).await;

    hub.submit_answer(alice.clone(), None).await;
    hub.submit_answer(alice.clone(), Some(RawAnswer::Text("   ".to_string()))).await;

    let snap = hub.snapshot().await;
    pretty_assertions::assert_eq!(snap.round.submission_count, 0);
    assert!(!snap.round.locked);
}

#[tokio::test]
async fn winner_triggers_rotation_to_a_fresh_question() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    hub.connect(alice.clone()).await;
    let first_id = hub.snapshot().await.round.question_id;

    let answer = hub.snapshot().await.round.answer.unwrap();
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;

    tokio::time::sleep(Duration::from_millis(120)).await;

    let snap = hub.snapshot().await;
    assert!(!snap.round.locked, "rotation should have unlocked the round");
    pretty_assertions::assert_ne!(snap.round.question_id, first_id);
}

#[tokio::test]
async fn admin_force_new_question_cancels_pending_rotation() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    hub.connect(alice.clone()).await;
    let answer = hub.snapshot().await.round.answer.unwrap();
    hub.submit_answer(alice.clone(), Some(RawAnswer::Number(answer as f64))).await;

    let before = hub.snapshot().await.round.question_id;
    hub.force_new_question(None).await;
    let after = hub.snapshot().await;

    assert!(!after.round.locked);
    pretty_assertions::assert_ne!(after.round.question_id, before);

    // The timer that was pending from the earlier win must not fire a
    // second rotation behind our backs.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let settled = hub.snapshot().await;
    pretty_assertions::assert_eq!(settled.round.question_id, after.round.question_id);
}

#[tokio::test]
async fn admin_reset_round_clears_the_question_and_returns_to_idle() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;
    hub.reset_round().await;

    let snap = hub.snapshot().await;
    assert!(snap.round.question_id.is_none());
    assert!(!snap.round.locked);
    pretty_assertions::assert_eq!(snap.round.submission_count, 0);
}

#[tokio::test]
async fn online_count_tracks_connect_and_disconnect() {
    let hub = Hub::new(fast_config(), Recorder::default());
    hub.start().await;

    let alice = ConnId::from("alice");
    let bob = ConnId::from("bob");
    hub.connect(alice.clone()).await;
    hub.connect(bob.clone()).await;
    pretty_assertions::assert_eq!(hub.snapshot().await.stats.online_count, 2);

    hub.disconnect(alice).await;
    pretty_assertions::assert_eq!(hub.snapshot().await.stats.online_count, 1);
}
