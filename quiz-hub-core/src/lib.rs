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

//! Server-side core of a live competitive quiz hub.
//!
//! This crate owns no transport, no CLI, and no environment loading — it is
//! consumed by a host (see `quiz-hub-server`) that supplies a concrete
//! [`transport::Transport`] implementation and dispatches inbound events into
//! [`hub::Hub`].
//!
//! Module map:
//! - [`question`] — pure question generation and answer validation.
//! - [`round`] — per-round mutable state (the current question, submissions,
//!   the lock, the winner).
//! - [`lifecycle`] — the four-state round lifecycle machine.
//! - [`registry`] — the connected-participant registry.
//! - [`transport`] — the external transport contract (trait only).
//! - [`hub`] — the single-writer orchestrator tying the above together.

pub mod hub;
pub mod lifecycle;
pub mod question;
pub mod registry;
pub mod round;
pub mod transport;

mod time;
pub use time::epoch_millis;

pub use hub::{Hub, HubConfig};
pub use lifecycle::{LifecycleMachine, LifecycleState, TransitionError};
pub use question::{Difficulty, Question, QuestionId, RawAnswer};
pub use registry::ParticipantRegistry;
pub use round::{GracePeriodError, RoundState, SubmitRejection, Submission};
pub use transport::{ConnId, OutboundEvent, Transport};
