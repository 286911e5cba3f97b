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

//! The external transport contract (`spec.md` §4.5, §6).
//!
//! This module only defines the trait and the wire-facing event types — the
//! core never opens a socket. A host crate (`quiz-hub-server`) supplies the
//! one real implementation.

mod events;

pub use events::OutboundEvent;

use serde::{Deserialize, Serialize};

/// Stable, opaque identifier for one live connection. Unique per live
/// connection; a reconnect gets a fresh id (`spec.md` §9 — do not attempt to
/// correlate reconnects to previous rounds).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnId(pub String);

impl From<&str> for ConnId {
    fn from(value: &str) -> Self { ConnId(value.to_string()) }
}

impl From<String> for ConnId {
    fn from(value: String) -> Self { ConnId(value) }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// What the Hub expects of its host: best-effort delivery to one connection,
/// and delivery to every currently connected participant.
///
/// The transport MUST deliver messages from a single connection in order,
/// MUST invoke connect before any message for that connection, and MUST
/// invoke disconnect at most once after the last message for that
/// connection. Send calls are fire-and-forget from the Hub's perspective —
/// they must not require acknowledgment before the Hub's critical section
/// releases (`spec.md` §5).
pub trait Transport: Send + Sync {
    fn send_to(&self, conn_id: &ConnId, event: OutboundEvent);
    fn broadcast(&self, event: OutboundEvent);
}
