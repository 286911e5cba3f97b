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

//! The connected-participant registry (`spec.md` §3). Mutated only on
//! connect and disconnect; its size is the broadcast "online count".

use std::collections::HashMap;
use std::time::Instant;

use crate::transport::ConnId;

/// A single live connection's identity and the instant it connected.
#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    pub conn_id: ConnId,
    pub connected_at: Instant,
}

#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    connections: HashMap<ConnId, ParticipantRecord>,
}

impl ParticipantRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, conn_id: ConnId) {
        self.connections.insert(
            conn_id.clone(),
            ParticipantRecord { conn_id, connected_at: Instant::now() },
        );
    }

    pub fn remove(&mut self, conn_id: &ConnId) -> Option<ParticipantRecord> {
        self.connections.remove(conn_id)
    }

    pub fn len(&self) -> usize { self.connections.len() }

    pub fn is_empty(&self) -> bool { self.connections.is_empty() }

    pub fn contains(&self, conn_id: &ConnId) -> bool { self.connections.contains_key(conn_id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove_track_online_count() {
        let mut registry = ParticipantRegistry::new();
        pretty_assertions::assert_eq!(registry.len(), 0);

        registry.insert(ConnId::from("a"));
        registry.insert(ConnId::from("b"));
        pretty_assertions::assert_eq!(registry.len(), 2);

        registry.remove(&ConnId::from("a"));
        pretty_assertions::assert_eq!(registry.len(), 1);
        assert!(registry.contains(&ConnId::from("b")));
    }

    #[test]
    fn removing_unknown_connection_is_a_no_op() {
        let mut registry = ParticipantRegistry::new();
        assert!(registry.remove(&ConnId::from("ghost")).is_none());
        pretty_assertions::assert_eq!(registry.len(), 0);
    }
}
