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

use std::time::Instant;

use crate::question::RawAnswer;
use crate::transport::ConnId;

/// Per-(round, connection) record. Created once, on a non-duplicate
/// submission in an `ACTIVE` round; never mutated; discarded on round reset.
#[derive(Debug, Clone)]
pub struct Submission {
    pub conn_id: ConnId,
    pub raw_answer: RawAnswer,
    /// Server-assigned monotonic receipt time — never a client-provided
    /// time, per `spec.md` §3.
    pub received_at: Instant,
}
