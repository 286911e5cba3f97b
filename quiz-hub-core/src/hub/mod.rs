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

//! The single-writer orchestrator (`spec.md` §4.4) tying together
//! [`crate::round`], [`crate::lifecycle`], [`crate::registry`] and a
//! [`crate::transport::Transport`] implementation supplied by the host.

mod config;
mod core;
mod snapshot;

pub use config::HubConfig;
pub use core::Hub;
pub use snapshot::{MachineSnapshot, ParticipantStats, RoundSnapshot, Snapshot};
