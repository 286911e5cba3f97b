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

//! Pure question generation and answer validation.
//!
//! Nothing in this module holds per-round state — [`generate`] and
//! [`validate`] are safe to call from any context, including concurrently
//! from multiple Hubs. The only shared state is the process-wide id counter
//! that keeps generated [`QuestionId`]s unique (see [`types::next_question_id`]).

mod generator;
mod types;

pub use generator::{default_config, generate, validate};
pub use types::{Difficulty, DifficultyConfig, Operator, Question, QuestionId, RawAnswer};
