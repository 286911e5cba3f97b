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

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::epoch_millis;

/// Difficulty tag. Drives the operand range and allowed operators in
/// [`super::generator::default_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self { Difficulty::Medium }
}

/// One of the three arithmetic operators this core supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
        }
    }
}

/// Per-difficulty operand range and allowed operator set.
#[derive(Debug, Clone)]
pub struct DifficultyConfig {
    pub min_operand: i64,
    pub max_operand: i64,
    pub operators: Vec<Operator>,
}

/// Opaque, globally-unique-per-process question identifier.
///
/// Built from a monotonic counter plus a random suffix
/// (`spec.md` §4.1: "a monotonic counter combined with a random suffix is
/// sufficient"), matching the counter-plus-entropy id shape the teacher uses
/// for its own atomic counters (see `AtomicU8Ext` in the `tui` crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

static QUESTION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Allocates the next globally-unique question id. Never repeats within a
/// process run (P6).
pub(crate) fn next_question_id() -> QuestionId {
    let seq = QUESTION_ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    let suffix: u32 = rand::thread_rng().gen();
    QuestionId(format!("q-{seq:x}-{suffix:08x}"))
}

/// Immutable record produced by [`super::generate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub expression: String,
    pub answer: i64,
    pub difficulty: Difficulty,
    pub created_at_epoch_ms: u64,
}

impl Question {
    pub(crate) fn new(operand_a: i64, operator: Operator, operand_b: i64, difficulty: Difficulty) -> Self {
        let answer = match operator {
            Operator::Add => operand_a + operand_b,
            Operator::Sub => operand_a - operand_b,
            Operator::Mul => operand_a * operand_b,
        };
        Question {
            id: next_question_id(),
            expression: format!("{operand_a} {} {operand_b}", operator.symbol()),
            answer,
            difficulty,
            created_at_epoch_ms: epoch_millis(),
        }
    }
}

/// A raw submitted answer, as received over the wire: either a JSON number or
/// a JSON string. [`super::validate`] accepts both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Number(f64),
    Text(String),
}

impl RawAnswer {
    /// True for an absent answer, an empty string, or a whitespace-only
    /// string. A numeric answer is never considered empty.
    pub fn is_blank(&self) -> bool {
        match self {
            RawAnswer::Number(_) => false,
            RawAnswer::Text(s) => s.trim().is_empty(),
        }
    }
}

impl std::fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawAnswer::Number(n) => write!(f, "{n}"),
            RawAnswer::Text(s) => write!(f, "{s}"),
        }
    }
}
