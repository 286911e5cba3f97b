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

use rand::Rng;

use super::types::{Difficulty, DifficultyConfig, Operator, Question, RawAnswer};

/// Returns the default operand range and allowed operators for a difficulty
/// tag, per `spec.md` §4.1's table.
pub fn default_config(difficulty: Difficulty) -> DifficultyConfig {
    match difficulty {
        Difficulty::Easy => DifficultyConfig {
            min_operand: 1,
            max_operand: 50,
            operators: vec![Operator::Add, Operator::Sub],
        },
        Difficulty::Medium => DifficultyConfig {
            min_operand: 1,
            max_operand: 100,
            operators: vec![Operator::Add, Operator::Sub, Operator::Mul],
        },
        Difficulty::Hard => DifficultyConfig {
            min_operand: 10,
            max_operand: 100,
            operators: vec![Operator::Add, Operator::Sub, Operator::Mul],
        },
    }
}

/// Generates a new arithmetic problem for `difficulty`.
///
/// - Operands are drawn uniformly from the difficulty's range; the operator
///   is drawn uniformly from the allowed set.
/// - For `*`, both operands are redrawn from `[min, min(max, 20)]` to bound
///   the product.
/// - For `-`, operands are ordered so the answer is non-negative (I5).
pub fn generate(difficulty: Difficulty) -> Question {
    let config = default_config(difficulty);
    generate_with_config(difficulty, &config)
}

/// As [`generate`], but with an explicit [`DifficultyConfig`] — useful for
/// tests that want to probe edge ranges without touching the defaults.
pub fn generate_with_config(difficulty: Difficulty, config: &DifficultyConfig) -> Question {
    let mut rng = rand::thread_rng();
    let operator = config.operators[rng.gen_range(0..config.operators.len())];

    let (a, b) = match operator {
        Operator::Mul => {
            let bounded_max = config.max_operand.min(20).max(config.min_operand);
            let a = rng.gen_range(config.min_operand..=bounded_max);
            let b = rng.gen_range(config.min_operand..=bounded_max);
            (a, b)
        },
        Operator::Add => (
            rng.gen_range(config.min_operand..=config.max_operand),
            rng.gen_range(config.min_operand..=config.max_operand),
        ),
        Operator::Sub => {
            let mut a = rng.gen_range(config.min_operand..=config.max_operand);
            let mut b = rng.gen_range(config.min_operand..=config.max_operand);
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }
            (a, b)
        },
    };

    Question::new(a, operator, b, difficulty)
}

/// Validates a raw submission against the canonical answer.
///
/// Trims whitespace, rejects empty/absent/non-parseable values, and accepts
/// anything within `1e-4` of `canonical` (P5).
pub fn validate(raw: &RawAnswer, canonical: i64) -> bool {
    if raw.is_blank() {
        return false;
    }
    let parsed: Option<f64> = match raw {
        RawAnswer::Number(n) => Some(*n),
        RawAnswer::Text(s) => s.trim().parse::<f64>().ok(),
    };
    match parsed {
        Some(p) => (p - canonical as f64).abs() < 1e-4,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easy_uses_plus_and_minus_only() {
        for _ in 0..200 {
            let q = generate(Difficulty::Easy);
            assert!(q.expression.contains('+') || q.expression.contains('-'));
            assert!(!q.expression.contains('*'));
        }
    }

    #[test]
    fn subtraction_answer_is_never_negative() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..500 {
                let q = generate(difficulty);
                if q.expression.contains('-') {
                    assert!(q.answer >= 0, "subtraction produced a negative answer: {q:?}");
                }
            }
        }
    }

    #[test]
    fn multiplication_operands_are_bounded() {
        let config = DifficultyConfig {
            min_operand: 1,
            max_operand: 100,
            operators: vec![Operator::Mul],
        };
        for _ in 0..500 {
            let q = generate_with_config(Difficulty::Medium, &config);
            // Both operands were drawn from [1, 20], so the product is <= 400.
            assert!(q.answer <= 400, "product exceeded the bound: {q:?}");
        }
    }

    #[test]
    fn question_ids_never_repeat() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            let q = generate(Difficulty::Medium);
            assert!(seen.insert(q.id.clone()), "duplicate question id: {:?}", q.id);
        }
    }

    #[test]
    fn validate_accepts_exact_integer_and_close_decimal() {
        assert!(validate(&RawAnswer::Number(15.0), 15));
        assert!(validate(&RawAnswer::Text("15".to_string()), 15));
        assert!(validate(&RawAnswer::Text(" 15 ".to_string()), 15));
        assert!(validate(&RawAnswer::Number(15.00009), 15));
    }

    #[test]
    fn validate_rejects_out_of_tolerance_and_garbage() {
        assert!(!validate(&RawAnswer::Number(15.01), 15));
        assert!(!validate(&RawAnswer::Text("fifteen".to_string()), 15));
        assert!(!validate(&RawAnswer::Text(String::new()), 15));
        assert!(!validate(&RawAnswer::Text("   ".to_string()), 15));
    }
}
