use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{Bank, Choice, Question, QuestionKind, TOTAL_QUESTIONS, TOTAL_VARIANTS};

pub const DEFAULT_SEED: u64 = 12;

const TOPICS: [&str; 4] = [
    "Algebra",
    "Functions & Graphs",
    "Geometry",
    "Probability & Statistics",
];
const DIFFICULTIES: [&str; 3] = ["Easy", "Medium", "Hard"];

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Generate the built-in practice bank: TOTAL_VARIANTS × TOTAL_QUESTIONS,
/// alternating a linear-equation multiple-choice template (odd qnum) with a
/// circle-area numeric template (even qnum). Fully deterministic for a given
/// seed, so repeated runs hand out identical exams.
pub fn generate_demo_bank(seed: u64) -> Bank {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(TOTAL_VARIANTS as usize * TOTAL_QUESTIONS);

    for variant in 1..=TOTAL_VARIANTS {
        for qnum in 1..=TOTAL_QUESTIONS as u32 {
            let topic = TOPICS[(qnum as usize - 1) % TOPICS.len()];
            let difficulty = DIFFICULTIES[qnum as usize % DIFFICULTIES.len()];
            let question = if qnum % 2 == 1 {
                linear_equation(&mut rng, variant, qnum, topic, difficulty)
            } else {
                circle_area(&mut rng, variant, qnum, topic, difficulty)
            };
            rows.push(question);
        }
    }

    Bank { rows }
}

fn linear_equation(
    rng: &mut StdRng,
    variant: u32,
    qnum: u32,
    topic: &str,
    difficulty: &str,
) -> Question {
    let a: i64 = rng.gen_range(2..=9);
    let b: i64 = rng.gen_range(0..=9);
    let x: i64 = rng.gen_range(1..=9);
    let c = a * x + b;

    let mut values = [x, x + 1, x - 1, x + 2];
    values.shuffle(rng);
    let correct_idx = values.iter().position(|&v| v == x).unwrap_or(0);
    let correct = ((b'A' + correct_idx as u8) as char).to_string();

    let options = values
        .iter()
        .zip(['A', 'B', 'C', 'D'])
        .map(|(v, label)| Choice {
            label,
            text: v.to_string(),
        })
        .collect();

    Question {
        variant,
        qnum,
        kind: QuestionKind::Mcq,
        prompt: format!("{}x + {} = {}. Find x.", a, b, c),
        options,
        correct,
        score: 1.0,
        solution: format!("{}x = {} - {}  =>  x = {}", a, c, b, x),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
        tolerance: None,
    }
}

fn circle_area(
    rng: &mut StdRng,
    variant: u32,
    qnum: u32,
    topic: &str,
    difficulty: &str,
) -> Question {
    let r: i64 = rng.gen_range(2..=12);
    let area = round2(3.1416 * (r * r) as f64);
    let tolerance = round2(0.05 * area);

    Question {
        variant,
        qnum,
        kind: QuestionKind::Num,
        prompt: format!(
            "Find the area of a circle with radius {} cm, taking \u{3c0} = 3.1416 (cm\u{b2}).",
            r
        ),
        options: Vec::new(),
        correct: area.to_string(),
        score: 1.0,
        solution: format!("S = \u{3c0}r\u{b2} = 3.1416 \u{d7} {}\u{b2} \u{2248} {}", r, area),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
        tolerance: Some(tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_identical_banks() {
        assert_eq!(generate_demo_bank(12), generate_demo_bank(12));
        assert_ne!(generate_demo_bank(12), generate_demo_bank(13));
    }

    #[test]
    fn bank_has_expected_shape() {
        let bank = generate_demo_bank(DEFAULT_SEED);
        assert_eq!(bank.rows.len(), TOTAL_VARIANTS as usize * TOTAL_QUESTIONS);
        assert_eq!(bank.variants().len(), TOTAL_VARIANTS as usize);
        for v in bank.variants() {
            assert_eq!(bank.variant_len(v), TOTAL_QUESTIONS);
        }
        assert!(bank.incomplete_variants().is_empty());
    }

    #[test]
    fn templates_alternate_by_parity() {
        let bank = generate_demo_bank(DEFAULT_SEED);
        for q in &bank.rows {
            if q.qnum % 2 == 1 {
                assert_eq!(q.kind, QuestionKind::Mcq);
                assert_eq!(q.options.len(), 4);
                assert!(matches!(q.correct.as_str(), "A" | "B" | "C" | "D"));
            } else {
                assert_eq!(q.kind, QuestionKind::Num);
                assert!(q.options.is_empty());
            }
        }
    }

    #[test]
    fn mcq_correct_letter_points_at_the_solution_value() {
        let bank = generate_demo_bank(DEFAULT_SEED);
        for q in bank.rows.iter().filter(|q| q.kind == QuestionKind::Mcq) {
            let letter = q.correct.chars().next().unwrap();
            let choice = q.options.iter().find(|c| c.label == letter).unwrap();
            // The solution text ends with "x = <answer>".
            assert!(q.solution.ends_with(&format!("x = {}", choice.text)));
        }
    }

    #[test]
    fn numeric_tolerance_is_five_percent_of_area() {
        let bank = generate_demo_bank(DEFAULT_SEED);
        for q in bank.rows.iter().filter(|q| q.kind == QuestionKind::Num) {
            let area: f64 = q.correct.parse().unwrap();
            let tol = q.tolerance.unwrap();
            assert!((tol - round2(0.05 * area)).abs() < 1e-9);
        }
    }
}
