use std::collections::BTreeMap;

use crate::model::{AnswerMap, Question, QuestionKind};

/// One graded question. Recomputed in full on every grading pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub variant: u32,
    pub qnum: u32,
    pub kind: QuestionKind,
    pub topic: String,
    pub difficulty: String,
    pub correct: String,
    pub your_answer: Option<String>,
    pub is_correct: bool,
    pub score: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub total: f64,
    pub max_total: f64,
    pub details: Vec<DetailRow>,
}

impl GradeOutcome {
    pub fn correct_count(&self) -> usize {
        self.details.iter().filter(|d| d.is_correct).count()
    }

    pub fn wrong_count(&self) -> usize {
        self.details.len() - self.correct_count()
    }

    pub fn percent(&self) -> f64 {
        if self.max_total == 0.0 {
            0.0
        } else {
            (1000.0 * self.total / self.max_total).round() / 10.0
        }
    }
}

/// Per-topic slice of the detail rows, for the report breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicStat {
    pub topic: String,
    pub correct: usize,
    pub total: usize,
    pub score: f64,
}

/// Parse a numeric answer, accepting either `.` or `,` as the decimal
/// separator. Returns None for anything that is not a number.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn check_mcq(answer: Option<&str>, correct: &str) -> bool {
    match answer {
        Some(a) => a.trim().eq_ignore_ascii_case(correct.trim()),
        None => false,
    }
}

/// A parse failure on either side is an incorrect answer, never an error.
fn check_numeric(answer: Option<&str>, correct: &str, tolerance: Option<f64>) -> bool {
    let Some(user) = answer.and_then(parse_numeric) else {
        return false;
    };
    let Some(expected) = parse_numeric(correct) else {
        return false;
    };
    let tol = tolerance.unwrap_or(0.0);
    (user - expected).abs() <= tol
}

/// Grade one variant's rows against the answer map. Pure: identical inputs
/// yield identical output, the answer map is never mutated, and max_total
/// accumulates every row's score regardless of correctness.
pub fn grade_exam(rows: &[Question], answers: &AnswerMap) -> GradeOutcome {
    let mut total = 0.0;
    let mut max_total = 0.0;
    let mut details = Vec::with_capacity(rows.len());

    for row in rows {
        let answer = answers.get(&row.key()).map(|s| s.as_str());
        let is_correct = match row.kind {
            QuestionKind::Mcq => check_mcq(answer, &row.correct),
            QuestionKind::Num => check_numeric(answer, &row.correct, row.tolerance),
        };
        let awarded = if is_correct { row.score } else { 0.0 };
        total += awarded;
        max_total += row.score;

        details.push(DetailRow {
            variant: row.variant,
            qnum: row.qnum,
            kind: row.kind,
            topic: row.topic.clone(),
            difficulty: row.difficulty.clone(),
            correct: row.correct.clone(),
            your_answer: answer.map(|s| s.to_string()),
            is_correct,
            score: awarded,
            max_score: row.score,
        });
    }

    GradeOutcome {
        total,
        max_total,
        details,
    }
}

/// Group detail rows by topic. Topics absent from the variant do not appear;
/// output is sorted by topic name so repeated runs render identically.
pub fn topic_breakdown(details: &[DetailRow]) -> Vec<TopicStat> {
    let mut groups: BTreeMap<&str, TopicStat> = BTreeMap::new();
    for d in details {
        let entry = groups.entry(d.topic.as_str()).or_insert_with(|| TopicStat {
            topic: d.topic.clone(),
            correct: 0,
            total: 0,
            score: 0.0,
        });
        entry.total += 1;
        if d.is_correct {
            entry.correct += 1;
        }
        entry.score += d.score;
    }
    groups.into_values().collect()
}
