use std::collections::HashMap;

/// Questions per variant in a complete bank.
pub const TOTAL_QUESTIONS: usize = 40;
/// Parallel exam forms in the generated bank.
pub const TOTAL_VARIANTS: u32 = 4;
/// Exam duration in minutes.
pub const EXAM_DURATION_MIN: i64 = 100;

/// Key into the answer map: (variant, qnum).
pub type AnswerKey = (u32, u32);

/// Raw user-submitted values, keyed by (variant, qnum). Built incrementally
/// while the exam runs; the grading engine only reads it.
pub type AnswerMap = HashMap<AnswerKey, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Mcq,
    Num,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Num => "num",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: char,
    pub text: String,
}

/// One row of the bank. Fields beyond the required six stay lenient:
/// an imported row may have no options, no solution and no tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub variant: u32,
    pub qnum: u32,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<Choice>,
    /// Option letter for mcq, number text for num. Kept raw; grading
    /// normalizes at comparison time.
    pub correct: String,
    pub score: f64,
    pub solution: String,
    pub topic: String,
    pub difficulty: String,
    pub tolerance: Option<f64>,
}

impl Question {
    pub fn key(&self) -> AnswerKey {
        (self.variant, self.qnum)
    }
}

/// The full question table across all variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    pub rows: Vec<Question>,
}

impl Bank {
    /// Sorted distinct variant numbers present in the bank.
    pub fn variants(&self) -> Vec<u32> {
        let mut vs: Vec<u32> = self.rows.iter().map(|q| q.variant).collect();
        vs.sort_unstable();
        vs.dedup();
        vs
    }

    /// Rows of one variant, sorted by qnum for display/grading order.
    pub fn variant_rows(&self, variant: u32) -> Vec<Question> {
        let mut rows: Vec<Question> = self
            .rows
            .iter()
            .filter(|q| q.variant == variant)
            .cloned()
            .collect();
        rows.sort_by_key(|q| q.qnum);
        rows
    }

    pub fn variant_len(&self, variant: u32) -> usize {
        self.rows.iter().filter(|q| q.variant == variant).count()
    }

    /// Incomplete variants are a warning, not a failure.
    pub fn incomplete_variants(&self) -> Vec<(u32, usize)> {
        self.variants()
            .into_iter()
            .map(|v| (v, self.variant_len(v)))
            .filter(|&(_, n)| n != TOTAL_QUESTIONS)
            .collect()
    }
}
