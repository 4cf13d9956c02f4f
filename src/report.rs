use serde::Serialize;

use crate::grade::{DetailRow, GradeOutcome, TopicStat};
use crate::timer::split_minutes;

#[derive(Debug, Clone)]
pub struct StudentInfo {
    pub username: String,
    pub classroom: String,
}

/// Aggregate result data handed to the report renderers.
#[derive(Debug, Clone)]
pub struct ExamSummary {
    pub total: f64,
    pub max_total: f64,
    pub percent: f64,
    pub correct_cnt: usize,
    pub wrong_cnt: usize,
    pub spent_min: i64,
    pub spent_sec: i64,
    pub topics: Vec<TopicStat>,
}

pub fn build_summary(outcome: &GradeOutcome, topics: Vec<TopicStat>, elapsed_secs: i64) -> ExamSummary {
    let (spent_min, spent_sec) = split_minutes(elapsed_secs);
    ExamSummary {
        total: outcome.total,
        max_total: outcome.max_total,
        percent: outcome.percent(),
        correct_cnt: outcome.correct_count(),
        wrong_cnt: outcome.wrong_count(),
        spent_min,
        spent_sec,
        topics,
    }
}

#[derive(Serialize)]
struct ResultCsvRow<'a> {
    username: &'a str,
    classroom: &'a str,
    timestamp: &'a str,
    variant: u32,
    qnum: u32,
    #[serde(rename = "type")]
    kind: &'a str,
    topic: &'a str,
    difficulty: &'a str,
    correct: &'a str,
    your: &'a str,
    is_correct: bool,
    score: f64,
    max_score: f64,
}

/// Result export: one row per graded question, prefixed with the student
/// identity and timestamp, BOM-prefixed for spreadsheet tools. Rows are
/// sorted by qnum here; the grading engine does not order its output.
pub fn results_csv_bytes(
    student: &StudentInfo,
    timestamp: &str,
    details: &[DetailRow],
) -> Result<Vec<u8>, String> {
    let mut sorted: Vec<&DetailRow> = details.iter().collect();
    sorted.sort_by_key(|d| d.qnum);

    let mut out = vec![0xEF, 0xBB, 0xBF];
    let mut writer = csv::Writer::from_writer(&mut out);
    for d in sorted {
        writer
            .serialize(ResultCsvRow {
                username: &student.username,
                classroom: &student.classroom,
                timestamp,
                variant: d.variant,
                qnum: d.qnum,
                kind: d.kind.label(),
                topic: &d.topic,
                difficulty: &d.difficulty,
                correct: &d.correct,
                your: d.your_answer.as_deref().unwrap_or(""),
                is_correct: d.is_correct,
                score: d.score,
                max_score: d.max_score,
            })
            .map_err(|e| format!("Cannot write results CSV: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Cannot write results CSV: {}", e))?;
    drop(writer);
    Ok(out)
}

/// Plain-text report document: title, metadata, score and elapsed lines,
/// topic breakdown, then the full per-question table.
pub fn render_report(
    student: &StudentInfo,
    variant: u32,
    timestamp: &str,
    summary: &ExamSummary,
    details: &[DetailRow],
) -> String {
    let mut out = String::new();
    let title = format!("Math Mock Exam Report — Variant {}", variant);
    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push_str("\n\n");

    let name = if student.username.is_empty() { "-" } else { &student.username };
    let class = if student.classroom.is_empty() { "-" } else { &student.classroom };
    out.push_str(&format!(
        "Student: {}    Class: {}    Date: {}\n\n",
        name, class, timestamp
    ));
    out.push_str(&format!(
        "Total score: {} / {}  ({}%)   Correct: {}   Wrong: {}\n",
        summary.total, summary.max_total, summary.percent, summary.correct_cnt, summary.wrong_cnt
    ));
    out.push_str(&format!(
        "Time spent: {} min {} sec\n\n",
        summary.spent_min, summary.spent_sec
    ));

    if !summary.topics.is_empty() {
        out.push_str("Topic breakdown\n");
        out.push_str(&format!(
            "{:<28} {:>8} {:>8} {:>8}\n",
            "Topic", "Correct", "Total", "Score"
        ));
        out.push_str(&format!("{}\n", "-".repeat(56)));
        for t in &summary.topics {
            out.push_str(&format!(
                "{:<28} {:>8} {:>8} {:>8}\n",
                t.topic, t.correct, t.total, t.score
            ));
        }
        out.push('\n');
    }

    let mut sorted: Vec<&DetailRow> = details.iter().collect();
    sorted.sort_by_key(|d| d.qnum);

    out.push_str("Question details\n");
    out.push_str(&format!(
        "{:>4} {:<6} {:<14} {:<14} {:>9}\n",
        "#", "Type", "Correct", "Your", "Score"
    ));
    out.push_str(&format!("{}\n", "-".repeat(52)));
    for d in sorted {
        out.push_str(&format!(
            "{:>4} {:<6} {:<14} {:<14} {:>9}\n",
            d.qnum,
            d.kind.label().to_uppercase(),
            d.correct,
            d.your_answer.as_deref().unwrap_or("-"),
            format!("{}/{}", d.score, d.max_score),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::{grade_exam, topic_breakdown};
    use crate::model::{AnswerMap, Question, QuestionKind};

    fn sample_details() -> Vec<DetailRow> {
        let rows = vec![
            Question {
                variant: 1,
                qnum: 2,
                kind: QuestionKind::Num,
                prompt: String::new(),
                options: Vec::new(),
                correct: "12.57".to_string(),
                score: 1.0,
                solution: String::new(),
                topic: "Geometry".to_string(),
                difficulty: "Easy".to_string(),
                tolerance: Some(0.63),
            },
            Question {
                variant: 1,
                qnum: 1,
                kind: QuestionKind::Mcq,
                prompt: String::new(),
                options: Vec::new(),
                correct: "B".to_string(),
                score: 1.0,
                solution: String::new(),
                topic: "Algebra".to_string(),
                difficulty: "Medium".to_string(),
                tolerance: None,
            },
        ];
        let mut answers = AnswerMap::new();
        answers.insert((1, 1), "b".to_string());
        grade_exam(&rows, &answers).details
    }

    fn student() -> StudentInfo {
        StudentInfo {
            username: "student".to_string(),
            classroom: "12A".to_string(),
        }
    }

    #[test]
    fn csv_has_bom_prefix_and_sorted_rows() {
        let bytes = results_csv_bytes(&student(), "2025-01-02 10:00:00", &sample_details()).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "username,classroom,timestamp,variant,qnum,type,topic,difficulty,correct,your,is_correct,score,max_score"
        );
        // qnum 1 before qnum 2 even though the engine emitted 2 first.
        assert!(lines.next().unwrap().contains(",1,mcq,"));
        assert!(lines.next().unwrap().contains(",2,num,"));
    }

    #[test]
    fn report_carries_summary_and_tables() {
        let details = sample_details();
        let outcome = crate::grade::GradeOutcome {
            total: 1.0,
            max_total: 2.0,
            details: details.clone(),
        };
        let topics = topic_breakdown(&details);
        let summary = build_summary(&outcome, topics, 125);
        let text = render_report(&student(), 1, "2025-01-02 10:00", &summary, &details);

        assert!(text.contains("Variant 1"));
        assert!(text.contains("Student: student"));
        assert!(text.contains("Total score: 1 / 2  (50%)"));
        assert!(text.contains("Time spent: 2 min 5 sec"));
        assert!(text.contains("Topic breakdown"));
        assert!(text.contains("Algebra"));
        assert!(text.contains("Question details"));
    }
}
