use std::path::PathBuf;

use chrono::{Duration, Utc};

use termexam::demo::{generate_demo_bank, DEFAULT_SEED};
use termexam::grade::{grade_exam, topic_breakdown};
use termexam::model::{AnswerMap, Choice, Question, QuestionKind};
use termexam::report::StudentInfo;
use termexam::session::{ExamSession, SessionStatus};
use termexam::state::{AppState, Screen};

fn mcq(qnum: u32, correct: &str) -> Question {
    Question {
        variant: 1,
        qnum,
        kind: QuestionKind::Mcq,
        prompt: format!("Question {}", qnum),
        options: vec![
            Choice { label: 'A', text: "1".to_string() },
            Choice { label: 'B', text: "2".to_string() },
            Choice { label: 'C', text: "3".to_string() },
            Choice { label: 'D', text: "4".to_string() },
        ],
        correct: correct.to_string(),
        score: 1.0,
        solution: String::new(),
        topic: "Algebra".to_string(),
        difficulty: "Easy".to_string(),
        tolerance: None,
    }
}

fn num(qnum: u32, correct: &str, tolerance: Option<f64>) -> Question {
    Question {
        variant: 1,
        qnum,
        kind: QuestionKind::Num,
        prompt: format!("Question {}", qnum),
        options: Vec::new(),
        correct: correct.to_string(),
        score: 1.0,
        solution: String::new(),
        topic: "Geometry".to_string(),
        difficulty: "Medium".to_string(),
        tolerance,
    }
}

fn student() -> StudentInfo {
    StudentInfo {
        username: "student".to_string(),
        classroom: "12A".to_string(),
    }
}

#[test]
fn test_mcq_matching_is_case_and_whitespace_insensitive() {
    let rows = vec![mcq(1, "B"), mcq(2, "C"), mcq(3, "D")];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), " b ".to_string());
    answers.insert((1, 2), "c".to_string());
    answers.insert((1, 3), "A".to_string());

    let outcome = grade_exam(&rows, &answers);
    assert_eq!(outcome.total, 2.0);
    assert_eq!(outcome.max_total, 3.0);
    assert_eq!(outcome.correct_count(), 2);
    assert_eq!(outcome.wrong_count(), 1);
}

#[test]
fn test_numeric_tolerance_boundary_is_inclusive() {
    let rows = vec![num(1, "10.0", Some(0.5)), num(2, "10.0", Some(0.5))];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "10,5".to_string()); // exactly at the boundary, comma separator
    answers.insert((1, 2), "10.75".to_string()); // past it

    let outcome = grade_exam(&rows, &answers);
    let d1 = &outcome.details[0];
    let d2 = &outcome.details[1];
    assert!(d1.is_correct);
    assert!(!d2.is_correct);
    assert_eq!(outcome.total, 1.0);
}

#[test]
fn test_grading_is_idempotent_for_identical_inputs() {
    let rows = vec![mcq(1, "B"), num(2, "113.1", Some(5.66)), mcq(3, "D")];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "b".to_string());
    answers.insert((1, 2), "115,0".to_string());

    let first = grade_exam(&rows, &answers);
    let second = grade_exam(&rows, &answers);
    assert_eq!(first, second);
    assert_eq!(first.total, second.total);
    assert_eq!(first.max_total, second.max_total);
    assert_eq!(first.details, second.details);
}

#[test]
fn test_missing_tolerance_requires_exact_value() {
    let rows = vec![num(1, "5.75", None)];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "5.75".to_string());
    let outcome = grade_exam(&rows, &answers);
    assert!(outcome.details[0].is_correct);

    answers.insert((1, 1), "5.76".to_string());
    let outcome = grade_exam(&rows, &answers);
    assert!(!outcome.details[0].is_correct);
}

#[test]
fn test_unanswered_and_garbage_answers_score_zero_but_count_in_max() {
    let rows = vec![num(1, "5.0", Some(0.1)), num(2, "abc", Some(0.1)), mcq(3, "A")];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "five".to_string());
    // qnum 2 has an unparseable key, qnum 3 is unanswered

    let outcome = grade_exam(&rows, &answers);
    assert_eq!(outcome.total, 0.0);
    assert_eq!(outcome.max_total, 3.0);
    assert_eq!(outcome.percent(), 0.0);
    assert_eq!(outcome.details[2].your_answer, None);
}

#[test]
fn test_topic_breakdown_aggregates_scores() {
    let rows = vec![mcq(1, "A"), mcq(2, "B"), num(3, "1.0", Some(0.1))];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "A".to_string());
    answers.insert((1, 3), "1.05".to_string());

    let outcome = grade_exam(&rows, &answers);
    let topics = topic_breakdown(&outcome.details);
    assert_eq!(topics.len(), 2);
    // BTreeMap ordering: Algebra before Geometry
    assert_eq!(topics[0].topic, "Algebra");
    assert_eq!(topics[0].correct, 1);
    assert_eq!(topics[0].total, 2);
    assert_eq!(topics[1].topic, "Geometry");
    assert_eq!(topics[1].score, 1.0);
}

#[test]
fn test_full_run_through_the_app_state() {
    let mut state = AppState::new(generate_demo_bank(DEFAULT_SEED), student(), PathBuf::from("."));
    state.start_selected_variant(Utc::now());
    assert_eq!(state.screen, Screen::Working);

    // Answer every question correctly, straight from the key.
    let rows = state.active_rows.clone();
    for (i, q) in rows.iter().enumerate() {
        state.navigate_to(i);
        match q.kind {
            QuestionKind::Mcq => {
                let idx = (q.correct.as_bytes()[0] - b'A') as usize;
                state.select_choice(idx);
            }
            QuestionKind::Num => {
                // Exercise the comma separator on the way in.
                state.text_input = q.correct.replace('.', ",");
            }
        }
    }
    assert_eq!(state.answered_count(), 40);

    state.finalize_submit(Utc::now());
    assert_eq!(state.screen, Screen::Results);
    let outcome = state.outcome.as_ref().unwrap();
    assert_eq!(outcome.total, 40.0);
    assert_eq!(outcome.percent(), 100.0);
    assert_eq!(state.topics.iter().map(|t| t.total).sum::<usize>(), 40);
}

#[test]
fn test_expired_session_auto_submits_with_partial_answers() {
    let mut session = ExamSession::new();
    session.start(1, Utc::now() - Duration::minutes(100) - Duration::seconds(1));
    session.record_answer(1, "A".to_string());

    let now = Utc::now();
    assert_eq!(session.status(now), SessionStatus::Submitted);
    assert!(session.tick(now));
    assert!(session.auto_submitted);
    // The answer recorded before expiry still grades.
    let rows = vec![mcq(1, "A"), mcq(2, "B")];
    let outcome = grade_exam(&rows, &session.answers);
    assert_eq!(outcome.total, 1.0);
    assert_eq!(outcome.max_total, 2.0);
}

#[test]
fn test_results_csv_has_identity_and_one_row_per_question() {
    let rows = vec![mcq(1, "A"), num(2, "5.0", Some(0.1))];
    let mut answers = AnswerMap::new();
    answers.insert((1, 1), "a".to_string());
    let outcome = grade_exam(&rows, &answers);

    let bytes =
        termexam::report::results_csv_bytes(&student(), "2025-06-01 09:00:00", &outcome.details)
            .unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3); // header + 2 rows
    assert!(lines[1].starts_with("student,12A,2025-06-01 09:00:00,1,1,mcq,"));
    assert!(lines[1].ends_with(",true,1.0,1.0"));
    assert!(lines[2].contains(",false,0.0,1.0"));
}
