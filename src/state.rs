use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::grade::{grade_exam, topic_breakdown, DetailRow, GradeOutcome, TopicStat};
use crate::model::{Bank, Question, QuestionKind, EXAM_DURATION_MIN};
use crate::report::StudentInfo;
use crate::session::ExamSession;

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    VariantSelect,
    Working,
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmSubmit,
    ConfirmQuit,
    ConfirmRestart,
    TimeUp,
    Help,
    Notice(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub bank: Bank,
    pub session: ExamSession,
    pub student: StudentInfo,
    pub out_dir: PathBuf,
    pub variants: Vec<u32>,
    pub variant_cursor: usize,
    /// Snapshot of the active variant's rows, fixed at start so a reloaded
    /// bank cannot change an exam in progress.
    pub active_rows: Vec<Question>,
    pub current_question: usize,
    pub text_input: String,
    pub text_cursor: usize,
    pub dialog_stack: Vec<Dialog>,
    pub remaining_seconds: Option<i64>,
    pub question_scroll: usize,
    pub result_scroll: usize,
    /// On the results screen: browse questions with per-question verdicts
    /// and solutions instead of the summary tables.
    pub review_mode: bool,
    pub outcome: Option<GradeOutcome>,
    pub topics: Vec<TopicStat>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elapsed_secs: i64,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(bank: Bank, student: StudentInfo, out_dir: PathBuf) -> Self {
        let variants = bank.variants();
        Self {
            screen: Screen::VariantSelect,
            bank,
            session: ExamSession::new(),
            student,
            out_dir,
            variants,
            variant_cursor: 0,
            active_rows: Vec::new(),
            current_question: 0,
            text_input: String::new(),
            text_cursor: 0,
            dialog_stack: Vec::new(),
            remaining_seconds: None,
            question_scroll: 0,
            result_scroll: 0,
            review_mode: false,
            outcome: None,
            topics: Vec::new(),
            finished_at: None,
            elapsed_secs: 0,
            should_quit: false,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.active_rows.get(self.current_question)
    }

    pub fn current_qnum(&self) -> u32 {
        self.current_question().map(|q| q.qnum).unwrap_or(0)
    }

    pub fn answered_count(&self) -> usize {
        self.session.answered_count(&self.active_rows)
    }

    /// Begin the variant under the cursor, discarding any previous run.
    pub fn start_selected_variant(&mut self, now: DateTime<Utc>) {
        let Some(&variant) = self.variants.get(self.variant_cursor) else {
            return;
        };
        self.active_rows = self.bank.variant_rows(variant);
        self.session.start(variant, now);
        self.screen = Screen::Working;
        self.current_question = 0;
        self.question_scroll = 0;
        self.result_scroll = 0;
        self.review_mode = false;
        self.outcome = None;
        self.topics = Vec::new();
        self.finished_at = None;
        self.elapsed_secs = 0;
        self.remaining_seconds = Some(EXAM_DURATION_MIN * 60);
        self.load_text_input_for_current();
    }

    pub fn navigate_to(&mut self, idx: usize) {
        if idx < self.active_rows.len() {
            self.save_current_text_input();
            self.current_question = idx;
            self.question_scroll = 0;
            self.load_text_input_for_current();
        }
    }

    /// Push the numeric input buffer into the session. MCQ answers are
    /// recorded on keypress and bypass the buffer.
    pub fn save_current_text_input(&mut self) {
        let target = self
            .current_question()
            .filter(|q| q.kind == QuestionKind::Num)
            .map(|q| q.qnum);
        if let Some(qnum) = target {
            let value = self.text_input.clone();
            self.session.record_answer(qnum, value);
        }
    }

    pub fn load_text_input_for_current(&mut self) {
        let text = self
            .current_question()
            .filter(|q| q.kind == QuestionKind::Num)
            .and_then(|q| self.session.answer(q.qnum))
            .unwrap_or("")
            .to_string();
        self.text_cursor = text.len();
        self.text_input = text;
    }

    pub fn select_choice(&mut self, idx: usize) {
        let target = self
            .current_question()
            .filter(|q| q.kind == QuestionKind::Mcq)
            .and_then(|q| q.options.get(idx).map(|c| (q.qnum, c.label)));
        if let Some((qnum, label)) = target {
            self.session.record_answer(qnum, label.to_string());
        }
    }

    pub fn is_choice_selected(&self, qnum: u32, label: char) -> bool {
        self.session
            .answer(qnum)
            .map(|a| a.trim().eq_ignore_ascii_case(&label.to_string()))
            .unwrap_or(false)
    }

    pub fn is_answered(&self, qnum: u32) -> bool {
        self.session
            .answer(qnum)
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false)
    }

    /// Grade the active variant and move to the results screen. Elapsed
    /// time is capped at the exam duration so auto-submitted runs report
    /// the full allotment.
    pub fn finalize_submit(&mut self, now: DateTime<Utc>) {
        self.save_current_text_input();
        self.session.submit();
        self.elapsed_secs = self.session.elapsed_secs(now).min(EXAM_DURATION_MIN * 60);
        self.finished_at = Some(now);
        let outcome = grade_exam(&self.active_rows, &self.session.answers);
        self.topics = topic_breakdown(&outcome.details);
        self.outcome = Some(outcome);
        self.screen = Screen::Results;
        self.result_scroll = 0;
        self.review_mode = false;
        self.current_question = 0;
        self.question_scroll = 0;
    }

    pub fn detail_for(&self, qnum: u32) -> Option<&DetailRow> {
        self.outcome
            .as_ref()
            .and_then(|o| o.details.iter().find(|d| d.qnum == qnum))
    }

    pub fn timestamp(&self) -> String {
        self.finished_at
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }
}
