use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::grade::parse_numeric;
use crate::model::{Bank, Choice, Question, QuestionKind};

/// Columns an import must carry; everything else is optional.
pub const REQUIRED_COLUMNS: [&str; 6] = ["variant", "qnum", "type", "question", "correct", "score"];

/// Full column set, in export order.
pub const ALL_COLUMNS: [&str; 14] = [
    "variant",
    "qnum",
    "type",
    "question",
    "A",
    "B",
    "C",
    "D",
    "correct",
    "score",
    "solution",
    "topic",
    "difficulty",
    "tolerance",
];

const OPTION_COLUMNS: [(char, &str); 4] = [('A', "A"), ('B', "B"), ('C', "C"), ('D', "D")];

#[derive(Debug, Error)]
pub enum BankError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported bank format {0:?} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("cannot parse bank file: {0}")]
    Parse(String),
    #[error("row {row}: cannot coerce {column} value {value:?} to an integer")]
    TypeCoercion {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Load an externally supplied bank, dispatching on the file extension.
/// Validation is deliberately shallow: required columns and integer
/// `variant`/`qnum` only; uniqueness of (variant, qnum) is not checked.
pub fn load_bank(path: &Path) -> Result<Bank, BankError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    // Reject the format before touching the file, so a binary workbook is
    // reported as unsupported rather than as an encoding error.
    let parse: fn(&str) -> Result<Bank, BankError> = match ext.as_str() {
        "csv" => parse_csv_bank,
        "json" => parse_json_bank,
        other => return Err(BankError::UnsupportedFormat(other.to_string())),
    };

    let content = fs::read_to_string(path).map_err(|source| BankError::Io {
        path: path.display().to_string(),
        source,
    })?;
    // Spreadsheet tools (and our own exports) prepend a byte-order marker.
    parse(content.strip_prefix('\u{feff}').unwrap_or(&content))
}

pub fn parse_csv_bank(content: &str) -> Result<Bank, BankError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| BankError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_required(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| BankError::Parse(e.to_string()))?;
        // Header is line 1, so data rows are numbered from 2.
        let row_num = i + 2;
        let get = |name: &str| -> String {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string()
        };
        rows.push(build_question(row_num, &get)?);
    }
    Ok(Bank { rows })
}

pub fn parse_json_bank(content: &str) -> Result<Bank, BankError> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(content).map_err(|e| BankError::Parse(e.to_string()))?;

    // Mirror a column-oriented view: a column exists if any record has it.
    let mut columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    check_required(&columns)?;

    let mut rows = Vec::new();
    for (i, obj) in objects.iter().enumerate() {
        let row_num = i + 1;
        let get = |name: &str| json_field(obj, name);
        rows.push(build_question(row_num, &get)?);
    }
    Ok(Bank { rows })
}

fn check_required(columns: &[String]) -> Result<(), BankError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|r| !columns.iter().any(|c| c == *r))
        .map(|r| r.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BankError::MissingColumns(missing))
    }
}

fn json_field(obj: &serde_json::Map<String, serde_json::Value>, name: &str) -> String {
    match obj.get(name) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

fn build_question(row_num: usize, get: &dyn Fn(&str) -> String) -> Result<Question, BankError> {
    let variant = coerce_int(&get("variant"), "variant", row_num)?;
    let qnum = coerce_int(&get("qnum"), "qnum", row_num)?;
    // Anything that is not "mcq" grades by numeric comparison.
    let kind = if get("type").trim().eq_ignore_ascii_case("mcq") {
        QuestionKind::Mcq
    } else {
        QuestionKind::Num
    };

    let mut options = Vec::new();
    for (label, column) in OPTION_COLUMNS {
        let text = get(column);
        if !text.trim().is_empty() {
            options.push(Choice { label, text });
        }
    }

    Ok(Question {
        variant,
        qnum,
        kind,
        prompt: get("question"),
        options,
        correct: get("correct").trim().to_string(),
        score: parse_numeric(&get("score")).unwrap_or(0.0),
        solution: get("solution"),
        topic: get("topic"),
        difficulty: get("difficulty"),
        tolerance: parse_numeric(&get("tolerance")),
    })
}

fn coerce_int(value: &str, column: &'static str, row: usize) -> Result<u32, BankError> {
    let trimmed = value.trim();
    let err = || BankError::TypeCoercion {
        row,
        column,
        value: value.to_string(),
    };
    if let Ok(n) = trimmed.parse::<i64>() {
        return u32::try_from(n).map_err(|_| err());
    }
    // Column-typed sources hand integers over as floats ("3.0").
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 {
            return Ok(f as u32);
        }
    }
    Err(err())
}

/// Serialize the bank back to the import CSV format, BOM-prefixed so
/// spreadsheet tools pick up the encoding.
pub fn bank_csv_bytes(bank: &Bank) -> Result<Vec<u8>, String> {
    let mut out = vec![0xEF, 0xBB, 0xBF];
    let mut writer = csv::Writer::from_writer(&mut out);
    writer
        .write_record(ALL_COLUMNS)
        .map_err(|e| format!("Cannot write bank CSV: {}", e))?;
    for q in &bank.rows {
        let option = |label: char| {
            q.options
                .iter()
                .find(|c| c.label == label)
                .map(|c| c.text.clone())
                .unwrap_or_default()
        };
        let tolerance = q.tolerance.map(|t| t.to_string()).unwrap_or_default();
        writer
            .write_record([
                q.variant.to_string(),
                q.qnum.to_string(),
                q.kind.label().to_string(),
                q.prompt.clone(),
                option('A'),
                option('B'),
                option('C'),
                option('D'),
                q.correct.clone(),
                q.score.to_string(),
                q.solution.clone(),
                q.topic.clone(),
                q.difficulty.clone(),
                tolerance,
            ])
            .map_err(|e| format!("Cannot write bank CSV: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("Cannot write bank CSV: {}", e))?;
    drop(writer);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "variant,qnum,type,question,A,B,C,D,correct,score,solution,topic,difficulty,tolerance";

    #[test]
    fn csv_roundtrip_of_a_minimal_bank() {
        let content = format!(
            "{}\n1,1,mcq,Solve it,2,3,4,5,B,1,,Algebra,Easy,\n1,2,num,Area?,,,,,12.57,1,,Geometry,Medium,0.63\n",
            HEADER
        );
        let bank = parse_csv_bank(&content).unwrap();
        assert_eq!(bank.rows.len(), 2);

        let q1 = &bank.rows[0];
        assert_eq!(q1.kind, QuestionKind::Mcq);
        assert_eq!(q1.options.len(), 4);
        assert_eq!(q1.correct, "B");
        assert_eq!(q1.tolerance, None);

        let q2 = &bank.rows[1];
        assert_eq!(q2.kind, QuestionKind::Num);
        assert!(q2.options.is_empty());
        assert_eq!(q2.tolerance, Some(0.63));
    }

    #[test]
    fn missing_columns_are_named() {
        let content = "variant,qnum,question\n1,1,Solve it\n";
        match parse_csv_bank(content) {
            Err(BankError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["type", "correct", "score"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn coercion_failure_names_row_and_column() {
        let content = format!("{}\nfirst,1,mcq,Q,,,,,A,1,,,,\n", HEADER);
        match parse_csv_bank(&content) {
            Err(BankError::TypeCoercion { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "variant");
                assert_eq!(value, "first");
            }
            other => panic!("expected TypeCoercion, got {:?}", other),
        }
    }

    #[test]
    fn float_typed_integers_are_accepted() {
        assert_eq!(coerce_int("3.0", "variant", 2).unwrap(), 3);
        assert!(coerce_int("3.5", "variant", 2).is_err());
        assert!(coerce_int("-1", "variant", 2).is_err());
    }

    #[test]
    fn unknown_type_grades_as_numeric() {
        let content = format!("{}\n1,1,weird,Q,,,,,5,1,,,,\n", HEADER);
        let bank = parse_csv_bank(&content).unwrap();
        assert_eq!(bank.rows[0].kind, QuestionKind::Num);
    }

    #[test]
    fn json_numbers_and_strings_both_load() {
        let content = r#"[
            {"variant": 1, "qnum": 1, "type": "mcq", "question": "Q1",
             "A": "2", "B": "3", "correct": "B", "score": 1},
            {"variant": "1", "qnum": "2", "type": "num", "question": "Q2",
             "correct": 113.1, "score": 1, "tolerance": 5.66}
        ]"#;
        let bank = parse_json_bank(content).unwrap();
        assert_eq!(bank.rows.len(), 2);
        assert_eq!(bank.rows[0].options.len(), 2);
        assert_eq!(bank.rows[1].correct, "113.1");
        assert_eq!(bank.rows[1].tolerance, Some(5.66));
    }

    #[test]
    fn bank_csv_starts_with_bom_and_header() {
        let bank = parse_csv_bank(&format!("{}\n1,1,mcq,Q,,,,,A,1,,,,\n", HEADER)).unwrap();
        let bytes = bank_csv_bytes(&bank).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with("variant,qnum,type,question"));
    }
}
