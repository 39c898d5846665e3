//! Import of question tables exported from a spreadsheet as tab-separated text.
//!
//! The first record is the header. Columns are located by name, so extra
//! columns and any column order are accepted. Cells may be quoted, which lets
//! a prompt span several lines.

use csv::{ReaderBuilder, StringRecord, Trim};
use quiz_core::model::{Question, QuestionError};
use thiserror::Error;

pub const PROMPT_COLUMN: &str = "質問";
pub const OPTION_COLUMNS: [&str; 3] = ["選択肢A", "選択肢B", "選択肢C"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TableError {
    #[error("table is empty")]
    Empty,

    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    #[error("line {line}: expected at least {expected} cells, got {got}")]
    ShortRow {
        line: u64,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: {source}")]
    InvalidQuestion {
        line: u64,
        #[source]
        source: QuestionError,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    prompt: usize,
    options: [usize; 3],
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, TableError> {
        if headers.iter().all(str::is_empty) {
            return Err(TableError::Empty);
        }
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|cell| cell == name)
                .ok_or(TableError::MissingColumn(name))
        };
        Ok(Self {
            prompt: find(PROMPT_COLUMN)?,
            options: [
                find(OPTION_COLUMNS[0])?,
                find(OPTION_COLUMNS[1])?,
                find(OPTION_COLUMNS[2])?,
            ],
        })
    }

    fn width(&self) -> usize {
        self.options
            .iter()
            .copied()
            .chain(std::iter::once(self.prompt))
            .max()
            .map_or(0, |max| max + 1)
    }

    fn question(&self, record: &StringRecord, line: u64) -> Result<Question, TableError> {
        let cell = |idx: usize| record.get(idx).unwrap_or_default();
        Question::new(cell(self.prompt), self.options.map(cell))
            .map_err(|source| TableError::InvalidQuestion { line, source })
    }
}

/// Parse a tab-separated question table into questions in row order.
///
/// # Errors
///
/// Returns `TableError` if the text is not valid delimited data, the header
/// lacks a required column, a row is too short, or a row has a blank prompt
/// or option.
pub fn parse_tsv(input: &str) -> Result<Vec<Question>, TableError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.trim_start_matches('\u{feff}').as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;
    let width = columns.width();

    let mut questions = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() < width {
            return Err(TableError::ShortRow {
                line,
                expected: width,
                got: record.len(),
            });
        }
        questions.push(columns.question(&record, line)?);
    }

    log::debug!("parsed {} questions from table", questions.len());
    Ok(questions)
}
