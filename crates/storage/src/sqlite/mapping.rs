use quiz_core::model::{Question, QuestionIndex};
use sqlx::Row;

use crate::repository::{QuestionRecord, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn position_to_i64(position: QuestionIndex) -> Result<i64, StorageError> {
    i64::try_from(position.value())
        .map_err(|_| StorageError::Serialization("position overflow".into()))
}

pub(crate) fn position_from_i64(v: i64) -> Result<QuestionIndex, StorageError> {
    usize::try_from(v)
        .map(QuestionIndex::new)
        .map_err(|_| StorageError::Serialization(format!("invalid position: {v}")))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let record = QuestionRecord {
        position: position_from_i64(row.try_get::<i64, _>("position").map_err(ser)?)?,
        prompt: row.try_get("prompt").map_err(ser)?,
        option_a: row.try_get("option_a").map_err(ser)?,
        option_b: row.try_get("option_b").map_err(ser)?,
        option_c: row.try_get("option_c").map_err(ser)?,
    };
    record.into_question().map_err(ser)
}
