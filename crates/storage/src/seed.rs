//! Filling the question table, from an exported spreadsheet or from the
//! built-in overseas-travel questions.

use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionError};
use thiserror::Error;

use crate::repository::{QuestionRepository, StorageError};
use crate::table::{TableError, parse_tsv};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

const SAMPLE_QUESTIONS: [(&str, [&str; 3]); 5] = [
    (
        "海外旅行の際、パスポートの残存期間について最も適切な説明はどれですか？",
        [
            "入国時に6か月以上必要な国が多い",
            "有効期限内であればどの国でも問題ない",
            "残存期間は出国時のみ確認される",
        ],
    ),
    (
        "アメリカへ観光目的で入国する際、ビザ免除プログラムを利用するために事前に必要なものはどれですか？",
        ["ESTAの申請", "現地大使館での面接", "国際運転免許証"],
    ),
    (
        "機内持ち込み手荷物の液体物について、国際線で一般的なルールはどれですか？",
        [
            "100ml以下の容器に入れ、1リットル以下の透明袋にまとめる",
            "500ml以下であれば何本でも持ち込める",
            "液体物は一切持ち込めない",
        ],
    ),
    (
        "海外でクレジットカードを使う際、「現地通貨か日本円か」を聞かれた場合に一般的に手数料が安くなるのはどちらですか？",
        ["現地通貨で支払う", "日本円で支払う", "どちらも同じ"],
    ),
    (
        "海外でパスポートを紛失した場合、最初に行うべきことはどれですか？",
        [
            "現地の警察に届け出て紛失証明を取得する",
            "すぐに帰国便を予約する",
            "ホテルのフロントに再発行を依頼する",
        ],
    ),
];

/// The built-in questions in table order.
///
/// # Errors
///
/// Returns `QuestionError` if a built-in entry has a blank cell.
pub fn sample_questions() -> Result<Vec<Question>, QuestionError> {
    SAMPLE_QUESTIONS
        .iter()
        .map(|(prompt, options)| Question::new(*prompt, *options))
        .collect()
}

/// Replace the stored questions with the table at `table`, or with the
/// built-in questions when no table is given. Returns the stored row count.
///
/// # Errors
///
/// Returns `SeedError` if the table cannot be read or parsed, or if storage
/// rejects the write. Nothing is replaced in either case.
pub async fn seed_questions(
    repo: &dyn QuestionRepository,
    table: Option<&Path>,
) -> Result<u32, SeedError> {
    let questions = match table {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_tsv(&text)?
        }
        None => sample_questions()?,
    };
    repo.replace_all(&questions).await?;
    let count = repo.count_questions().await?;
    log::info!(
        "seeded {count} questions from {}",
        table.map_or_else(|| "built-in samples".to_string(), |p| p.display().to_string())
    );
    Ok(count)
}
