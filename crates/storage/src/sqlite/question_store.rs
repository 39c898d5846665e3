use chrono::Utc;
use quiz_core::model::{Question, QuestionIndex};
use sqlx::SqlitePool;

use super::{
    SqliteQuestionStore,
    mapping::{map_question_row, position_to_i64},
};
use crate::repository::{QuestionRecord, QuestionRepository, StorageError};

/// Schema steps in version order. Each runs once, inside its own transaction.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    r"
        CREATE TABLE IF NOT EXISTS questions (
            position INTEGER PRIMARY KEY CHECK (position >= 0),
            prompt TEXT NOT NULL CHECK (length(trim(prompt)) > 0),
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
)];

const INSERT_QUESTION: &str = r"
    INSERT INTO questions (position, prompt, option_a, option_b, option_c, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const UPSERT_QUESTION: &str = r"
    INSERT INTO questions (position, prompt, option_a, option_b, option_c, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(position) DO UPDATE SET
        prompt = excluded.prompt,
        option_a = excluded.option_a,
        option_b = excluded.option_b,
        option_c = excluded.option_c,
        updated_at = excluded.updated_at
";

const SELECT_QUESTION: &str = r"
    SELECT position, prompt, option_a, option_b, option_c
    FROM questions
    WHERE position = ?1
";

const LIST_QUESTIONS: &str = r"
    SELECT position, prompt, option_a, option_b, option_c
    FROM questions
    ORDER BY position ASC
";

/// Apply pending schema steps and return the number of stored questions.
pub(super) async fn migrate(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )
    .execute(pool)
    .await?;

    let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;
    for &(version, ddl) in MIGRATIONS {
        if applied.contains(&version) {
            continue;
        }
        let mut tx = pool.begin().await?;
        sqlx::query(ddl).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        log::info!("applied question store migration {version}");
    }

    sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteQuestionStore {
    async fn upsert_question(
        &self,
        position: QuestionIndex,
        question: &Question,
    ) -> Result<(), StorageError> {
        let record = QuestionRecord::from_question(position, question);
        sqlx::query(UPSERT_QUESTION)
            .bind(position_to_i64(record.position)?)
            .bind(record.prompt)
            .bind(record.option_a)
            .bind(record.option_b)
            .bind(record.option_c)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    /// Rows are renumbered `0..n` in slice order. Readers see either the old
    /// table or the new one.
    async fn replace_all(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let removed = sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?
            .rows_affected();

        let now = Utc::now();
        for (position, question) in questions.iter().enumerate() {
            let record = QuestionRecord::from_question(QuestionIndex::new(position), question);
            sqlx::query(INSERT_QUESTION)
                .bind(position_to_i64(record.position)?)
                .bind(record.prompt)
                .bind(record.option_a)
                .bind(record.option_b)
                .bind(record.option_c)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        log::info!(
            "replaced {removed} stored questions with {}",
            questions.len()
        );
        Ok(())
    }

    async fn get_question(&self, position: QuestionIndex) -> Result<Question, StorageError> {
        let row = sqlx::query(SELECT_QUESTION)
            .bind(position_to_i64(position)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref()
            .map_or(Err(StorageError::NotFound), map_question_row)
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(LIST_QUESTIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}
