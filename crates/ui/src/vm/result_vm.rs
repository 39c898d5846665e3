use quiz_core::model::{AnswerRecord, QuizResult};

use super::markdown_vm::{explanation_markdown, markdown_to_html};
use super::time_fmt::{format_datetime, format_elapsed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    pub number: usize,
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub mark: &'static str,
    pub explanation_html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub title: String,
    pub score_label: String,
    pub percent_label: String,
    pub message: &'static str,
    pub completed_label: String,
    pub elapsed_label: String,
    pub rows: Vec<AnswerRowVm>,
}

#[must_use]
pub fn map_result(result: &QuizResult) -> ResultVm {
    let title = result.nickname.as_deref().map_or_else(
        || "あなたの結果".to_string(),
        |nickname| format!("{nickname}さんの結果"),
    );
    let percent = result.percent_correct();

    ResultVm {
        title,
        score_label: format!("{} / {} 問正解", result.correct_count, result.total_questions),
        percent_label: format!("正答率 {percent}%"),
        message: score_message(percent),
        completed_label: format_datetime(result.completed_at),
        elapsed_label: format_elapsed(result.started_at, result.completed_at),
        rows: result.answers_history.iter().enumerate().map(map_row).collect(),
    }
}

fn map_row((position, record): (usize, &AnswerRecord)) -> AnswerRowVm {
    AnswerRowVm {
        number: position + 1,
        question: record.question().to_string(),
        user_answer: record.user_answer().to_string(),
        correct_answer: record.correct_answer().to_string(),
        is_correct: record.is_correct(),
        mark: if record.is_correct() { "⭕" } else { "❌" },
        explanation_html: markdown_to_html(&explanation_markdown(record.explanation())),
    }
}

fn score_message(percent: u32) -> &'static str {
    match percent {
        100 => "パーフェクト！どこへ行っても安心ですね🌏",
        80..=99 => "すばらしい！旅の準備はばっちりです✈️",
        50..=79 => "なかなかです。もう少しで旅の達人！",
        _ => "出発前にもう一度おさらいしましょう📚",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{EvaluationResult, QuestionIndex, SessionId};
    use quiz_core::time::fixed_now;

    fn record(index: usize, is_correct: bool) -> AnswerRecord {
        let evaluation = EvaluationResult {
            is_correct,
            user_answer: "ESTA".into(),
            correct_answer: "ESTA".into(),
            explanation: "**渡航前**に申請".into(),
        };
        AnswerRecord::new(
            QuestionIndex::new(index),
            format!("Q{index}"),
            "ESTA",
            &evaluation,
            "raw",
            fixed_now(),
        )
    }

    #[test]
    fn maps_score_and_rows_in_history_order() {
        let result = QuizResult {
            session_id: SessionId::new_random(),
            nickname: Some("はなこ".into()),
            total_questions: 2,
            correct_count: 1,
            answers_history: vec![record(3, true), record(7, false)],
            started_at: fixed_now(),
            completed_at: fixed_now() + Duration::seconds(90),
        };

        let vm = map_result(&result);
        assert_eq!(vm.title, "はなこさんの結果");
        assert_eq!(vm.score_label, "1 / 2 問正解");
        assert_eq!(vm.percent_label, "正答率 50%");
        assert_eq!(vm.elapsed_label, "1分30秒");
        assert_eq!(vm.rows[0].number, 1);
        assert_eq!(vm.rows[0].question, "Q3");
        assert_eq!(vm.rows[1].mark, "❌");
        assert!(vm.rows[0].explanation_html.contains("<strong>渡航前</strong>"));
    }

    #[test]
    fn anonymous_results_use_generic_title() {
        let result = QuizResult {
            session_id: SessionId::new_random(),
            nickname: None,
            total_questions: 1,
            correct_count: 1,
            answers_history: vec![record(0, true)],
            started_at: fixed_now(),
            completed_at: fixed_now(),
        };
        let vm = map_result(&result);
        assert_eq!(vm.title, "あなたの結果");
        assert_eq!(vm.message, score_message(100));
    }
}
