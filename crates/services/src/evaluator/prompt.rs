use quiz_core::model::{OptionLabel, PersonaCatalog, PersonaId, Question};

/// Header placed above the bullet list of persona instructions.
pub const ADVISOR_HEADER: &str = "あなたは以下の特性を持っているアドバイザーです：";

/// Correct-answer text used when grading could not run.
pub const EVALUATION_FAILED_ANSWER: &str = "評価中にエラーが発生しました";

/// Apology shown as the explanation when grading could not run.
pub const EVALUATION_FAILED_EXPLANATION: &str =
    "申し訳ありません。回答の評価中にエラーが発生しました。もう一度お試しください。";

/// Render the system instructions for the selected personas.
///
/// Roles missing from the catalog are skipped; with nothing left the
/// catalog's default persona speaks alone.
#[must_use]
pub fn build_system_instructions(catalog: &PersonaCatalog, roles: &[PersonaId]) -> String {
    let instructions: Vec<&str> = roles
        .iter()
        .filter_map(|role| catalog.instruction(role).ok())
        .collect();

    if instructions.is_empty() {
        return catalog.default_persona().instruction.clone();
    }

    let mut combined = String::from(ADVISOR_HEADER);
    combined.push('\n');
    for instruction in instructions {
        combined.push_str("- ");
        combined.push_str(instruction);
        combined.push('\n');
    }
    combined
}

/// Render the user message asking for a verdict in the fixed layout.
#[must_use]
pub fn build_grading_prompt(question: &Question, user_answer: &str) -> String {
    let options = OptionLabel::ALL
        .iter()
        .map(|label| format!("{label}. {}", question.option(*label)))
        .collect::<Vec<_>>()
        .join(" / ");

    format!(
        "問題: {prompt}
選択肢: {options}
ユーザーの回答: {user_answer}

以下の手順でユーザーの回答を評価し、必ず指定された形式で回答してください：

1. 問題文と選択肢から最も適切な選択肢を１つ選んでください。（この内容は出力しないでください）
2. ユーザーの回答が最も適切な選択肢と一致するか評価してください。（この内容は出力しないでください）
3. RESULT:[INCORRECT]の場合、ユーザーの回答にツッコミを入れ、正解の解説をしてください
4. 以下のフォーマットで厳密に回答してください：

RESULT:[CORRECT] または RESULT:[INCORRECT]
あなたの回答: [ユーザーの回答]
正解: [適切な選択肢]
解説: [200字程度の、選択したキャラクターに応じた面白い解説]
",
        prompt = question.prompt(),
    )
}

/// Stand-in response used whenever the evaluator fails.
///
/// Parses as an incorrect answer with an apology explanation.
#[must_use]
pub fn synthetic_failure_response(user_answer: &str) -> String {
    format!(
        "RESULT:[INCORRECT]\nあなたの回答: {user_answer}\n正解: {EVALUATION_FAILED_ANSWER}\n解説: {EVALUATION_FAILED_EXPLANATION}"
    )
}
