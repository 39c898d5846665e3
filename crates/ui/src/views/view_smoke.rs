use std::sync::Arc;

use quiz_core::model::QuizProfile;

use super::quiz::QuizIntent;
use super::test_harness::{
    KeyedEvaluator, ScriptOnlyEvaluator, ViewKind, build_services, settings, setup_view_harness,
    travel_questions,
};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_single_persona_select() {
    let services = build_services(
        travel_questions(3),
        settings(QuizProfile::Standard, 3),
        Arc::new(KeyedEvaluator),
    );
    let mut harness = setup_view_harness(ViewKind::Home, services, None);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("全3問"), "missing length in {html}");
    assert!(html.contains("<select"), "missing select in {html}");
    assert!(html.contains("厳しい先生"), "missing persona in {html}");
    assert!(!html.contains("checkbox"), "unexpected checkbox in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_persona_checkboxes_when_multiple() {
    let services = build_services(
        travel_questions(3),
        settings(QuizProfile::Extended, 3),
        Arc::new(KeyedEvaluator),
    );
    let mut harness = setup_view_harness(ViewKind::Home, services, None);
    harness.rebuild();
    let html = harness.render();
    assert_eq!(html.matches("checkbox").count(), 5, "expected 5 personas in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_starts_and_grades_an_answer() {
    let services = build_services(
        travel_questions(2),
        settings(QuizProfile::Standard, 2),
        Arc::new(KeyedEvaluator),
    );
    let mut harness = setup_view_harness(ViewKind::Quiz, services, None);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("問題 1 / 2"), "missing heading in {html}");
    assert!(html.contains("旅行クイズ1"), "missing prompt in {html}");
    assert!(html.contains("回答を確定する"), "missing submit in {html}");

    let dispatch = harness.quiz_handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Submit));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("回答を選択してください。"), "missing warning in {html}");

    harness
        .dom
        .in_runtime(|| dispatch.call(QuizIntent::Select("ESTAの申請".into())));
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Submit));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("正解です！"), "missing verdict in {html}");
    assert!(html.contains("+1 point"), "missing badge in {html}");
    assert!(html.contains("<strong>ESTAの申請</strong>"), "missing explanation in {html}");
    assert!(html.contains("次の問題へ"), "missing next button in {html}");
    assert!(html.contains("問題 1 / 2"), "heading moved early in {html}");

    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Next));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("問題 2 / 2"), "missing second heading in {html}");
    assert!(!html.contains("正解です！"), "stale feedback in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_falls_back_to_raw_response() {
    let services = build_services(
        travel_questions(1),
        settings(QuizProfile::Standard, 1),
        Arc::new(ScriptOnlyEvaluator),
    );
    let mut harness = setup_view_harness(ViewKind::Quiz, services, None);
    harness.rebuild();
    harness.drive_async().await;

    let dispatch = harness.quiz_handles.dispatch();
    harness
        .dom
        .in_runtime(|| dispatch.call(QuizIntent::Select("何も要らない".into())));
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Submit));
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("回答の表示中にエラーが発生しました。"),
        "missing render error in {html}"
    );
    assert!(html.contains("GPTレスポンス:"), "missing raw label in {html}");
    assert!(html.contains("結果を見る"), "missing results button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_empty_question_table() {
    let services = build_services(
        Vec::new(),
        settings(QuizProfile::Standard, 3),
        Arc::new(KeyedEvaluator),
    );
    let mut harness = setup_view_harness(ViewKind::Quiz, services, None);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("問題が登録されていません"), "missing error in {html}");
    assert!(html.contains("再試行"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_score_and_history() {
    let services = build_services(
        travel_questions(2),
        settings(QuizProfile::Standard, 2),
        Arc::new(KeyedEvaluator),
    );
    let quiz_loop = services.quiz_loop();
    let mut run = quiz_loop.start(Some("はなこ"), Vec::new()).await.unwrap();
    quiz_loop.submit(&mut run, Some("ESTAの申請")).await.unwrap();
    quiz_loop.next(&mut run);
    quiz_loop.submit(&mut run, Some("パスポートのみ")).await.unwrap();
    assert!(run.is_complete());
    assert!(run.result().is_some());

    let mut harness = setup_view_harness(ViewKind::Results, services, Some(run));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("はなこさんの結果"), "missing title in {html}");
    assert!(html.contains("1 / 2 問正解"), "missing score in {html}");
    assert!(html.contains("正答率 50%"), "missing percent in {html}");
    assert!(html.contains("問題1: 旅行クイズ1"), "missing history in {html}");

    harness.rebuild();
    assert_eq!(harness.render(), html);
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_rejects_unfinished_quiz() {
    let services = build_services(
        travel_questions(2),
        settings(QuizProfile::Standard, 2),
        Arc::new(KeyedEvaluator),
    );
    let run = services.quiz_loop().start(None, Vec::new()).await.unwrap();

    let mut harness = setup_view_harness(ViewKind::Results, services, Some(run));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("まだ全ての問題に回答していません"), "missing message in {html}");
}
