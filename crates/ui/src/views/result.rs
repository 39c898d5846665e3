use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, use_quiz_slot};
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::{ResultVm, map_result};

#[component]
pub fn ResultView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let slot = use_quiz_slot();
    let quiz_loop = ctx.quiz_loop();

    let outcome = use_memo(move || -> Result<ResultVm, ViewError> {
        match slot.run.read().as_ref() {
            Some(run) => quiz_loop
                .finalize(run)
                .map(|result| map_result(&result))
                .map_err(ViewError::from),
            None => Err(ViewError::NotFinished),
        }
    });

    let on_retry = move |_| {
        slot.reset();
        navigator.push(Route::Quiz {});
    };

    rsx! {
        div { class: "page result-page",
            match outcome() {
                Ok(vm) => rsx! {
                    header { class: "view-header",
                        h2 { class: "view-title", "{vm.title}" }
                        p { class: "view-subtitle", "{vm.message}" }
                    }
                    div { class: "view-divider" }
                    div { class: "result-score",
                        span { class: "result-score-main", "{vm.score_label}" }
                        span { class: "result-score-percent", "{vm.percent_label}" }
                    }
                    p { class: "result-meta", "完了: {vm.completed_label}（所要時間 {vm.elapsed_label}）" }
                    ol { class: "result-history",
                        for row in vm.rows.iter() {
                            li {
                                key: "{row.number}",
                                class: if row.is_correct { "result-row result-row--correct" } else { "result-row result-row--incorrect" },
                                p { class: "result-question", "{row.mark} 問題{row.number}: {row.question}" }
                                p { "あなたの回答: {row.user_answer}" }
                                p { "正解: {row.correct_answer}" }
                                div { class: "result-explanation", dangerous_inner_html: "{row.explanation_html}" }
                            }
                        }
                    }
                    div { class: "result-actions",
                        button {
                            class: "btn btn-primary",
                            id: "result-retry",
                            r#type: "button",
                            onclick: on_retry,
                            "もう一度挑戦する"
                        }
                        Link { class: "btn btn-secondary", to: Route::Home {}, "スタートに戻る" }
                    }
                },
                Err(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    Link { class: "btn btn-link", to: Route::Quiz {}, "クイズに戻る" }
                },
            }
        }
    }
}
