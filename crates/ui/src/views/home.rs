use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::model::{PersonaId, PersonaSelection};

use crate::context::{AppContext, use_quiz_slot};
use crate::routes::Route;

#[derive(Clone, Debug, PartialEq, Eq)]
struct PersonaChoice {
    id: PersonaId,
    selected: bool,
}

fn persona_choices(ctx: &AppContext, roles: &[PersonaId]) -> Vec<PersonaChoice> {
    let default_id = &ctx.catalog().default_persona().id;
    ctx.catalog()
        .ids()
        .map(|id| PersonaChoice {
            id: id.clone(),
            selected: if roles.is_empty() {
                id == default_id
            } else {
                roles.contains(id)
            },
        })
        .collect()
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let slot = use_quiz_slot();
    let mut setup = slot.setup;

    let max_questions = ctx.settings().max_questions();
    let selection = ctx.settings().persona_selection();
    let choices = persona_choices(&ctx, &setup.read().roles);
    let nickname = setup.read().nickname.clone();

    let checkboxes = choices.iter().map(|choice| {
        let id = choice.id.clone();
        let checked = choice.selected;
        rsx! {
            label { key: "{choice.id}", class: "persona-option",
                input {
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |evt: FormEvent| {
                        toggle_role(&mut setup.write().roles, &id, evt.checked());
                    },
                }
                span { "{choice.id}" }
            }
        }
    });

    let on_start = move |_| {
        slot.reset();
        navigator.push(Route::Quiz {});
    };

    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "🗽海外旅行の基礎知識Check🏝️" }
                p { class: "view-subtitle",
                    "全{max_questions}問の三択クイズです。回答はAIの先生が採点して解説してくれます。"
                }
            }
            div { class: "view-divider" }
            div { class: "form-field",
                label { r#for: "nickname", "ニックネーム" }
                input {
                    id: "nickname",
                    r#type: "text",
                    placeholder: "旅人",
                    value: "{nickname}",
                    oninput: move |evt| setup.write().nickname = evt.value(),
                }
            }
            div { class: "form-field persona-field",
                match selection {
                    PersonaSelection::Single => rsx! {
                        label { r#for: "persona", "解説してくれる人" }
                        select {
                            id: "persona",
                            onchange: move |evt| {
                                if let Ok(id) = PersonaId::new(evt.value()) {
                                    setup.write().roles = vec![id];
                                }
                            },
                            for choice in choices.iter() {
                                option {
                                    key: "{choice.id}",
                                    value: "{choice.id}",
                                    selected: choice.selected,
                                    "{choice.id}"
                                }
                            }
                        }
                    },
                    PersonaSelection::Multiple => rsx! {
                        span { class: "form-label", "解説してくれる人（複数選択可）" }
                        div { class: "persona-list",
                            {checkboxes}
                        }
                    },
                }
            }
            button {
                class: "btn btn-primary",
                id: "quiz-start",
                r#type: "button",
                onclick: on_start,
                "クイズを始める"
            }
        }
    }
}

fn toggle_role(roles: &mut Vec<PersonaId>, id: &PersonaId, checked: bool) {
    roles.retain(|role| role != id);
    if checked {
        roles.push(id.clone());
    }
}
