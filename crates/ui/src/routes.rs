use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::use_quiz_slot_provider;
use crate::views::{HomeView, QuizView, ResultView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/result", ResultView)] Results {},
}

#[component]
fn Layout() -> Element {
    use_quiz_slot_provider();

    rsx! {
        div { class: "app",
            TopBar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    rsx! {
        nav { class: "topbar",
            h1 { Link { to: Route::Home {}, "🗽海外旅行の基礎知識Check🏝️" } }
        }
    }
}
