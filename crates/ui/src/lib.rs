pub mod app;
pub mod context;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use context::{
    AppContext, QuizSetup, QuizSlot, UiApp, build_app_context, use_quiz_slot, use_quiz_slot_provider,
};
