mod feedback_vm;
mod markdown_vm;
mod quiz_vm;
mod result_vm;
mod time_fmt;

pub use feedback_vm::{
    FeedbackDisplay, FeedbackVm, RenderError, Verdict, VerdictBannerVm, feedback_or_raw,
    render_feedback, verdict_banner,
};
pub use markdown_vm::{explanation_markdown, markdown_to_html, sanitize_html};
pub use quiz_vm::{
    GRADING_MESSAGE, MISSING_SELECTION_WARNING, NEXT_LABEL, OptionVm, QuizNext, QuizScreenVm,
    RESULTS_LABEL, SELECT_PROMPT, SUBMIT_LABEL, map_quiz_screen,
};
pub use result_vm::{AnswerRowVm, ResultVm, map_result};
pub use time_fmt::{format_datetime, format_elapsed};
