#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod parser;
pub mod time;

pub use error::Error;
pub use parser::{ExplanationFallback, LabelMatch, ParserOptions, ResponseParser};
pub use time::Clock;
