#![forbid(unsafe_code)]

pub mod repository;
pub mod seed;
pub mod sqlite;
pub mod table;

pub use repository::{InMemoryRepository, QuestionRepository, Storage, StorageError};
