//! Request orchestration on top of [`crate::llm`].
//!
//! * [`get_synonyms`]: synonym table for a word list.
//! * [`generate_questions`]: bilingual passage questions per [`QuestionMode`].

pub mod questions;
pub mod synonyms;

pub use questions::{generate_questions, GenerateError, QuestionMode, SECTION_RULE_WIDTH};
pub use synonyms::{get_synonyms, DEFAULT_WORDS};
