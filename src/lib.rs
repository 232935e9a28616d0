//! GPT-backed English question generator: synonym tables, passage questions,
//! per-user word lists and document / speech export.

pub mod app;
pub mod config;
pub mod export;
pub mod llm;
pub mod pipeline;
pub mod quiz;
pub mod store;
