//! Chat-completion module.
//!
//! This module provides:
//! * [`CompletionClient`]: async trait implemented by completion backends.
//! * [`ApiClient`]: OpenAI-compatible REST API client.
//! * [`make_prompt`] and the three passage prompt builders.
//! * [`parse_table`] / [`render_table`]: pipe-delimited table handling.
//! * [`LlmError`]: error variants for completion requests.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use passage_quiz::config::AppConfig;
//! use passage_quiz::llm::{make_prompt, parse_table, ApiClient, CompletionClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default().with_env();
//!     let client = ApiClient::from_config(&config.llm);
//!
//!     let answer = client.complete(&make_prompt(&["happy", "big"])).await.unwrap();
//!     for row in parse_table(&answer) {
//!         println!("{}", row.join(" | "));
//!     }
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod table;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{extract_content, ApiClient, CompletionClient, LlmError};
pub use prompt::{
    make_analysis_prompt, make_blank_question_prompt, make_false_statements_prompt, make_prompt,
};
pub use table::{parse_table, render_rows, render_table, TableRow, RULE_WIDTH, TABLE_HEADER};
