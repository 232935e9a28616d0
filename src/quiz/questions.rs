//! Passage question generation.
//!
//! A [`QuestionMode`] picks one of the three passage prompts, or all three
//! in a fixed order. The completion text is returned unprocessed; for
//! [`QuestionMode::All`] the three answers are concatenated under a titled
//! banner each.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{
    make_analysis_prompt, make_blank_question_prompt, make_false_statements_prompt,
    CompletionClient, LlmError,
};

/// Width of the `=` rule closing each section of a combined result.
pub const SECTION_RULE_WIDTH: usize = 80;

// ---------------------------------------------------------------------------
// GenerateError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The passage was empty or whitespace only; no request was made.
    #[error("지문을 입력해주세요.")]
    EmptyPassage,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

// ---------------------------------------------------------------------------
// QuestionMode
// ---------------------------------------------------------------------------

/// Which questions to generate for a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionMode {
    /// Flow analysis plus title / topic / main idea / summary questions.
    Analysis,
    /// Select all statements that do not match the passage.
    FalseStatements,
    /// Fill-in-the-blank on the key sentence.
    FillInBlank,
    /// The three modes above, one request each.
    All,
}

impl QuestionMode {
    /// Menu order.
    pub const ALL: [QuestionMode; 4] = [
        QuestionMode::Analysis,
        QuestionMode::FalseStatements,
        QuestionMode::FillInBlank,
        QuestionMode::All,
    ];

    /// Modes issued, in order, by [`QuestionMode::All`].
    pub const SINGLE: [QuestionMode; 3] = [
        QuestionMode::Analysis,
        QuestionMode::FalseStatements,
        QuestionMode::FillInBlank,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuestionMode::Analysis => "주제·제목·요지",
            QuestionMode::FalseStatements => "불일치 문제",
            QuestionMode::FillInBlank => "빈칸 문제",
            QuestionMode::All => "전체 문제 생성",
        }
    }

    /// Prompt for a single mode; `None` for [`QuestionMode::All`].
    pub fn prompt(self, passage: &str) -> Option<String> {
        match self {
            QuestionMode::Analysis => Some(make_analysis_prompt(passage)),
            QuestionMode::FalseStatements => Some(make_false_statements_prompt(passage)),
            QuestionMode::FillInBlank => Some(make_blank_question_prompt(passage)),
            QuestionMode::All => None,
        }
    }
}

impl Default for QuestionMode {
    fn default() -> Self {
        Self::Analysis
    }
}

// ---------------------------------------------------------------------------
// generate_questions
// ---------------------------------------------------------------------------

/// Generate questions for `passage`.
///
/// Blank passages fail with [`GenerateError::EmptyPassage`] before any
/// request. The first failing request aborts the whole run.
pub async fn generate_questions(
    client: &dyn CompletionClient,
    mode: QuestionMode,
    passage: &str,
) -> Result<String, GenerateError> {
    if passage.trim().is_empty() {
        return Err(GenerateError::EmptyPassage);
    }

    if let Some(prompt) = mode.prompt(passage) {
        log::info!("quiz: requesting {}", mode.label());
        return Ok(client.complete(&prompt).await?);
    }

    let mut combined = String::new();
    for single in QuestionMode::SINGLE {
        let Some(prompt) = single.prompt(passage) else {
            continue;
        };
        log::info!("quiz: requesting {}", single.label());
        let content = client.complete(&prompt).await?;
        combined.push_str(&section(single.label(), &content));
    }
    Ok(combined)
}

fn section(title: &str, content: &str) -> String {
    format!(
        "🔷 {title} 결과\n\n{content}\n\n{}\n\n",
        "=".repeat(SECTION_RULE_WIDTH)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
