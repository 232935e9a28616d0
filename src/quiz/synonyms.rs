//! Synonym table lookup: prompt → one completion → parsed rows.

use crate::llm::{make_prompt, parse_table, CompletionClient, LlmError, TableRow};

/// Words used when the CLI is run without arguments.
pub const DEFAULT_WORDS: [&str; 10] = [
    "happy",
    "big",
    "small",
    "fast",
    "beautiful",
    "strong",
    "smart",
    "hot",
    "cold",
    "funny",
];

/// Ask for three synonyms and the Korean meaning of every word in `words`.
///
/// The answer is parsed with [`parse_table`]; a reply without a table gives
/// an empty vector rather than an error.
pub async fn get_synonyms<S: AsRef<str>>(
    client: &dyn CompletionClient,
    words: &[S],
) -> Result<Vec<TableRow>, LlmError> {
    let prompt = make_prompt(words);

    log::info!("synonyms: requesting {} word(s)", words.len());
    log::info!(
        "synonyms: words = {:?}",
        words.iter().map(|w| w.as_ref()).collect::<Vec<&str>>()
    );
    log::debug!("synonyms: prompt = {prompt:?}");

    let answer = client.complete(&prompt).await?;
    log::debug!("synonyms: raw answer = {answer:?}");

    Ok(parse_table(&answer))
}
