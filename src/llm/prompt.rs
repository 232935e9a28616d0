//! Prompt builders.
//!
//! * [`make_prompt`]: synonym table request for a word list (Korean).
//! * [`make_analysis_prompt`]: flow analysis + title / topic / main idea /
//!   summary multiple-choice questions.
//! * [`make_false_statements_prompt`]: "select all that do not match".
//! * [`make_blank_question_prompt`]: fill-in-the-blank.
//!
//! All builders are pure: the input is embedded verbatim and nothing else
//! varies between calls.

use super::table::TABLE_HEADER;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const SYNONYM_INSTRUCTION: &str =
    "다음 영어 단어 각각에 대해 유의어 3개와 한국어 의미를 표 형식으로 보여줘.";

const ANALYSIS_INSTRUCTION: &str = "
This GPT has two main functions: flow analysis and question generation, both based on a given passage. Users provide a text passage, and the GPT will analyze its flow and generate relevant multiple-choice questions in English and Korean. All summaries provided will be concise and in Korean, limited to less than 20 characters.

**Flow Analysis (in Korean)**
1. The passage is broken down into three sections—Introduction, Body, and Conclusion.
2. For each section, the GPT will:
  - **Subject Matter**: Identify and describe the main focus of the section in Korean.
  - **Summary**: Provide a brief summary in Korean, ensuring it is less than 20 characters.

**Question Generation (Both in English and Korean)**
1. **Multiple-Choice Questions**: Create relevant questions with 5 answer choices. Each question will have:
  - **Title**: A question to determine the best title for the passage, using styles and examples based on those in the attached reference PDF. Ensure options are of varying sentence lengths and meanings for clarity and distinction.
  - **Topic**: A question to determine the best topic for the passage, following similar guidelines as the title question. On Topic, choices should be given in small letters.
  - **Main Idea**: A question to determine the best main idea for the passage, with 5 choices listed by sentence length. The correct answer will be distinct, and the wrong answers will differ in content and context to avoid overlapping meaning with the correct one.
  - **Summary**: Summarize the passage in one sentence.

Each question will be provided with one correct answer, and the answers will be translated into Korean. The wrong answers should be translated into Korean as well. Make the choices in circled digits like ① ② ③ ④ ⑤. English and Korean choices should be given separately. To ensure variety, the correct answer should not always be option ①, but instead randomly assigned among the five options for each question.
📌 You **must provide the correct answer explicitly** for each question in both English and Korean.
Passage:
";

const FALSE_STATEMENTS_INSTRUCTION: &str = "
This GPT generates multiple-choice questions (MCQs) in both English and Korean based on a given passage. It follows a structured format where:

1. A passage is provided by the user.
2. A question is created asking the user to select all choices that do not match the passage.
3. Answer choices are labeled with ⓐ ⓑ ⓒ ⓓ ⓔ ⓕ ⓖ ⓗ.
4. The wording of answer choices is varied to avoid direct repetition of the passage.
5. Just three incorrect choices are included.(They are the answers: only three)
6. Correct answers are provided with detailed explanations.
7. The entire question, choices, answers, and explanations are provided in both **English and Korean**.
8. English and Korean should be separated.

This GPT is ideal for language learners, educators, and test creators who need bilingual comprehension questions. It ensures accuracy and consistency while maintaining clarity in both languages.

    Passage:
    ";

const BLANK_QUESTION_INSTRUCTION: &str = "
This GPT generates multiple-choice questions (MCQs) in both English and Korean based on a given passage. It follows a structured format where: 

1. A passage is provided by the user.
2. A question is created by turning the topic sentence or key idea of the passage into a fill-in-the-blank format.
3. Answer choices are labeled with ① ② ③ ④ ⑤. 
4. The correct answer must match the original sentence from the passage exactly, while the incorrect choices are created by modifying the correct answer to express opposite or irrelevant ideas.
5. The entire question, choices, and answers are provided in both **English and Korean**. 
6. English and Korean should be separated.

Passage:
";

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the synonym-table request for `words`.
///
/// ```rust
/// use passage_quiz::llm::make_prompt;
///
/// let prompt = make_prompt(&["happy", "big"]);
/// assert!(prompt.contains("happy, big"));
/// ```
pub fn make_prompt<S: AsRef<str>>(words: &[S]) -> String {
    let word_list = words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<&str>>()
        .join(", ");

    format!(
        "{SYNONYM_INSTRUCTION}\n단어 리스트: {word_list}\n\n결과는 다음과 같이 보여줘:\n{TABLE_HEADER}\n"
    )
}

/// Flow analysis plus title / topic / main idea / summary questions.
pub fn make_analysis_prompt(text: &str) -> String {
    embed(ANALYSIS_INSTRUCTION, text, "\n    ")
}

/// "Select all choices that do not match the passage" questions.
pub fn make_false_statements_prompt(text: &str) -> String {
    embed(FALSE_STATEMENTS_INSTRUCTION, text, "\n")
}

/// Fill-in-the-blank question built from the passage's key sentence.
pub fn make_blank_question_prompt(text: &str) -> String {
    embed(BLANK_QUESTION_INSTRUCTION, text, "\n")
}

fn embed(instruction: &str, text: &str, tail: &str) -> String {
    let mut prompt = String::with_capacity(instruction.len() + text.len() + tail.len());
    prompt.push_str(instruction);
    prompt.push_str(text);
    prompt.push_str(tail);
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PASSAGE: &str = "Bees communicate through dance.\nThe waggle dance points to food.";

    #[test]
    fn synonym_prompt_joins_words_in_order() {
        let prompt = make_prompt(&["happy", "big"]);
        assert!(prompt.contains("단어 리스트: happy, big\n"));
    }

    #[test]
    fn synonym_prompt_ends_with_table_header() {
        let prompt = make_prompt(&["fast"]);
        assert!(prompt.ends_with("영어 단어 | 유의어1 | 유의어2 | 유의어3 | 한국어 의미\n"));
        assert!(prompt.starts_with(SYNONYM_INSTRUCTION));
    }

    #[test]
    fn synonym_prompt_contains_each_word_once() {
        let words = ["happy", "big", "small", "fast", "beautiful"];
        let prompt = make_prompt(&words);

        for word in words {
            assert_eq!(
                prompt.matches(word).count(),
                1,
                "{word} should appear exactly once"
            );
        }
        assert!(prompt.contains(&words.join(", ")));
    }

    #[test]
    fn synonym_prompt_accepts_owned_strings() {
        let words: Vec<String> = vec!["hot".into(), "cold".into()];
        assert_eq!(make_prompt(&words), make_prompt(&["hot", "cold"]));
    }

    #[test]
    fn synonym_prompt_with_no_words_is_still_well_formed() {
        let prompt = make_prompt::<&str>(&[]);
        assert!(prompt.contains("단어 리스트: \n"));
    }

    #[test]
    fn analysis_prompt_embeds_passage_verbatim() {
        let prompt = make_analysis_prompt(PASSAGE);
        assert!(prompt.contains(&format!("Passage:\n{PASSAGE}")));
        assert!(prompt.contains("**Flow Analysis (in Korean)**"));
        assert!(prompt.contains("① ② ③ ④ ⑤"));
    }

    #[test]
    fn false_statements_prompt_uses_lettered_choices() {
        let prompt = make_false_statements_prompt(PASSAGE);
        assert!(prompt.contains(PASSAGE));
        assert!(prompt.contains("ⓐ ⓑ ⓒ ⓓ ⓔ ⓕ ⓖ ⓗ"));
        assert!(prompt.contains("do not match the passage"));
    }

    #[test]
    fn blank_prompt_asks_for_fill_in_the_blank() {
        let prompt = make_blank_question_prompt(PASSAGE);
        assert!(prompt.ends_with(&format!("Passage:\n{PASSAGE}\n")));
        assert!(prompt.contains("fill-in-the-blank"));
    }

    #[test]
    fn blank_prompt_keeps_trailing_spaces() {
        let prompt = make_blank_question_prompt(PASSAGE);
        assert!(prompt.contains("structured format where: \n\n1. A passage"));
        assert!(prompt.contains("① ② ③ ④ ⑤. \n4."));
        assert!(prompt.contains("**English and Korean**. \n6."));
    }

    #[test]
    fn question_prompts_are_distinct() {
        let a = make_analysis_prompt(PASSAGE);
        let b = make_false_statements_prompt(PASSAGE);
        let c = make_blank_question_prompt(PASSAGE);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}
