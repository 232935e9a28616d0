//! Pipeline orchestrator: runs UI commands one at a time.
//!
//! [`PipelineOrchestrator`] owns the remote clients and the user store and
//! reacts to [`PipelineCommand`]s received over a `tokio::sync::mpsc`
//! channel.
//!
//! # Command flow
//!
//! ```text
//! Generate        ─▶ generate_questions             ─▶ generated
//! FindSynonyms    ─▶ get_synonyms
//!                    └─ (username) spawn_blocking(save_word × n, save_results)
//!                                                   ─▶ synonym_rows, saved_words
//! ExportDocument  ─▶ spawn_blocking(save_document)  ─▶ last_export
//! ExportSpeech    ─▶ export_speech                  ─▶ last_export
//! ```
//!
//! JSON and `.docx` writes go through `tokio::task::spawn_blocking`; the
//! HTTP calls are awaited directly.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::export::{export_speech, save_document, ExportError, SpeechLanguage, SpeechSynthesizer};
use crate::llm::{CompletionClient, LlmError, TableRow};
use crate::quiz::{generate_questions, get_synonyms, GenerateError, QuestionMode};
use crate::store::{StoreError, UserData};

use super::state::{lock_state, PipelineState, SharedState};

// ---------------------------------------------------------------------------
// PipelineCommand
// ---------------------------------------------------------------------------

/// Requests sent from the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineCommand {
    /// Generate questions for `passage`.
    Generate { mode: QuestionMode, passage: String },

    /// Look up synonyms; a non-empty `username` also persists the words and
    /// rows for that user.
    FindSynonyms { username: String, words: Vec<String> },

    /// Write `content` to a timestamped `.docx`.
    ExportDocument { content: String },

    /// Synthesize `text` into a timestamped `.mp3`.
    ExportSpeech { text: String, language: SpeechLanguage },
}

impl PipelineCommand {
    /// Activity label shown next to the spinner.
    pub fn activity(&self) -> &'static str {
        match self {
            PipelineCommand::Generate { .. } => "문제 생성",
            PipelineCommand::FindSynonyms { .. } => "유의어 찾기",
            PipelineCommand::ExportDocument { .. } => "Word 저장",
            PipelineCommand::ExportSpeech { .. } => "음성 저장",
        }
    }
}

/// Split a comma-separated word field into trimmed, non-empty words.
///
/// ```
/// use passage_quiz::pipeline::parse_word_list;
///
/// assert_eq!(parse_word_list(" run, walk ,,jump "), vec!["run", "walk", "jump"]);
/// ```
pub fn parse_word_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Why a command ended in [`PipelineState::Error`]. The `Display` text is
/// shown to the user verbatim.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("단어를 입력해주세요.")]
    NoWords,

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("API 요청 실패: {0}")]
    Llm(#[from] LlmError),

    #[error("저장 실패: {0}")]
    Store(#[from] StoreError),

    #[error("내보내기 실패: {0}")]
    Export(#[from] ExportError),

    /// A blocking task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(e: tokio::task::JoinError) -> Self {
        PipelineError::Internal(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Executes [`PipelineCommand`]s and publishes results into [`SharedState`].
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use passage_quiz::config::AppConfig;
/// use passage_quiz::export::GoogleTranslateTts;
/// use passage_quiz::llm::ApiClient;
/// use passage_quiz::pipeline::{new_shared_state, PipelineCommand, PipelineOrchestrator};
/// use passage_quiz::store::UserData;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let state = new_shared_state(config.clone());
///
/// let orchestrator = PipelineOrchestrator::new(
///     state.clone(),
///     Arc::new(ApiClient::from_config(&config.llm)),
///     Arc::new(GoogleTranslateTts::from_config(&config.speech)),
///     Arc::new(UserData::from_config(&config.storage)),
/// );
///
/// let (tx, rx) = tokio::sync::mpsc::channel(16);
/// tokio::spawn(orchestrator.run(rx));
/// tx.send(PipelineCommand::FindSynonyms {
///     username: String::new(),
///     words: vec!["happy".into()],
/// })
/// .await
/// .unwrap();
/// # }
/// ```
pub struct PipelineOrchestrator {
    state: SharedState,
    client: Arc<dyn CompletionClient>,
    speech: Arc<dyn SpeechSynthesizer>,
    store: Arc<UserData>,
}

impl PipelineOrchestrator {
    pub fn new(
        state: SharedState,
        client: Arc<dyn CompletionClient>,
        speech: Arc<dyn SpeechSynthesizer>,
        store: Arc<UserData>,
    ) -> Self {
        Self {
            state,
            client,
            speech,
            store,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until every sender of `rx` is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<PipelineCommand>) {
        while let Some(command) = rx.recv().await {
            let activity = command.activity();
            log::info!("pipeline: {activity} started");
            self.set_working(activity);

            match self.handle(command).await {
                Ok(()) => {
                    log::info!("pipeline: {activity} finished");
                    self.set_pipeline(PipelineState::Done);
                }
                Err(e) => self.set_error(e.to_string()),
            }
            lock_state(&self.state).finished += 1;
        }

        log::info!("pipeline: command channel closed, orchestrator shutting down");
    }

    async fn handle(&self, command: PipelineCommand) -> Result<(), PipelineError> {
        match command {
            PipelineCommand::Generate { mode, passage } => self.generate(mode, &passage).await,
            PipelineCommand::FindSynonyms { username, words } => {
                self.find_synonyms(username, words).await
            }
            PipelineCommand::ExportDocument { content } => self.export_document(content).await,
            PipelineCommand::ExportSpeech { text, language } => {
                self.export_speech(&text, language).await
            }
        }
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    async fn generate(&self, mode: QuestionMode, passage: &str) -> Result<(), PipelineError> {
        let text = generate_questions(self.client.as_ref(), mode, passage).await?;
        log::debug!("pipeline: generated {} chars", text.chars().count());

        lock_state(&self.state).generated = Some(text);
        Ok(())
    }

    async fn find_synonyms(
        &self,
        username: String,
        words: Vec<String>,
    ) -> Result<(), PipelineError> {
        if words.is_empty() {
            return Err(PipelineError::NoWords);
        }

        let rows = get_synonyms(self.client.as_ref(), &words).await?;
        if rows.is_empty() {
            log::warn!("pipeline: completion contained no table rows");
        }

        let username = username.trim().to_string();
        let saved_words = if username.is_empty() {
            Vec::new()
        } else {
            let store = Arc::clone(&self.store);
            let to_save = rows.clone();
            tokio::task::spawn_blocking(move || persist(&store, &username, &words, &to_save))
                .await??
        };

        let mut st = lock_state(&self.state);
        st.synonym_rows = rows;
        st.saved_words = saved_words;
        Ok(())
    }

    async fn export_document(&self, content: String) -> Result<(), PipelineError> {
        if content.trim().is_empty() {
            return Err(ExportError::EmptyText.into());
        }

        let (dir, heading) = {
            let st = lock_state(&self.state);
            (
                st.config.export.output_dir.clone(),
                st.config.export.document_heading.clone(),
            )
        };

        let path = tokio::task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
            std::fs::create_dir_all(&dir).map_err(|source| ExportError::Io {
                path: dir.clone(),
                source,
            })?;
            save_document(&content, &heading, &dir, None, &Local::now())
        })
        .await??;

        lock_state(&self.state).last_export = Some(path);
        Ok(())
    }

    async fn export_speech(
        &self,
        text: &str,
        language: SpeechLanguage,
    ) -> Result<(), PipelineError> {
        let dir = lock_state(&self.state).config.export.output_dir.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ExportError::Io {
                path: dir.clone(),
                source,
            })?;

        let path = export_speech(self.speech.as_ref(), text, language, &dir, &Local::now()).await?;

        lock_state(&self.state).last_export = Some(path);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_working(&self, activity: &'static str) {
        let mut st = lock_state(&self.state);
        st.pipeline = PipelineState::Working;
        st.activity = Some(activity);
        st.error_message = None;
    }

    fn set_pipeline(&self, state: PipelineState) {
        lock_state(&self.state).pipeline = state;
    }

    fn set_error(&self, message: String) {
        let mut st = lock_state(&self.state);
        st.pipeline = PipelineState::Error;
        st.error_message = Some(message.clone());
        log::error!("pipeline error: {message}");
    }
}

/// Save every word and all rows for `username`, then read back the list.
fn persist(
    store: &UserData,
    username: &str,
    words: &[String],
    rows: &[TableRow],
) -> Result<Vec<String>, StoreError> {
    for word in words {
        store.save_word(username, word)?;
    }
    store.save_results(username, rows)?;
    store.get_words(username)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::state::new_shared_state;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    const TABLE_REPLY: &str = "영어 단어 | 유의어1 | 유의어2 | 유의어3 | 한국어 의미\n\
                               run | sprint | dash | race | 달리다\n\
                               walk | stroll | march | hike | 걷다";

    /// Answers every prompt with a fixed reply and counts calls.
    struct CannedLlm {
        reply: String,
        calls: Mutex<usize>,
    }

    impl CannedLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for CannedLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.reply.clone())
        }
    }

    struct FailLlm;

    #[async_trait]
    impl CompletionClient for FailLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Timeout)
        }
    }

    struct FakeSynth;

    #[async_trait]
    impl SpeechSynthesizer for FakeSynth {
        async fn synthesize(
            &self,
            text: &str,
            _language: SpeechLanguage,
        ) -> Result<Vec<u8>, ExportError> {
            Ok(text.as_bytes().to_vec())
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Harness {
        state: SharedState,
        store: Arc<UserData>,
    }

    /// Send `commands`, close the channel and run the orchestrator to the end.
    async fn run_commands(
        config: AppConfig,
        client: Arc<dyn CompletionClient>,
        commands: Vec<PipelineCommand>,
    ) -> Harness {
        let state = new_shared_state(config);
        let store = Arc::new(UserData::in_memory());
        let orc = PipelineOrchestrator::new(
            Arc::clone(&state),
            client,
            Arc::new(FakeSynth),
            Arc::clone(&store),
        );

        let (tx, rx) = mpsc::channel(8);
        for command in commands {
            tx.send(command).await.unwrap();
        }
        drop(tx);

        orc.run(rx).await;
        Harness { state, store }
    }

    fn find(username: &str, words: &[&str]) -> PipelineCommand {
        PipelineCommand::FindSynonyms {
            username: username.into(),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn word_list_parsing_drops_blanks() {
        assert_eq!(parse_word_list("run,walk"), vec!["run", "walk"]);
        assert!(parse_word_list(" , ,").is_empty());
    }

    #[tokio::test]
    async fn generate_stores_text_and_finishes() {
        let client = CannedLlm::new("Q1. What is the best title?");
        let h = run_commands(
            AppConfig::default(),
            client.clone(),
            vec![PipelineCommand::Generate {
                mode: QuestionMode::Analysis,
                passage: "Bees dance.".into(),
            }],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Done);
        assert_eq!(st.generated.as_deref(), Some("Q1. What is the best title?"));
        assert_eq!(st.activity, Some("문제 생성"));
        assert_eq!(*client.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_passage_sets_error_without_request() {
        let client = CannedLlm::new("unused");
        let h = run_commands(
            AppConfig::default(),
            client.clone(),
            vec![PipelineCommand::Generate {
                mode: QuestionMode::All,
                passage: "  \n".into(),
            }],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Error);
        assert_eq!(st.error_message.as_deref(), Some("지문을 입력해주세요."));
        assert_eq!(*client.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn llm_failure_sets_error_state() {
        let h = run_commands(
            AppConfig::default(),
            Arc::new(FailLlm),
            vec![find("alice", &["run"])],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Error);
        assert_eq!(
            st.error_message.as_deref(),
            Some("API 요청 실패: LLM request timed out")
        );
        drop(st);
        assert!(h.store.get_words("alice").unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_synonyms_with_user_persists_words_and_rows() {
        let h = run_commands(
            AppConfig::default(),
            CannedLlm::new(TABLE_REPLY),
            vec![find("alice", &["run", "walk"]), find(" alice ", &["run"])],
        )
        .await;

        {
            let st = lock_state(&h.state);
            assert_eq!(st.pipeline, PipelineState::Done);
            assert_eq!(st.synonym_rows.len(), 2);
            assert_eq!(st.synonym_rows[1][4], "걷다");
            assert_eq!(st.saved_words, vec!["run", "walk"]);
        }

        assert_eq!(h.store.get_words("alice").unwrap(), vec!["run", "walk"]);
        assert_eq!(h.store.get_results("alice").unwrap().len(), 4);
    }

    #[tokio::test]
    async fn find_synonyms_without_user_does_not_persist() {
        let h = run_commands(
            AppConfig::default(),
            CannedLlm::new(TABLE_REPLY),
            vec![find("   ", &["run"])],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Done);
        assert_eq!(st.synonym_rows.len(), 2);
        assert!(st.saved_words.is_empty());
        drop(st);
        assert!(h.store.get_results("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_word_list_is_rejected() {
        let client = CannedLlm::new(TABLE_REPLY);
        let h = run_commands(AppConfig::default(), client.clone(), vec![find("bob", &[])]).await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Error);
        assert_eq!(st.error_message.as_deref(), Some("단어를 입력해주세요."));
        assert_eq!(*client.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn export_document_writes_into_output_dir() {
        let dir = tempdir().expect("temp dir");
        let mut config = AppConfig::default();
        config.export.output_dir = dir.path().join("exports");

        let h = run_commands(
            config,
            CannedLlm::new(""),
            vec![PipelineCommand::ExportDocument {
                content: "Q1.\n① A".into(),
            }],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Done);
        let path = st.last_export.clone().expect("exported path");
        assert!(path.starts_with(dir.path().join("exports")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("docx"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn export_speech_writes_mp3() {
        let dir = tempdir().expect("temp dir");
        let mut config = AppConfig::default();
        config.export.output_dir = dir.path().to_path_buf();

        let h = run_commands(
            config,
            CannedLlm::new(""),
            vec![PipelineCommand::ExportSpeech {
                text: "안녕하세요".into(),
                language: SpeechLanguage::Korean,
            }],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Done);
        let path = st.last_export.clone().expect("exported path");
        assert_eq!(std::fs::read(&path).unwrap(), "안녕하세요".as_bytes());
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("tts_output_") && n.ends_with(".mp3")));
    }

    #[tokio::test]
    async fn blank_speech_text_sets_error() {
        let dir = tempdir().expect("temp dir");
        let mut config = AppConfig::default();
        config.export.output_dir = dir.path().to_path_buf();

        let h = run_commands(
            config,
            CannedLlm::new(""),
            vec![PipelineCommand::ExportSpeech {
                text: " ".into(),
                language: SpeechLanguage::English,
            }],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Error);
        assert!(st.last_export.is_none());
    }

    #[tokio::test]
    async fn error_is_cleared_by_next_success() {
        let h = run_commands(
            AppConfig::default(),
            CannedLlm::new("ok"),
            vec![
                PipelineCommand::Generate {
                    mode: QuestionMode::FillInBlank,
                    passage: String::new(),
                },
                PipelineCommand::Generate {
                    mode: QuestionMode::FillInBlank,
                    passage: "A real passage.".into(),
                },
            ],
        )
        .await;

        let st = lock_state(&h.state);
        assert_eq!(st.pipeline, PipelineState::Done);
        assert!(st.error_message.is_none());
        assert_eq!(st.generated.as_deref(), Some("ok"));
        assert_eq!(st.finished, 2);
    }
}
