//! Request state machine and shared application state.
//!
//! [`PipelineState`] tracks whether a request is in flight. The UI reads it
//! through [`SharedState`] to grey out buttons and show a spinner.
//!
//! [`AppState`] holds everything the window renders besides its own input
//! fields: the phase, the last generated questions, the last synonym rows,
//! the user's saved words, the last exported file and any error message.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::llm::TableRow;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// Phase of the request pipeline.
///
/// ```text
/// Idle ──command──▶ Working ──ok──▶ Done
///                           ──err─▶ Error
/// Done / Error ──next command──▶ Working
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// A completion, lookup or export is running.
    Working,

    /// The last command finished successfully.
    Done,

    /// The last command failed; `AppState::error_message` says why.
    Error,
}

impl PipelineState {
    /// `true` while a command is running.
    ///
    /// ```
    /// use passage_quiz::pipeline::PipelineState;
    ///
    /// assert!(PipelineState::Working.is_busy());
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(!PipelineState::Done.is_busy());
    /// assert!(!PipelineState::Error.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Working)
    }

    /// Label that prefixes the status line next to `문제 생성`.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "대기",
            PipelineState::Working => "처리 중",
            PipelineState::Done => "완료",
            PipelineState::Error => "오류",
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state written by the orchestrator and read by the UI.
pub struct AppState {
    pub pipeline: PipelineState,

    /// What the current (or last) command was doing, e.g. `"문제 생성"`.
    pub activity: Option<&'static str>,

    /// Questions from the last successful `Generate`.
    pub generated: Option<String>,

    /// Rows from the last successful `FindSynonyms`.
    pub synonym_rows: Vec<TableRow>,

    /// Saved words of the user named in the last `FindSynonyms`.
    pub saved_words: Vec<String>,

    /// File written by the last successful export.
    pub last_export: Option<PathBuf>,

    /// Set when `pipeline == PipelineState::Error`.
    pub error_message: Option<String>,

    /// Number of commands finished so far, successfully or not.
    pub finished: u64,

    /// Configuration snapshot taken at start-up.
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            pipeline: PipelineState::Idle,
            activity: None,
            generated: None,
            synonym_rows: Vec::new(),
            saved_words: Vec::new(),
            last_export: None,
            error_message: None,
            finished: 0,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// `Arc<Mutex<AppState>>`. Never hold the guard across an `.await`.
pub type SharedState = Arc<Mutex<AppState>>;

pub fn new_shared_state(config: AppConfig) -> SharedState {
    Arc::new(Mutex::new(AppState::new(config)))
}

/// Lock `state`, recovering the guard if a previous holder panicked.
///
/// Every writer leaves `AppState` consistent between statements, so a
/// poisoned lock still guards usable data.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, AppState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_working_is_busy() {
        assert!(PipelineState::Working.is_busy());
        for state in [PipelineState::Idle, PipelineState::Done, PipelineState::Error] {
            assert!(!state.is_busy(), "{state:?} should not be busy");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "대기");
        assert_eq!(PipelineState::Working.label(), "처리 중");
        assert_eq!(PipelineState::Done.label(), "완료");
        assert_eq!(PipelineState::Error.label(), "오류");
    }

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    #[test]
    fn app_state_starts_empty() {
        let state = AppState::default();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(state.generated.is_none());
        assert!(state.synonym_rows.is_empty());
        assert!(state.saved_words.is_empty());
        assert!(state.last_export.is_none());
        assert!(state.error_message.is_none());
        assert_eq!(state.finished, 0);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state(AppConfig::default());
        let state2 = Arc::clone(&state);

        lock_state(&state).pipeline = PipelineState::Working;
        assert_eq!(lock_state(&state2).pipeline, PipelineState::Working);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let state = new_shared_state(AppConfig::default());
        let clone = Arc::clone(&state);

        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(state.is_poisoned());
        lock_state(&state).pipeline = PipelineState::Done;
        assert_eq!(lock_state(&state).pipeline, PipelineState::Done);
    }
}
