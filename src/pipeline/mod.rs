//! Request pipeline between the egui window and the remote services.
//!
//! The window never awaits anything itself. It sends a [`PipelineCommand`]
//! and renders whatever the orchestrator has published so far.
//!
//! # Architecture
//!
//! ```text
//! egui update() ──PipelineCommand (mpsc)──▶ PipelineOrchestrator::run()  ← tokio task
//!       ▲                                          │
//!       │                                          ├─ CompletionClient   (questions, synonyms)
//!       │                                          ├─ UserData           (saved words / rows)
//!       │                                          └─ SpeechSynthesizer  (mp3)
//!       │                                          │
//!       └──────── SharedState (Arc<Mutex<AppState>>) ◀┘
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{parse_word_list, PipelineCommand, PipelineError, PipelineOrchestrator};
pub use state::{lock_state, new_shared_state, AppState, PipelineState, SharedState};
