//! Export of generated text to files.
//!
//! * [`document`]: `.docx` with a fixed heading, one paragraph per line.
//! * [`speech`]: `.mp3` via a [`SpeechSynthesizer`] backend.
//!
//! Both default to timestamped file names built by [`timestamped_filename`].

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};
use thiserror::Error;

pub mod document;
pub mod speech;

pub use document::{export_document, save_document, DOCUMENT_PREFIX};
pub use speech::{
    export_speech, split_text_chunks, GoogleTranslateTts, SpeechLanguage, SpeechSynthesizer,
    MAX_CHUNK_CHARS, SPEECH_PREFIX,
};

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// Errors raised while producing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to export: the text was empty or whitespace only.
    #[error("nothing to export: text is empty")]
    EmptyText,

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document library could not assemble the `.docx` archive.
    #[error("failed to build document: {0}")]
    Document(String),

    /// The speech backend failed or returned no audio.
    #[error("speech synthesis failed: {0}")]
    Speech(String),
}

impl From<reqwest::Error> for ExportError {
    fn from(e: reqwest::Error) -> Self {
        ExportError::Speech(e.to_string())
    }
}

/// `{prefix}_{YYYYmmdd_HHMMSS}.{ext}`
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use passage_quiz::export::timestamped_filename;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     timestamped_filename("gpt_questions", "docx", &now),
///     "gpt_questions_20240309_140507.docx"
/// );
/// ```
pub fn timestamped_filename<Tz: TimeZone>(prefix: &str, ext: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.{ext}", now.format("%Y%m%d_%H%M%S"))
}
