//! Text-to-speech export.
//!
//! [`GoogleTranslateTts`] talks to the public Google Translate TTS endpoint,
//! which answers each request with an MP3 clip for at most
//! [`MAX_CHUNK_CHARS`] characters. Longer text is split on whitespace and
//! the clips are concatenated; MP3 frames are self-delimiting so the joined
//! bytes play back as one file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{timestamped_filename, ExportError};
use crate::config::SpeechConfig;

/// File-name prefix for exported audio.
pub const SPEECH_PREFIX: &str = "tts_output";

/// Per-request character limit of the TTS endpoint.
pub const MAX_CHUNK_CHARS: usize = 100;

// ---------------------------------------------------------------------------
// SpeechLanguage
// ---------------------------------------------------------------------------

/// Voice language offered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechLanguage {
    Korean,
    English,
}

impl SpeechLanguage {
    pub const ALL: [SpeechLanguage; 2] = [SpeechLanguage::Korean, SpeechLanguage::English];

    /// ISO-639-1 code sent to the synthesizer.
    pub fn code(self) -> &'static str {
        match self {
            SpeechLanguage::Korean => "ko",
            SpeechLanguage::English => "en",
        }
    }

    /// Label shown next to the radio button.
    pub fn label(self) -> &'static str {
        match self {
            SpeechLanguage::Korean => "한국어",
            SpeechLanguage::English => "영어",
        }
    }
}

impl Default for SpeechLanguage {
    fn default() -> Self {
        Self::Korean
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Turns text into encoded audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: SpeechLanguage)
        -> Result<Vec<u8>, ExportError>;
}

// ---------------------------------------------------------------------------
// GoogleTranslateTts
// ---------------------------------------------------------------------------

pub struct GoogleTranslateTts {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslateTts {
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: SpeechLanguage,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, ExportError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language.code()),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(
        &self,
        text: &str,
        language: SpeechLanguage,
    ) -> Result<Vec<u8>, ExportError> {
        let chunks = split_text_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ExportError::EmptyText);
        }

        log::debug!(
            "speech: {} chunk(s), language={}",
            chunks.len(),
            language.code()
        );

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, language, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(ExportError::Speech("endpoint returned no audio".into()));
        }
        Ok(audio)
    }
}

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace. A single word longer than `max_chars` is cut mid-word.
pub fn split_text_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        while word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let cut = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            chunks.push(word[..cut].to_string());
            word = &word[cut..];
            word_len -= max_chars;
        }

        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ---------------------------------------------------------------------------
// export_speech
// ---------------------------------------------------------------------------

/// Synthesize `text` and write `tts_output_<timestamp>.mp3` into `dir`.
///
/// Blank text is rejected before the synthesizer is called.
pub async fn export_speech<Tz: TimeZone>(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
    language: SpeechLanguage,
    dir: &Path,
    now: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    if text.trim().is_empty() {
        return Err(ExportError::EmptyText);
    }

    let audio = synthesizer.synthesize(text, language).await?;

    let path = dir.join(timestamped_filename(SPEECH_PREFIX, "mp3", now));
    tokio::fs::write(&path, &audio)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    log::info!("export: wrote {} bytes of audio to {}", audio.len(), path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Returns the language code and text as "audio" and counts calls.
    struct EchoSynth {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechSynthesizer for EchoSynth {
        async fn synthesize(
            &self,
            text: &str,
            language: SpeechLanguage,
        ) -> Result<Vec<u8>, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}:{}", language.code(), text).into_bytes())
        }
    }

    #[test]
    fn language_codes() {
        assert_eq!(SpeechLanguage::Korean.code(), "ko");
        assert_eq!(SpeechLanguage::English.code(), "en");
        assert_eq!(SpeechLanguage::default(), SpeechLanguage::Korean);
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text_chunks("  안녕하세요  여러분 ", 100), vec!["안녕하세요 여러분"]);
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(split_text_chunks(" \n\t ", 100).is_empty());
    }

    #[test]
    fn chunks_break_on_whitespace_and_respect_limit() {
        let text = "one two three four five six seven";
        let chunks = split_text_chunks(text, 10);

        assert_eq!(chunks, vec!["one two", "three four", "five six", "seven"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn overlong_word_is_cut_by_characters() {
        let chunks = split_text_chunks("가나다라마바사 ok", 3);
        assert_eq!(chunks, vec!["가나다", "라마바", "사", "ok"]);
    }

    #[test]
    fn chunks_keep_every_word_in_order() {
        let text = "The waggle dance tells other bees where the flowers are and how far away they grow.";
        let joined = split_text_chunks(text, 20).join(" ");
        assert_eq!(joined, text);
    }

    #[tokio::test]
    async fn export_writes_timestamped_mp3() {
        let dir = tempdir().expect("temp dir");
        let synth = EchoSynth { calls: AtomicUsize::new(0) };
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 58).unwrap();

        let path = export_speech(&synth, "hello", SpeechLanguage::English, dir.path(), &now)
            .await
            .expect("export");

        assert_eq!(path, dir.path().join("tts_output_20240131_235958.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"en:hello");
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_synthesis() {
        let dir = tempdir().expect("temp dir");
        let synth = EchoSynth { calls: AtomicUsize::new(0) };

        let result =
            export_speech(&synth, "   ", SpeechLanguage::Korean, dir.path(), &Utc::now()).await;

        assert!(matches!(result, Err(ExportError::EmptyText)));
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn google_backend_is_object_safe() {
        let synth: Box<dyn SpeechSynthesizer> =
            Box::new(GoogleTranslateTts::from_config(&SpeechConfig::default()));
        drop(synth);
    }
}
