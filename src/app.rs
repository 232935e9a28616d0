//! Passage question generator: egui/eframe application.
//!
//! # Architecture
//!
//! [`QuizApp`] owns the form inputs and two pipeline endpoints:
//!
//! * `command_tx` sends [`PipelineCommand`]s to the orchestrator task.
//! * `state` is the [`SharedState`] the orchestrator publishes into.
//!
//! Input validation that needs no request (empty passage, empty speech text)
//! happens here and only shows a warning.
//!
//! # Layout
//!
//! | Area | Contents |
//! |------|----------|
//! | Left sidebar, top | speech export: text, 한국어/영어, `음성 저장 (mp3)` |
//! | Left sidebar, bottom | word list: user, words, `유의어 찾기`, saved words, result grid |
//! | Central panel | mode radio, passage, `문제 생성`, result, export / copy buttons |

use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::export::SpeechLanguage;
use crate::llm::{TableRow, TABLE_HEADER};
use crate::pipeline::{lock_state, parse_word_list, PipelineCommand, PipelineState, SharedState};
use crate::quiz::QuestionMode;

pub const APP_TITLE: &str = "GPT 기반 영어 문제 생성기";

const EMPTY_PASSAGE_WARNING: &str = "지문을 입력해주세요.";
const EMPTY_SPEECH_WARNING: &str = "텍스트를 입력해주세요.";

/// Hangul-capable fonts tried when `ui.font_path` is unset.
const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

const KOREAN_FONT: &str = "korean";

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Register a Hangul font with `ctx`, preferring `configured` over the
/// platform fallbacks. Returns the file that was loaded.
pub fn install_fonts(ctx: &egui::Context, configured: Option<&Path>) -> Option<PathBuf> {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(FALLBACK_FONTS.iter().map(PathBuf::from));

    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let mut fonts = egui::FontDefinitions::default();
                fonts.font_data.insert(
                    KOREAN_FONT.to_owned(),
                    egui::FontData::from_owned(bytes).into(),
                );
                for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .insert(0, KOREAN_FONT.to_owned());
                }
                ctx.set_fonts(fonts);
                log::info!("ui: loaded font {}", path.display());
                return Some(path);
            }
            Err(e) => log::debug!("ui: font {} unavailable: {e}", path.display()),
        }
    }

    log::warn!("ui: no Hangul font found; set ui.font_path in settings.toml");
    None
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

/// `Generate` command for the form, or the warning to show instead.
pub fn generate_command(
    mode: QuestionMode,
    passage: &str,
) -> Result<PipelineCommand, &'static str> {
    if passage.trim().is_empty() {
        return Err(EMPTY_PASSAGE_WARNING);
    }
    Ok(PipelineCommand::Generate {
        mode,
        passage: passage.to_string(),
    })
}

/// `ExportSpeech` command for the form, or the warning to show instead.
pub fn speech_command(
    text: &str,
    language: SpeechLanguage,
) -> Result<PipelineCommand, &'static str> {
    if text.trim().is_empty() {
        return Err(EMPTY_SPEECH_WARNING);
    }
    Ok(PipelineCommand::ExportSpeech {
        text: text.to_string(),
        language,
    })
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// What a frame needs from [`SharedState`], copied so the lock is released
/// before any widget is drawn.
struct Snapshot {
    pipeline: PipelineState,
    busy: bool,
    activity: Option<&'static str>,
    error: Option<String>,
    last_export: Option<PathBuf>,
    rows: Vec<TableRow>,
    saved_words: Vec<String>,
    finished: u64,
}

// ---------------------------------------------------------------------------
// QuizApp
// ---------------------------------------------------------------------------

/// Form a validation warning is shown next to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Question,
    Speech,
}

pub struct QuizApp {
    // ── Question form ────────────────────────────────────────────────────
    mode: QuestionMode,
    passage: String,
    /// Editable copy of the last generated questions.
    result: String,
    /// The generated text `result` was last synced from.
    shown_generated: Option<String>,

    // ── Speech form ──────────────────────────────────────────────────────
    speech_text: String,
    speech_language: SpeechLanguage,

    // ── Word-list form ───────────────────────────────────────────────────
    username: String,
    words_input: String,

    /// Validation warning for the last click and the form it belongs to;
    /// cleared on the next send.
    warning: Option<(Form, &'static str)>,
    /// Commands handed to the orchestrator so far.
    sent: u64,

    command_tx: mpsc::Sender<PipelineCommand>,
    state: SharedState,
}

impl QuizApp {
    pub fn new(
        command_tx: mpsc::Sender<PipelineCommand>,
        state: SharedState,
        config: &AppConfig,
    ) -> Self {
        Self {
            mode: QuestionMode::default(),
            passage: String::new(),
            result: String::new(),
            shown_generated: None,
            speech_text: String::new(),
            speech_language: config.speech.default_language,
            username: String::new(),
            words_input: String::new(),
            warning: None,
            sent: 0,
            command_tx,
            state,
        }
    }

    // ── State sync ───────────────────────────────────────────────────────

    fn snapshot(&mut self) -> Snapshot {
        let st = lock_state(&self.state);

        if st.generated != self.shown_generated {
            self.shown_generated = st.generated.clone();
            self.result = st.generated.clone().unwrap_or_default();
        }

        Snapshot {
            pipeline: st.pipeline,
            busy: st.pipeline.is_busy(),
            activity: st.activity,
            error: st.error_message.clone(),
            last_export: st.last_export.clone(),
            rows: st.synonym_rows.clone(),
            saved_words: st.saved_words.clone(),
            finished: st.finished,
        }
    }

    fn send(&mut self, command: PipelineCommand) {
        match self.command_tx.try_send(command) {
            Ok(()) => {
                self.sent += 1;
                self.warning = None;
            }
            Err(e) => log::warn!("ui: could not queue command: {e}"),
        }
    }

    fn send_or_warn(&mut self, form: Form, command: Result<PipelineCommand, &'static str>) {
        match command {
            Ok(command) => self.send(command),
            Err(warning) => self.warning = Some((form, warning)),
        }
    }

    fn warning_for(&self, form: Form) -> Option<&'static str> {
        self.warning
            .and_then(|(owner, warning)| (owner == form).then_some(warning))
    }

    // ── Sidebar ──────────────────────────────────────────────────────────

    fn draw_speech_section(&mut self, ui: &mut egui::Ui, busy: bool) {
        ui.heading("🔊 텍스트 음성 변환");
        ui.add(
            egui::TextEdit::multiline(&mut self.speech_text)
                .desired_rows(5)
                .desired_width(f32::INFINITY)
                .hint_text("읽어 줄 텍스트"),
        );

        ui.horizontal(|ui| {
            for language in SpeechLanguage::ALL {
                ui.radio_value(&mut self.speech_language, language, language.label());
            }
        });

        if ui
            .add_enabled(!busy, egui::Button::new("음성 저장 (mp3)"))
            .clicked()
        {
            let command = speech_command(&self.speech_text, self.speech_language);
            self.send_or_warn(Form::Speech, command);
        }
        if let Some(warning) = self.warning_for(Form::Speech) {
            ui.colored_label(WARNING_COLOR, warning);
        }
    }

    fn draw_word_section(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.heading("📚 단어장");

        ui.horizontal(|ui| {
            ui.label("사용자");
            ui.text_edit_singleline(&mut self.username);
        });
        ui.add(
            egui::TextEdit::singleline(&mut self.words_input)
                .desired_width(f32::INFINITY)
                .hint_text("happy, big, small"),
        );

        if ui
            .add_enabled(!snap.busy, egui::Button::new("유의어 찾기"))
            .clicked()
        {
            self.send(PipelineCommand::FindSynonyms {
                username: self.username.clone(),
                words: parse_word_list(&self.words_input),
            });
        }

        if !snap.saved_words.is_empty() {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("저장된 단어").strong());
            ui.label(snap.saved_words.join(", "));
        }

        if !snap.rows.is_empty() {
            ui.add_space(4.0);
            egui::ScrollArea::horizontal()
                .id_salt("synonym_scroll")
                .show(ui, |ui| draw_table(ui, &snap.rows));
        }
    }

    // ── Central panel ────────────────────────────────────────────────────

    fn draw_question_form(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &Snapshot) {
        ui.heading(APP_TITLE);
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            for mode in QuestionMode::ALL {
                ui.radio_value(&mut self.mode, mode, mode.label());
            }
        });

        ui.add(
            egui::TextEdit::multiline(&mut self.passage)
                .desired_rows(10)
                .desired_width(f32::INFINITY)
                .hint_text("영어 지문을 입력하세요"),
        );

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!snap.busy, egui::Button::new("문제 생성"))
                .clicked()
            {
                let command = generate_command(self.mode, &self.passage);
                self.send_or_warn(Form::Question, command);
            }
            draw_status(ui, snap, self.warning_for(Form::Question));
        });

        if self.result.is_empty() {
            return;
        }

        ui.separator();
        ui.label(egui::RichText::new("📄 생성 결과").strong());
        egui::ScrollArea::vertical()
            .id_salt("result_scroll")
            .max_height((ui.available_height() - 40.0).max(120.0))
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.result)
                        .desired_rows(16)
                        .desired_width(f32::INFINITY),
                );
            });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!snap.busy, egui::Button::new("Word로 저장"))
                .clicked()
            {
                self.send(PipelineCommand::ExportDocument {
                    content: self.result.clone(),
                });
            }
            if ui
                .add_enabled(!snap.busy, egui::Button::new("음성(mp3)으로 저장"))
                .clicked()
            {
                let command = speech_command(&self.result, self.speech_language);
                self.send_or_warn(Form::Question, command);
            }
            if ui.button("복사").clicked() {
                ctx.copy_text(self.result.clone());
            }
        });
    }
}

const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 170, 40);

/// Status line for the pipeline phase, `None` while idle.
fn status_text(snap: &Snapshot) -> Option<String> {
    let label = snap.pipeline.label();
    match snap.pipeline {
        PipelineState::Idle => None,
        PipelineState::Working => match snap.activity {
            Some(activity) => Some(format!("{label}: {activity}...")),
            None => Some(format!("{label}...")),
        },
        PipelineState::Error => match &snap.error {
            Some(error) => Some(format!("{label}: {error}")),
            None => Some(label.to_string()),
        },
        PipelineState::Done => match &snap.last_export {
            Some(path) => Some(format!("{label} · 저장됨: {}", path.display())),
            None => Some(label.to_string()),
        },
    }
}

fn draw_status(ui: &mut egui::Ui, snap: &Snapshot, warning: Option<&str>) {
    if snap.busy {
        ui.spinner();
    } else if let Some(warning) = warning {
        ui.colored_label(WARNING_COLOR, warning);
        return;
    }

    let Some(text) = status_text(snap) else {
        return;
    };
    let color = match snap.pipeline {
        PipelineState::Error => egui::Color32::from_rgb(230, 90, 70),
        PipelineState::Done => egui::Color32::from_rgb(80, 180, 110),
        _ => ui.visuals().text_color(),
    };
    ui.colored_label(color, text);
}

fn draw_table(ui: &mut egui::Ui, rows: &[TableRow]) {
    egui::Grid::new("synonym_grid")
        .striped(true)
        .show(ui, |ui| {
            for title in TABLE_HEADER.split(" | ") {
                ui.label(egui::RichText::new(title).strong());
            }
            ui.end_row();

            for row in rows {
                for cell in row {
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snap = self.snapshot();

        // Keep polling until every queued command has been published.
        if snap.busy || snap.finished < self.sent {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_speech_section(ui, snap.busy);
                    ui.separator();
                    self.draw_word_section(ui, &snap);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_question_form(ui, ctx, &snap);
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
