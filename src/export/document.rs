//! Word document export backed by `docx-rs`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};

use super::{timestamped_filename, ExportError};

/// File-name prefix for exported question sets.
pub const DOCUMENT_PREFIX: &str = "gpt_questions";

const HEADING_STYLE: &str = "Heading1";

/// Write `content` to `path` as a `.docx`: `heading` as a level-1 heading,
/// then one paragraph per line of `content` (blank lines included).
pub fn export_document(content: &str, heading: &str, path: &Path) -> Result<(), ExportError> {
    let mut docx = Docx::new()
        .add_style(
            Style::new(HEADING_STYLE, StyleType::Paragraph)
                .name("Heading 1")
                .bold()
                .size(32),
        )
        .add_paragraph(
            Paragraph::new()
                .style(HEADING_STYLE)
                .add_run(Run::new().add_text(heading)),
        );

    for line in content.split('\n') {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = std::fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    docx.build()
        .pack(file)
        .map_err(|e| ExportError::Document(e.to_string()))?;

    log::info!("export: wrote document {}", path.display());
    Ok(())
}

/// Export into `dir`, naming the file `filename` or, when `None`,
/// `gpt_questions_<timestamp>.docx`. Returns the written path.
pub fn save_document<Tz: TimeZone>(
    content: &str,
    heading: &str,
    dir: &Path,
    filename: Option<&str>,
    now: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    let name = match filename.filter(|f| !f.trim().is_empty()) {
        Some(f) => f.to_string(),
        None => timestamped_filename(DOCUMENT_PREFIX, "docx", now),
    };
    let path = dir.join(name);
    export_document(content, heading, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
    use tempfile::tempdir;

    #[test]
    fn writes_a_zip_archive() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.docx");

        export_document("Q1. 제목은?\n① A\n② B", "GPT 문제 생성 결과", &path).expect("export");

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK", "docx is a zip container");
    }

    fn paragraph_text(paragraph: &Paragraph) -> String {
        paragraph
            .children
            .iter()
            .filter_map(|child| match child {
                ParagraphChild::Run(run) => Some(run),
                _ => None,
            })
            .flat_map(|run| run.children.iter())
            .filter_map(|child| match child {
                RunChild::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn heading_then_one_paragraph_per_line() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.docx");

        export_document("Q1. 제목은?\n\n① A", "GPT 문제 생성 결과", &path).expect("export");

        let bytes = std::fs::read(&path).unwrap();
        let docx = read_docx(&bytes).expect("readable docx");
        let paragraphs: Vec<&Paragraph> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(&**p),
                _ => None,
            })
            .collect();

        assert_eq!(paragraphs.len(), 4, "heading plus three lines");
        let style = |p: &Paragraph| p.property.style.as_ref().map(|s| s.val.clone());
        assert_eq!(style(paragraphs[0]).as_deref(), Some(HEADING_STYLE));
        for body in &paragraphs[1..] {
            assert_ne!(style(*body).as_deref(), Some(HEADING_STYLE));
        }

        let texts: Vec<String> = paragraphs.iter().map(|p| paragraph_text(p)).collect();
        assert_eq!(texts, ["GPT 문제 생성 결과", "Q1. 제목은?", "", "① A"]);
    }

    #[test]
    fn default_name_uses_timestamp() {
        let dir = tempdir().expect("temp dir");
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let path = save_document("text", "heading", dir.path(), None, &now).expect("export");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("gpt_questions_20240506_070809.docx")
        );
        assert!(path.exists());
    }

    #[test]
    fn explicit_name_is_used() {
        let dir = tempdir().expect("temp dir");
        let now = Utc::now();

        let path =
            save_document("text", "heading", dir.path(), Some("quiz.docx"), &now).expect("export");
        assert_eq!(path, dir.path().join("quiz.docx"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("no-such-dir").join("out.docx");

        assert!(matches!(
            export_document("x", "h", &path),
            Err(ExportError::Io { .. })
        ));
    }
}
