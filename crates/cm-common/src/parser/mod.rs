pub mod fields;
pub mod vocabulary;

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use serde::Serialize;
use thiserror::Error;

use vocabulary::Vocabulary;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to extract document text: {0}")]
    ExtractionFailed(String),
}

/// Document formats the extractor understands, derived from the uploaded
/// file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "doc" => Some(DocumentFormat::Doc),
            _ => None,
        }
    }
}

/// Everything extracted from one uploaded résumé. Field values are already
/// sanitized (no NUL bytes, trimmed) and safe to hand to the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub raw_text: String,
    pub skills: Vec<String>,
    pub education: String,
    pub experience: String,
}

/// Extract plain text from an uploaded document. The format is chosen by
/// file extension before any byte is inspected; unknown extensions fail with
/// `UnsupportedFormat` and corrupt content with `ExtractionFailed`. Neither
/// is retried.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ParserError> {
    let format = DocumentFormat::from_file_name(file_name).ok_or_else(|| {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("<none>");
        ParserError::UnsupportedFormat(ext.to_string())
    })?;

    match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::Doc => Ok(extract_doc(bytes)),
    }
}

/// Run the full pipeline over one document: text extraction, heuristic field
/// extraction, and sanitization.
pub fn parse_document(
    vocabulary: &Vocabulary,
    file_name: &str,
    bytes: &[u8],
) -> Result<ParsedDocument, ParserError> {
    let raw_text = extract_text(file_name, bytes)?;

    let skills = fields::extract_skills(vocabulary, &raw_text);
    let education = fields::sanitize(&fields::extract_education(vocabulary, &raw_text));
    let experience = fields::sanitize(&fields::extract_experience(vocabulary, &raw_text));

    Ok(ParsedDocument {
        raw_text: fields::sanitize(&raw_text),
        skills: fields::sanitize_list(&skills),
        education,
        experience,
    })
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ParserError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| ParserError::ExtractionFailed(format!("pdf: {err}")))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ParserError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ParserError::ExtractionFailed(format!("docx: {err}")))?;

    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| ParserError::ExtractionFailed("docx: missing word/document.xml".into()))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| ParserError::ExtractionFailed(format!("docx: {err}")))?;

    document_xml_to_text(&xml)
}

/// Flatten WordprocessingML into plain text. Text runs are concatenated;
/// paragraph ends and explicit breaks become newlines so the line-oriented
/// field heuristics still see the document's structure.
fn document_xml_to_text(xml: &str) -> Result<String, ParserError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(chunk)) => {
                let unescaped = chunk
                    .unescape()
                    .map_err(|err| ParserError::ExtractionFailed(format!("docx: {err}")))?;
                text.push_str(&unescaped);
            }
            Ok(Event::End(tag)) if tag.local_name().as_ref() == b"p" => text.push('\n'),
            Ok(Event::Empty(tag)) if tag.local_name().as_ref() == b"br" => text.push('\n'),
            Ok(Event::Empty(tag)) if tag.local_name().as_ref() == b"tab" => text.push(' '),
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ParserError::ExtractionFailed(format!(
                    "docx: malformed document.xml: {err}"
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Legacy `.doc` is a binary container without a lightweight parser in the
/// ecosystem; salvage the printable runs instead of rejecting the upload.
fn extract_doc(bytes: &[u8]) -> String {
    let lossy = String::from_utf8_lossy(bytes);
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in lossy.chars() {
        if ch == '\n' || ch == '\r' {
            flush_run(&mut current, &mut runs);
        } else if ch.is_ascii_graphic() || ch == ' ' || ch == '\t' {
            current.push(ch);
        } else {
            flush_run(&mut current, &mut runs);
        }
    }
    flush_run(&mut current, &mut runs);

    runs.join("\n")
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    // Runs shorter than this are almost always binary noise.
    const MIN_RUN_LEN: usize = 4;

    let trimmed = current.trim();
    if trimmed.len() >= MIN_RUN_LEN {
        runs.push(trimmed.to_string());
    }
    current.clear();
}
