//! Text extraction from uploaded resume documents, dispatched on file extension.

use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Text runs inside a WordprocessingML paragraph. `<w:tab/>` and `<w:tbl>` do not match.
static DOCX_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("docx text regex is valid")
});

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x?)([0-9A-Fa-f]+);").expect("entity regex is valid"));

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Extracts plain text from `bytes`, choosing a reader from the extension of
/// `filename` (case-insensitive).
///
/// Unknown extensions are decoded as text with whitespace collapsed. Only
/// `.pdf` and `.docx` can fail.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ParseError> {
    let name = filename.to_lowercase();
    if name.ends_with(".pdf") {
        extract_pdf(bytes)
    } else if name.ends_with(".docx") {
        extract_docx(bytes)
    } else if name.ends_with(".txt") {
        Ok(decode_text(bytes))
    } else {
        let text = decode_text(bytes);
        Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    // pdf-extract panics on some malformed documents.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ParseError::Pdf("document could not be read".to_string()))?
        .map_err(|e| ParseError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ParseError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| ParseError::Docx(format!("{DOCX_BODY}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .map(|para| {
            DOCX_TEXT_RE
                .captures_iter(para)
                .map(|c| unescape_xml(&c[1]))
                .collect::<String>()
        })
        .filter(|p| !p.is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn unescape_xml(text: &str) -> String {
    let text = NUMERIC_ENTITY_RE.replace_all(text, |c: &regex::Captures| {
        let radix = if c[1].is_empty() { 10 } else { 16 };
        u32::from_str_radix(&c[2], radix)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// UTF-8 first, then Latin-1. Latin-1 maps every byte, so decoding never fails.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
