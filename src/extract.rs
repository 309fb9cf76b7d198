//! Plain-text extraction from uploaded documents.
//!
//! Dispatch is on the lower-cased file extension. PDFs go through `pdf-extract` straight from
//! memory, DOCX files are opened as zip archives and `word/document.xml` is walked with
//! `quick-xml`, and `.txt` uploads must be valid UTF-8.

use quick_xml::{Reader, events::Event};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

const DOCX_BODY_ENTRY: &str = "word/document.xml";

/// Source label used for pasted text.
pub const TEXTAREA_SOURCE: &str = "textarea";

/// Errors raised while turning an upload into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extension is not one of `pdf`, `docx`, or `txt`.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// PDF could not be parsed.
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
    /// DOCX archive or XML body could not be parsed.
    #[error("Failed to read DOCX: {0}")]
    Docx(String),
    /// Plain-text upload was not valid UTF-8.
    #[error("Text file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Plain-text document ready for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Extracted text.
    pub text: String,
    /// Original filename, or [`TEXTAREA_SOURCE`] for pasted input.
    pub source: String,
}

impl Document {
    /// Wrap pasted text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: TEXTAREA_SOURCE.into(),
        }
    }
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

fn detect_format(filename: &str) -> Result<DocumentFormat, ExtractError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(DocumentFormat::Pdf),
        "docx" => Ok(DocumentFormat::Docx),
        "txt" => Ok(DocumentFormat::PlainText),
        _ => Err(ExtractError::UnsupportedFormat(filename.to_string())),
    }
}

/// Extract text from an uploaded file.
///
/// Parsing is CPU-bound; async callers should run this on a blocking thread.
pub fn extract_document(filename: &str, bytes: &[u8]) -> Result<Document, ExtractError> {
    let format = detect_format(filename)?;
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())?,
    };
    tracing::debug!(
        source = filename,
        ?format,
        chars = text.chars().count(),
        "Extracted document text"
    );
    Ok(Document {
        text,
        source: filename.to_string(),
    })
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract can panic on malformed input.
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(error)) => Err(ExtractError::Pdf(error.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser panicked on malformed PDF".into())),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|error| ExtractError::Docx(format!("not a zip archive: {error}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_ENTRY)
        .map_err(|error| ExtractError::Docx(format!("missing {DOCX_BODY_ENTRY}: {error}")))?
        .read_to_string(&mut xml)
        .map_err(|error| ExtractError::Docx(format!("unreadable {DOCX_BODY_ENTRY}: {error}")))?;
    docx_paragraphs(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collect the text of every `w:p` paragraph in a WordprocessingML body.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_paragraph => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|error| ExtractError::Docx(error.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at byte {}: {error}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(entry: &str, body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(entry, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(body.as_bytes()).expect("write entry");
        writer.finish().expect("finish archive").into_inner()
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First </w:t></w:r><w:r><w:t>paragraph &amp; more.</w:t></w:r></w:p>
    <w:p><w:r><w:t>రెండవ</w:t><w:tab/><w:t>పేరా.</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;

    #[test]
    fn reads_docx_paragraphs() {
        let bytes = docx_bytes(DOCX_BODY_ENTRY, BODY);
        let document = extract_document("Report.DOCX", &bytes).expect("docx");
        assert_eq!(document.text, "First paragraph & more.\nరెండవ\tపేరా.");
        assert_eq!(document.source, "Report.DOCX");
    }

    #[test]
    fn docx_without_body_is_rejected() {
        let bytes = docx_bytes("word/styles.xml", "<w:styles/>");
        let error = extract_document("styles.docx", &bytes).expect_err("missing body");
        assert!(matches!(error, ExtractError::Docx(message) if message.contains(DOCX_BODY_ENTRY)));
    }

    #[test]
    fn non_zip_docx_is_rejected() {
        let error = extract_document("fake.docx", b"plain bytes").expect_err("not zip");
        assert!(matches!(error, ExtractError::Docx(_)));
    }

    #[test]
    fn reads_utf8_text() {
        let document = extract_document("notes.txt", "नमस्ते दुनिया".as_bytes()).expect("txt");
        assert_eq!(document.text, "नमस्ते दुनिया");
    }

    #[test]
    fn invalid_utf8_text_is_an_encoding_error() {
        let error = extract_document("notes.txt", &[0xff, 0xfe, 0x00]).expect_err("encoding");
        assert!(matches!(error, ExtractError::Encoding(_)));
    }

    #[test]
    fn garbage_pdf_is_a_pdf_error() {
        let error = extract_document("scan.pdf", b"not really a pdf").expect_err("pdf");
        assert!(matches!(error, ExtractError::Pdf(_)));
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        for name in ["slides.pptx", "README", "archive.tar.gz"] {
            let error = extract_document(name, b"data").expect_err("unsupported");
            assert!(matches!(error, ExtractError::UnsupportedFormat(_)), "{name}");
        }
    }

    #[test]
    fn pasted_text_uses_textarea_source() {
        assert_eq!(Document::from_text("hi").source, TEXTAREA_SOURCE);
    }
}
