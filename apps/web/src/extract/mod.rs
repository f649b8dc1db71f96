//! Document text extraction: turns an uploaded resume into a flat string.
//!
//! PDF parsing is CPU bound; callers on the async runtime must run
//! `extract_text` inside `tokio::task::spawn_blocking`.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;

/// Media types accepted by the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    PlainText,
}

impl MediaType {
    /// Resolves the declared media type of an upload.
    /// The `Content-Type` wins; the file extension is the fallback for
    /// browsers that send `application/octet-stream`.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("application/pdf") => return Some(MediaType::Pdf),
            Some("text/plain") => return Some(MediaType::PlainText),
            _ => {}
        }

        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Some(MediaType::Pdf),
            Some("txt") => Some(MediaType::PlainText),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Pdf => "PDF",
            MediaType::PlainText => "plain text",
        }
    }
}

/// An uploaded resume as received from the browser.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub media_type: MediaType,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not parse PDF document: {0}")]
    DocumentParse(String),

    #[error("Uploaded text is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Extracts the text of a resume document.
///
/// PDFs yield every page's text in page order joined by single spaces
/// (an empty document yields `""`). Plain text is decoded as UTF-8 verbatim.
pub fn extract_text(document: &ResumeDocument) -> Result<String, ExtractError> {
    match document.media_type {
        MediaType::Pdf => {
            let pages = pdf_extract::extract_text_from_mem_by_pages(&document.bytes)
                .map_err(|e| ExtractError::DocumentParse(e.to_string()))?;
            Ok(join_pages(pages))
        }
        MediaType::PlainText => Ok(String::from_utf8(document.bytes.to_vec())?),
    }
}

fn join_pages(pages: Vec<String>) -> String {
    pages.join(" ")
}

/// Builds an in-memory PDF with one Courier text line per page.
#[cfg(test)]
pub(crate) fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("serialize test pdf");
    buf
}
