//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfSource, Result};
use crate::error::PdfError;

/// Text content acquired from one PDF document.
///
/// `text` is the full concatenated body used for matching; `pages` keeps a
/// per-page view for diagnostics. Page breaks in `text` are not guaranteed
/// to align with newlines, so consumers must not rely on line boundaries
/// marking page boundaries.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Full concatenated text, page order preserved.
    pub text: String,

    /// Per-page text (best effort, for diagnostics only).
    pub pages: Vec<String>,
}

impl DocumentText {
    /// True when the document yields no usable text layer, e.g. a
    /// scanned-image-only PDF. Not an error condition.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Keep only the first `max_pages` pages (0 means unlimited), rebuilding
    /// the matching body from the per-page view. The per-page slices are
    /// approximate, so the capped body is too.
    pub fn limit_pages(&mut self, max_pages: usize) {
        if max_pages == 0 || self.pages.len() <= max_pages {
            return;
        }
        self.pages.truncate(max_pages);
        self.text = self.pages.join("\n");
    }
}

/// PDF text extractor. The owned [`Document`] is dropped on every exit
/// path, so the underlying resource is always released.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes and return a ready extractor.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        Ok(text)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page));
        }

        let full_text = self.extract_text()?;
        let lines: Vec<&str> = full_text.lines().collect();
        Ok(page_slice(&lines, page, page_count))
    }

    fn extract_document(&self) -> Result<DocumentText> {
        let text = self.extract_text()?;
        let page_count = self.page_count();

        let mut pages = Vec::with_capacity(page_count as usize);
        for page in 1..=page_count {
            pages.push(self.extract_page_text(page).unwrap_or_default());
        }

        debug!(
            "Extracted {} chars of text across {} pages",
            text.len(),
            page_count
        );

        Ok(DocumentText { text, pages })
    }
}

// pdf-extract yields one body of text; approximate per-page slices by
// dividing lines evenly. Good enough for diagnostics. Short documents get
// at least one line per page so the leading pages stay non-empty.
fn page_slice(lines: &[&str], page: u32, page_count: u32) -> String {
    let lines_per_page = (lines.len() / page_count as usize).max(1);
    let start = ((page - 1) as usize) * lines_per_page;
    let end = (page as usize) * lines_per_page;

    lines[start.min(lines.len())..end.min(lines.len())].join("\n")
}
