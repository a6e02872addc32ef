use mupdf::Document as MuDocument;

use crate::error::{Error, Result};

/// A PDF that mupdf could open, with its page count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfDocument {
    page_count: usize,
}

impl PdfDocument {
    /// Open a PDF from bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let (_, page_count) = parse(&bytes.into())?;
        Ok(Self { page_count })
    }

    /// Get number of pages
    pub const fn page_count(&self) -> usize {
        self.page_count
    }
}

/// Parse PDF bytes once, returning the mupdf handle and the page count
pub(crate) fn parse(bytes: &[u8]) -> Result<(MuDocument, usize)> {
    if bytes.is_empty() {
        return Err(Error::PdfOpen("file is empty".to_string()));
    }

    let doc = MuDocument::from_bytes(bytes, "")
        .map_err(|e| Error::PdfOpen(format!("Failed to parse PDF: {e}")))?;

    let page_count = doc
        .page_count()
        .map_err(|e| Error::PdfOpen(format!("Failed to get page count: {e}")))?;

    Ok((doc, usize::try_from(page_count).unwrap_or(0)))
}
