use thiserror::Error;

/// Unified error type for pdf-pages-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - PDF operations (opening, rendering, PNG encoding)
/// - Upload validation
/// - Selection and archive operations
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF file
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// Invalid page number requested
    #[error("invalid page number {page} (document has {total} pages)")]
    InvalidPage { page: usize, total: usize },

    /// Failed to render a PDF page
    #[error("failed to render page {page}: {reason}")]
    PdfRender { page: usize, reason: String },

    /// Failed to encode a rendered page as PNG
    #[error("failed to encode PNG: {0}")]
    ImageEncode(String),

    // ==========================================================================
    // Upload Errors
    // ==========================================================================
    /// Uploaded file is not a PDF
    #[error("not a PDF file: {0}")]
    UnsupportedFile(String),

    /// More than one file was sent in single-file mode
    #[error("skipped {0}: single PDF mode converts only the first file")]
    ExtraFile(String),

    // ==========================================================================
    // Selection & Archive Errors
    // ==========================================================================
    /// No page with this output name exists in the catalog
    #[error("no page named '{0}'")]
    UnknownPage(String),

    /// Tried to build an archive with nothing selected
    #[error("no pages selected")]
    EmptySelection,

    /// Failed to write the ZIP archive
    #[error("failed to build archive: {0}")]
    Archive(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
