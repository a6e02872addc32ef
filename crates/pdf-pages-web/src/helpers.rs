//! Helper types and traits for cleaner route handlers.
//!
//! Provides extension traits for converting `Option` and `Result` types
//! into HTTP-appropriate error responses, reducing boilerplate in routes.

use axum::http::StatusCode;
use pdf_pages_core::Error;

/// Standard result type for route handlers returning HTML.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Shown when a download is attempted with nothing selected
pub const EMPTY_SELECTION_MESSAGE: &str = "Select at least one page to enable ZIP download.";

/// Extension trait for converting `Option<T>` to `RouteResult<T>`.
///
/// Provides convenient methods for returning 404 Not Found when
/// an expected resource (like a run) doesn't exist.
pub trait OptionExt<T> {
    /// Returns the contained value or a 404 Not Found error.
    fn or_not_found(self, msg: &str) -> RouteResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, msg: &str) -> RouteResult<T> {
        self.ok_or_else(|| (StatusCode::NOT_FOUND, msg.to_string()))
    }
}

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;

    /// Converts the error to 400 Bad Request.
    fn or_bad_request(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }

    fn or_bad_request(self) -> RouteResult<T> {
        self.map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

/// Map a core error to a status and a message fit for the browser.
///
/// Archive and I/O failures get a generic message; the details go to the log.
pub fn core_error_response(error: &Error) -> (StatusCode, String) {
    match error {
        Error::EmptySelection => (StatusCode::BAD_REQUEST, EMPTY_SELECTION_MESSAGE.to_string()),
        Error::UnknownPage(_) => (StatusCode::NOT_FOUND, error.to_string()),
        Error::UnsupportedFile(_) | Error::PdfOpen(_) | Error::InvalidPage { .. } => {
            (StatusCode::BAD_REQUEST, error.to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong while preparing the download. Please try again.".to_string(),
        ),
    }
}

/// Whether an upload looks like a PDF, by declared content type or extension.
pub fn is_pdf_upload(filename: &str, content_type: Option<&str>) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"));

    declared
        || mime_guess::from_path(filename)
            .first()
            .is_some_and(|mime| mime.essence_str() == "application/pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_is_bad_request() {
        let (status, msg) = core_error_response(&Error::EmptySelection);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, EMPTY_SELECTION_MESSAGE);
    }

    #[test]
    fn test_archive_failure_is_generic() {
        let (status, msg) = core_error_response(&Error::Archive("disk full".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!msg.contains("disk full"));
    }

    #[test]
    fn test_unknown_page_is_not_found() {
        let (status, _) = core_error_response(&Error::UnknownPage("x.png".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_is_pdf_upload() {
        assert!(is_pdf_upload("a.pdf", None));
        assert!(is_pdf_upload("A.PDF", Some("application/octet-stream")));
        assert!(is_pdf_upload("scan", Some("application/pdf")));
        assert!(is_pdf_upload("scan", Some("Application/PDF; charset=binary")));
        assert!(!is_pdf_upload("notes.txt", Some("text/plain")));
        assert!(!is_pdf_upload("image.png", None));
    }
}
