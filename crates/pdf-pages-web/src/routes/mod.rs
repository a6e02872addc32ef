//! HTTP route handlers for the PDF pages web application.
//!
//! All routes return either HTML (full pages or HTMX fragments) or binary
//! data (PNG pages, the ZIP archive). HTML routes use Askama templates from
//! the `templates` module.

mod download;
mod pages;
mod preview;
mod selection;
mod upload;

pub use download::download_archive;
pub use pages::{index, view_run};
pub use preview::get_page_image;
pub use selection::{select_all, select_page};
pub use upload::upload_pdfs;

use serde::Deserialize as SerdeDeserialize;

/// Checkbox state from the select-all toggle.
///
/// Browsers omit unchecked checkboxes, so a missing field means "off".
#[derive(SerdeDeserialize, Default)]
pub struct SelectAllForm {
    #[serde(default)]
    pub selected: Option<String>,
}

/// Checkbox state for one page row.
#[derive(SerdeDeserialize)]
pub struct SelectPageForm {
    /// Output name of the page
    pub page: String,
    #[serde(default)]
    pub selected: Option<String>,
}

/// Interpret an HTML checkbox value.
pub fn checkbox_checked(value: Option<&str>) -> bool {
    value.is_some_and(|v| !matches!(v, "" | "false" | "off" | "0"))
}
