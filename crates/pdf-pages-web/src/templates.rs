//! Askama templates for full pages and HTMX fragments.
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS/JS
//! - `index.html` - Landing page with upload form
//! - `run.html` - Conversion result: banner, failures, page table
//! - `partials/page_table.html` - Select-all toggle, page rows, download panel
//! - `partials/download_panel.html` - Download link or the empty-selection notice
//!
//! The partials are rendered on their own as HTMX responses and included by
//! `run.html`, so they read the same field names from every template that
//! includes them.

use askama::Template;
use askama_web::WebTemplate;
use pdf_pages_core::{ARCHIVE_FILE_NAME, ConversionRun, PageRecord};

use crate::helpers::EMPTY_SELECTION_MESSAGE;

/// Tint used if a source somehow has no assigned color
const FALLBACK_ROW_COLOR: &str = "transparent";

// =============================================================================
// View models
// =============================================================================

/// One table row
#[derive(Debug, Clone)]
pub struct PageRow {
    pub output_name: String,
    pub source_name: String,
    pub size_kb: usize,
    /// PNG served by the app; thumbnail source and click-through target
    pub href: String,
    pub color: String,
    pub selected: bool,
}

impl PageRow {
    fn new(run_id: &str, record: &PageRecord, conversion: &ConversionRun) -> Self {
        Self {
            output_name: record.output_name().to_string(),
            source_name: record.source_name().to_string(),
            size_kb: record.size_kb(),
            href: page_href(run_id, record.output_name()),
            color: conversion
                .colors()
                .color_for(record.source_name())
                .unwrap_or(FALLBACK_ROW_COLOR)
                .to_string(),
            selected: conversion.selection().is_selected(record.output_name()),
        }
    }
}

/// URL of one page's PNG
pub fn page_href(run_id: &str, output_name: &str) -> String {
    format!("/api/run/{run_id}/page/{}", urlencoding::encode(output_name))
}

/// A file that could not be converted
#[derive(Debug, Clone)]
pub struct FailureRow {
    pub source_name: String,
    pub reason: String,
}

fn rows_for(run_id: &str, conversion: &ConversionRun) -> Vec<PageRow> {
    conversion
        .catalog()
        .iter()
        .map(|record| PageRow::new(run_id, record, conversion))
        .collect()
}

fn download_label(selected_count: usize) -> String {
    format!("Download {selected_count} Selected Page(s) as ZIP")
}

// =============================================================================
// Full Page Templates
// =============================================================================

/// Landing page with upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Result page after an upload.
#[derive(Template, WebTemplate)]
#[template(path = "run.html")]
pub struct RunTemplate {
    pub run_id: String,
    pub files_converted: usize,
    pub page_count: usize,
    pub failures: Vec<FailureRow>,
    // Shared with partials/page_table.html
    pub all_selected: bool,
    pub rows: Vec<PageRow>,
    // Shared with partials/download_panel.html
    pub selected_count: usize,
    pub download_label: String,
    pub archive_name: &'static str,
    pub empty_message: &'static str,
}

impl RunTemplate {
    pub fn new(run_id: String, conversion: &ConversionRun) -> Self {
        let summary = conversion.summary();
        let selected_count = conversion.selection().selected_count();

        Self {
            rows: rows_for(&run_id, conversion),
            run_id,
            files_converted: summary.files_converted,
            page_count: summary.pages,
            failures: conversion
                .failures()
                .iter()
                .map(|f| FailureRow {
                    source_name: f.source_name.clone(),
                    reason: f.reason.clone(),
                })
                .collect(),
            all_selected: conversion.selection().all_selected(),
            selected_count,
            download_label: download_label(selected_count),
            archive_name: ARCHIVE_FILE_NAME,
            empty_message: EMPTY_SELECTION_MESSAGE,
        }
    }
}

// =============================================================================
// Fragment Templates (HTMX partial responses)
// =============================================================================

/// Page table fragment returned after the select-all toggle.
#[derive(Template, WebTemplate)]
#[template(path = "partials/page_table.html")]
pub struct PageTableTemplate {
    pub run_id: String,
    pub all_selected: bool,
    pub rows: Vec<PageRow>,
    pub selected_count: usize,
    pub download_label: String,
    pub archive_name: &'static str,
    pub empty_message: &'static str,
}

impl PageTableTemplate {
    pub fn new(run_id: String, conversion: &ConversionRun) -> Self {
        let selected_count = conversion.selection().selected_count();

        Self {
            rows: rows_for(&run_id, conversion),
            run_id,
            all_selected: conversion.selection().all_selected(),
            selected_count,
            download_label: download_label(selected_count),
            archive_name: ARCHIVE_FILE_NAME,
            empty_message: EMPTY_SELECTION_MESSAGE,
        }
    }
}

/// Download panel fragment returned after a single checkbox changes.
#[derive(Template, WebTemplate)]
#[template(path = "partials/download_panel.html")]
pub struct DownloadPanelTemplate {
    pub run_id: String,
    pub selected_count: usize,
    pub download_label: String,
    pub archive_name: &'static str,
    pub empty_message: &'static str,
}

impl DownloadPanelTemplate {
    #[allow(clippy::missing_const_for_fn)] // String fields prevent const
    pub fn new(run_id: String, selected_count: usize) -> Self {
        Self {
            run_id,
            selected_count,
            download_label: download_label(selected_count),
            archive_name: ARCHIVE_FILE_NAME,
            empty_message: EMPTY_SELECTION_MESSAGE,
        }
    }
}
