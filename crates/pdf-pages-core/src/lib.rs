//! PDF Pages Core Library
//!
//! This library provides the core functionality for turning PDFs into PNG pages:
//! - PDF rasterization via mupdf
//! - Page catalog building with per-file error isolation
//! - Page selection and per-source color grouping
//! - ZIP packaging of the selected pages

pub mod archive;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod pdf;
pub mod selection;
pub mod util;

pub use archive::{ARCHIVE_CONTENT_TYPE, ARCHIVE_FILE_NAME, build_archive};
pub use catalog::{Catalog, CatalogBuild, CatalogBuilder, FileFailure, PageRecord, UploadedFile};
pub use color::{ColorAssignment, DEFAULT_PALETTE, Palette};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use pdf::{MupdfRasterizer, PageNumber, PageRasterizer, PdfDocument};
pub use selection::SelectionState;

use tracing::debug;

/// Everything produced by one upload: the pages, which of them are
/// selected, their row colors, and the files that failed.
#[derive(Debug, Clone)]
pub struct ConversionRun {
    catalog: Catalog,
    selection: SelectionState,
    colors: ColorAssignment,
    failures: Vec<FileFailure>,
    files_received: usize,
}

/// Counts for the post-conversion banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files_converted: usize,
    pub files_failed: usize,
    pub pages: usize,
}

impl ConversionRun {
    /// Convert `files`, select every page, and assign row colors with a
    /// fresh random seed.
    pub fn build(files: &[UploadedFile], rasterizer: &dyn PageRasterizer, palette: &Palette) -> Self {
        Self::build_seeded(files, rasterizer, palette, rand::random())
    }

    /// [`build`](Self::build) with an explicit color seed.
    pub fn build_seeded(
        files: &[UploadedFile],
        rasterizer: &dyn PageRasterizer,
        palette: &Palette,
        seed: u64,
    ) -> Self {
        let CatalogBuild { catalog, failures } = CatalogBuilder::new(rasterizer).build(files);
        Self::from_catalog(catalog, failures, files.len(), palette, seed)
    }

    /// Wrap an already built catalog. Files rejected before conversion (for
    /// example, non-PDF uploads) can be passed in `failures`.
    pub fn from_catalog(
        catalog: Catalog,
        failures: Vec<FileFailure>,
        files_received: usize,
        palette: &Palette,
        seed: u64,
    ) -> Self {
        let selection = SelectionState::new(&catalog);
        let colors = ColorAssignment::assign(palette, &catalog, seed);
        debug!("Assigned {} colors with seed {}", colors.len(), seed);

        Self {
            catalog,
            selection,
            colors,
            failures,
            files_received,
        }
    }

    /// Add failures found outside the catalog builder.
    pub fn add_failures(&mut self, failures: impl IntoIterator<Item = FileFailure>) {
        let before = self.failures.len();
        self.failures.extend(failures);
        self.files_received += self.failures.len() - before;
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub const fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub const fn colors(&self) -> &ColorAssignment {
        &self.colors
    }

    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Look up a page by output name
    pub fn page(&self, output_name: &str) -> Option<&PageRecord> {
        self.catalog.get(output_name)
    }

    /// Selected pages in catalog order
    pub fn selected_records(&self) -> Vec<&PageRecord> {
        self.selection.selected_records(&self.catalog)
    }

    /// ZIP of the currently selected pages
    pub fn archive(&self) -> Result<Vec<u8>> {
        build_archive(&self.selected_records())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files_converted: self.files_received.saturating_sub(self.failures.len()),
            files_failed: self.failures.len(),
            pages: self.catalog.len(),
        }
    }
}
