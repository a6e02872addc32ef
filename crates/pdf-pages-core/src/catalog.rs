//! Page catalog: one record per rendered page, across every uploaded file.
//!
//! Building a catalog never fails as a whole. A file that cannot be rendered
//! is reported in [`CatalogBuild::failures`] and the remaining files are
//! still converted.

use base64::Engine;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::pdf::{PageNumber, PageRasterizer, encode_png};
use crate::util::{base_file_name, pdf_stem};

/// Stem used when an upload has no usable filename
const FALLBACK_STEM: &str = "document";

/// A file as received from the upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// One rendered PDF page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    source_name: String,
    page_index: PageNumber,
    output_name: String,
    image_bytes: Vec<u8>,
}

impl PageRecord {
    pub fn new(
        source_name: impl Into<String>,
        page_index: PageNumber,
        output_name: impl Into<String>,
        image_bytes: Vec<u8>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            page_index,
            output_name: output_name.into(),
            image_bytes,
        }
    }

    /// Name of the PDF this page came from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// 1-based position within the source PDF
    pub const fn page_index(&self) -> PageNumber {
        self.page_index
    }

    /// Filename used inside the ZIP archive, unique within the catalog
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// PNG encoding of the page
    pub fn image_bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    /// PNG size in whole kilobytes (truncated)
    pub const fn size_kb(&self) -> usize {
        self.image_bytes.len() / 1024
    }

    /// `data:` URI for embedding the page inline.
    ///
    /// Derived from `image_bytes` on every call.
    pub fn preview_reference(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.image_bytes);
        format!("data:image/png;base64,{encoded}")
    }

    /// Swap in a new PNG, returning the old one.
    pub fn replace_image(&mut self, image_bytes: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.image_bytes, image_bytes)
    }
}

/// Ordered page records: upload order, then page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<PageRecord>,
}

impl Catalog {
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its output name
    pub fn get(&self, output_name: &str) -> Option<&PageRecord> {
        self.records.iter().find(|r| r.output_name == output_name)
    }

    /// Number of distinct source files that produced pages
    pub fn source_count(&self) -> usize {
        self.records
            .iter()
            .map(PageRecord::source_name)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A file that could not be converted, with a user-facing reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub source_name: String,
    pub reason: String,
}

impl FileFailure {
    pub fn new(source_name: impl Into<String>, error: &Error) -> Self {
        Self {
            source_name: source_name.into(),
            reason: error.to_string(),
        }
    }
}

/// Result of one catalog build
#[derive(Debug, Clone, Default)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub failures: Vec<FileFailure>,
}

/// Builds a [`Catalog`] from uploaded files using a [`PageRasterizer`]
pub struct CatalogBuilder<'a> {
    rasterizer: &'a dyn PageRasterizer,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(rasterizer: &'a dyn PageRasterizer) -> Self {
        Self { rasterizer }
    }

    /// Convert every file, isolating per-file failures.
    pub fn build(&self, files: &[UploadedFile]) -> CatalogBuild {
        let mut names = OutputNames::default();
        let mut build = CatalogBuild::default();

        for file in files {
            let source_name = base_file_name(&file.name).to_string();
            match self.convert_file(&source_name, &file.bytes, &mut names) {
                Ok(records) => {
                    debug!("Converted {} ({} pages)", source_name, records.len());
                    build.catalog.records.extend(records);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", source_name, e);
                    build.failures.push(FileFailure::new(source_name, &e));
                }
            }
        }

        info!(
            "Built catalog: {} pages from {} files ({} failed)",
            build.catalog.len(),
            files.len(),
            build.failures.len()
        );
        build
    }

    fn convert_file(
        &self,
        source_name: &str,
        bytes: &[u8],
        names: &mut OutputNames,
    ) -> Result<Vec<PageRecord>> {
        let images = self.rasterizer.rasterize(bytes)?;
        if images.is_empty() {
            return Err(Error::PdfOpen("document contains no pages".to_string()));
        }

        // Encode everything before claiming a stem so a failed file leaves no trace
        let pngs = images.iter().map(encode_png).collect::<Result<Vec<_>>>()?;

        let stem = names.claim_stem(pdf_stem(source_name), pngs.len());
        let mut page = PageNumber::FIRST;
        let mut records = Vec::with_capacity(pngs.len());
        for png in pngs {
            let output_name = format!("{stem}_page_{page}.png");
            records.push(PageRecord::new(source_name, page, output_name, png));
            if let Some(next) = page.next() {
                page = next;
            }
        }
        Ok(records)
    }
}

/// Tracks output names handed out during one build.
#[derive(Debug, Default)]
struct OutputNames {
    used: HashSet<String>,
}

impl OutputNames {
    /// Pick a stem whose `<stem>_page_<n>.png` names are all unused, and
    /// reserve them. Tries `stem`, then `stem_2`, `stem_3`, ...
    fn claim_stem(&mut self, stem: &str, page_count: usize) -> String {
        let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };

        let mut candidate = stem.to_string();
        let mut suffix = 2_usize;
        while (1..=page_count).any(|n| self.used.contains(&format!("{candidate}_page_{n}.png"))) {
            candidate = format!("{stem}_{suffix}");
            suffix += 1;
        }

        for n in 1..=page_count {
            self.used.insert(format!("{candidate}_page_{n}.png"));
        }
        candidate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::RgbaImage;

    /// Treats the first byte of the "PDF" as its page count; 0xFF fails.
    struct CountingRasterizer;

    impl PageRasterizer for CountingRasterizer {
        fn rasterize(&self, pdf: &[u8]) -> Result<Vec<RgbaImage>> {
            match pdf.first() {
                None => Err(Error::PdfOpen("file is empty".to_string())),
                Some(0xFF) => Err(Error::PdfOpen("broken".to_string())),
                Some(&n) => Ok((0..n)
                    .map(|i| RgbaImage::from_pixel(2, 2, image::Rgba([i, 0, 0, 255])))
                    .collect()),
            }
        }
    }

    fn build(files: &[UploadedFile]) -> CatalogBuild {
        CatalogBuilder::new(&CountingRasterizer).build(files)
    }

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.iter().map(PageRecord::output_name).collect()
    }

    #[test]
    fn test_output_names_and_order() {
        let result = build(&[UploadedFile::new("a.pdf", [3_u8]), UploadedFile::new("b.pdf", [1_u8])]);

        assert!(result.failures.is_empty());
        assert_eq!(
            names(&result.catalog),
            ["a_page_1.png", "a_page_2.png", "a_page_3.png", "b_page_1.png"]
        );
        let indexes: Vec<u32> = result.catalog.iter().map(|r| r.page_index().get()).collect();
        assert_eq!(indexes, [1, 2, 3, 1]);
    }

    #[test]
    fn test_identical_source_names_stay_unique() {
        let result = build(&[
            UploadedFile::new("a.pdf", [2_u8]),
            UploadedFile::new("a.pdf", [1_u8]),
            UploadedFile::new("A.PDF", [1_u8]),
        ]);

        let all = names(&result.catalog);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all, ["a_page_1.png", "a_page_2.png", "a_2_page_1.png", "A_page_1.png"]);
    }

    #[test]
    fn test_suffix_skips_names_taken_by_real_files() {
        let result = build(&[
            UploadedFile::new("a_2.pdf", [1_u8]),
            UploadedFile::new("a.pdf", [1_u8]),
            UploadedFile::new("a.pdf", [1_u8]),
        ]);

        assert_eq!(
            names(&result.catalog),
            ["a_2_page_1.png", "a_page_1.png", "a_3_page_1.png"]
        );
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let result = build(&[
            UploadedFile::new("good.pdf", [2_u8]),
            UploadedFile::new("bad.pdf", [0xFF_u8]),
            UploadedFile::new("empty.pdf", Vec::new()),
            UploadedFile::new("later.pdf", [1_u8]),
        ]);

        assert_eq!(
            names(&result.catalog),
            ["good_page_1.png", "good_page_2.png", "later_page_1.png"]
        );
        let failed: Vec<_> = result.failures.iter().map(|f| f.source_name.as_str()).collect();
        assert_eq!(failed, ["bad.pdf", "empty.pdf"]);
        assert!(result.failures[0].reason.contains("broken"));
    }

    #[test]
    fn test_zero_page_document_is_a_failure() {
        let result = build(&[UploadedFile::new("blank.pdf", [0_u8])]);
        assert!(result.catalog.is_empty());
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].reason.contains("no pages"));
    }

    #[test]
    fn test_source_name_drops_directories() {
        let result = build(&[UploadedFile::new("scans/2024/report.pdf", [1_u8])]);
        let record = &result.catalog.records()[0];
        assert_eq!(record.source_name(), "report.pdf");
        assert_eq!(record.output_name(), "report_page_1.png");
    }

    #[test]
    fn test_unnamed_upload_gets_fallback_stem() {
        let result = build(&[UploadedFile::new("", [1_u8])]);
        assert_eq!(names(&result.catalog), ["document_page_1.png"]);
    }

    #[test]
    fn test_size_and_preview_follow_image_bytes() {
        let mut record = PageRecord::new("a.pdf", PageNumber::FIRST, "a_page_1.png", vec![0; 2047]);
        assert_eq!(record.size_kb(), 1);

        let before = record.preview_reference();
        assert!(before.starts_with("data:image/png;base64,"));

        let old = record.replace_image(vec![1; 4096]);
        assert_eq!(old.len(), 2047);
        assert_eq!(record.size_kb(), 4);
        assert_ne!(record.preview_reference(), before);
    }

    #[test]
    fn test_preview_reference_decodes_to_image_bytes() {
        let result = build(&[UploadedFile::new("a.pdf", [1_u8])]);
        let record = &result.catalog.records()[0];

        let uri = record.preview_reference();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(decoded, record.image_bytes());
    }

    #[test]
    fn test_catalog_lookup_and_source_count() {
        let result = build(&[UploadedFile::new("a.pdf", [2_u8]), UploadedFile::new("b.pdf", [1_u8])]);
        let catalog = &result.catalog;

        assert_eq!(catalog.source_count(), 2);
        assert_eq!(catalog.get("a_page_2.png").unwrap().page_index().get(), 2);
        assert!(catalog.get("missing.png").is_none());
    }
}
