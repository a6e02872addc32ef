//! ZIP packaging of selected pages.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::catalog::PageRecord;
use crate::error::{Error, Result};

/// Filename offered for the download
pub const ARCHIVE_FILE_NAME: &str = "selected_pages.zip";

/// Media type of the download
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Package records into a ZIP: one entry per record, named by its output
/// name, in input order.
pub fn build_archive(records: &[&PageRecord]) -> Result<Vec<u8>> {
    if records.is_empty() {
        return Err(Error::EmptySelection);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for record in records {
        zip.start_file(record.output_name(), options)?;
        zip.write_all(record.image_bytes())
            .map_err(|e| Error::Archive(format!("{}: {e}", record.output_name())))?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!("Built archive with {} entries ({} bytes)", records.len(), bytes.len());
    Ok(bytes)
}
