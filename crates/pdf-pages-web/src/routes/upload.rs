//! Upload route - PDF file upload and conversion.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use axum_extra::extract::Multipart;
use pdf_pages_core::{ConversionRun, Error, FileFailure, UploadedFile};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::helpers::{ResultExt, RouteResult, is_pdf_upload};
use crate::state::AppState;

/// "Single PDF" or "Multiple PDFs" from the upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    Single,
    #[default]
    Multiple,
}

impl UploadMode {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "single" => Self::Single,
            _ => Self::Multiple,
        }
    }
}

/// A multipart file field before validation
#[derive(Debug)]
struct ReceivedFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Apply the upload mode and split PDFs from everything else.
///
/// Files past the single-mode limit are reported rather than dropped.
fn partition_uploads(
    received: Vec<ReceivedFile>,
    mode: UploadMode,
) -> (Vec<UploadedFile>, Vec<FileFailure>) {
    let limit = match mode {
        UploadMode::Single => 1,
        UploadMode::Multiple => usize::MAX,
    };

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for (position, file) in received.into_iter().enumerate() {
        if position >= limit {
            warn!("Skipped extra upload {} in single mode", file.name);
            let err = Error::ExtraFile(file.name.clone());
            rejected.push(FileFailure::new(file.name, &err));
        } else if is_pdf_upload(&file.name, file.content_type.as_deref()) {
            accepted.push(UploadedFile::new(file.name, file.bytes));
        } else {
            warn!("Rejected non-PDF upload {}", file.name);
            let err = Error::UnsupportedFile(file.name.clone());
            rejected.push(FileFailure::new(file.name, &err));
        }
    }
    (accepted, rejected)
}

/// Upload PDF files - converts them and redirects to the result page
/// (POST-Redirect-GET pattern).
///
/// Supports both HTMX requests (HX-Redirect header) and standard form submissions
/// (HTTP 303 See Other redirect) for graceful degradation without JavaScript.
pub async fn upload_pdfs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut received = Vec::new();
    let mut mode = UploadMode::default();

    while let Some(field) = multipart.next_field().await.or_bad_request()? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "mode" => {
                let value = field.text().await.or_bad_request()?;
                mode = UploadMode::parse(&value);
            }
            "file" => {
                let name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.or_bad_request()?;

                // Browsers send an empty, unnamed part when no file was chosen
                if name.is_empty() && bytes.is_empty() {
                    continue;
                }
                received.push(ReceivedFile {
                    name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    if received.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No file uploaded".to_string()));
    }

    let (files, rejected) = partition_uploads(received, mode);
    info!(
        "Converting {} PDF(s) ({} rejected, mode {:?})",
        files.len(),
        rejected.len(),
        mode
    );

    // Rasterize in a blocking task to avoid blocking the async runtime
    let rasterizer = state.rasterizer();
    let palette = state.palette.clone();
    let mut conversion =
        tokio::task::spawn_blocking(move || ConversionRun::build(&files, &rasterizer, &palette))
            .await
            .map_err(|e| {
                error!("Conversion task panicked: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PDF conversion failed".to_string(),
                )
            })?;
    conversion.add_failures(rejected);

    let summary = conversion.summary();
    let run_id = state.insert_run(conversion).await;
    info!(
        "Created run {}: {} pages from {} PDF(s), {} failed",
        run_id, summary.pages, summary.files_converted, summary.files_failed
    );

    let redirect_url = format!("/run/{run_id}");

    if headers.get("HX-Request").is_some() {
        // HX-Redirect tells HTMX to do a full page navigation
        Response::builder()
            .status(StatusCode::OK)
            .header("HX-Redirect", redirect_url)
            .body(Body::empty())
            .or_internal_error()
    } else {
        // 303 See Other for POST-Redirect-GET
        Response::builder()
            .status(StatusCode::SEE_OTHER)
            .header(header::LOCATION, redirect_url)
            .body(Body::empty())
            .or_internal_error()
    }
}
