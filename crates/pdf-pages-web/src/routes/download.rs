//! Download route - ZIP of the selected pages.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use pdf_pages_core::{ARCHIVE_CONTENT_TYPE, ARCHIVE_FILE_NAME, Error, PageRecord, build_archive};
use std::sync::Arc;
use tracing::{error, info};

use crate::helpers::{OptionExt, ResultExt, RouteResult, core_error_response};
use crate::state::AppState;

/// Download the currently selected pages as `selected_pages.zip`.
///
/// An empty selection answers 400 with the same notice the page shows; the
/// UI never offers the link in that state.
pub async fn download_archive(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> RouteResult<Response> {
    let run = state
        .get_run(&run_id)
        .await
        .or_not_found("Conversion not found")?;

    // Copy the selected pages out inside the lock (fast), compress outside it
    let selected = run
        .with_run(|r| {
            r.conversion
                .selected_records()
                .into_iter()
                .cloned()
                .collect::<Vec<PageRecord>>()
        })
        .await
        .or_not_found("Conversion not found")?;

    let page_count = selected.len();
    let archive = tokio::task::spawn_blocking(move || {
        let refs: Vec<&PageRecord> = selected.iter().collect();
        build_archive(&refs)
    })
    .await
    .map_err(|e| {
        error!("Archive task panicked: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Archive building failed".to_string(),
        )
    })?
    .map_err(|e| {
        if matches!(e, Error::EmptySelection) {
            info!("Run {}: download requested with nothing selected", run_id);
        } else {
            error!("Failed to build archive for run {}: {}", run_id, e);
        }
        core_error_response(&e)
    })?;

    info!("Run {}: downloading {} pages ({} bytes)", run_id, page_count, archive.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ARCHIVE_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ARCHIVE_FILE_NAME}\""),
        )
        .body(Body::from(archive))
        .or_internal_error()
}
