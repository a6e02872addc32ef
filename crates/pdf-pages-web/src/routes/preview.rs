//! Preview route - full-size PNG for a single page.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use std::sync::Arc;

use crate::helpers::{OptionExt, ResultExt, RouteResult};
use crate::state::AppState;

/// Serve one page's PNG, addressed by output name.
///
/// Pages never change within a run, so the response is cacheable for the
/// run's lifetime.
pub async fn get_page_image(
    State(state): State<Arc<AppState>>,
    Path((run_id, output_name)): Path<(String, String)>,
) -> RouteResult<Response> {
    let run = state
        .get_run(&run_id)
        .await
        .or_not_found("Conversion not found")?;

    let png = run
        .with_run(|r| r.conversion.page(&output_name).map(|p| p.image_bytes().to_vec()))
        .await
        .flatten()
        .or_not_found("Page not found")?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", output_name.replace('"', "")),
        )
        .header(header::CACHE_CONTROL, "private, max-age=3600, immutable")
        .body(Body::from(png))
        .or_internal_error()
}
