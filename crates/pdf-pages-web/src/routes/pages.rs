//! Page routes - full HTML page renders.

use axum::extract::{Path, State};
use std::sync::Arc;

use crate::helpers::{OptionExt, RouteResult};
use crate::state::AppState;
use crate::templates::{IndexTemplate, RunTemplate};

/// Landing page with upload form.
pub async fn index() -> IndexTemplate {
    IndexTemplate
}

/// Conversion result for a run: banner, failures, selectable page table.
pub async fn view_run(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
) -> RouteResult<RunTemplate> {
    let run = state
        .get_run(&run_id)
        .await
        .or_not_found("Conversion not found")?;

    // View model is built under the lock; rendering happens after it is released
    let template = run
        .with_run(|r| RunTemplate::new(run_id.clone(), &r.conversion))
        .await
        .or_not_found("Conversion not found")?;

    Ok(template)
}
