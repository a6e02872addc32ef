//! Selection routes - checkbox changes from the page table.

use axum::extract::{Form, Path, State};
use std::sync::Arc;
use tracing::debug;

use super::{SelectAllForm, SelectPageForm, checkbox_checked};
use crate::helpers::{OptionExt, RouteResult, core_error_response};
use crate::state::AppState;
use crate::templates::{DownloadPanelTemplate, PageTableTemplate};

/// Select or deselect every page - returns the whole page table.
///
/// HTMX: Replaces `#page-table`, since every row checkbox changes.
pub async fn select_all(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
    Form(form): Form<SelectAllForm>,
) -> RouteResult<PageTableTemplate> {
    let value = checkbox_checked(form.selected.as_deref());

    let run = state
        .get_run(&run_id)
        .await
        .or_not_found("Conversion not found")?;

    let template = run
        .with_run_mut(|r| {
            r.conversion.selection_mut().set_all(value);
            PageTableTemplate::new(run_id.clone(), &r.conversion)
        })
        .await
        .or_not_found("Conversion not found")?;

    debug!("Run {}: select all = {}", run_id, value);
    Ok(template)
}

/// Select or deselect one page - returns the download panel.
///
/// HTMX: Replaces `#download-panel`; the row's own checkbox already shows
/// the new state.
pub async fn select_page(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<String>,
    Form(form): Form<SelectPageForm>,
) -> RouteResult<DownloadPanelTemplate> {
    let value = checkbox_checked(form.selected.as_deref());

    let run = state
        .get_run(&run_id)
        .await
        .or_not_found("Conversion not found")?;

    let selected_count = run
        .with_run_mut(|r| {
            let selection = r.conversion.selection_mut();
            selection
                .set_one(&form.page, value)
                .map(|()| selection.selected_count())
        })
        .await
        .or_not_found("Conversion not found")?
        .map_err(|e| core_error_response(&e))?;

    debug!("Run {}: {} selected = {}", run_id, form.page, value);
    Ok(DownloadPanelTemplate::new(run_id, selected_count))
}
