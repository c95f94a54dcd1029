//! Per-request page pipeline.
//!
//! ```text
//! resolve page → read markup (404 if absent) → read shell
//!     → transform → fetch → render → assemble → 200 text/html
//! ```
//! Any failure after the markup lookup is a 500 with an empty body.

use std::time::Instant;

use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};

use crate::http::request::request_id;
use crate::http::response::PageError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::pages::Page;
use crate::render::{render, RenderContext};
use crate::template::{transform, Params};

/// Handle a request for `page_id`.
pub async fn serve_page(
    state: AppState,
    page_id: String,
    params: Params,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    tracing::debug!(
        request_id = %request_id,
        page = %page_id,
        "Rendering page"
    );

    let response = match render_page(&state, &page_id, params).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            err.log(&request_id, &page_id);
            err.into_response()
        }
    };

    metrics::record_request(&page_id, response.status().as_u16(), start_time);
    response
}

/// Run the full pipeline and return the assembled document.
pub async fn render_page(
    state: &AppState,
    page_id: &str,
    params: Params,
) -> Result<String, PageError> {
    let page = Page::resolve(&state.project.app_path(), page_id).await;

    let markup = page
        .read_markup()
        .await
        .map_err(|e| PageError::from_io(page.markup_path.clone(), e))?;

    let shell_path = state.project.shell_path();
    let shell = tokio::fs::read_to_string(&shell_path)
        .await
        .map_err(|source| PageError::Io {
            path: shell_path,
            source,
        })?;

    let transformed = transform(&markup, &params)?;
    tracing::trace!(
        page = %page_id,
        is_static = transformed.template.is_static(),
        fetch = transformed.fetch.as_ref().map(|f| f.url.as_str()).unwrap_or(""),
        "Markup transformed"
    );

    let mut ctx = RenderContext::new(params);
    if let Some(fetch) = &transformed.fetch {
        let data = state.fetcher.fetch(&fetch.url).await?;
        ctx = ctx.bind(fetch.response_var.clone(), data);
    }

    let fragment = render(&transformed.template, &ctx)?;

    let html = state.assembler.assemble(&shell, &fragment, &page);
    tracing::trace!(
        page = %page_id,
        asset_version = %state.assembler.version(),
        css = page.has_css(),
        js = page.has_js(),
        "Page assembled"
    );
    Ok(html)
}
