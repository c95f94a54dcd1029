//! Page pipeline errors and their HTTP mapping.
//!
//! # Responsibilities
//! - Collect every failure of the per-request page pipeline
//! - Map failures to a bare status code (no diagnostic body)
//! - Log diagnostics server-side
//!
//! # Design Decisions
//! - Missing page markup is 404; everything else is 500
//! - No partial output: an error never carries half a page

use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::fetch::FetchError;
use crate::render::RenderError;
use crate::template::TemplateError;

/// Failure of the page pipeline for one request.
#[derive(Debug, Error)]
pub enum PageError {
    /// Page markup file does not exist.
    #[error("page markup not found at {}", .0.display())]
    MissingPage(PathBuf),

    /// Markup or shell could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directive markup could not be parsed.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// SSR data fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Template evaluation failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

impl PageError {
    /// Classify an IO error raised while reading `path`.
    pub fn from_io(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            PageError::MissingPage(path)
        } else {
            PageError::Io { path, source }
        }
    }

    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::MissingPage(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PageError::MissingPage(_) => "missing_page",
            PageError::Io { .. } => "io",
            PageError::Template(_) => "template",
            PageError::Fetch(_) => "fetch",
            PageError::Render(_) => "render",
        }
    }

    /// Log the failure with request context.
    pub fn log(&self, request_id: &str, page: &str) {
        match self {
            PageError::MissingPage(_) => tracing::warn!(
                request_id = %request_id,
                page = %page,
                error = %self,
                "Page not found"
            ),
            _ => tracing::error!(
                request_id = %request_id,
                page = %page,
                kind = self.kind(),
                error = %self,
                "Page pipeline failed"
            ),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}
