//! Static asset fallback.
//!
//! Requests that match no page route are served from disk:
//! 1. `<app>/<stem>/<file>` for a page asset such as `/home.css`
//!    (also `/docs/home.css`, since pages link their assets relatively;
//!    a parametrized page route such as `/users/:id` matches first, so
//!    relative links from its pages never reach this fallback)
//! 2. `<app>/<path>`
//! 3. `<static>/<path>`
//!
//! Paths with `..`, root or prefix components are never served.

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::config::ProjectConfig;
use crate::http::server::AppState;

/// Fallback handler serving project files.
pub async fn serve_asset(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_string();

    let Some(file) = resolve_asset(&state.project, &path).await else {
        tracing::debug!(path = %path, "No asset found");
        return StatusCode::NOT_FOUND.into_response();
    };

    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Map a request path to a file on disk, if one exists.
pub async fn resolve_asset(project: &ProjectConfig, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let app = project.app_path();
    let mut candidates = Vec::with_capacity(3);
    if let (Some(stem), Some(name)) = (relative.file_stem(), relative.file_name()) {
        candidates.push(app.join(stem).join(name));
    }
    candidates.push(app.join(relative));
    candidates.push(project.static_path().join(relative));

    for candidate in candidates {
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
