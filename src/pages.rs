//! Page resolution by convention path.
//!
//! A page `id` lives at `<app_dir>/<id>/<id>.html`, with optional
//! `<id>.css` and `<id>.js` beside it. Pages are resolved on every request;
//! nothing is cached.

use std::io;
use std::path::{Path, PathBuf};

/// A page and the assets it ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub markup_path: PathBuf,
    /// Present only if the stylesheet exists and is non-empty.
    pub css_path: Option<PathBuf>,
    /// Present only if the script exists and is non-empty.
    pub js_path: Option<PathBuf>,
}

impl Page {
    /// Resolve page paths under `app_dir`.
    pub async fn resolve(app_dir: &Path, id: &str) -> Self {
        let dir = app_dir.join(id);
        let css = dir.join(format!("{id}.css"));
        let js = dir.join(format!("{id}.js"));

        Self {
            id: id.to_string(),
            markup_path: dir.join(format!("{id}.html")),
            css_path: has_content(&css).await.then_some(css),
            js_path: has_content(&js).await.then_some(js),
        }
    }

    pub fn has_css(&self) -> bool {
        self.css_path.is_some()
    }

    pub fn has_js(&self) -> bool {
        self.js_path.is_some()
    }

    /// Read the page markup.
    pub async fn read_markup(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.markup_path).await
    }
}

async fn has_content(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}
