//! Page assembly.
//!
//! # Data Flow
//! ```text
//! rendered fragment + shell (index.html) + Page + VersionToken
//!     → append page script (if the page has JS)
//!     → replace placeholder with fragment
//!     → version the base stylesheet link
//!     → insert page stylesheet before </head> (if the page has CSS)
//!     → final HTML document
//! ```
//!
//! # Design Decisions
//! - Plain substring replacement on the shell; first occurrence only
//! - Every asset URL carries the same `?v=<token>` for the process lifetime

pub mod version;

use crate::config::AssetConfig;
use crate::pages::Page;

pub use version::VersionToken;

const HEAD_CLOSE: &str = "</head>";

/// Merges rendered fragments into the shell layout.
#[derive(Debug, Clone)]
pub struct Assembler {
    assets: AssetConfig,
    version: VersionToken,
}

impl Assembler {
    pub fn new(assets: AssetConfig, version: VersionToken) -> Self {
        Self { assets, version }
    }

    pub fn version(&self) -> VersionToken {
        self.version
    }

    /// Build the final document for `page`.
    pub fn assemble(&self, shell: &str, fragment: &str, page: &Page) -> String {
        let v = self.version;

        let mut fragment = fragment.to_string();
        if page.has_js() {
            fragment.push_str(&format!("\n<script src=\"./{}.js?v={}\"></script>", page.id, v));
        }

        let html = shell.replacen(&self.assets.placeholder, &fragment, 1);

        let base_link = stylesheet_link(&self.assets.base_stylesheet);
        let versioned = stylesheet_link(&format!("{}?v={}", self.assets.base_stylesheet, v));
        let mut html = html.replacen(&base_link, &versioned, 1);

        if page.has_css() {
            let link = stylesheet_link(&format!("./{}.css?v={}", page.id, v));
            html = html.replacen(HEAD_CLOSE, &format!("{}\n{}", link, HEAD_CLOSE), 1);
        }

        html
    }
}

fn stylesheet_link(href: &str) -> String {
    format!("<link rel=\"stylesheet\" href=\"{}\">", href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SHELL: &str = concat!(
        "<html><head>",
        "<link rel=\"stylesheet\" href=\"/styles.css\">",
        "</head><body><routes></routes></body></html>",
    );

    fn page(css: bool, js: bool) -> Page {
        Page {
            id: "home".into(),
            markup_path: PathBuf::from("app/home/home.html"),
            css_path: css.then(|| PathBuf::from("app/home/home.css")),
            js_path: js.then(|| PathBuf::from("app/home/home.js")),
        }
    }

    fn assembler() -> Assembler {
        Assembler::new(AssetConfig::default(), VersionToken::from_millis(42))
    }

    #[test]
    fn test_plain_page() {
        let html = assembler().assemble(SHELL, "<h1>Hi</h1>", &page(false, false));
        assert_eq!(
            html,
            concat!(
                "<html><head>",
                "<link rel=\"stylesheet\" href=\"/styles.css?v=42\">",
                "</head><body><h1>Hi</h1></body></html>",
            )
        );
    }

    #[test]
    fn test_page_with_assets() {
        let html = assembler().assemble(SHELL, "<h1>Hi</h1>", &page(true, true));
        assert!(html.contains(
            "<link rel=\"stylesheet\" href=\"./home.css?v=42\">\n</head>"
        ));
        assert!(html.contains(
            "<h1>Hi</h1>\n<script src=\"./home.js?v=42\"></script></body>"
        ));
        assert!(!html.contains("<routes></routes>"));
    }

    #[test]
    fn test_version_is_shared() {
        let assembler = assembler();
        let a = assembler.assemble(SHELL, "a", &page(true, false));
        let b = assembler.assemble(SHELL, "b", &page(true, false));
        assert_eq!(a.matches("?v=42").count(), 2);
        assert_eq!(b.matches("?v=42").count(), 2);
    }

    #[test]
    fn test_shell_without_markers() {
        let html = assembler().assemble("<p>no markers</p>", "x", &page(true, false));
        assert_eq!(html, "<p>no markers</p>");
    }
}
