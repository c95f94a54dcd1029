//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SattoConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Project layout on disk.
    pub project: ProjectConfig,

    /// Shell markers rewritten by the assembler.
    pub assets: AssetConfig,

    /// SSR data fetch settings.
    pub fetch: FetchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions mapping paths to pages.
    pub routes: Vec<RouteConfig>,
}

impl Default for SattoConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            project: ProjectConfig::default(),
            assets: AssetConfig::default(),
            fetch: FetchConfig::default(),
            observability: ObservabilityConfig::default(),
            routes: vec![RouteConfig {
                path: "/".to_string(),
                page: "home".to_string(),
            }],
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Project layout. All paths are relative to `root`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project source directory.
    pub root: PathBuf,

    /// Shell layout file.
    pub shell: String,

    /// Directory holding one sub-directory per page.
    pub app_dir: String,

    /// Directory of shared static files.
    pub static_dir: String,
}

impl ProjectConfig {
    pub fn shell_path(&self) -> PathBuf {
        self.root.join(&self.shell)
    }

    pub fn app_path(&self) -> PathBuf {
        self.root.join(&self.app_dir)
    }

    pub fn static_path(&self) -> PathBuf {
        self.root.join(&self.static_dir)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("src"),
            shell: "index.html".to_string(),
            app_dir: "app".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

/// Markers in the shell layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Marker replaced by the rendered page.
    pub placeholder: String,

    /// Href of the shell's base stylesheet link, versioned on every page.
    pub base_stylesheet: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            placeholder: "<routes></routes>".to_string(),
            base_stylesheet: "/styles.css".to_string(),
        }
    }
}

/// SSR data fetch configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL for relative `<ssr url="/...">` values.
    pub base_url: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route configuration mapping a path to a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Request path; `:name` or `{name}` segments capture params.
    pub path: String,

    /// Page identifier under the app directory.
    pub page: String,
}
