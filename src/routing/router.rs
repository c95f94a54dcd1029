//! Route table.
//!
//! # Responsibilities
//! - Compile configured paths into axum path patterns
//! - Reject paths the HTTP router cannot register
//! - Store the route → page mapping
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - `:name` (Express style) and `{name}` (axum style) are equivalent
//! - A trailing `*name` segment captures the rest of the path
//! - Two routes overlap when they differ only in parameter names

use std::collections::HashMap;

use thiserror::Error;

use crate::config::RouteConfig;

/// A configured path that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route path '{path}' has an empty parameter name")]
    EmptyParam { path: String },

    #[error("route path '{path}' has invalid parameter name '{name}'")]
    InvalidParam { path: String, name: String },

    #[error("route path '{path}' declares parameter '{name}' twice")]
    RepeatedParam { path: String, name: String },

    #[error("route path '{path}' has a catch-all before its last segment")]
    CatchAllNotLast { path: String },

    #[error("route path '{path}' has a stray brace in segment '{segment}'")]
    StrayBrace { path: String, segment: String },

    #[error("route path '{path}' overlaps '{existing}'")]
    Overlap { path: String, existing: String },
}

/// A configured path in router form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPath {
    /// Pattern registered with the HTTP router.
    pub pattern: String,

    /// Pattern with parameter names erased; equal shapes overlap.
    pub shape: String,
}

/// A compiled route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path as written in the configuration.
    pub path: String,

    /// Pattern registered with the HTTP router.
    pub pattern: String,

    /// Page rendered for this route.
    pub page: String,
}

/// Immutable table of compiled routes, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile routes from configuration, failing on the first bad path.
    pub fn from_config(routes: Vec<RouteConfig>) -> Result<Self, RouteError> {
        let mut shapes: HashMap<String, String> = HashMap::new();
        let mut compiled = Vec::with_capacity(routes.len());

        for route in routes {
            let CompiledPath { pattern, shape } = compile_path(&route.path)?;
            if let Some(existing) = shapes.get(&shape) {
                return Err(RouteError::Overlap {
                    path: route.path,
                    existing: existing.clone(),
                });
            }
            shapes.insert(shape, route.path.clone());
            compiled.push(Route {
                pattern,
                path: route.path,
                page: route.page,
            });
        }

        Ok(Self { routes: compiled })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}

/// Convert a configured path to an axum path pattern.
pub fn compile_path(path: &str) -> Result<CompiledPath, RouteError> {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut names: Vec<&str> = Vec::new();
    let mut pattern = Vec::with_capacity(segments.len());
    let mut shape = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let param = segment
            .strip_prefix(':')
            .map(|name| (name, false))
            .or_else(|| segment.strip_prefix('*').map(|name| (name, true)))
            .or_else(|| {
                let inner = segment.strip_prefix('{')?.strip_suffix('}')?;
                Some(match inner.strip_prefix('*') {
                    Some(name) => (name, true),
                    None => (inner, false),
                })
            });

        let Some((name, catch_all)) = param else {
            if segment.contains(['{', '}']) {
                return Err(RouteError::StrayBrace {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
            pattern.push(segment.to_string());
            shape.push(segment.to_string());
            continue;
        };

        let name = match name {
            "" if catch_all => "rest",
            "" => {
                return Err(RouteError::EmptyParam {
                    path: path.to_string(),
                })
            }
            name => name,
        };
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RouteError::InvalidParam {
                path: path.to_string(),
                name: name.to_string(),
            });
        }
        if names.contains(&name) {
            return Err(RouteError::RepeatedParam {
                path: path.to_string(),
                name: name.to_string(),
            });
        }
        names.push(name);

        if catch_all {
            if i != last {
                return Err(RouteError::CatchAllNotLast {
                    path: path.to_string(),
                });
            }
            pattern.push(format!("{{*{}}}", name));
            shape.push("{*}".to_string());
        } else {
            pattern.push(format!("{{{}}}", name));
            shape.push("{}".to_string());
        }
    }

    Ok(CompiledPath {
        pattern: pattern.join("/"),
        shape: shape.join("/"),
    })
}
