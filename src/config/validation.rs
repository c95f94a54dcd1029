//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route paths and page identifiers
//! - Detect routes that overlap or that the router cannot register
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SattoConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::SattoConfig;
use crate::routing::{compile_path, RouteError};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no routes configured")]
    NoRoutes,

    #[error("route path '{0}' must start with '/'")]
    RelativePath(String),

    #[error("route path '{path}' overlaps '{existing}'")]
    DuplicatePath { path: String, existing: String },

    #[error("{0}")]
    InvalidPath(RouteError),

    #[error("route '{path}' has invalid page id '{page}'")]
    InvalidPage { path: String, page: String },

    #[error("assets.placeholder must not be empty")]
    EmptyPlaceholder,

    #[error("fetch.base_url '{0}' is not a valid absolute URL")]
    InvalidBaseUrl(String),

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &SattoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut shapes: HashMap<String, &str> = HashMap::new();
    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::RelativePath(route.path.clone()));
        } else {
            match compile_path(&route.path) {
                Ok(compiled) => match shapes.get(&compiled.shape) {
                    Some(existing) => errors.push(ValidationError::DuplicatePath {
                        path: route.path.clone(),
                        existing: existing.to_string(),
                    }),
                    None => {
                        shapes.insert(compiled.shape, &route.path);
                    }
                },
                Err(e) => errors.push(ValidationError::InvalidPath(e)),
            }
        }

        if !is_page_id(&route.page) {
            errors.push(ValidationError::InvalidPage {
                path: route.path.clone(),
                page: route.page.clone(),
            });
        }
    }

    if config.assets.placeholder.is_empty() {
        errors.push(ValidationError::EmptyPlaceholder);
    }

    if let Some(base) = &config.fetch.base_url {
        if url::Url::parse(base).is_err() {
            errors.push(ValidationError::InvalidBaseUrl(base.clone()));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A page id is a single, non-hidden path segment.
fn is_page_id(page: &str) -> bool {
    !page.is_empty()
        && !page.starts_with('.')
        && page
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
