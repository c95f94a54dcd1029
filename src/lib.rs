//! satto: server-side rendering of directive markup pages.

pub mod assemble;
pub mod config;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pages;
pub mod render;
pub mod routing;
pub mod template;

pub use assemble::{Assembler, VersionToken};
pub use config::SattoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
