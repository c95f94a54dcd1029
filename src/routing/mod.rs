//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → router.rs (compile :param / {param} paths, reject overlaps)
//!     → Freeze as immutable RouteTable
//!     → one GET handler per route in http::server
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Path matching is delegated to the HTTP router
//! - Deterministic: same input always matches same route

pub mod router;

pub use router::{compile_path, CompiledPath, Route, RouteError, RouteTable};
