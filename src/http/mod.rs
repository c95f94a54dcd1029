//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add request ID)
//!     → page.rs (transform → fetch → render → assemble)
//!       or assets.rs (unmatched paths served from disk)
//!     → response.rs (failures mapped to 404/500)
//!     → Send to client
//! ```

pub mod assets;
pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::PageError;
pub use server::{AppState, HttpServer, ServerError};
