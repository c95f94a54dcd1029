//! Directive markup subsystem.
//!
//! # Data Flow
//! ```text
//! raw page markup + route params
//!     → transform.rs (find <ssr> wrapper, resolve {{params.KEY}} in url)
//!     → lexer.rs (one alternation over the wrapper body, textual order)
//!     → parser.rs (recursive descent → directive tree)
//!     → expr.rs (expression sources → Expr)
//!     → Transformed { template, fetch }
//! ```
//!
//! # Directive Forms
//! | Form | Node |
//! |---|---|
//! | `{{ expr }}` | `Node::Interpolation` |
//! | `<for condition="let X in EXPR"> … </for>` | `Node::Loop` |
//! | `<if condition="EXPR"> … </if>` | `Node::Conditional` |
//! | `[ATTR]="EXPR"` | `Node::AttributeBinding` |
//! | `<ssr url="…" response="VAR"> … </ssr>` | `Transformed::fetch` |
//!
//! Directives are only recognized inside the `<ssr>` wrapper. Markup without
//! one is returned untouched as `Template::Static`.

pub mod ast;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod transform;

use std::collections::HashMap;

pub use ast::{FetchDirective, Node, Template, Transformed};
pub use error::TemplateError;
pub use expr::{BinOp, Expr};
pub use transform::{resolve_params, transform};

/// Route parameters captured for a request.
pub type Params = HashMap<String, String>;
