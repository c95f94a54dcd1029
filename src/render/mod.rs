//! Template rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Template + RenderContext { params, <response_var>: data }
//!     → context.rs (scope: loop frames → bindings → params)
//!     → eval.rs (expressions against the scope)
//!     → value.rs (truthiness, display, HTML escaping)
//!     → HTML fragment
//! ```
//!
//! # Design Decisions
//! - Rendering is a pure function of (template, context); nothing is cached
//! - Undefined names are errors, missing object properties are null
//! - Interpolated values are HTML-escaped, literal text is not

pub mod context;
pub mod eval;
pub mod value;

use thiserror::Error;

use crate::template::{Node, Template};

pub use context::{RenderContext, Scope};

/// Errors raised while evaluating a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A name that is not bound in the render scope.
    #[error("{name} is not defined")]
    Undefined { name: String },

    /// Property access on null.
    #[error("cannot read property '{property}' of null ({expr})")]
    NullAccess { expr: String, property: String },

    /// A loop over something that is not an array.
    #[error("cannot iterate over {found} ({expr})")]
    NotIterable { expr: String, found: &'static str },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render a template against a context.
pub fn render(template: &Template, ctx: &RenderContext) -> RenderResult<String> {
    match template {
        Template::Static(markup) => Ok(markup.clone()),
        Template::Tree(nodes) => {
            let mut scope = Scope::new(ctx);
            let mut out = String::new();
            render_nodes(nodes, &mut scope, &mut out)?;
            Ok(out)
        }
    }
}

fn render_nodes(nodes: &[Node], scope: &mut Scope<'_>, out: &mut String) -> RenderResult<()> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Interpolation(expr) => {
                let value = eval::evaluate(expr, scope)?;
                value::escape_into(&value::display(&value), out);
            }
            Node::AttributeBinding { name, value: expr } => {
                let value = eval::evaluate(expr, scope)?;
                out.push_str(name);
                out.push_str("=\"");
                value::escape_into(&value::display(&value), out);
                out.push('"');
            }
            Node::Conditional { condition, body } => {
                if value::is_truthy(&eval::evaluate(condition, scope)?) {
                    render_nodes(body, scope, out)?;
                }
            }
            Node::Loop {
                item,
                collection,
                body,
            } => {
                let items = match eval::evaluate(collection, scope)? {
                    serde_json::Value::Array(items) => items,
                    other => {
                        return Err(RenderError::NotIterable {
                            expr: collection.to_string(),
                            found: value::kind(&other),
                        })
                    }
                };

                for entry in items {
                    scope.push(item, entry);
                    let result = render_nodes(body, scope, out);
                    scope.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}
