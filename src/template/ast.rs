//! Directive tree types.

use crate::template::expr::Expr;

/// A node of a parsed page body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal markup, emitted verbatim.
    Text(String),

    /// `{{ expr }}`: emits the escaped value of `expr`.
    Interpolation(Expr),

    /// `<for condition="let item in collection"> body </for>`.
    Loop {
        item: String,
        collection: Expr,
        body: Vec<Node>,
    },

    /// `<if condition="condition"> body </if>`.
    Conditional { condition: Expr, body: Vec<Node> },

    /// `[name]="value"`: emits `name="<escaped value>"`.
    AttributeBinding { name: String, value: Expr },
}

/// Executable form of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Page had no fetch wrapper; served byte-for-byte.
    Static(String),

    /// Page had a fetch wrapper; evaluated against a render context.
    Tree(Vec<Node>),
}

impl Template {
    /// Returns true if the template contains no directives to evaluate.
    pub fn is_static(&self) -> bool {
        matches!(self, Template::Static(_))
    }
}

/// The `<ssr url="…" response="…">` declaration of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDirective {
    /// URL with `{{params.KEY}}` tokens already substituted.
    pub url: String,

    /// Name the fetched JSON is bound to while rendering.
    pub response_var: String,
}

/// Output of the markup transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub template: Template,
    pub fetch: Option<FetchDirective>,
}
