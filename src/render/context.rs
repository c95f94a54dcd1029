//! Render context and variable scope.

use serde_json::{Map, Value};

use crate::template::Params;

/// Per-request values visible to a template.
///
/// `params` is always bound. The fetched data is bound under the name the
/// page declared in its `response` attribute.
#[derive(Debug, Clone)]
pub struct RenderContext {
    params: Value,
    bindings: Vec<(String, Value)>,
}

impl RenderContext {
    /// Create a context holding only the route params.
    pub fn new(params: Params) -> Self {
        let params = params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>();
        Self {
            params: Value::Object(params),
            bindings: Vec::new(),
        }
    }

    /// Returns a context with `name` bound to `value`.
    pub fn bind(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.bindings.retain(|(existing, _)| *existing != name);
        self.bindings.push((name, value));
        self
    }

    /// Look up a top-level name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
            .or_else(|| (name == "params").then_some(&self.params))
    }
}

/// Lexical scope used during rendering: loop frames over the context.
#[derive(Debug)]
pub struct Scope<'a> {
    ctx: &'a RenderContext,
    frames: Vec<(String, Value)>,
}

impl<'a> Scope<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self {
            ctx,
            frames: Vec::new(),
        }
    }

    /// Bind a loop variable, shadowing outer names.
    pub fn push(&mut self, name: &str, value: Value) {
        self.frames.push((name.to_string(), value));
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve a name, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
            .or_else(|| self.ctx.get(name))
    }
}
