//! Markup transformer.
//!
//! # Responsibilities
//! - Detect the `<ssr url="…" response="…">` wrapper
//! - Resolve `{{params.KEY}}` tokens in the wrapper URL from route params
//! - Strip the wrapper tags and parse the body into a directive tree
//!
//! # Design Decisions
//! - No wrapper means no directives: the markup is returned unchanged
//! - URL resolution only sees route params, never fetched data
//! - Markup around the wrapper is kept as literal text

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::template::ast::{FetchDirective, Node, Template, Transformed};
use crate::template::error::{TemplateError, TemplateResult};
use crate::template::expr::is_identifier;
use crate::template::parser;
use crate::template::Params;

static WRAPPER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ssr(?:\s[^>]*)?>").expect("wrapper pattern is valid"));

static WRAPPER_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</ssr\s*>").expect("wrapper close pattern is valid"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#)
        .expect("attribute pattern is valid")
});

static PARAM_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*params\.(\w+)\s*\}\}").expect("param token pattern is valid")
});

/// Location of the fetch wrapper inside page markup.
#[derive(Debug)]
struct Wrapper<'a> {
    /// Byte range of the opening tag.
    open: (usize, usize),
    /// Byte range of the closing tag, if present.
    close: Option<(usize, usize)>,
    url: &'a str,
    response: &'a str,
}

/// Transform raw page markup for one request.
pub fn transform(markup: &str, params: &Params) -> TemplateResult<Transformed> {
    let Some(wrapper) = find_wrapper(markup) else {
        return Ok(Transformed {
            template: Template::Static(markup.to_string()),
            fetch: None,
        });
    };

    if !is_identifier(wrapper.response) {
        return Err(TemplateError::InvalidResponseVar(
            wrapper.response.to_string(),
        ));
    }

    let fetch = FetchDirective {
        url: resolve_params(wrapper.url, params),
        response_var: wrapper.response.to_string(),
    };

    let (body_end, tail_start) = match wrapper.close {
        Some((start, end)) => (start, end),
        None => (markup.len(), markup.len()),
    };

    let mut nodes = Vec::new();
    let head = &markup[..wrapper.open.0];
    if !head.is_empty() {
        nodes.push(Node::Text(head.to_string()));
    }
    nodes.extend(parser::parse(&markup[wrapper.open.1..body_end])?);
    let tail = &markup[tail_start..];
    if !tail.is_empty() {
        nodes.push(Node::Text(tail.to_string()));
    }

    Ok(Transformed {
        template: Template::Tree(nodes),
        fetch: Some(fetch),
    })
}

/// Substitute `{{params.KEY}}` tokens; unknown keys become empty strings.
pub fn resolve_params(template: &str, params: &Params) -> String {
    PARAM_TOKEN
        .replace_all(template, |caps: &Captures<'_>| {
            params.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

fn find_wrapper(markup: &str) -> Option<Wrapper<'_>> {
    WRAPPER_OPEN.find_iter(markup).find_map(|open| {
        let mut url = None;
        let mut response = None;

        for caps in ATTRIBUTE.captures_iter(open.as_str()) {
            let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            match name.as_str() {
                "url" => url = Some(value.as_str()),
                "response" => response = Some(value.as_str()),
                _ => {}
            }
        }

        let close = WRAPPER_CLOSE
            .find_at(markup, open.end())
            .map(|m| (m.start(), m.end()));

        Some(Wrapper {
            open: (open.start(), open.end()),
            close,
            url: url?,
            response: response?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::expr::Expr;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_static_markup_passes_through() {
        let markup = r#"<h1>{{ data.name }}</h1><for condition="let i in x">{{i}}</for><a [href]="x">"#;
        let out = transform(markup, &Params::new()).unwrap();
        assert_eq!(out.template, Template::Static(markup.to_string()));
        assert!(out.fetch.is_none());
    }

    #[test]
    fn test_wrapper_without_response_is_static() {
        let markup = r#"<ssr url="/api/x">{{ data }}</ssr>"#;
        let out = transform(markup, &Params::new()).unwrap();
        assert!(out.template.is_static());
        assert!(out.fetch.is_none());
    }

    #[test]
    fn test_wrapper_is_stripped() {
        let markup = r#"<main><ssr url="/api/x" response="data">{{data.name}}</ssr></main>"#;
        let out = transform(markup, &Params::new()).unwrap();
        assert_eq!(
            out.fetch,
            Some(FetchDirective {
                url: "/api/x".into(),
                response_var: "data".into(),
            })
        );
        assert_eq!(
            out.template,
            Template::Tree(vec![
                Node::Text("<main>".into()),
                Node::Interpolation(Expr::Member(
                    Box::new(Expr::Var("data".into())),
                    "name".into()
                )),
                Node::Text("</main>".into()),
            ])
        );
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let markup = r#"<ssr response="user" class="x" url="/u">{{user}}</ssr>"#;
        let fetch = transform(markup, &Params::new()).unwrap().fetch.unwrap();
        assert_eq!(fetch.url, "/u");
        assert_eq!(fetch.response_var, "user");
    }

    #[test]
    fn test_url_params_resolved() {
        let markup = r#"<ssr url="https://api.test/users/{{ params.id }}/{{params.missing}}" response="u"></ssr>"#;
        let fetch = transform(markup, &params(&[("id", "42")]))
            .unwrap()
            .fetch
            .unwrap();
        assert_eq!(fetch.url, "https://api.test/users/42/");
    }

    #[test]
    fn test_resolve_params_ignores_other_tokens() {
        let out = resolve_params("/a/{{params.x}}/{{ data.y }}", &params(&[("x", "1")]));
        assert_eq!(out, "/a/1/{{ data.y }}");
    }

    #[test]
    fn test_invalid_response_var() {
        let markup = r#"<ssr url="/x" response="my-data"></ssr>"#;
        let err = transform(markup, &Params::new()).unwrap_err();
        assert_eq!(err, TemplateError::InvalidResponseVar("my-data".into()));
    }

    #[test]
    fn test_missing_close_extends_to_end() {
        let markup = r#"<ssr url="/x" response="d">{{d}}"#;
        let out = transform(markup, &Params::new()).unwrap();
        assert_eq!(
            out.template,
            Template::Tree(vec![Node::Interpolation(Expr::Var("d".into()))])
        );
    }

    #[test]
    fn test_ssr_prefixed_tags_are_not_wrappers() {
        let markup = r#"<ssrx url="/x" response="d">{{d}}</ssrx>"#;
        assert!(transform(markup, &Params::new()).unwrap().template.is_static());
    }
}
