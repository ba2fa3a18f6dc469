//! Template engine for storefront pages
//!
//! A deliberately small language: `{{ path.to.value }}` interpolation,
//! `{{ value|safe }}` for raw output and `{% for item in items %}...{% endfor %}`
//! loops. Templates are split into tokens by one regex scan, folded into a
//! node tree with a stack matcher and rendered recursively against a
//! [`Context`].

mod engine;
mod lexer;
mod render;
mod value;

pub use engine::TemplateEngine;
pub use lexer::{tokenize, Token};
pub use render::{Node, Template};
pub use value::{Context, Value};

use thiserror::Error;

/// Structural template errors, raised when a template is parsed.
///
/// Missing data never produces an error; these only signal a defect in
/// the template source itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("line {line}: `for {var}` is never closed with `endfor`")]
    UnclosedLoop { var: String, line: usize },

    #[error("line {line}: `endfor` without a matching `for`")]
    UnexpectedEndfor { line: usize },

    #[error("line {line}: malformed tag `{{% {tag} %}}`")]
    MalformedTag { tag: String, line: usize },

    #[error("line {line}: unknown tag `{{% {tag} %}}`")]
    UnknownTag { tag: String, line: usize },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),
}

/// Parse and render a template string in one step, escaping interpolated
/// values.
pub fn render(source: &str, context: &Context) -> Result<String, TemplateError> {
    Ok(Template::parse(source)?.render(context))
}

/// HTML escape a string
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
