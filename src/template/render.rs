//! Parsing tokens into a node tree and rendering it

use lazy_static::lazy_static;
use regex::Regex;

use super::lexer::{tokenize, Token};
use super::value::{Context, Value};
use super::{escape_html, TemplateError};

lazy_static! {
    static ref FOR_TAG: Regex = Regex::new(r"(?s)^for\s+(\w+)\s+in\s+(.+)$").unwrap();
}

/// Parsed template node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text
    Text(String),
    /// Interpolated path
    Expr { path: String, safe: bool },
    /// `{% for var in source %}body{% endfor %}`
    Loop {
        var: String,
        source: String,
        body: Vec<Node>,
    },
}

/// A loop that has been opened but not yet closed while parsing
struct OpenLoop {
    var: String,
    source: String,
    line: usize,
    body: Vec<Node>,
}

enum Statement {
    For { var: String, source: String },
    EndFor,
}

/// A parsed template, ready to render any number of times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source.
    ///
    /// Fails on structural defects only: an unclosed `for`, a stray
    /// `endfor`, a `for` that does not read `for <name> in <path>`, or any
    /// other tag.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<OpenLoop> = Vec::new();

        for token in tokenize(source) {
            let node = match token {
                Token::Literal(text) => Node::Text(text),
                Token::Expression { path, safe } => Node::Expr { path, safe },
                Token::Tag { stmt, line } => match parse_statement(&stmt, line)? {
                    Statement::For { var, source } => {
                        stack.push(OpenLoop {
                            var,
                            source,
                            line,
                            body: Vec::new(),
                        });
                        continue;
                    }
                    Statement::EndFor => {
                        let open = stack
                            .pop()
                            .ok_or(TemplateError::UnexpectedEndfor { line })?;
                        Node::Loop {
                            var: open.var,
                            source: open.source,
                            body: open.body,
                        }
                    }
                },
            };

            match stack.last_mut() {
                Some(open) => open.body.push(node),
                None => root.push(node),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(TemplateError::UnclosedLoop {
                var: open.var,
                line: open.line,
            });
        }

        Ok(Self { nodes: root })
    }

    /// Render with HTML escaping of interpolated values (`|safe` opts out)
    pub fn render(&self, context: &Context) -> String {
        self.render_with(context, true)
    }

    /// Render, choosing whether non-`safe` interpolations are escaped
    pub fn render_with(&self, context: &Context, autoescape: bool) -> String {
        let mut output = String::new();
        render_nodes(&self.nodes, &Scope::Root(context), autoescape, &mut output);
        output
    }
}

fn parse_statement(stmt: &str, line: usize) -> Result<Statement, TemplateError> {
    let keyword = stmt.split_whitespace().next().unwrap_or("");
    match keyword {
        "for" => {
            let caps = FOR_TAG
                .captures(stmt)
                .ok_or_else(|| TemplateError::MalformedTag {
                    tag: stmt.to_string(),
                    line,
                })?;
            Ok(Statement::For {
                var: caps[1].to_string(),
                source: caps[2].trim().to_string(),
            })
        }
        "endfor" if stmt == "endfor" => Ok(Statement::EndFor),
        "endfor" => Err(TemplateError::MalformedTag {
            tag: stmt.to_string(),
            line,
        }),
        _ => Err(TemplateError::UnknownTag {
            tag: stmt.to_string(),
            line,
        }),
    }
}

/// Name resolution for one render.
///
/// Each loop iteration pushes a frame holding its single binding; frames
/// live on the call stack and only borrow the context, so the caller's
/// data is never copied or modified.
enum Scope<'a> {
    Root(&'a Context),
    Frame {
        name: &'a str,
        value: &'a Value,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    fn bind<'b>(&'b self, name: &'b str, value: &'b Value) -> Scope<'b> {
        Scope::Frame {
            name,
            value,
            parent: self,
        }
    }

    fn resolve_root(&self, root: &str) -> Option<&'a Value> {
        match *self {
            Scope::Root(context) => context.get(root),
            Scope::Frame {
                name,
                value,
                parent,
            } => {
                if name == root {
                    Some(value)
                } else {
                    parent.resolve_root(root)
                }
            }
        }
    }

    /// Resolve a dotted path; `None` as soon as a segment is missing
    fn lookup(&self, path: &str) -> Option<&'a Value> {
        let mut parts = path.split('.');
        let mut current = self.resolve_root(parts.next()?)?;
        for part in parts {
            current = current.get_property(part)?;
        }
        Some(current)
    }
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, autoescape: bool, output: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Expr { path, safe } => {
                let value = scope
                    .lookup(path)
                    .map(Value::to_output_string)
                    .unwrap_or_default();
                if autoescape && !safe {
                    output.push_str(&escape_html(&value));
                } else {
                    output.push_str(&value);
                }
            }
            Node::Loop { var, source, body } => {
                let Some(items) = scope.lookup(source).and_then(Value::as_array) else {
                    tracing::trace!("Loop source {} is not a sequence, skipping", source);
                    continue;
                };
                for item in items {
                    let frame = scope.bind(var, item);
                    render_nodes(body, &frame, autoescape, output);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: serde_json::Value) -> Context {
        let mut ctx = Context::new();
        if let serde_json::Value::Object(map) = value {
            for (k, v) in map {
                ctx.set(&k, Value::from_json(&v));
            }
        }
        ctx
    }

    fn render(source: &str, ctx: &Context) -> String {
        Template::parse(source).unwrap().render(ctx)
    }

    #[test]
    fn test_render_literal_only() {
        let src = "<html>\n  <body></body>\n</html>\n";
        assert_eq!(render(src, &Context::new()), src);
    }

    #[test]
    fn test_dotted_lookup() {
        let ctx = context(json!({ "site": { "meta": { "name": "Shop" } } }));
        assert_eq!(render("{{ site.meta.name }}", &ctx), "Shop");
        assert_eq!(render("{{ site.meta.missing }}", &ctx), "");
        assert_eq!(render("{{ site.meta.name.deeper }}", &ctx), "");
        assert_eq!(render("{{ }}", &ctx), "");
    }

    #[test]
    fn test_number_interpolation() {
        let ctx = Context::new().with("year", 2024);
        assert_eq!(render("(c) {{ year }}", &ctx), "(c) 2024");
    }

    #[test]
    fn test_container_interpolates_empty() {
        let ctx = context(json!({ "tags": ["a", "b"], "site": { "name": "x" } }));
        assert_eq!(render("[{{ tags }}][{{ site }}]", &ctx), "[][]");
    }

    #[test]
    fn test_autoescape_and_safe() {
        let ctx = Context::new().with("body", "<p>Hi & bye</p>");
        assert_eq!(render("{{ body }}", &ctx), "&lt;p&gt;Hi &amp; bye&lt;/p&gt;");
        assert_eq!(render("{{ body|safe }}", &ctx), "<p>Hi & bye</p>");

        let template = Template::parse("{{ body }}").unwrap();
        assert_eq!(template.render_with(&ctx, false), "<p>Hi & bye</p>");
    }

    #[test]
    fn test_literal_text_is_not_escaped() {
        let ctx = Context::new();
        assert_eq!(render("<b>&amp;</b>", &ctx), "<b>&amp;</b>");
    }

    #[test]
    fn test_nested_loops_see_outer_binding() {
        let ctx = context(json!({
            "groups": [
                { "name": "g1", "items": ["a", "b"] },
                { "name": "g2", "items": ["c"] }
            ]
        }));
        let out = render(
            "{% for g in groups %}<{% for i in g.items %}{{ g.name }}:{{ i }};{% endfor %}>{% endfor %}",
            &ctx,
        );
        assert_eq!(out, "<g1:a;g1:b;><g2:c;>");
    }

    #[test]
    fn test_loop_binding_shadows_and_does_not_leak() {
        let ctx = context(json!({ "x": "outer", "xs": ["1", "2"] }));
        let out = render("{{ x }}|{% for x in xs %}{{ x }},{% endfor %}|{{ x }}", &ctx);
        assert_eq!(out, "outer|1,2,|outer");
        assert_eq!(ctx.get("x"), Some(&Value::String("outer".to_string())));
    }

    #[test]
    fn test_sibling_loops_are_independent() {
        let ctx = context(json!({ "a": ["1", "2"], "b": ["3"] }));
        let out = render(
            "{% for v in a %}{{ v }}{% endfor %}-{% for w in b %}{{ v }}{{ w }}{% endfor %}",
            &ctx,
        );
        assert_eq!(out, "12-3");
    }

    #[test]
    fn test_empty_and_non_sequence_sources() {
        let ctx = context(json!({
            "empty": [],
            "scalar": "abc",
            "object": { "k": "v" }
        }));
        for source in ["empty", "scalar", "object", "missing", "missing.deep"] {
            let out = render(&format!("[{{% for i in {} %}}x{{% endfor %}}]", source), &ctx);
            assert_eq!(out, "[]", "source {}", source);
        }
    }

    #[test]
    fn test_loop_over_scalars_preserves_order() {
        let ctx = context(json!({ "urls": ["https://a/", "https://a/b.html"] }));
        let out = render(
            "{% for u in urls %}\n<url><loc>{{ u }}</loc></url>{% endfor %}\n",
            &ctx,
        );
        assert_eq!(
            out,
            "\n<url><loc>https://a/</loc></url>\n<url><loc>https://a/b.html</loc></url>\n"
        );
    }

    #[test]
    fn test_parse_builds_tree() {
        let template = Template::parse("a{% for x in xs %}{% for y in x.ys %}{{ y }}{% endfor %}{% endfor %}").unwrap();
        assert_eq!(template.nodes.len(), 2);
        match &template.nodes[1] {
            Node::Loop { var, source, body } => {
                assert_eq!(var, "x");
                assert_eq!(source, "xs");
                assert!(matches!(&body[0], Node::Loop { var, .. } if var == "y"));
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_loop() {
        let err = Template::parse("{% for x in xs %}\n{% for y in x %}{% endfor %}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnclosedLoop {
                var: "x".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_stray_endfor() {
        let err = Template::parse("a\nb{% endfor %}").unwrap_err();
        assert_eq!(err, TemplateError::UnexpectedEndfor { line: 2 });
    }

    #[test]
    fn test_malformed_and_unknown_tags() {
        assert!(matches!(
            Template::parse("{% for x %}{% endfor %}"),
            Err(TemplateError::MalformedTag { .. })
        ));
        assert!(matches!(
            Template::parse("{% for x in %}{% endfor %}"),
            Err(TemplateError::MalformedTag { .. })
        ));
        assert!(matches!(
            Template::parse("{% endfor now %}"),
            Err(TemplateError::MalformedTag { .. })
        ));
        assert!(matches!(
            Template::parse("{% if x %}"),
            Err(TemplateError::UnknownTag { .. })
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let ctx = context(json!({ "posts": [{ "title": "A" }, { "title": "B" }] }));
        let template = Template::parse("{% for p in posts %}{{ p.title }}{% endfor %}").unwrap();
        let first = template.render(&ctx);
        for _ in 0..5 {
            assert_eq!(template.render(&ctx), first);
        }
    }
}
