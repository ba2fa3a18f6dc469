//! Minimal Markdown to HTML conversion
//!
//! Recognises `#`/`##` headings, `- ` list items, fenced code blocks and
//! paragraphs, one line at a time. Every piece of source text is escaped.

use crate::template::escape_html;

const FENCE: &str = "```";

/// Block state carried from one line to the next
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LineState {
    in_code: bool,
    in_list: bool,
}

impl LineState {
    fn close_list(&mut self, out: &mut Vec<String>) {
        if self.in_list {
            out.push("</ul>".to_string());
            self.in_list = false;
        }
    }

    fn push_line(&mut self, line: &str, out: &mut Vec<String>) {
        if line.starts_with(FENCE) {
            self.in_code = !self.in_code;
            out.push(if self.in_code { "<pre><code>" } else { "</code></pre>" }.to_string());
            return;
        }
        if self.in_code {
            out.push(escape_html(line));
            return;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            out.push(format!("<h2>{}</h2>", escape_html(heading)));
        } else if let Some(heading) = line.strip_prefix("# ") {
            out.push(format!("<h1>{}</h1>", escape_html(heading)));
        } else if let Some(item) = line.strip_prefix("- ") {
            if !self.in_list {
                out.push("<ul>".to_string());
                self.in_list = true;
            }
            out.push(format!("<li>{}</li>", escape_html(item)));
        } else {
            // Headings and fences above leave an open list alone
            self.close_list(out);
            if line.trim().is_empty() {
                out.push(String::new());
            } else {
                out.push(format!("<p>{}</p>", escape_html(line)));
            }
        }
    }
}

/// Convert a Markdown body to HTML.
///
/// Output has one line per input line, plus one for each list opened or
/// closed. An unterminated fence is left open.
pub fn to_html(markdown: &str) -> String {
    let mut state = LineState::default();
    let mut out = Vec::new();

    for line in markdown.lines() {
        state.push_line(line, &mut out);
    }
    state.close_list(&mut out);

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_list_paragraph() {
        let html = to_html("# Title\n- one\n- two\nplain");
        assert_eq!(
            html,
            "<h1>Title</h1>\n<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>plain</p>"
        );
    }

    #[test]
    fn test_h2_before_h1_prefix() {
        assert_eq!(to_html("## Sub"), "<h2>Sub</h2>");
        assert_eq!(to_html("#NoSpace"), "<p>#NoSpace</p>");
    }

    #[test]
    fn test_blank_lines_kept_as_empty_lines() {
        assert_eq!(to_html("a\n\nb"), "<p>a</p>\n\n<p>b</p>");
        assert_eq!(to_html("a\n   \nb"), "<p>a</p>\n\n<p>b</p>");
    }

    #[test]
    fn test_list_closed_at_end() {
        assert_eq!(to_html("- x"), "<ul>\n<li>x</li>\n</ul>");
    }

    #[test]
    fn test_list_closed_by_blank_line() {
        assert_eq!(
            to_html("- a\n\n- b"),
            "<ul>\n<li>a</li>\n</ul>\n\n<ul>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_heading_keeps_list_open() {
        assert_eq!(
            to_html("- a\n## Next"),
            "<ul>\n<li>a</li>\n<h2>Next</h2>\n</ul>"
        );
        assert_eq!(
            to_html("- a\n# Top\n- b\nend"),
            "<ul>\n<li>a</li>\n<h1>Top</h1>\n<li>b</li>\n</ul>\n<p>end</p>"
        );
    }

    #[test]
    fn test_fence_keeps_list_open() {
        assert_eq!(
            to_html("- a\n```\nx\n```"),
            "<ul>\n<li>a</li>\n<pre><code>\nx\n</code></pre>\n</ul>"
        );
    }

    #[test]
    fn test_list_markers_inside_fence_are_code() {
        assert_eq!(
            to_html("```\n- not a list\n```\n- item"),
            "<pre><code>\n- not a list\n</code></pre>\n<ul>\n<li>item</li>\n</ul>"
        );
    }

    #[test]
    fn test_unclosed_fence_is_tolerated() {
        assert_eq!(to_html("```\ncode"), "<pre><code>\ncode");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            to_html("# <script>\n- a & b\n\"quoted\" <i>"),
            "<h1>&lt;script&gt;</h1>\n<ul>\n<li>a &amp; b</li>\n</ul>\n<p>&quot;quoted&quot; &lt;i&gt;</p>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(to_html("# T\r\nbody\r\n"), "<h1>T</h1>\n<p>body</p>");
    }
}
