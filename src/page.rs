//! Static exports built from the render tree: a standalone HTML page, a
//! Markdown file with the title on top, and plain text.

use std::fmt::Write as _;

use crate::inline::{label_spans, plain_text as spans_text};
use crate::rules::escape_html;
use crate::types::{Block, BlockNode, InlineSpan};

/// Page-level stylesheet for the standalone document.
const PAGE_STYLE: &str = "body { max-width: 760px; margin: 40px auto; padding: 0 20px; font-family: sans-serif; line-height: 1.7; color: #1f2937; } \
pre { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; overflow-x: auto; } \
table { border-collapse: collapse; width: 100%; } th, td { border-bottom: 1px solid #e2e8f0; padding: 10px; text-align: left; } \
blockquote { border-left: 4px solid #cbd5e1; margin: 24px 0; padding-left: 16px; color: #475569; }";

/// Escaped HTML for a run of inline spans.
fn inline_html(spans: &[InlineSpan]) -> String {
    let mut html = String::new();
    for span in spans {
        match span {
            InlineSpan::Bold(text) => {
                let _ = write!(html, "<strong>{}</strong>", escape_html(text));
            },
            InlineSpan::LineBreak => html.push_str("<br />"),
            InlineSpan::Link { label, url } => {
                let _ = write!(html, "<a href=\"{}\">{}</a>", escape_html(url), inline_html(&label_spans(label)));
            },
            InlineSpan::PlainText(text) => html.push_str(&escape_html(text)),
        }
    }
    return html;
}

/// `# {title}` followed by the body, as written to a `.md` export.
pub fn markdown_document(title: &str, markdown: &str) -> String {
    return format!("# {title}\n\n{markdown}");
}

/// Text-only rendering of the tree, one line per block. Table cells are
/// separated by tabs.
pub fn plain_text(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match &block.node {
            BlockNode::Blank => lines.push(String::new()),
            BlockNode::BlockQuote { inline }
            | BlockNode::Heading { inline, .. }
            | BlockNode::Paragraph { inline } => lines.push(spans_text(inline)),
            BlockNode::CodeBlock { raw, .. } => lines.push(raw.clone()),
            BlockNode::ListItem { inline } => lines.push(format!("- {}", spans_text(inline))),
            BlockNode::Table { headers, rows } => {
                lines.push(headers.join("\t"));
                lines.extend(rows.iter().map(|row| return row.join("\t")));
            },
        }
    }
    return lines.join("\n");
}

/// Complete HTML document for the post. List items on consecutive lines
/// share one `<ul>`; mermaid fences are emitted as `<pre class="mermaid">`.
pub fn standalone_page(title: &str, blocks: &[Block]) -> String {
    let title = escape_html(title);
    let mut body = String::new();
    let mut in_list = false;

    for block in blocks {
        let is_item = matches!(block.node, BlockNode::ListItem { .. });
        if in_list && !is_item {
            body.push_str("</ul>\n");
            in_list = false;
        }
        if is_item && !in_list {
            body.push_str("<ul>\n");
            in_list = true;
        }
        write_block(&mut body, &block.node);
    }
    if in_list {
        body.push_str("</ul>\n");
    }

    return format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{title}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n<article>\n<h1>{title}</h1>\n{body}</article>\n</body>\n</html>\n"
    );
}

/// Append the HTML for one block.
fn write_block(out: &mut String, node: &BlockNode) {
    match node {
        BlockNode::Blank => {},
        BlockNode::BlockQuote { inline } => {
            let _ = writeln!(out, "<blockquote><p>{}</p></blockquote>", inline_html(inline));
        },
        BlockNode::CodeBlock { is_diagram: true, raw, .. } => {
            let _ = writeln!(out, "<pre class=\"mermaid\">{}</pre>", escape_html(raw));
        },
        BlockNode::CodeBlock { is_diagram: false, language, raw } => {
            if language.is_empty() {
                let _ = writeln!(out, "<pre><code>{}</code></pre>", escape_html(raw));
            } else {
                let _ = writeln!(
                    out,
                    "<pre><code class=\"language-{}\">{}</code></pre>",
                    escape_html(language),
                    escape_html(raw)
                );
            }
        },
        BlockNode::Heading { inline, level } => {
            let _ = writeln!(out, "<h{level}>{}</h{level}>", inline_html(inline));
        },
        BlockNode::ListItem { inline } => {
            let _ = writeln!(out, "<li>{}</li>", inline_html(inline));
        },
        BlockNode::Paragraph { inline } => {
            let _ = writeln!(out, "<p>{}</p>", inline_html(inline));
        },
        BlockNode::Table { headers, rows } => {
            out.push_str("<table>\n<thead><tr>");
            for cell in headers {
                let _ = write!(out, "<th>{}</th>", escape_html(cell));
            }
            out.push_str("</tr></thead>\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape_html(cell));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        },
    }
}
