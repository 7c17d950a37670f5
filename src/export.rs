//! Platform HTML export pipeline.
//!
//! Three phases: split the document into text and fenced-code segments,
//! resolve every fence to an HTML fragment in source order, then run the
//! substitution rules over the text segments and stitch everything back
//! together by position. Fenced code never passes through a markdown rule.

use serde::Serialize;

use crate::blocks::parse_blocks;
use crate::diagram::{DiagramRenderer, Rasterizer, data_uri};
use crate::rules;
use crate::styles::{CODE_BLOCK_STYLE, DIAGRAM_ERROR_STYLE, DIAGRAM_FIGURE_STYLE, PlatformStyleSheet, style_attr, style_sheet};
use crate::types::{BlockNode, Platform};

/// Pixel density for rasterized diagrams; 2x keeps pasted images sharp.
pub const RASTER_SCALE: u32 = 2;

/// HTML for the rich-text clipboard slot plus the raw markdown fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipboardPayload {
    /// Inline-styled HTML for `text/html`.
    pub html: String,
    /// Target platform.
    pub platform: Platform,
    /// Original markdown for `text/plain`.
    pub plain_text: String,
}

/// The external programs an export may call.
pub struct Collaborators<'a> {
    /// Diagram source to SVG.
    pub diagrams: &'a dyn DiagramRenderer,
    /// SVG to PNG.
    pub rasterizer: &'a dyn Rasterizer,
}

/// Per-export switches.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Image URL or data URI placed above the body.
    pub header_image_url: Option<String>,
    /// Whether to place the header image at all.
    pub include_header_image: bool,
}

/// A fenced code block lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    /// True for a `mermaid` fence.
    pub is_diagram: bool,
    /// Info string, empty when absent.
    pub language: String,
    /// Code between the fences.
    pub raw: String,
}

/// One piece of the document in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fenced code, resolved separately.
    Fence(Fence),
    /// Markdown text, including the newlines that separate it from fences.
    Text(String),
}

/// Monospaced `<pre><code>` block with escaped content.
fn code_block_html(fence: &Fence) -> String {
    let class = if fence.language.is_empty() {
        String::new()
    } else {
        format!(" class=\"language-{}\"", rules::escape_html(&fence.language))
    };
    return format!(
        "<pre{}><code{class}>{}</code></pre>",
        style_attr(CODE_BLOCK_STYLE),
        rules::escape_html(&fence.raw)
    );
}

/// Visible error block shown in place of a diagram that failed to render.
/// The diagram source stays readable below the message.
fn diagram_error_html(fence: &Fence, reason: &str) -> String {
    return format!(
        "<div{}><strong>Diagram could not be rendered</strong><p>{}</p><pre{}><code>{}</code></pre></div>",
        style_attr(DIAGRAM_ERROR_STYLE),
        rules::escape_html(reason),
        style_attr(CODE_BLOCK_STYLE),
        rules::escape_html(&fence.raw)
    );
}

/// Render a diagram and embed it as an image. Rasterizing falls back to an
/// SVG data URI; a render failure becomes a visible error block.
async fn diagram_html(fence: &Fence, sheet: &PlatformStyleSheet, collaborators: &Collaborators<'_>) -> String {
    let svg = match collaborators.diagrams.render(&fence.raw).await {
        Err(e) => {
            tracing::warn!(error = %e, "diagram render failed, exporting error block");
            return diagram_error_html(fence, &e.to_string());
        },
        Ok(svg) => svg,
    };

    let src = match collaborators.rasterizer.rasterize(&svg, RASTER_SCALE).await {
        Err(e) => {
            tracing::warn!(error = %e, "rasterize failed, embedding svg");
            data_uri("image/svg+xml", svg.as_bytes())
        },
        Ok(png) => data_uri("image/png", &png),
    };

    return format!(
        "<div{}><img src=\"{src}\" alt=\"diagram\"{} /></div>",
        style_attr(DIAGRAM_FIGURE_STYLE),
        style_attr(sheet.image)
    );
}

/// Run the text rules in their fixed order.
fn render_text_segment(text: &str, sheet: &PlatformStyleSheet) -> String {
    let html = rules::replace_images(text, sheet);
    let html = rules::replace_tables(&html);
    let html = rules::replace_headings(&html, sheet);
    let html = rules::replace_bold(&html, sheet);
    let html = rules::replace_blockquotes(&html, sheet);
    let html = rules::replace_list_items(&html, sheet);
    let html = rules::replace_links(&html, sheet);
    return rules::replace_newlines(&html);
}

/// Render markdown as inline-styled HTML for `platform`.
///
/// Diagram fences are resolved one at a time in source order and the future
/// completes only after each has become an image or an error block. Apart
/// from the collaborators the output depends only on the arguments.
pub async fn render_html(
    markdown: &str,
    title: &str,
    platform: Platform,
    options: &ExportOptions,
    collaborators: &Collaborators<'_>,
) -> String {
    let sheet = style_sheet(platform);
    // line-anchored rules and the table pattern expect `\n` endings
    let markdown = markdown.replace("\r\n", "\n");
    let segments = split_fences(&markdown);
    tracing::debug!(platform = platform.slug(), segments = segments.len(), "rendering export");

    let mut fragments: Vec<String> = Vec::with_capacity(segments.len());
    for segment in &segments {
        if let Segment::Fence(fence) = segment {
            fragments.push(resolve_fence(fence, sheet, collaborators).await);
        } else {
            fragments.push(String::new());
        }
    }

    let mut body = String::new();
    if options.include_header_image
        && let Some(url) = options.header_image_url.as_deref().filter(|u| return !u.is_empty())
    {
        body.push_str(&rules::header_image(url, sheet));
    }

    for (segment, fragment) in segments.iter().zip(fragments) {
        match segment {
            Segment::Fence(_) => body.push_str(&fragment),
            Segment::Text(text) => body.push_str(&render_text_segment(text, sheet)),
        }
    }

    return rules::wrap_container(&body, title, platform, sheet);
}

/// Render and pair the HTML with the markdown as plain-text fallback.
pub async fn render_clipboard(
    markdown: &str,
    title: &str,
    platform: Platform,
    options: &ExportOptions,
    collaborators: &Collaborators<'_>,
) -> ClipboardPayload {
    let html = render_html(markdown, title, platform, options, collaborators).await;
    return ClipboardPayload { html, platform, plain_text: markdown.to_string() };
}

/// Turn one fence into its HTML fragment.
async fn resolve_fence(fence: &Fence, sheet: &PlatformStyleSheet, collaborators: &Collaborators<'_>) -> String {
    if fence.is_diagram {
        return diagram_html(fence, sheet, collaborators).await;
    }
    return code_block_html(fence);
}

/// Split markdown into text and fenced-code segments using the block parser's
/// fence detection. Newlines between a fence and its neighbours stay in the
/// text segments so they still become `<br />`.
pub fn split_fences(markdown: &str) -> Vec<Segment> {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut segments = Vec::new();
    let mut buffer = String::new();

    for block in parse_blocks(markdown) {
        if block.lines.start > 0 {
            buffer.push('\n');
        }
        if let BlockNode::CodeBlock { is_diagram, language, raw } = block.node {
            if !buffer.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut buffer)));
            }
            segments.push(Segment::Fence(Fence { is_diagram, language, raw }));
        } else {
            let text = lines.get(block.lines).unwrap_or_default().join("\n");
            buffer.push_str(&text);
        }
    }

    if !buffer.is_empty() {
        segments.push(Segment::Text(buffer));
    }
    return segments;
}
