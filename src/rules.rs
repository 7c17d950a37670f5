//! Markdown-to-HTML substitution rules for platform export.
//!
//! Each rule is a pure function over a text segment that contains no fenced
//! code. The export pipeline applies them in a fixed order: images, tables,
//! headings, bold, blockquotes, list items, links, newlines. Images must run
//! before links so the link pattern never sees `![alt](url)`.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::blocks::split_table_cells;
use crate::styles::{PlatformStyleSheet, TABLE_STYLES, TITLE_RULE_STYLE, style_attr};
use crate::types::Platform;

/// `> quote` at line start.
static BLOCKQUOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"(?m)^> (.*)$").expect("valid regex"));

/// `**bold**`, non-greedy.
static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// `#`, `##`, `###` headings, longest marker first.
static HEADING_PATTERNS: LazyLock<[(u8, Regex); 3]> = LazyLock::new(|| {
    return [
        (3, Regex::new(r"(?m)^### (.*)$").expect("valid regex")),
        (2, Regex::new(r"(?m)^## (.*)$").expect("valid regex")),
        (1, Regex::new(r"(?m)^# (.*)$").expect("valid regex")),
    ];
});

/// `![alt](url)`; alt may be empty.
static IMAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));

/// `[label](url)`.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));

/// `- item` or `* item` at line start.
static LIST_ITEM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"(?m)^[-*] (.*)$").expect("valid regex"));

/// Header row, separator row, then one or more body rows.
static TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"\|(.+)\|\n\|([-:| ]+)\|\n((?:\|.*\|\n?)+)").expect("valid regex");
});

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    return out;
}

/// `<img>` tag for the header image, styled per platform.
pub fn header_image(url: &str, sheet: &PlatformStyleSheet) -> String {
    return format!(
        "<img src=\"{}\" alt=\"header image\"{} />",
        escape_html(url),
        style_attr(sheet.image)
    );
}

/// `> text` lines to `<blockquote>`.
pub fn replace_blockquotes(text: &str, sheet: &PlatformStyleSheet) -> String {
    let replacement = format!("<blockquote{}>${{1}}</blockquote>", style_attr(sheet.blockquote));
    return BLOCKQUOTE_PATTERN.replace_all(text, replacement.as_str()).into_owned();
}

/// `**text**` to `<strong>`.
pub fn replace_bold(text: &str, sheet: &PlatformStyleSheet) -> String {
    let replacement = format!("<strong{}>${{1}}</strong>", style_attr(sheet.bold));
    return BOLD_PATTERN.replace_all(text, replacement.as_str()).into_owned();
}

/// `###`, `##`, `#` lines to `<h3>`, `<h2>`, `<h1>`.
pub fn replace_headings(text: &str, sheet: &PlatformStyleSheet) -> String {
    let mut out = text.to_string();
    for (level, pattern) in HEADING_PATTERNS.iter() {
        let replacement = format!("<h{level}{}>${{1}}</h{level}>", style_attr(sheet.heading(*level)));
        out = pattern.replace_all(&out, replacement.as_str()).into_owned();
    }
    return out;
}

/// `![alt](url)` to `<img>`, with `alt` and `src` escaped for their attributes.
pub fn replace_images(text: &str, sheet: &PlatformStyleSheet) -> String {
    let style = style_attr(sheet.image);
    return IMAGE_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let alt = caps.get(1).map_or("", |m| return m.as_str());
            let src = caps.get(2).map_or("", |m| return m.as_str());
            return format!("<img src=\"{}\" alt=\"{}\"{style} />", escape_html(src), escape_html(alt));
        })
        .into_owned();
}

/// `[label](url)` to `<a target="_blank">`.
pub fn replace_links(text: &str, sheet: &PlatformStyleSheet) -> String {
    let replacement = format!("<a href=\"${{2}}\" target=\"_blank\"{}>${{1}}</a>", style_attr(sheet.link));
    return LINK_PATTERN.replace_all(text, replacement.as_str()).into_owned();
}

/// `- item` / `* item` lines to `<li>`.
pub fn replace_list_items(text: &str, sheet: &PlatformStyleSheet) -> String {
    let replacement = format!("<li{}>${{1}}</li>", style_attr(sheet.paragraph));
    return LIST_ITEM_PATTERN.replace_all(text, replacement.as_str()).into_owned();
}

/// Remaining newlines to `<br />`.
pub fn replace_newlines(text: &str) -> String {
    return text.replace('\n', "<br />");
}

/// Well-formed markdown tables to `<table>` with the shared table styles.
/// A table consumes the newline after its last row, so no `<br />` follows it.
pub fn replace_tables(text: &str) -> String {
    return TABLE_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let header = caps.get(1).map_or("", |m| return m.as_str());
            let body = caps.get(3).map_or("", |m| return m.as_str());
            return table_html(header, body);
        })
        .into_owned();
}

/// Render one table from its header capture and body rows.
fn table_html(header: &str, body: &str) -> String {
    let headers = split_table_cells(&format!("|{header}|"));
    let mut html = format!("<table{}><thead><tr>", style_attr(TABLE_STYLES.table));
    for cell in &headers {
        let _ = write!(html, "<th{}>{cell}</th>", style_attr(TABLE_STYLES.th));
    }
    html.push_str("</tr></thead><tbody>");

    for row in body.trim().split('\n') {
        html.push_str("<tr>");
        for cell in split_table_cells(row) {
            let _ = write!(html, "<td{}>{cell}</td>", style_attr(TABLE_STYLES.td));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    return html;
}

/// Wrap the body in the platform container with the title as `<h1>`.
/// Every platform except Medium draws a rule under the title.
pub fn wrap_container(body: &str, title: &str, platform: Platform, sheet: &PlatformStyleSheet) -> String {
    let title_html = format!("<h1{}>{}</h1>", style_attr(sheet.h1), escape_html(title));
    let rule = if platform == Platform::Medium {
        String::new()
    } else {
        format!("<hr{} />", style_attr(TITLE_RULE_STYLE))
    };
    return format!("<div{}>{title_html}{rule}{body}</div>", style_attr(sheet.container));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::style_sheet;

    #[test]
    fn headings_use_platform_styles() {
        let sheet = style_sheet(Platform::Naver);
        let html = replace_headings("# A\n## B\n### C\n#### D", sheet);
        assert!(html.contains(&format!("<h1 style=\"{}\">A</h1>", sheet.h1)));
        assert!(html.contains(&format!("<h2 style=\"{}\">B</h2>", sheet.h2)));
        assert!(html.contains(&format!("<h3 style=\"{}\">C</h3>", sheet.h3)));
        assert!(html.ends_with("#### D"));
    }

    #[test]
    fn images_are_replaced_before_links_can_match() {
        let sheet = style_sheet(Platform::Tistory);
        let html = replace_links(&replace_images("![cat](c.png) [home](/)", sheet), sheet);
        assert!(html.starts_with("<img src=\"c.png\" alt=\"cat\""));
        assert!(html.contains("<a href=\"/\" target=\"_blank\""));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn image_attributes_are_escaped() {
        let sheet = style_sheet(Platform::Wordpress);
        let html = replace_images("![say \"hi\"](a.png?x=1&y=2)", sheet);
        assert_eq!(html, "<img src=\"a.png?x=1&amp;y=2\" alt=\"say &quot;hi&quot;\" />");
    }

    #[test]
    fn bold_inside_link_label_nests() {
        let sheet = style_sheet(Platform::Wordpress);
        let html = replace_links(&replace_bold("[**bold link**](http://x)", sheet), sheet);
        assert_eq!(html, "<a href=\"http://x\" target=\"_blank\"><strong>bold link</strong></a>");
    }

    #[test]
    fn table_becomes_html_and_eats_trailing_newline() {
        let html = replace_tables("| A | B |\n|---|:-:|\n| 1 | 2 |\n| 3 | 4 |\nafter");
        assert!(html.starts_with("<table"));
        assert!(html.contains("<th style=\""));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains(">4</td>"));
        assert!(html.ends_with("</table>after"));
    }

    #[test]
    fn table_without_separator_is_left_alone() {
        let text = "| A | B |\n| 1 | 2 |\n";
        assert_eq!(replace_tables(text), text);
    }

    #[test]
    fn list_items_and_quotes_only_at_line_start() {
        let sheet = style_sheet(Platform::Wordpress);
        let html = replace_blockquotes(&replace_list_items("- one\n* two\nnot - three\n> said", sheet), sheet);
        assert_eq!(html, "<li>one</li>\n<li>two</li>\nnot - three\n<blockquote>said</blockquote>");
    }

    #[test]
    fn medium_has_no_rule_under_title() {
        let medium = wrap_container("x", "T", Platform::Medium, style_sheet(Platform::Medium));
        let naver = wrap_container("x", "T", Platform::Naver, style_sheet(Platform::Naver));
        assert!(!medium.contains("<hr"));
        assert!(naver.contains("<hr"));
    }

    #[test]
    fn title_is_escaped() {
        let html = wrap_container("", "A & <B>", Platform::Wordpress, style_sheet(Platform::Wordpress));
        assert!(html.contains("<h1>A &amp; &lt;B&gt;</h1>"));
    }
}
