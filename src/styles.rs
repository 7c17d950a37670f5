//! Inline style sheets that mimic each platform's native typography when pasted.

use crate::types::Platform;

/// Monospaced block used for non-diagram code fences on every platform.
pub const CODE_BLOCK_STYLE: &str = "background-color: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; margin: 24px 0; overflow-x: auto; font-family: 'D2Coding', 'Consolas', monospace; font-size: 14px; line-height: 1.6; color: #1e293b; white-space: pre;";

/// Visible placeholder shown when a diagram cannot be rendered.
pub const DIAGRAM_ERROR_STYLE: &str = "border: 2px solid #fca5a5; background-color: #fef2f2; color: #b91c1c; border-radius: 8px; padding: 16px; margin: 24px 0; font-size: 14px;";

/// Wrapper around a rendered diagram image.
pub const DIAGRAM_FIGURE_STYLE: &str = "text-align: center; margin: 30px 0;";

/// Rule drawn under the title on every platform except Medium.
pub const TITLE_RULE_STYLE: &str = "border: 0; border-top: 1px solid #eee; margin: 30px 0;";

/// Table styles shared by every platform.
pub const TABLE_STYLES: TableStyles = TableStyles {
    table: "border-collapse: collapse; width: 100%; margin: 30px 0; font-size: 15px; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.1);",
    td: "border-bottom: 1px solid #f1f5f9; padding: 14px; color: #334155; line-height: 1.6;",
    th: "background-color: #f1f5f9; border-bottom: 2px solid #e2e8f0; padding: 14px; font-weight: bold; text-align: left; color: #1e293b; text-transform: uppercase; font-size: 14px;",
};

/// Medium: serif body with sans-serif section headings.
static MEDIUM: PlatformStyleSheet = PlatformStyleSheet {
    blockquote: "border-left: 3px solid #242424; padding-left: 20px; font-style: italic; font-size: 24px;",
    bold: "font-weight: 700;",
    container: "font-family: 'Times New Roman', serif; color: #242424;",
    h1: "font-size: 42px; font-weight: 400; margin-bottom: 10px; color: #242424;",
    h2: "font-family: sans-serif; font-size: 24px; font-weight: 700; margin-top: 40px; margin-bottom: 14px; color: #242424;",
    h3: "font-family: sans-serif; font-size: 20px; font-weight: 700; margin-top: 30px; margin-bottom: 10px; color: #242424;",
    image: "max-width: 100%; height: auto; display: block; margin: 32px auto;",
    link: "color: #1a8917; text-decoration: underline;",
    paragraph: "font-size: 20px; line-height: 1.58; color: #242424; margin-bottom: 24px;",
};

/// Naver Blog: green accents and highlighter-style bold.
static NAVER: PlatformStyleSheet = PlatformStyleSheet {
    blockquote: "background-color: #f8fafc; border-left: 4px solid #03C75A; padding: 24px; margin: 30px 0; font-style: italic; color: #475569; font-family: \"Noto Serif KR\", serif; font-size: 18px;",
    bold: "background-color: #fef9c3; padding: 0 4px; border-radius: 2px; color: #000;",
    container: "font-family: 'Pretendard', 'Malgun Gothic', sans-serif; color: #374151;",
    h1: "font-size: 34px; font-weight: 800; margin-bottom: 30px; color: #111; letter-spacing: -0.02em;",
    h2: "font-size: 26px; font-weight: bold; margin-top: 40px; margin-bottom: 20px; padding-bottom: 12px; border-bottom: 2px solid #f1f5f9; color: #111;",
    h3: "font-size: 20px; font-weight: bold; margin-top: 30px; margin-bottom: 15px; color: #333; border-left: 4px solid #03C75A; padding-left: 12px;",
    image: "max-width: 100%; height: auto; display: block; margin: 30px auto; border-radius: 8px;",
    link: "color: #03C75A; text-decoration: underline; font-weight: bold;",
    paragraph: "font-size: 17px; line-height: 1.8; color: #374151; margin-bottom: 20px;",
};

/// Substack: compact sans-serif with orange accents.
static SUBSTACK: PlatformStyleSheet = PlatformStyleSheet {
    blockquote: "padding-left: 16px; border-left: 3px solid #FF6719; font-style: italic;",
    bold: "font-weight: bold;",
    container: "font-family: sans-serif; color: #363636;",
    h1: "font-size: 28px; font-weight: 800; margin-bottom: 16px; color: #1a1a1a;",
    h2: "font-size: 20px; font-weight: 700; margin-top: 24px; margin-bottom: 12px; color: #1a1a1a;",
    h3: "font-size: 18px; font-weight: 600; margin-top: 20px; margin-bottom: 8px;",
    image: "max-width: 100%; height: auto; display: block; margin: 20px auto;",
    link: "color: #FF6719; text-decoration: underline;",
    paragraph: "font-size: 17px; line-height: 1.6; color: #363636; margin-bottom: 16px;",
};

/// Tistory: orange headings.
static TISTORY: PlatformStyleSheet = PlatformStyleSheet {
    blockquote: "border-left: 4px solid #F44F05; padding-left: 18px; margin: 24px 0; color: #666; font-style: italic;",
    bold: "font-weight: bold; color: #000;",
    container: "font-family: 'Pretendard', sans-serif; color: #333;",
    h1: "font-size: 32px; font-weight: bold; margin-bottom: 24px; color: #222;",
    h2: "font-size: 24px; font-weight: bold; margin-top: 40px; margin-bottom: 16px; color: #F44F05;",
    h3: "font-size: 19px; font-weight: bold; margin-top: 24px; margin-bottom: 12px; color: #333;",
    image: "max-width: 100%; height: auto; display: block; margin: 24px auto;",
    link: "color: #F44F05; text-decoration: underline;",
    paragraph: "font-size: 17px; line-height: 1.75; color: #444; margin-bottom: 18px;",
};

/// WordPress: the active theme styles everything.
static WORDPRESS: PlatformStyleSheet = PlatformStyleSheet {
    blockquote: "",
    bold: "",
    container: "",
    h1: "",
    h2: "",
    h3: "",
    image: "",
    link: "",
    paragraph: "",
};

/// Literal inline-style strings for each semantic role on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformStyleSheet {
    /// `<blockquote>`.
    pub blockquote: &'static str,
    /// `<strong>`.
    pub bold: &'static str,
    /// Outer `<div>` wrapping the export.
    pub container: &'static str,
    /// Title and `#` headings.
    pub h1: &'static str,
    /// `##` headings.
    pub h2: &'static str,
    /// `###` headings.
    pub h3: &'static str,
    /// Header and inline images.
    pub image: &'static str,
    /// `<a>`.
    pub link: &'static str,
    /// Body text.
    pub paragraph: &'static str,
}

/// Styles for the shared `<table>` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyles {
    /// `<table>`.
    pub table: &'static str,
    /// Body cells.
    pub td: &'static str,
    /// Header cells.
    pub th: &'static str,
}

impl PlatformStyleSheet {
    /// Style for a heading level. Levels outside 1..=3 use the h3 style.
    pub const fn heading(&self, level: u8) -> &'static str {
        return match level {
            1 => self.h1,
            2 => self.h2,
            _ => self.h3,
        };
    }
}

/// Format a `style` attribute, or nothing when the style is empty. Double
/// quotes inside the style (font names) are entity-escaped so the attribute
/// stays intact.
pub fn style_attr(style: &str) -> String {
    if style.is_empty() {
        return String::new();
    }
    return format!(" style=\"{}\"", style.replace('"', "&quot;"));
}

/// The style sheet for a platform.
pub fn style_sheet(platform: Platform) -> &'static PlatformStyleSheet {
    return match platform {
        Platform::Medium => &MEDIUM,
        Platform::Naver => &NAVER,
        Platform::Substack => &SUBSTACK,
        Platform::Tistory => &TISTORY,
        Platform::Wordpress => &WORDPRESS,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_headings_are_sans_serif_and_distinct_from_naver() {
        let medium = style_sheet(Platform::Medium);
        let naver = style_sheet(Platform::Naver);
        assert!(medium.h2.contains("sans-serif"));
        assert_ne!(medium.h2, naver.h2);
        assert_ne!(medium.bold, naver.bold);
    }

    #[test]
    fn wordpress_emits_no_style_attributes() {
        let wp = style_sheet(Platform::Wordpress);
        assert_eq!(style_attr(wp.paragraph), "");
        assert_eq!(style_attr(wp.h1), "");
    }

    #[test]
    fn quoted_font_names_keep_the_attribute_closed() {
        let naver = style_sheet(Platform::Naver);
        let attr = style_attr(naver.blockquote);
        assert!(attr.contains("font-family: &quot;Noto Serif KR&quot;, serif; font-size: 18px;\""));
        assert_eq!(attr.matches('"').count(), 2);
    }

    #[test]
    fn heading_level_falls_back_to_h3() {
        let naver = style_sheet(Platform::Naver);
        assert_eq!(naver.heading(1), naver.h1);
        assert_eq!(naver.heading(6), naver.h3);
    }
}
