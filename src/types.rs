/// Core domain types for the blogport render tree and export targets.
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A parsed block paired with the source lines it was produced from.
/// `lines` is a half-open range of zero-based line indices into the input
/// split on `\n`; consecutive blocks tile the input with no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Source line indices consumed by this block.
    pub lines: Range<usize>,
    /// The semantic node.
    pub node: BlockNode,
}

/// A semantic unit of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockNode {
    /// Vertical spacing marker for a whitespace-only line.
    Blank,
    /// `> ` quoted line.
    BlockQuote {
        /// Tokenized quote text.
        inline: Vec<InlineSpan>,
    },
    /// Fenced code block, including mermaid diagrams.
    CodeBlock {
        /// True for a `mermaid` fence.
        is_diagram: bool,
        /// Info string after the opening fence, empty when absent.
        language: String,
        /// Code between the fences, without the fence lines.
        raw: String,
    },
    /// `#`, `##` or `###` heading.
    Heading {
        /// Tokenized heading text.
        inline: Vec<InlineSpan>,
        /// Heading level, 1 to 3.
        level: u8,
    },
    /// `- ` or `* ` list item.
    ListItem {
        /// Tokenized item text.
        inline: Vec<InlineSpan>,
    },
    /// Any other line.
    Paragraph {
        /// Tokenized paragraph text.
        inline: Vec<InlineSpan>,
    },
    /// Pipe table with at least a header and separator row.
    Table {
        /// Header cells.
        headers: Vec<String>,
        /// Body rows; the separator row is not included.
        rows: Vec<Vec<String>>,
    },
}

/// A styled fragment inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    /// `**text**`, delimiters removed.
    Bold(String),
    /// Explicit `<br>` line break.
    LineBreak,
    /// `[label](url)`. The label keeps its raw markup.
    Link {
        /// Raw label text, possibly containing bold markup.
        label: String,
        /// Link target.
        url: String,
    },
    /// Unstyled text.
    PlainText(String),
}

/// Target blogging platform for styled HTML export.
/// Closed set: an unknown platform cannot exist past argument parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Medium: serif body, sans-serif headings, no rule under the title.
    Medium,
    /// Naver Blog.
    Naver,
    /// Substack.
    Substack,
    /// Tistory.
    Tistory,
    /// WordPress: unstyled, the theme decides.
    Wordpress,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Self; 5] = [Self::Naver, Self::Tistory, Self::Medium, Self::Wordpress, Self::Substack];

    /// Human-readable platform name.
    pub const fn display_name(self) -> &'static str {
        return match self {
            Self::Medium => "Medium",
            Self::Naver => "Naver Blog",
            Self::Substack => "Substack",
            Self::Tistory => "Tistory",
            Self::Wordpress => "WordPress",
        };
    }

    /// Lowercase identifier used on the command line and in file names.
    pub const fn slug(self) -> &'static str {
        return match self {
            Self::Medium => "medium",
            Self::Naver => "naver",
            Self::Substack => "substack",
            Self::Tistory => "tistory",
            Self::Wordpress => "wordpress",
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_slugs_are_unique() {
        let mut slugs: Vec<&str> = Platform::ALL.iter().map(|p| p.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 5);
    }

    #[test]
    fn platform_deserializes_from_lowercase() {
        let parsed: Platform = serde_json::from_str("\"wordpress\"").unwrap();
        assert_eq!(parsed, Platform::Wordpress);
    }
}
