//! Line-oriented block parser producing the render tree.

use std::ops::Range;

use crate::inline::tokenize_inline;
use crate::types::{Block, BlockNode};

/// Opening and closing marker of a fenced code block.
const FENCE: &str = "```";

/// Info string that marks a fence as a diagram.
const DIAGRAM_LANGUAGE: &str = "mermaid";

/// A table needs a header row and a separator row at minimum.
const MIN_TABLE_ROWS: usize = 2;

/// Classify a single line that is not part of a multi-line construct.
fn classify_single_line(line: &str) -> BlockNode {
    if let Some(text) = line.strip_prefix("### ") {
        return BlockNode::Heading { inline: tokenize_inline(text), level: 3 };
    }
    if let Some(text) = line.strip_prefix("## ") {
        return BlockNode::Heading { inline: tokenize_inline(text), level: 2 };
    }
    if let Some(text) = line.strip_prefix("# ") {
        return BlockNode::Heading { inline: tokenize_inline(text), level: 1 };
    }
    if let Some(text) = line.strip_prefix("- ").or_else(|| return line.strip_prefix("* ")) {
        return BlockNode::ListItem { inline: tokenize_inline(text) };
    }
    if let Some(text) = line.strip_prefix("> ") {
        return BlockNode::BlockQuote { inline: tokenize_inline(text) };
    }
    if line.trim().is_empty() {
        return BlockNode::Blank;
    }
    return BlockNode::Paragraph { inline: tokenize_inline(line) };
}

/// Consume a fenced block starting at `start`. An unterminated fence runs to
/// the end of the input.
fn consume_fence(lines: &[&str], start: usize, info: &str) -> Block {
    let language = info.split_whitespace().next().unwrap_or_default().to_string();
    let is_diagram = language == DIAGRAM_LANGUAGE;

    let body_start = start.saturating_add(1);
    let close = lines
        .iter()
        .enumerate()
        .skip(body_start)
        .find(|(_, line)| return is_closing_fence(line))
        .map(|(idx, _)| return idx);

    let (body_end, end) = match close {
        None => (lines.len(), lines.len()),
        Some(idx) => (idx, idx.saturating_add(1)),
    };
    let raw = lines.get(body_start..body_end).unwrap_or_default().join("\n");

    return Block {
        lines: start..end,
        node: BlockNode::CodeBlock { is_diagram, language, raw },
    };
}

/// Info string of an opening fence, or `None` if the line does not open one.
/// An info string containing a backtick means the line is inline code.
pub fn fence_info(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let info = trimmed.trim_start_matches('`');
    if trimmed.len().saturating_sub(info.len()) < FENCE.len() || info.contains('`') {
        return None;
    }
    return Some(info.trim());
}

/// A closing fence is a line of backticks only, at least three long.
pub fn is_closing_fence(line: &str) -> bool {
    let trimmed = line.trim();
    return trimmed.starts_with(FENCE) && trimmed.trim_start_matches('`').is_empty();
}

/// Whether a line looks like a pipe-table row.
fn is_table_row(line: &str) -> bool {
    return line.trim().starts_with('|');
}

/// Parse the block that begins at line `start`.
fn parse_block_at(lines: &[&str], start: usize) -> Block {
    let line = lines.get(start).map(|l| return strip_carriage_return(l)).unwrap_or_default();

    if let Some(info) = fence_info(line) {
        return consume_fence(lines, start, info);
    }

    if is_table_row(line) {
        let row_count = lines
            .iter()
            .skip(start)
            .take_while(|l| return is_table_row(l))
            .count();
        if row_count >= MIN_TABLE_ROWS {
            let end = start.saturating_add(row_count);
            return table_block(lines, start..end);
        }
    }

    return Block {
        lines: start..start.saturating_add(1),
        node: classify_single_line(line),
    };
}

/// Parse markdown into blocks. Total: every input line lands in exactly one
/// block, in order, and the function never fails.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut blocks = Vec::new();
    let mut cursor = 0_usize;

    while cursor < lines.len() {
        let block = parse_block_at(&lines, cursor);
        // Every block consumes at least one line.
        cursor = block.lines.end.max(cursor.saturating_add(1));
        blocks.push(block);
    }

    return blocks;
}

/// Split a table row into trimmed cells, dropping the empty cells produced by
/// leading and trailing pipes. Interior empty cells are kept.
pub fn split_table_cells(row: &str) -> Vec<String> {
    let mut cells: Vec<&str> = row.trim().split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| return c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| return c.is_empty()) {
        cells.pop();
    }
    return cells.into_iter().map(String::from).collect();
}

/// Drop a trailing `\r` so CRLF input classifies like LF input.
fn strip_carriage_return(line: &str) -> &str {
    return line.strip_suffix('\r').unwrap_or(line);
}

/// Build a table block from its row range: header, separator, body rows.
fn table_block(lines: &[&str], range: Range<usize>) -> Block {
    let rows = lines.get(range.clone()).unwrap_or_default();
    let headers = rows.first().map(|r| return split_table_cells(r)).unwrap_or_default();
    let body = rows.iter().skip(MIN_TABLE_ROWS).map(|r| return split_table_cells(r)).collect();

    return Block {
        lines: range,
        node: BlockNode::Table { headers, rows: body },
    };
}
