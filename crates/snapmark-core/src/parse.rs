//! Document parser adapter.
//!
//! Turns snapshot file text into the flat node sequence the reducer consumes.
//! The markdown grammar itself is delegated to `comrak`; this module only
//! keeps the two block kinds snapshot files are made of.

use std::path::Path;

use comrak::nodes::{AstNode, NodeCodeBlock, NodeValue};
use comrak::{parse_document, Arena, Options};

use crate::errors::Result;
use crate::model::SourceLocation;

/// A top-level block of a snapshot document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Heading {
        level: u8,
        text: String,
        loc: SourceLocation,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
        loc: SourceLocation,
    },
}

/// Tokenizes raw snapshot text into an ordered node sequence.
///
/// `path` is only used for error reporting.
pub trait DocumentParser: Send + Sync {
    /// # Errors
    ///
    /// Implementations return a located error when the text cannot be tokenized.
    fn parse(&self, path: &Path, raw: &str) -> Result<Vec<Node>>;
}

/// CommonMark-backed parser adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser;

impl DocumentParser for MarkdownParser {
    fn parse(&self, _path: &Path, raw: &str) -> Result<Vec<Node>> {
        let arena = Arena::new();
        let options = Options::default();
        let root = parse_document(&arena, raw, &options);
        let lines = LineStarts::new(raw);

        let mut nodes = Vec::new();
        for child in root.children() {
            let ast = child.data.borrow();
            let start = ast.sourcepos.start;
            let loc = SourceLocation::new(start.line, start.column);

            match &ast.value {
                NodeValue::Heading(heading) => {
                    let text = match lines.line(raw, start.line) {
                        Some(line) if !heading.setext => atx_heading_text(line).to_string(),
                        _ => {
                            let mut text = String::new();
                            collect_inline_text(child, &mut text);
                            text
                        }
                    };
                    nodes.push(Node::Heading {
                        level: heading.level,
                        text,
                        loc,
                    });
                }
                NodeValue::CodeBlock(code_block) => {
                    let info = code_block.info.trim();
                    let language = (!info.is_empty()).then(|| info.to_string());
                    let text = fenced_body(&lines, raw, code_block, start.line).unwrap_or_else(|| {
                        code_block
                            .literal
                            .strip_suffix('\n')
                            .unwrap_or(&code_block.literal)
                            .to_string()
                    });
                    nodes.push(Node::CodeBlock {
                        language,
                        text,
                        loc,
                    });
                }
                _ => {}
            }
        }

        Ok(nodes)
    }
}

/// Byte offsets of line starts, using CommonMark line endings
/// (`\n`, `\r\n` and a lone `\r`) so line numbers agree with comrak's
struct LineStarts {
    starts: Vec<usize>,
    len: usize,
}

impl LineStarts {
    fn new(raw: &str) -> Self {
        let bytes = raw.as_bytes();
        let mut starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => starts.push(i + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            starts,
            len: raw.len(),
        }
    }

    /// Byte offset where 1-based `line` starts
    fn start(&self, line: usize) -> Option<usize> {
        self.starts.get(line.checked_sub(1)?).copied()
    }

    fn count(&self) -> usize {
        self.starts.len()
    }

    /// Text of 1-based `line` without its terminator
    fn line<'a>(&self, raw: &'a str, line: usize) -> Option<&'a str> {
        let start = self.start(line)?;
        let end = self.start(line + 1).unwrap_or(self.len);
        Some(raw[start..end].trim_end_matches(|c: char| c == '\r' || c == '\n'))
    }
}

/// Heading text as written, without the opening and optional closing `#` runs
fn atx_heading_text(line: &str) -> &str {
    let text = line.trim_start().trim_start_matches('#').trim();
    let open = text.trim_end_matches('#');
    let has_closing = open.len() < text.len()
        && (open.is_empty() || open.ends_with(|c: char| c == ' ' || c == '\t'));
    if has_closing {
        open.trim_end()
    } else {
        text
    }
}

fn is_closing_fence(line: &str, fence_char: u8, fence_length: usize) -> bool {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 {
        return false;
    }
    let run = rest.bytes().take_while(|b| *b == fence_char).count();
    run >= fence_length && rest[run..].trim().is_empty()
}

/// Exact source text between the fences of a closed, unindented fenced block.
///
/// Cut from `raw` because comrak's `literal` normalises line endings. A block
/// opened on a `\r\n` line belongs to a CRLF file and is read back with `\n`
/// endings. `None` for indented, offset or unclosed blocks.
fn fenced_body(
    lines: &LineStarts,
    raw: &str,
    block: &NodeCodeBlock,
    open_line: usize,
) -> Option<String> {
    if !block.fenced || block.fence_offset != 0 {
        return None;
    }
    let close_line = (open_line + 1..=lines.count()).find(|&l| {
        lines
            .line(raw, l)
            .is_some_and(|text| is_closing_fence(text, block.fence_char, block.fence_length))
    })?;

    let open_start = lines.start(open_line)?;
    let body_start = lines.start(open_line + 1)?;
    let body = &raw[body_start..lines.start(close_line)?];

    if raw[open_start..body_start].ends_with("\r\n") {
        let body = body.replace("\r\n", "\n");
        return Some(body.strip_suffix('\n').unwrap_or(&body).to_string());
    }
    let body = body
        .strip_suffix('\n')
        .or_else(|| body.strip_suffix('\r'))
        .unwrap_or(body);
    Some(body.to_string())
}

/// Flatten setext heading inlines back to text, re-wrapping code spans in backticks
fn collect_inline_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => {
                out.push('`');
                out.push_str(&code.literal);
                out.push('`');
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => collect_inline_text(child, out),
        }
    }
}
