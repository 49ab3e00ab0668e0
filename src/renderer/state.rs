use tracing::error;

use crate::renderer::components::TextWrapper;

/// Lines with an indent relative to the block they were spliced into.
pub type LineGroup = (usize, Vec<String>);

#[derive(Debug, Clone)]
enum Chunk {
    /// Raw text, joined with its neighbours and wrapped when the block ends.
    Text(String),
    /// Already formatted lines, never wrapped again.
    Lines { indent: usize, lines: Vec<String> },
}

#[derive(Debug, Default)]
struct Block {
    indent: usize,
    chunks: Vec<Chunk>,
}

/// How a block is turned into lines when it ends.
#[derive(Debug, Clone, Copy)]
pub struct EndBlock<'a> {
    pub wrap: bool,
    pub blank_after: bool,
    /// Keep trailing whitespace on every line (code blocks).
    pub preformatted: bool,
    pub first: Option<&'a str>,
}

impl<'a> EndBlock<'a> {
    pub fn wrapped() -> Self {
        Self {
            wrap: true,
            blank_after: true,
            preformatted: false,
            first: None,
        }
    }

    pub fn verbatim() -> Self {
        Self {
            wrap: false,
            blank_after: true,
            preformatted: false,
            first: None,
        }
    }

    pub fn preformatted() -> Self {
        Self {
            preformatted: true,
            ..Self::verbatim()
        }
    }

    pub fn without_blank(self) -> Self {
        Self {
            blank_after: false,
            ..self
        }
    }

    /// Prefix the first line with `first`, outdented by the block's own
    /// indent (list markers, footnote labels, admonition labels).
    pub fn with_first(self, first: &'a str) -> Self {
        Self {
            first: Some(first),
            ..self
        }
    }
}

/// Stack of in-progress blocks. The root block is never popped, so pushes
/// and pops only need to balance among themselves.
#[derive(Debug)]
pub struct BlockStack {
    blocks: Vec<Block>,
    width: usize,
}

impl BlockStack {
    pub fn new(width: usize) -> Self {
        Self {
            blocks: vec![Block::default()],
            width,
        }
    }

    pub fn push(&mut self, indent: usize) {
        self.blocks.push(Block {
            indent,
            chunks: Vec::new(),
        });
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    /// Sum of the indents of every open block.
    pub fn total_indent(&self) -> usize {
        self.blocks.iter().map(|block| block.indent).sum()
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        if let Some(top) = self.blocks.last_mut() {
            top.chunks.push(Chunk::Text(text.into()));
        }
    }

    pub fn add_lines(&mut self, indent: usize, lines: Vec<String>) {
        if let Some(top) = self.blocks.last_mut() {
            top.chunks.push(Chunk::Lines { indent, lines });
        }
    }

    /// Pop the current block and splice its lines into the parent.
    pub fn end(&mut self, options: EndBlock<'_>) {
        let groups = self.end_detached(options);
        if let Some(top) = self.blocks.last_mut() {
            top.chunks.extend(
                groups
                    .into_iter()
                    .map(|(indent, lines)| Chunk::Lines { indent, lines }),
            );
        }
    }

    /// Pop the current block and hand its lines back instead of splicing.
    pub fn end_detached(&mut self, options: EndBlock<'_>) -> Vec<LineGroup> {
        if self.blocks.len() <= 1 {
            error!("attempted to end the root block");
            return Vec::new();
        }
        let max_indent = self.total_indent();
        match self.blocks.pop() {
            Some(block) => format_block(block, self.width.saturating_sub(max_indent), options),
            None => Vec::new(),
        }
    }

    /// Format the root block and join every line with `newline`. Leading and
    /// trailing blank lines are dropped.
    pub fn finish(mut self, newline: &str) -> String {
        let root = std::mem::take(&mut self.blocks[0]);
        let groups = format_block(root, self.width, EndBlock::wrapped());
        let lines = flatten(&groups);

        let start = lines.iter().position(|line| !line.trim().is_empty());
        let end = lines.iter().rposition(|line| !line.trim().is_empty());
        match (start, end) {
            (Some(start), Some(end)) => lines[start..=end].join(newline),
            _ => String::new(),
        }
    }
}

/// Shift every group by its indent and return plain lines.
pub fn flatten(groups: &[LineGroup]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|(indent, lines)| {
            lines.iter().map(move |line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", " ".repeat(*indent), line)
                }
            })
        })
        .collect()
}

fn format_block(block: Block, width: usize, options: EndBlock<'_>) -> Vec<LineGroup> {
    let indent = block.indent;
    let wrapper = TextWrapper::new(width);
    let mut result: Vec<LineGroup> = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for chunk in block.chunks {
        match chunk {
            Chunk::Text(text) => pending.push(text),
            Chunk::Lines {
                indent: item_indent,
                lines,
            } => {
                flush_pending(&mut pending, indent, &wrapper, options, &mut result);
                result.push((indent + item_indent, lines));
            }
        }
    }
    flush_pending(&mut pending, indent, &wrapper, options, &mut result);

    if let Some(first) = options.first {
        apply_first(&mut result, indent, first);
    }
    result
}

fn flush_pending(
    pending: &mut Vec<String>,
    indent: usize,
    wrapper: &TextWrapper,
    options: EndBlock<'_>,
    result: &mut Vec<LineGroup>,
) {
    if pending.is_empty() {
        return;
    }
    let text = pending.concat();
    pending.clear();

    let mut lines: Vec<String> = if options.wrap {
        wrapper.wrap_preserving_breaks(&text)
    } else if options.preformatted {
        text.lines().map(String::from).collect()
    } else {
        text.lines().map(|line| line.trim_end().to_string()).collect()
    };
    if options.blank_after {
        lines.push(String::new());
    }
    result.push((indent, lines));
}

fn apply_first(result: &mut Vec<LineGroup>, indent: usize, first: &str) {
    if result.is_empty() {
        return;
    }
    let (item_indent, lines) = result.remove(0);
    let mut lines = lines.into_iter();
    let head = match lines.next() {
        Some(line) if !line.is_empty() => format!("{}{}", first, line),
        _ => first.trim_end().to_string(),
    };
    let rest: Vec<String> = lines.collect();

    result.insert(0, (item_indent.saturating_sub(indent), vec![head]));
    if !rest.is_empty() {
        result.insert(1, (item_indent, rest));
    }
}
