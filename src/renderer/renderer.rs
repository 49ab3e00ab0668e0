use tracing::{debug, info_span};

use crate::error::{Result, TreePath, Warning};
use crate::parser::*;
use crate::renderer::renders::MarkdownTranslator;
use crate::renderer::traits::*;

/// Output of one render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub markdown: String,
    pub warnings: Vec<Warning>,
    /// Cell text of every table seen, in document order. Tables render as a
    /// placeholder in the Markdown itself.
    pub tables: Vec<TableGrid>,
}

/// Cells collected from a `table` node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    pub colwidths: Vec<usize>,
    pub rows: Vec<Vec<String>>,
    /// Index of the first body row; rows before it are header rows.
    pub body_start: Option<usize>,
}

impl TableGrid {
    pub fn header_rows(&self) -> &[Vec<String>] {
        &self.rows[..self.body_start.unwrap_or(0)]
    }

    pub fn body_rows(&self) -> &[Vec<String>] {
        &self.rows[self.body_start.unwrap_or(0)..]
    }
}

/// Renders doctrees to DocFX Markdown
pub struct MarkdownRenderer {
    config: RenderConfig,
}

impl MarkdownRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, node: &Node) -> Result<Rendered> {
        self.render_nodes(std::slice::from_ref(node))
    }

    /// Render a sequence of sibling nodes as one document.
    pub fn render_nodes(&self, nodes: &[Node]) -> Result<Rendered> {
        let _span = info_span!("render", nodes = nodes.len(), width = self.config.width).entered();

        let mut translator = MarkdownTranslator::new(&self.config);
        walk_all(nodes, &mut translator)?;
        let rendered = translator.finish();

        debug!(
            bytes = rendered.markdown.len(),
            warnings = rendered.warnings.len(),
            "rendered doctree"
        );
        Ok(rendered)
    }

    /// Load a JSON doctree and render it.
    pub fn render_json(&self, json: &str) -> Result<Rendered> {
        let node = parse_doctree(json)?;
        self.render(&node)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

/// Visit `node` and everything below it depth-first.
pub fn walk<V: NodeVisitor>(node: &Node, visitor: &mut V) -> Result<()> {
    let mut path = TreePath::new();
    walk_node(node, 0, &mut path, visitor)
}

pub fn walk_all<V: NodeVisitor>(nodes: &[Node], visitor: &mut V) -> Result<()> {
    let mut path = TreePath::new();
    for (index, node) in nodes.iter().enumerate() {
        walk_node(node, index, &mut path, visitor)?;
    }
    Ok(())
}

fn walk_node<V: NodeVisitor>(
    node: &Node,
    index: usize,
    path: &mut TreePath,
    visitor: &mut V,
) -> Result<()> {
    path.push(node.kind(), index);

    if visitor.enter(node, path)? == Flow::Descend {
        for (child_index, child) in node.children().iter().enumerate() {
            walk_node(child, child_index, path, visitor)?;
        }
        visitor.leave(node, path)?;
    }

    path.pop();
    Ok(())
}
