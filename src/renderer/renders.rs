use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result, TreePath, Warning};
use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::renderer::{Rendered, TableGrid};
use crate::renderer::state::{flatten, BlockStack, EndBlock};
use crate::renderer::traits::*;

const STD_INDENT: usize = 3;

/// One open list, innermost last.
#[derive(Debug, Clone, Copy)]
enum ListFrame {
    Bullet,
    Enumerated { next: usize, current: usize },
    Definition,
}

/// Term/classifier bookkeeping for one definition list item.
#[derive(Debug, Clone, Copy, Default)]
struct DefinitionItem {
    classifiers_left: usize,
    term_open: bool,
}

/// Walks a doctree and accumulates DocFX Markdown.
pub struct MarkdownTranslator<'a> {
    config: &'a RenderConfig,
    stack: BlockStack,
    lists: Vec<ListFrame>,
    definition_items: Vec<DefinitionItem>,
    // `false` for a field that is not a name/body pair
    fields: Vec<bool>,
    section_level: usize,
    line_block_level: usize,
    first_param: bool,
    first_option: bool,
    table: Option<TableGrid>,
    tables: Vec<TableGrid>,
    warnings: Vec<Warning>,
}

impl<'a> MarkdownTranslator<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            stack: BlockStack::new(config.width),
            lists: Vec::new(),
            definition_items: Vec::new(),
            fields: Vec::new(),
            section_level: 0,
            line_block_level: 0,
            first_param: true,
            first_option: true,
            table: None,
            tables: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            markdown: self.stack.finish(self.config.newline.as_str()),
            warnings: self.warnings,
            tables: self.tables,
        }
    }

    fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn in_malformed_field(&self) -> bool {
        self.fields.last() == Some(&false)
    }

    /// Titles directly under a section or the document become headings.
    fn is_heading(path: &TreePath) -> bool {
        matches!(path.parent_kind(), Some("section") | Some("document"))
    }

    /// The first paragraph of an option description shares the option row.
    fn is_option_description(path: &TreePath) -> bool {
        path.parent_kind() == Some(PassthroughKind::Description.tag())
            && path.segments().last().is_some_and(|segment| segment.index == 0)
    }

    fn is_admonition_label(path: &TreePath) -> bool {
        path.parent_kind() == Some(AdmonitionKind::Generic.tag())
    }

    /// Labels go on their own line when the body opens with something other
    /// than running text.
    fn starts_with_block(children: &[Node]) -> bool {
        children
            .iter()
            .find(|child| !matches!(child, Node::Title(_)))
            .is_some_and(|child| child.is_block() && !matches!(child, Node::Paragraph(_)))
    }

    fn admonition_label(kind: AdmonitionKind, children: &[Node]) -> String {
        match kind {
            AdmonitionKind::Generic => children
                .iter()
                .find(|child| matches!(child, Node::Title(_)))
                .map(|title| title.astext().trim().to_string())
                .unwrap_or_default(),
            _ => kind.label().to_string(),
        }
    }

    fn include_marker(&self, language: Option<&str>, source: &str, caption: Option<&str>) -> Option<String> {
        let root = self.config.source_root.as_ref()?;
        let relative = Path::new(source).strip_prefix(root).ok()?;
        let language = language.map(|l| format!("-{}", l)).unwrap_or_default();
        let target = match caption {
            Some(caption) => format!("{} \"{}\"", relative.display(), caption),
            None => relative.display().to_string(),
        };
        Some(format!("<!--[!code{}[Main]({})]-->", language, target))
    }

    fn end_code_block(&mut self, language: Option<&str>) {
        let groups = self.stack.end_detached(EndBlock::preformatted().without_blank());
        let lines = flatten(&groups);
        let fence = "`".repeat(CodeFence::fence_length(&lines.join("\n")));

        let mut out = Vec::with_capacity(lines.len() + 3);
        out.push(format!("{}{}", fence, language.unwrap_or_default()));
        out.extend(lines);
        out.push(fence);
        out.push(String::new());
        self.stack.add_lines(0, out);
    }

    fn end_alert_box(&mut self, tag: &str) {
        let groups = self.stack.end_detached(EndBlock::wrapped());
        let mut lines = flatten(&groups);
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        // The block was indented by two columns to leave room for the quote
        let mut out = Vec::with_capacity(lines.len() + 2);
        out.push(format!("> [!{}]", tag));
        for line in &lines {
            match line.strip_prefix("  ") {
                _ if line.is_empty() => out.push(">".to_string()),
                Some(rest) => out.push(format!("> {}", rest)),
                None => out.push(format!("> {}", line.trim_start())),
            }
        }
        out.push(String::new());
        self.stack.add_lines(0, out);
    }

    fn render_productions(&mut self, productions: &[Production]) {
        let width = productions
            .iter()
            .filter_map(|p| p.token_name.as_deref())
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0);

        self.stack.push(STD_INDENT);
        let mut seen_name = false;
        for production in productions {
            match &production.token_name {
                Some(name) => {
                    self.stack.add_text(format!("{:<width$} ::= ", name, width = width));
                    seen_name = true;
                }
                None if seen_name => self.stack.add_text(" ".repeat(width + 5)),
                None => {}
            }
            self.stack.add_text(format!("{}\n", production.text));
        }
        self.stack.end(EndBlock::verbatim());
    }

    fn enter_list_item(&mut self) {
        match self.lists.last_mut() {
            Some(ListFrame::Definition) => {}
            Some(ListFrame::Enumerated { next, current }) => {
                *current = *next;
                *next += 1;
                let indent = current.to_string().len() + 2;
                self.stack.push(indent);
            }
            Some(ListFrame::Bullet) | None => self.stack.push(2),
        }
    }

    fn leave_list_item(&mut self) {
        match self.lists.last() {
            Some(ListFrame::Definition) => {}
            Some(ListFrame::Enumerated { current, .. }) => {
                let marker = format!("{}. ", current);
                self.stack.end(EndBlock::wrapped().with_first(&marker));
            }
            Some(ListFrame::Bullet) | None => {
                self.stack.end(EndBlock::wrapped().with_first("* "));
            }
        }
    }

    fn end_term(&mut self) {
        self.stack.end(EndBlock::wrapped().without_blank());
        if let Some(item) = self.definition_items.last_mut() {
            item.term_open = false;
        }
    }
}

impl NodeVisitor for MarkdownTranslator<'_> {
    fn enter(&mut self, node: &Node, path: &TreePath) -> Result<Flow> {
        match node {
            Node::Text(text) => self.stack.add_text(text.as_str()),
            Node::Passthrough { .. } => {}
            Node::Skipped(kind) => {
                debug!(kind = kind.tag(), path = %path, "skipping node");
                return Ok(Flow::Skip);
            }

            Node::Section(_) => self.section_level += 1,
            Node::Title(_) => {
                if Self::is_admonition_label(path) {
                    return Ok(Flow::Skip);
                }
                self.stack.push(0);
                if Self::is_heading(path) {
                    let level = self.section_level.max(1);
                    self.stack.add_text(format!("{} ", "#".repeat(level)));
                } else {
                    self.stack.add_text("**");
                }
            }
            Node::Rubric(_) => {
                self.stack.push(0);
                self.stack.add_text("-[ ");
            }
            Node::Paragraph(_) => {
                if !Self::is_option_description(path) {
                    self.stack.push(0);
                }
            }
            Node::Transition => {
                self.stack.add_lines(0, vec!["---".to_string(), String::new()]);
                return Ok(Flow::Skip);
            }

            Node::BulletList(_) => self.lists.push(ListFrame::Bullet),
            Node::EnumeratedList { start, .. } => self.lists.push(ListFrame::Enumerated {
                next: *start,
                current: *start,
            }),
            Node::DefinitionList(_) => self.lists.push(ListFrame::Definition),
            Node::ListItem(_) => self.enter_list_item(),
            Node::DefinitionListItem(children) => {
                let classifiers_left = children
                    .iter()
                    .filter(|child| matches!(child, Node::Classifier(_)))
                    .count();
                self.definition_items.push(DefinitionItem {
                    classifiers_left,
                    term_open: false,
                });
            }
            Node::Term(_) => {
                self.stack.push(0);
                if let Some(item) = self.definition_items.last_mut() {
                    item.term_open = true;
                }
            }
            Node::Termsep => {
                self.stack.add_text(", ");
                return Ok(Flow::Skip);
            }
            Node::Classifier(_) => {
                let term_open = self.definition_items.last().is_some_and(|item| item.term_open);
                if !term_open {
                    self.stack.push(0);
                    if let Some(item) = self.definition_items.last_mut() {
                        item.term_open = true;
                    }
                }
                self.stack.add_text(" : ");
            }
            Node::Definition(_) => self.stack.push(STD_INDENT),

            Node::Field(children) => {
                let well_formed = children.len() == 2
                    && matches!(children[0], Node::FieldName(_))
                    && matches!(children[1], Node::FieldBody(_));
                if !well_formed {
                    self.warn(Warning::MalformedFieldList {
                        path: path.clone(),
                        children: children.len(),
                    });
                }
                self.fields.push(well_formed);
            }
            Node::FieldName(_) => {
                self.stack.push(0);
                if self.in_malformed_field() {
                    self.stack.add_text(capitalize(node.astext().trim()));
                    self.stack.end(EndBlock::wrapped());
                    return Ok(Flow::Skip);
                }
            }
            Node::FieldBody(_) => {
                let indent = if self.in_malformed_field() { 0 } else { STD_INDENT };
                self.stack.push(indent);
            }

            Node::OptionListItem(_) => self.stack.push(0),
            Node::OptionGroup(_) => self.first_option = true,
            Node::OptionEntry(_) => {
                if self.first_option {
                    self.first_option = false;
                } else {
                    self.stack.add_text(", ");
                }
            }
            Node::OptionArgument { delimiter, .. } => self.stack.add_text(delimiter.as_str()),

            Node::Admonition { kind, children } => match kind {
                AdmonitionKind::Note
                | AdmonitionKind::Warning
                | AdmonitionKind::Tip
                | AdmonitionKind::Important
                | AdmonitionKind::Caution => self.stack.push(2),
                AdmonitionKind::Attention
                | AdmonitionKind::Danger
                | AdmonitionKind::Error
                | AdmonitionKind::Hint
                | AdmonitionKind::Generic => {
                    self.stack.push(2);
                    if Self::starts_with_block(children) {
                        self.stack.add_lines(0, vec![String::new()]);
                    }
                }
                AdmonitionKind::SeeAlso => self.stack.push(2),
            },
            Node::VersionModified(_) => self.stack.push(0),

            Node::LiteralBlock {
                language,
                source,
                caption,
                ..
            } => {
                if let Some(source) = source {
                    if let Some(marker) =
                        self.include_marker(language.as_deref(), source, caption.as_deref())
                    {
                        self.stack.add_lines(0, vec![marker]);
                    }
                }
                self.stack.push(0);
            }
            Node::DoctestBlock(_) => self.stack.push(0),
            Node::LineBlock(_) => {
                self.line_block_level += 1;
                let indent = if self.line_block_level > 1 { STD_INDENT } else { 0 };
                self.stack.push(indent);
            }
            Node::Line(_) => {}
            Node::BlockQuote(_) => self.stack.push(STD_INDENT),
            Node::Attribution(_) => self.stack.add_text("-- "),

            Node::Footnote { label, .. } | Node::Citation { label, .. } => {
                self.stack.push(label.chars().count() + 3);
            }
            Node::Figure(_) => self.stack.push(STD_INDENT),
            Node::Image { uri, alt } => {
                match AssetRenderer::image_path(uri, &self.config.static_dir) {
                    Some(image_path) => {
                        let alt = alt.as_deref().unwrap_or("image");
                        self.stack.add_lines(
                            0,
                            vec![format!("![{}]({})", alt, image_path), String::new()],
                        );
                    }
                    None => self.warn(Warning::ImageAssetNotFound {
                        uri: uri.clone(),
                        path: path.clone(),
                    }),
                }
                return Ok(Flow::Skip);
            }

            Node::Table(_) => {
                if self.table.is_some() {
                    return Err(Error::UnsupportedNestedTable { path: path.clone() });
                }
                self.table = Some(TableGrid::default());
                self.stack.push(0);
            }
            Node::ColSpec { colwidth } => {
                if let Some(table) = self.table.as_mut() {
                    table.colwidths.push(*colwidth);
                }
                return Ok(Flow::Skip);
            }
            Node::TBody(_) => {
                if let Some(table) = self.table.as_mut() {
                    table.body_start = Some(table.rows.len());
                }
            }
            Node::Row(_) => {
                if let Some(table) = self.table.as_mut() {
                    table.rows.push(Vec::new());
                }
            }
            Node::Entry {
                morerows, morecols, ..
            } => {
                if *morerows > 0 || *morecols > 0 {
                    return Err(Error::UnsupportedSpanningCell { path: path.clone() });
                }
                self.stack.push(0);
            }

            Node::ProductionList(productions) => {
                self.render_productions(productions);
                return Ok(Flow::Skip);
            }
            Node::Acks(children) => {
                let names: Vec<String> = children
                    .first()
                    .map(|list| list.children().iter().map(Node::astext).collect())
                    .unwrap_or_default();
                self.stack.push(0);
                self.stack.add_text(format!("{}.", names.join(", ")));
                self.stack.end(EndBlock::wrapped());
                return Ok(Flow::Skip);
            }
            Node::Target { refid } => {
                if let Some(refid) = refid {
                    self.stack
                        .add_lines(0, vec![format!("<a name={}></a>", refid), String::new()]);
                }
                return Ok(Flow::Skip);
            }

            Node::DescSignature(_) => self.stack.push(0),
            Node::DescParameterList(_) => {
                self.stack.add_text("(");
                self.first_param = true;
            }
            Node::DescParameter(_) => {
                if self.first_param {
                    self.first_param = false;
                } else {
                    self.stack.add_text(", ");
                }
                self.stack.add_text(node.astext());
                return Ok(Flow::Skip);
            }
            Node::DescOptional(_) => self.stack.add_text("["),
            Node::DescReturns(_) => self.stack.add_text(" -> "),
            Node::DescContent(_) => self.stack.push(STD_INDENT),

            Node::Inline { style, .. } => {
                let open = match style {
                    InlineStyle::Literal => CodeFence::inline_delimiters(&node.astext()).0,
                    _ => style.delimiters().0.to_string(),
                };
                self.stack.add_text(open);
            }
            Node::Abbreviation { .. } => {}
            Node::Classed { classes, .. } => {
                if has_emphasis_class(classes) {
                    self.stack.add_text("*");
                }
            }
            Node::Reference { refid, refuri, .. } => {
                let text = node.astext();
                let rendered = match (refid, refuri) {
                    (Some(refid), _) => LinkRenderer::xref(refid),
                    (None, Some(refuri)) => LinkRenderer::render_uri(&text, refuri),
                    (None, None) => {
                        debug!(path = %path, "reference without target");
                        text
                    }
                };
                self.stack.add_text(rendered);
                return Ok(Flow::Skip);
            }
            Node::PendingXref {
                refdomain,
                reftarget,
                ..
            } => {
                if refdomain.as_deref() == Some("py") {
                    self.stack.add_text(LinkRenderer::xref(reftarget));
                } else {
                    self.stack.add_text(node.astext());
                }
                return Ok(Flow::Skip);
            }
            Node::NumberReference { title } => {
                self.stack.add_text(title.as_deref().unwrap_or("#"));
                return Ok(Flow::Skip);
            }
            Node::FootnoteReference(_) | Node::CitationReference(_) => {
                self.stack.add_text(format!("[{}]", node.astext()));
                return Ok(Flow::Skip);
            }

            Node::SystemMessage(_) => {
                self.warn(Warning::SystemMessage {
                    text: node.astext(),
                    path: path.clone(),
                });
                return Ok(Flow::Skip);
            }
            Node::Math { .. } => {
                self.warn(Warning::MathWithoutExtension { path: path.clone() });
                return Ok(Flow::Skip);
            }
            Node::Raw { format, text } => {
                if format.split_whitespace().any(|f| f == "text") {
                    self.stack.push(0);
                    self.stack.add_text(text.as_str());
                    self.stack.end(EndBlock::verbatim());
                }
                return Ok(Flow::Skip);
            }
        }

        Ok(Flow::Descend)
    }

    fn leave(&mut self, node: &Node, path: &TreePath) -> Result<()> {
        match node {
            Node::Section(_) => self.section_level = self.section_level.saturating_sub(1),
            Node::Title(_) => {
                if !Self::is_heading(path) {
                    self.stack.add_text("**");
                }
                self.stack.end(EndBlock::wrapped());
            }
            Node::Rubric(_) => {
                self.stack.add_text(" ]-");
                self.stack.end(EndBlock::wrapped());
            }
            Node::Paragraph(_) => {
                if !Self::is_option_description(path) {
                    self.stack.end(EndBlock::wrapped());
                }
            }
            Node::Definition(_)
            | Node::OptionListItem(_)
            | Node::VersionModified(_)
            | Node::BlockQuote(_)
            | Node::Figure(_)
            | Node::DescContent(_) => self.stack.end(EndBlock::wrapped()),

            Node::BulletList(_) | Node::EnumeratedList { .. } | Node::DefinitionList(_) => {
                self.lists.pop();
            }
            Node::ListItem(_) => self.leave_list_item(),
            Node::DefinitionListItem(_) => {
                if self.definition_items.last().is_some_and(|item| item.term_open) {
                    self.end_term();
                }
                self.definition_items.pop();
            }
            Node::Term(_) => {
                let waits_for_classifier = self
                    .definition_items
                    .last()
                    .is_some_and(|item| item.classifiers_left > 0);
                if !waits_for_classifier {
                    self.end_term();
                }
            }
            Node::Classifier(_) => {
                let mut done = false;
                if let Some(item) = self.definition_items.last_mut() {
                    item.classifiers_left = item.classifiers_left.saturating_sub(1);
                    done = item.classifiers_left == 0 && item.term_open;
                }
                if done || self.definition_items.is_empty() {
                    self.end_term();
                }
            }

            Node::Field(_) => {
                self.fields.pop();
            }
            Node::FieldName(_) => {
                self.stack.add_text(":");
                self.stack.end(EndBlock::wrapped().without_blank());
            }
            Node::FieldBody(_) => self.stack.end(EndBlock::wrapped()),

            Node::OptionGroup(_) => self.stack.add_text("     "),
            Node::OptionEntry(_) | Node::OptionArgument { .. } => {}

            Node::Admonition { kind, children } => {
                if let Some(tag) = kind.alert_tag() {
                    self.end_alert_box(tag);
                } else if *kind == AdmonitionKind::SeeAlso {
                    self.stack.end(EndBlock::wrapped());
                } else {
                    let label = format!("{}: ", Self::admonition_label(*kind, children));
                    self.stack.end(EndBlock::wrapped().with_first(&label));
                }
            }

            Node::LiteralBlock { language, .. } => self.end_code_block(language.as_deref()),
            Node::DoctestBlock(_) => self.end_code_block(None),
            Node::LineBlock(_) => {
                self.line_block_level = self.line_block_level.saturating_sub(1);
                self.stack.end(EndBlock::verbatim().without_blank());
                if self.line_block_level == 0 {
                    self.stack.add_lines(0, vec![String::new()]);
                }
            }
            Node::Line(_) => self.stack.add_text("\n"),

            Node::Footnote { label, .. } | Node::Citation { label, .. } => {
                let first = format!("[{}] ", label);
                self.stack.end(EndBlock::wrapped().with_first(&first));
            }

            Node::Table(_) => {
                self.stack.add_text("<!-- table -->");
                self.stack.end(EndBlock::verbatim());
                if let Some(table) = self.table.take() {
                    debug!(rows = table.rows.len(), columns = table.colwidths.len(), "collected table");
                    self.tables.push(table);
                }
            }
            Node::Entry { .. } => {
                let groups = self.stack.end_detached(EndBlock::verbatim().without_blank());
                let text = flatten(&groups).join("\n").trim_end().to_string();
                if let Some(row) = self.table.as_mut().and_then(|table| table.rows.last_mut()) {
                    row.push(text);
                }
            }

            Node::DescSignature(_) => self.stack.end(EndBlock::verbatim().without_blank()),
            Node::DescParameterList(_) => self.stack.add_text(")"),
            Node::DescOptional(_) => self.stack.add_text("]"),

            Node::Inline { style, .. } => {
                let close = match style {
                    InlineStyle::Literal => CodeFence::inline_delimiters(&node.astext()).1,
                    _ => style.delimiters().1.to_string(),
                };
                self.stack.add_text(close);
            }
            Node::Abbreviation { explanation, .. } => {
                if let Some(explanation) = explanation {
                    self.stack.add_text(format!(" ({})", explanation));
                }
            }
            Node::Classed { classes, .. } => {
                if has_emphasis_class(classes) {
                    self.stack.add_text("*");
                }
            }

            Node::Text(_)
            | Node::Passthrough { .. }
            | Node::Skipped(_)
            | Node::Transition
            | Node::Termsep
            | Node::Image { .. }
            | Node::ColSpec { .. }
            | Node::TBody(_)
            | Node::Row(_)
            | Node::ProductionList(_)
            | Node::Acks(_)
            | Node::Target { .. }
            | Node::DescParameter(_)
            | Node::DescReturns(_)
            | Node::Attribution(_)
            | Node::Reference { .. }
            | Node::PendingXref { .. }
            | Node::NumberReference { .. }
            | Node::FootnoteReference(_)
            | Node::CitationReference(_)
            | Node::SystemMessage(_)
            | Node::Math { .. }
            | Node::Raw { .. } => {}
        }

        Ok(())
    }
}

fn has_emphasis_class(classes: &[String]) -> bool {
    classes.iter().any(|class| class == "xref" || class == "term")
}
