use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result, TreePath};
use crate::parser::types::*;

/// JSON shape of a serialized doctree node.
///
/// Text leaves are plain strings or `{"text": ...}` objects; elements carry a
/// docutils tag, an attribute map and their children.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNode {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        attributes: Map<String, Value>,
        #[serde(default)]
        children: Vec<RawNode>,
    },
    TextLeaf {
        text: String,
    },
}

impl RawNode {
    fn astext(&self) -> String {
        match self {
            RawNode::Text(text) | RawNode::TextLeaf { text } => text.clone(),
            RawNode::Element { children, .. } => children.iter().map(RawNode::astext).collect(),
        }
    }

    fn tag(&self) -> Option<&str> {
        match self {
            RawNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

// Converts serialized doctrees into typed nodes
pub struct DoctreeParser {
    path: TreePath,
}

impl DoctreeParser {
    pub fn new() -> Self {
        Self {
            path: TreePath::new(),
        }
    }

    pub fn parse_str(&mut self, json: &str) -> Result<Node> {
        let raw: RawNode = serde_json::from_str(json)?;
        self.parse_raw(raw)
    }

    fn parse_raw(&mut self, raw: RawNode) -> Result<Node> {
        self.path = TreePath::new();
        self.parse_node(raw, 0)
    }

    fn parse_node(&mut self, raw: RawNode, index: usize) -> Result<Node> {
        let (tag, attributes, children) = match raw {
            RawNode::Text(text) | RawNode::TextLeaf { text } => return Ok(Node::Text(text)),
            RawNode::Element {
                tag,
                attributes,
                children,
            } => (tag, attributes, children),
        };

        self.path.push(tag.as_str(), index);
        let node = self.parse_element(&tag, &attributes, children);
        self.path.pop();
        node
    }

    fn parse_children(&mut self, children: Vec<RawNode>) -> Result<Vec<Node>> {
        children
            .into_iter()
            .enumerate()
            .map(|(index, child)| self.parse_node(child, index))
            .collect()
    }

    fn parse_element(
        &mut self,
        tag: &str,
        attributes: &Map<String, Value>,
        children: Vec<RawNode>,
    ) -> Result<Node> {
        if let Some(kind) = SkipKind::from_tag(tag) {
            debug!(kind = tag, path = %self.path, "dropping subtree");
            return Ok(Node::Skipped(kind));
        }
        if let Some(kind) = PassthroughKind::from_tag(tag) {
            return Ok(Node::Passthrough {
                kind,
                children: self.parse_children(children)?,
            });
        }
        if let Some(style) = InlineStyle::from_tag(tag) {
            return Ok(Node::Inline {
                style,
                children: self.parse_children(children)?,
            });
        }
        if let Some(kind) = AdmonitionKind::from_tag(tag) {
            return Ok(Node::Admonition {
                kind,
                children: self.parse_children(children)?,
            });
        }

        let node = match tag {
            "section" => Node::Section(self.parse_children(children)?),
            "title" => Node::Title(self.parse_children(children)?),
            "rubric" => Node::Rubric(self.parse_children(children)?),
            "paragraph" | "remarks" => Node::Paragraph(self.parse_children(children)?),
            "transition" => Node::Transition,

            "bullet_list" => Node::BulletList(self.parse_children(children)?),
            "enumerated_list" => Node::EnumeratedList {
                start: self.attr_usize(tag, attributes, "start")?.unwrap_or(1),
                children: self.parse_children(children)?,
            },
            "list_item" => Node::ListItem(self.parse_children(children)?),
            "definition_list" => Node::DefinitionList(self.parse_children(children)?),
            "definition_list_item" => Node::DefinitionListItem(self.parse_children(children)?),
            "term" => Node::Term(self.parse_children(children)?),
            "termsep" => Node::Termsep,
            "classifier" => Node::Classifier(self.parse_children(children)?),
            "definition" => Node::Definition(self.parse_children(children)?),

            "field" => Node::Field(self.parse_children(children)?),
            "field_name" => Node::FieldName(self.parse_children(children)?),
            "field_body" => Node::FieldBody(self.parse_children(children)?),

            "option_list_item" => Node::OptionListItem(self.parse_children(children)?),
            "option_group" => Node::OptionGroup(self.parse_children(children)?),
            "option" => Node::OptionEntry(self.parse_children(children)?),
            "option_argument" => Node::OptionArgument {
                delimiter: self
                    .attr_str(tag, attributes, "delimiter")?
                    .unwrap_or_else(|| " ".to_string()),
                children: self.parse_children(children)?,
            },

            "versionmodified" => Node::VersionModified(self.parse_children(children)?),
            "literal_block" => Node::LiteralBlock {
                language: self.attr_str(tag, attributes, "language")?,
                source: self.attr_str(tag, attributes, "source")?,
                caption: self.attr_str(tag, attributes, "caption")?,
                children: self.parse_children(children)?,
            },
            "doctest_block" => Node::DoctestBlock(self.parse_children(children)?),
            "line_block" => Node::LineBlock(self.parse_children(children)?),
            "line" => Node::Line(self.parse_children(children)?),
            "block_quote" => Node::BlockQuote(self.parse_children(children)?),
            "attribution" => Node::Attribution(self.parse_children(children)?),

            "footnote" | "citation" => {
                let (label, children) = split_label(children);
                let children = self.parse_children(children)?;
                if tag == "footnote" {
                    Node::Footnote { label, children }
                } else {
                    Node::Citation { label, children }
                }
            }
            "figure" => Node::Figure(self.parse_children(children)?),
            "image" => Node::Image {
                uri: self.require_str(tag, attributes, "uri")?,
                alt: self.attr_str(tag, attributes, "alt")?,
            },

            "table" => Node::Table(self.parse_children(children)?),
            "colspec" => Node::ColSpec {
                colwidth: self.attr_usize(tag, attributes, "colwidth")?.unwrap_or(0),
            },
            "tbody" => Node::TBody(self.parse_children(children)?),
            "row" => Node::Row(self.parse_children(children)?),
            "entry" => Node::Entry {
                morerows: self.attr_usize(tag, attributes, "morerows")?.unwrap_or(0),
                morecols: self.attr_usize(tag, attributes, "morecols")?.unwrap_or(0),
                children: self.parse_children(children)?,
            },

            "productionlist" => Node::ProductionList(self.parse_productions(children)?),
            "acks" => Node::Acks(self.parse_children(children)?),
            "target" => Node::Target {
                refid: self.attr_str(tag, attributes, "refid")?,
            },

            "desc_signature" => Node::DescSignature(self.parse_children(children)?),
            "desc_parameterlist" => Node::DescParameterList(self.parse_children(children)?),
            "desc_parameter" => Node::DescParameter(self.parse_children(children)?),
            "desc_optional" => Node::DescOptional(self.parse_children(children)?),
            "desc_returns" => Node::DescReturns(self.parse_children(children)?),
            "desc_content" => Node::DescContent(self.parse_children(children)?),

            "abbreviation" => Node::Abbreviation {
                explanation: self.attr_str(tag, attributes, "explanation")?,
                children: self.parse_children(children)?,
            },
            "inline" => Node::Classed {
                classes: self.attr_strings(tag, attributes, "classes")?,
                children: self.parse_children(children)?,
            },
            "reference" => Node::Reference {
                refid: self.attr_str(tag, attributes, "refid")?,
                refuri: self.attr_str(tag, attributes, "refuri")?,
                children: self.parse_children(children)?,
            },
            "pending_xref" => Node::PendingXref {
                refdomain: self.attr_str(tag, attributes, "refdomain")?,
                reftarget: self.require_str(tag, attributes, "reftarget")?,
                children: self.parse_children(children)?,
            },
            "number_reference" => Node::NumberReference {
                title: self.attr_str(tag, attributes, "title")?,
            },
            "footnote_reference" => Node::FootnoteReference(self.parse_children(children)?),
            "citation_reference" => Node::CitationReference(self.parse_children(children)?),

            "system_message" => Node::SystemMessage(self.parse_children(children)?),
            "math" | "math_block" => Node::Math {
                block: tag == "math_block",
                children: self.parse_children(children)?,
            },
            "raw" => Node::Raw {
                format: self.attr_str(tag, attributes, "format")?.unwrap_or_default(),
                text: children.iter().map(RawNode::astext).collect(),
            },

            _ => {
                return Err(Error::UnsupportedNodeKind {
                    kind: tag.to_string(),
                    path: self.path.clone(),
                })
            }
        };

        Ok(node)
    }

    fn parse_productions(&mut self, children: Vec<RawNode>) -> Result<Vec<Production>> {
        let mut productions = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let RawNode::Element {
                tag, attributes, ..
            } = &child
            else {
                continue;
            };
            self.path.push(tag.as_str(), index);
            let token_name = self
                .attr_str(tag, attributes, "tokenname")?
                .filter(|name| !name.is_empty());
            self.path.pop();
            productions.push(Production {
                token_name,
                text: child.astext(),
            });
        }
        Ok(productions)
    }

    fn malformed(&self, tag: &str, reason: String) -> Error {
        Error::MalformedNode {
            kind: tag.to_string(),
            path: self.path.clone(),
            reason,
        }
    }

    fn attr_str(&self, tag: &str, attributes: &Map<String, Value>, key: &str) -> Result<Option<String>> {
        match attributes.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(Value::Number(value)) => Ok(Some(value.to_string())),
            Some(other) => Err(self.malformed(
                tag,
                format!("attribute `{}` should be a string, found {}", key, other),
            )),
        }
    }

    fn require_str(&self, tag: &str, attributes: &Map<String, Value>, key: &str) -> Result<String> {
        self.attr_str(tag, attributes, key)?
            .ok_or_else(|| self.malformed(tag, format!("missing attribute `{}`", key)))
    }

    fn attr_usize(&self, tag: &str, attributes: &Map<String, Value>, key: &str) -> Result<Option<usize>> {
        let parsed = match attributes.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(value)) => value.as_u64().map(|n| n as usize),
            Some(Value::String(value)) => value.trim().parse::<usize>().ok(),
            Some(_) => None,
        };
        parsed.map(Some).ok_or_else(|| {
            self.malformed(tag, format!("attribute `{}` should be a non-negative integer", key))
        })
    }

    fn attr_strings(&self, tag: &str, attributes: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
        match attributes.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(value)) => Ok(value.split_whitespace().map(String::from).collect()),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    value.as_str().map(String::from).ok_or_else(|| {
                        self.malformed(tag, format!("attribute `{}` should hold strings", key))
                    })
                })
                .collect(),
            Some(_) => Err(self.malformed(tag, format!("attribute `{}` should be a list", key))),
        }
    }
}

impl Default for DoctreeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detach a leading `label` child, returning its text and the rest.
fn split_label(mut children: Vec<RawNode>) -> (String, Vec<RawNode>) {
    if children.first().and_then(RawNode::tag) == Some("label") {
        let label = children.remove(0).astext().trim().to_string();
        (label, children)
    } else {
        (String::new(), children)
    }
}

/// Parse a JSON doctree into a [`Node`].
pub fn parse_doctree(json: &str) -> Result<Node> {
    DoctreeParser::new().parse_str(json)
}
