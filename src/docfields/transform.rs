use std::collections::HashMap;

use tracing::debug;

use crate::docfields::types::*;
use crate::error::{Result, Warning};
use crate::parser::*;
use crate::renderer::components::capitalize;
use crate::renderer::{MarkdownRenderer, RenderConfig};

/// Info-field families recognized in a field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Parameter,
    ParameterType,
    Variable,
    VariableType,
    Exception,
    ReturnValue,
    ReturnType,
}

impl FieldGroup {
    pub fn from_name(name: &str) -> Option<Self> {
        let group = match name {
            "param" | "parameter" | "arg" | "argument" | "key" | "keyword" | "kwarg"
            | "kwparam" => FieldGroup::Parameter,
            "type" | "paramtype" | "kwtype" => FieldGroup::ParameterType,
            "var" | "ivar" | "cvar" => FieldGroup::Variable,
            "vartype" => FieldGroup::VariableType,
            "raises" | "raise" | "exception" | "except" => FieldGroup::Exception,
            "returns" | "return" => FieldGroup::ReturnValue,
            "rtype" => FieldGroup::ReturnType,
            _ => return None,
        };
        Some(group)
    }

    /// Whether the field name must be followed by an argument.
    pub fn has_arg(self) -> bool {
        !matches!(self, FieldGroup::ReturnValue | FieldGroup::ReturnType)
    }
}

/// Pulls parameters, return values and the rest out of a description body.
pub struct FieldExtractor {
    renderer: MarkdownRenderer,
}

impl FieldExtractor {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::new(config),
        }
    }

    /// Extract from a `desc_content` node or a document; any other node is
    /// treated as the only child of a body.
    pub fn extract(&self, node: &Node) -> Result<DocFields> {
        match node {
            Node::DescContent(children)
            | Node::Passthrough {
                kind: PassthroughKind::Document,
                children,
            } => self.extract_nodes(children),
            other => self.extract_nodes(std::slice::from_ref(other)),
        }
    }

    pub fn extract_nodes(&self, nodes: &[Node]) -> Result<DocFields> {
        let mut fields = DocFields::default();
        let mut summary = Vec::new();

        for node in nodes {
            match node {
                Node::Passthrough {
                    kind: PassthroughKind::Desc,
                    ..
                } => debug!("not descending into nested description"),
                Node::Passthrough {
                    kind: PassthroughKind::FieldList,
                    children,
                } => {
                    let passthrough = self.collect_fields(children, &mut fields)?;
                    summary.extend(passthrough);
                }
                Node::Admonition {
                    kind: AdmonitionKind::SeeAlso,
                    children,
                } => fields.seealso = self.markdown(children, &mut fields.warnings)?,
                Node::Admonition {
                    kind: AdmonitionKind::Generic,
                    children,
                } if is_example(children) => {
                    fields.example = self.markdown(&children[1..], &mut fields.warnings)?;
                }
                _ => summary.push(self.markdown(std::slice::from_ref(node), &mut fields.warnings)?),
            }
        }

        summary.retain(|part| !part.is_empty());
        fields.summary = summary.join("\n");
        Ok(fields)
    }

    /// Sort the fields of one list into `fields`. Returns the rendered
    /// Markdown of fields that did not match a known family.
    fn collect_fields(&self, children: &[Node], fields: &mut DocFields) -> Result<Vec<String>> {
        let mut passthrough = Vec::new();
        let mut parameter_types: HashMap<String, String> = HashMap::new();
        let mut variable_types: HashMap<String, String> = HashMap::new();
        let mut returns = fields.returns.take().unwrap_or_default();

        for child in children {
            let (name, body) = match (child, child.children()) {
                (Node::Field(_), [name @ Node::FieldName(_), body @ Node::FieldBody(_)]) => (name, body),
                _ => {
                    passthrough.push(self.markdown(std::slice::from_ref(child), &mut fields.warnings)?);
                    continue;
                }
            };

            let label = name.astext();
            let label = label.trim();
            let (field_type, field_arg) = match label.split_once(char::is_whitespace) {
                Some((field_type, field_arg)) => (field_type, field_arg.trim()),
                None => (label, ""),
            };

            let group = FieldGroup::from_name(field_type)
                .filter(|group| group.has_arg() == !field_arg.is_empty());
            let Some(group) = group else {
                debug!(field = label, "passing unknown field through");
                let markdown = self.passthrough_field(field_type, field_arg, body, &mut fields.warnings)?;
                passthrough.push(markdown);
                continue;
            };

            match group {
                FieldGroup::Parameter | FieldGroup::Variable => {
                    // `:param int x:` carries the type inline
                    let (arg_type, arg_name) = match field_arg.rsplit_once(char::is_whitespace) {
                        Some((arg_type, arg_name)) => (Some(arg_type.trim()), arg_name),
                        None => (None, field_arg),
                    };
                    let (entries, types) = if group == FieldGroup::Parameter {
                        (&mut fields.parameters, &mut parameter_types)
                    } else {
                        (&mut fields.variables, &mut variable_types)
                    };
                    if let Some(arg_type) = arg_type {
                        types.insert(arg_name.to_string(), arg_type.to_string());
                    }
                    let description = self.markdown(body.children(), &mut fields.warnings)?;
                    entries.push(Parameter {
                        id: arg_name.to_string(),
                        types: Vec::new(),
                        description,
                    });
                }
                FieldGroup::ParameterType | FieldGroup::VariableType => {
                    let types = if group == FieldGroup::ParameterType {
                        &mut parameter_types
                    } else {
                        &mut variable_types
                    };
                    let type_text = inline_text(body);
                    if !type_text.is_empty() {
                        types.insert(field_arg.to_string(), type_text);
                    }
                }
                FieldGroup::Exception => {
                    let description = self.markdown(body.children(), &mut fields.warnings)?;
                    fields.exceptions.push(ExceptionEntry {
                        type_name: field_arg.to_string(),
                        description,
                    });
                }
                FieldGroup::ReturnValue => {
                    returns.description = self.markdown(body.children(), &mut fields.warnings)?;
                }
                FieldGroup::ReturnType => {
                    let type_text = inline_text(body);
                    if !type_text.is_empty() {
                        returns.types = vec![type_text];
                    }
                }
            }
        }

        apply_types(&mut fields.parameters, &parameter_types);
        apply_types(&mut fields.variables, &variable_types);
        if !returns.is_empty() {
            fields.returns = Some(returns);
        }

        Ok(passthrough)
    }

    /// Render an unrecognized field with its name capitalized.
    fn passthrough_field(
        &self,
        field_type: &str,
        field_arg: &str,
        body: &Node,
        warnings: &mut Vec<Warning>,
    ) -> Result<String> {
        let mut label = capitalize(field_type);
        if !field_arg.is_empty() {
            label.push(' ');
            label.push_str(field_arg);
        }
        let field = Node::Field(vec![Node::FieldName(vec![Node::text(label)]), body.clone()]);
        self.markdown(std::slice::from_ref(&field), warnings)
    }

    fn markdown(&self, nodes: &[Node], warnings: &mut Vec<Warning>) -> Result<String> {
        let rendered = self.renderer.render_nodes(nodes)?;
        warnings.extend(rendered.warnings);
        Ok(rendered.markdown.trim().to_string())
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

fn is_example(children: &[Node]) -> bool {
    children
        .first()
        .is_some_and(|node| matches!(node, Node::Title(_)) && node.astext().contains("Example"))
}

/// Text of the inline content of a field body. A body holding a single
/// paragraph is looked through; block content is ignored.
fn inline_text(body: &Node) -> String {
    let content = match body.children() {
        [Node::Paragraph(children)] => children.as_slice(),
        children => children,
    };
    content
        .iter()
        .filter(|node| !node.is_block())
        .map(Node::astext)
        .collect::<String>()
        .trim()
        .to_string()
}

fn apply_types(entries: &mut [Parameter], types: &HashMap<String, String>) {
    for entry in entries {
        if let Some(type_text) = types.get(&entry.id) {
            entry.types = vec![type_text.clone()];
        }
    }
}
