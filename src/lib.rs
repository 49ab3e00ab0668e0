//! # docfx-yaml
//!
//! Renders docutils/Sphinx document trees as DocFX-flavoured Markdown and
//! pulls info-field data (parameters, return values, exceptions) out of
//! API description bodies.
//!
//! ```
//! use docfx_yaml::render_markdown;
//!
//! let json = r#"{"tag": "paragraph", "children": ["Hello, world."]}"#;
//! assert_eq!(render_markdown(json).unwrap(), "Hello, world.");
//! ```

pub mod docfields;
pub mod error;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use docfields::{DocFields, FieldExtractor};
pub use error::{Error, Result, TreePath, Warning};
pub use parser::{parse_doctree, Node};
pub use renderer::{MarkdownRenderer, RenderConfig, Rendered};

/// Render a JSON doctree with the default configuration, discarding warnings.
pub fn render_markdown(json: &str) -> Result<String> {
    Ok(MarkdownRenderer::default().render_json(json)?.markdown)
}
