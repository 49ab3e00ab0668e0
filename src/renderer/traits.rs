use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreePath};
use crate::parser::Node;

/// Line width used when nothing else is configured. Large enough that only
/// author-written line breaks end up in the output.
pub const DEFAULT_WIDTH: usize = 999;

/// Configuration for rendering operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum display width of a wrapped line, indentation included.
    pub width: usize,
    pub newline: Newline,
    /// Directory marker that image paths are rewritten relative to.
    pub static_dir: String,
    /// Root that literal-block `source` paths are made relative to when
    /// emitting include markers.
    pub source_root: Option<PathBuf>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            newline: Newline::Unix,
            static_dir: "_static".to_string(),
            source_root: None,
        }
    }

    pub fn with_width(&self, width: usize) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }

    pub fn with_newline(&self, newline: Newline) -> Self {
        Self {
            newline,
            ..self.clone()
        }
    }

    /// Load a configuration file. JSON is accepted as well since it is a
    /// subset of YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Newline convention of the rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    Native,
    Unix,
    Windows,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            Newline::Unix => "\n",
            Newline::Windows => "\r\n",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "native" => Some(Newline::Native),
            "unix" | "lf" => Some(Newline::Unix),
            "windows" | "crlf" => Some(Newline::Windows),
            _ => None,
        }
    }
}

/// What the walker does after `enter` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the children, then call `leave`.
    Descend,
    /// Skip the children and `leave`.
    Skip,
}

/// Depth-first visitor over a node tree.
pub trait NodeVisitor {
    fn enter(&mut self, node: &Node, path: &TreePath) -> Result<Flow>;
    fn leave(&mut self, node: &Node, path: &TreePath) -> Result<()>;
}
