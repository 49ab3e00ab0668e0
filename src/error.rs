//! Error and warning types for doctree loading and rendering.

use std::fmt;

use thiserror::Error;

/// One step of a [`TreePath`]: the node kind and its index among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: String,
    pub index: usize,
}

/// Location of a node in the tree, from the root down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePath {
    segments: Vec<Segment>,
}

impl TreePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: impl Into<String>, index: usize) {
        self.segments.push(Segment {
            kind: kind.into(),
            index,
        });
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Kind of the parent of the last segment, if any.
    pub fn parent_kind(&self) -> Option<&str> {
        let len = self.segments.len();
        if len < 2 {
            return None;
        }
        Some(self.segments[len - 2].kind.as_str())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}[{}]", segment.kind, segment.index)?;
        }
        Ok(())
    }
}

/// Fatal errors: the current load or render call is aborted.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported node kind `{kind}` at {path}")]
    UnsupportedNodeKind { kind: String, path: TreePath },

    #[error("nested tables are not supported (at {path})")]
    UnsupportedNestedTable { path: TreePath },

    #[error("table cells spanning rows or columns are not supported (at {path})")]
    UnsupportedSpanningCell { path: TreePath },

    #[error("malformed `{kind}` node at {path}: {reason}")]
    MalformedNode {
        kind: String,
        path: TreePath,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable conditions: rendering continues and the warning is reported
/// next to the output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("malformed field list entry at {path}: expected name and body, found {children} children")]
    MalformedFieldList { path: TreePath, children: usize },

    #[error("image not found where expected: {uri} (at {path})")]
    ImageAssetNotFound { uri: String, path: TreePath },

    #[error("math markup is not supported, skipped (at {path})")]
    MathWithoutExtension { path: TreePath },

    #[error("system message: {text}")]
    SystemMessage { text: String, path: TreePath },
}
