//! Core identity types for the story graph.
//!
//! [`NodeType`] enumerates the five story node kinds and carries the
//! catalog metadata the add-node menu renders. [`Position`] is the canvas
//! coordinate attached to every node.
//!
//! # Examples
//!
//! ```rust
//! use storygraph::types::NodeType;
//!
//! let kind: NodeType = "development".parse().unwrap();
//! assert_eq!(kind, NodeType::Development);
//! assert_eq!(kind.as_str(), "development");
//! assert!(!kind.is_terminal());
//! assert!(NodeType::Output.is_terminal());
//! ```

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string named a node type outside the fixed set of five.
///
/// This is a caller bug at the parse boundary (menus and snapshots are the
/// only producers of type strings); surface it in development rather than
/// to end users.
#[derive(Debug, Error, Diagnostic)]
#[error("unknown node type: {0:?}")]
#[diagnostic(
    code(storygraph::types::unknown_node_type),
    help("Valid node types are: idea, prompt, development, structure, output.")
)]
pub struct UnknownNodeTypeError(pub String);

/// The kind of a story node, fixed at creation.
///
/// The kind decides a node's default fields (see
/// [`factory::default_payload`](crate::factory::default_payload)) and its
/// role in the flow: every kind forwards data downstream except
/// [`Output`](Self::Output), which is terminal and triggers generation
/// instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A starting story concept.
    Idea,
    /// A request for AI assistance.
    Prompt,
    /// A developed story element (character, setting, plot, theme).
    Development,
    /// A structural unit organizing story flow.
    Structure,
    /// Terminal node that generates the final story instead of forwarding.
    Output,
}

impl NodeType {
    /// Every node kind, in add-node menu order.
    pub const ALL: [NodeType; 5] = [
        NodeType::Idea,
        NodeType::Prompt,
        NodeType::Development,
        NodeType::Structure,
        NodeType::Output,
    ];

    /// The persisted string form of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeType::Idea => "idea",
            NodeType::Prompt => "prompt",
            NodeType::Development => "development",
            NodeType::Structure => "structure",
            NodeType::Output => "output",
        }
    }

    /// Human-facing name for the add-node menu.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            NodeType::Idea => "Idea Node",
            NodeType::Prompt => "Prompt Node",
            NodeType::Development => "Development Node",
            NodeType::Structure => "Structure Node",
            NodeType::Output => "Output Node",
        }
    }

    /// One-line description for the add-node menu.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            NodeType::Idea => "Start with a story concept",
            NodeType::Prompt => "Request AI assistance",
            NodeType::Development => "Develop story elements",
            NodeType::Structure => "Organize story flow",
            NodeType::Output => "Generate the final story",
        }
    }

    /// Returns `true` for terminal kinds that generate instead of forwarding.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, NodeType::Output)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = UnknownNodeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(NodeType::Idea),
            "prompt" => Ok(NodeType::Prompt),
            "development" => Ok(NodeType::Development),
            "structure" => Ok(NodeType::Structure),
            "output" => Ok(NodeType::Output),
            other => Err(UnknownNodeTypeError(other.to_string())),
        }
    }
}

/// A 2D canvas coordinate. Owned by the (external) canvas layer; the graph
/// only stores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
