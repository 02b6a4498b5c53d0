//! Node arena for syntax tree storage.

use crate::node::{Node, NodeData, NodeIndex};
use llv_common::SourceInfo;
use serde::{Deserialize, Serialize};

/// Arena-based storage for syntax nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, pos: SourceInfo, data: NodeData) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node { pos, data });
        NodeIndex(index)
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Position of a node, `SourceInfo::NONE` for dangling indices.
    pub fn pos(&self, index: NodeIndex) -> SourceInfo {
        self.get(index).map_or(SourceInfo::NONE, |n| n.pos)
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes reachable from `root`, in pre-order.
    pub fn descendants(&self, root: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.get(idx) else {
                continue;
            };
            out.push(idx);
            let mut children = node.data.children();
            children.reverse();
            stack.extend(children);
        }
        out
    }
}

/// One parsed source file: its name, nodes, and root `SourceFile` node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
}

impl SyntaxTree {
    /// Deserialize a tree produced by an external parser.
    pub fn from_json(text: &str) -> Result<SyntaxTree, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.arena.get(self.root)
    }
}
