//! Syntax tree for the language-level dialects.
//!
//! Trees are produced by an external parser and handed to the analyzer
//! either through [`TreeBuilder`] or as JSON (see [`SyntaxTree::from_json`]).
//! Nodes live in a [`NodeArena`] and reference each other by [`NodeIndex`].

pub mod node;
pub use node::{
    AssignOp, BinaryOp, ImportDecl, Literal, Modifier, Modifiers, Node, NodeData, NodeIndex,
    SyntaxKind, UnaryOp,
};

pub mod arena;
pub use arena::{NodeArena, SyntaxTree};

pub mod builder;
pub use builder::TreeBuilder;

#[cfg(test)]
#[path = "tests/arena_tests.rs"]
mod arena_tests;
#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod builder_tests;
