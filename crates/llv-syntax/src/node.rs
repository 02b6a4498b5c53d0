//! Node definitions.
//!
//! A node is a position plus a `NodeData` payload. `SyntaxKind` is the
//! payload's tag, used by the analyzer to key per-level rules.

use llv_common::SourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Declaration modifiers, in the order they were written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
}

impl Modifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Native => "native",
            Modifier::Synchronized => "synchronized",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Modifiers = Vec<Modifier>;

/// An `import` declaration; `on_demand` is the `.*` form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub name: String,
    #[serde(default)]
    pub on_demand: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    InstanceOf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

/// Node kind tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,
    ClassDef,
    InterfaceDef,
    MethodDef,
    ConstructorDef,
    FormalParameter,
    VariableDeclaration,
    VariableDeclarator,
    Block,
    InstanceInitializer,
    TryCatch,
    CatchBlock,
    ExpressionStatement,
    Return,
    If,
    While,
    For,
    Binary,
    Unary,
    Assignment,
    Literal,
    NameReference,
    FieldAccess,
    MethodInvocation,
    ThisReference,
    Instantiation,
    AnonymousClass,
    Cast,
}

/// Node payloads. Child links are `NodeIndex` values into the same arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    SourceFile {
        #[serde(default)]
        package: Option<String>,
        #[serde(default)]
        imports: Vec<ImportDecl>,
        types: Vec<NodeIndex>,
    },
    ClassDef {
        #[serde(default)]
        modifiers: Modifiers,
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        superclass: Option<String>,
        #[serde(default)]
        interfaces: Vec<String>,
        members: Vec<NodeIndex>,
    },
    InterfaceDef {
        #[serde(default)]
        modifiers: Modifiers,
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        #[serde(default)]
        extends: Vec<String>,
        members: Vec<NodeIndex>,
    },
    MethodDef {
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        type_params: Vec<String>,
        return_type: String,
        name: String,
        params: Vec<NodeIndex>,
        #[serde(default)]
        throws: Vec<String>,
        /// `None` for abstract and interface methods.
        #[serde(default)]
        body: Option<NodeIndex>,
    },
    ConstructorDef {
        #[serde(default)]
        modifiers: Modifiers,
        name: String,
        params: Vec<NodeIndex>,
        #[serde(default)]
        throws: Vec<String>,
        body: NodeIndex,
    },
    FormalParameter {
        #[serde(default)]
        is_final: bool,
        ty: String,
        name: String,
    },
    VariableDeclaration {
        #[serde(default)]
        modifiers: Modifiers,
        declarators: Vec<NodeIndex>,
    },
    VariableDeclarator {
        ty: String,
        name: String,
        #[serde(default)]
        initializer: Option<NodeIndex>,
    },
    Block {
        statements: Vec<NodeIndex>,
    },
    InstanceInitializer {
        block: NodeIndex,
    },
    TryCatch {
        try_block: NodeIndex,
        catches: Vec<NodeIndex>,
        #[serde(default)]
        finally_block: Option<NodeIndex>,
    },
    CatchBlock {
        exception: NodeIndex,
        block: NodeIndex,
    },
    ExpressionStatement {
        expression: NodeIndex,
    },
    Return {
        #[serde(default)]
        value: Option<NodeIndex>,
    },
    If {
        condition: NodeIndex,
        then_branch: NodeIndex,
        #[serde(default)]
        else_branch: Option<NodeIndex>,
    },
    While {
        condition: NodeIndex,
        body: NodeIndex,
    },
    For {
        #[serde(default)]
        init: Vec<NodeIndex>,
        #[serde(default)]
        condition: Option<NodeIndex>,
        #[serde(default)]
        update: Vec<NodeIndex>,
        body: NodeIndex,
    },
    Binary {
        op: BinaryOp,
        left: NodeIndex,
        right: NodeIndex,
    },
    Unary {
        op: UnaryOp,
        operand: NodeIndex,
    },
    Assignment {
        op: AssignOp,
        target: NodeIndex,
        value: NodeIndex,
    },
    Literal {
        value: Literal,
    },
    NameReference {
        name: String,
    },
    FieldAccess {
        receiver: NodeIndex,
        name: String,
    },
    MethodInvocation {
        #[serde(default)]
        receiver: Option<NodeIndex>,
        name: String,
        arguments: Vec<NodeIndex>,
    },
    /// `this`, or `Outer.this` when `qualifier` is present.
    ThisReference {
        #[serde(default)]
        qualifier: Option<NodeIndex>,
    },
    Instantiation {
        #[serde(default)]
        outer: Option<NodeIndex>,
        ty: String,
        arguments: Vec<NodeIndex>,
    },
    AnonymousClass {
        #[serde(default)]
        outer: Option<NodeIndex>,
        ty: String,
        arguments: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    },
    Cast {
        ty: String,
        expression: NodeIndex,
    },
}

impl NodeData {
    pub const fn kind(&self) -> SyntaxKind {
        match self {
            NodeData::SourceFile { .. } => SyntaxKind::SourceFile,
            NodeData::ClassDef { .. } => SyntaxKind::ClassDef,
            NodeData::InterfaceDef { .. } => SyntaxKind::InterfaceDef,
            NodeData::MethodDef { .. } => SyntaxKind::MethodDef,
            NodeData::ConstructorDef { .. } => SyntaxKind::ConstructorDef,
            NodeData::FormalParameter { .. } => SyntaxKind::FormalParameter,
            NodeData::VariableDeclaration { .. } => SyntaxKind::VariableDeclaration,
            NodeData::VariableDeclarator { .. } => SyntaxKind::VariableDeclarator,
            NodeData::Block { .. } => SyntaxKind::Block,
            NodeData::InstanceInitializer { .. } => SyntaxKind::InstanceInitializer,
            NodeData::TryCatch { .. } => SyntaxKind::TryCatch,
            NodeData::CatchBlock { .. } => SyntaxKind::CatchBlock,
            NodeData::ExpressionStatement { .. } => SyntaxKind::ExpressionStatement,
            NodeData::Return { .. } => SyntaxKind::Return,
            NodeData::If { .. } => SyntaxKind::If,
            NodeData::While { .. } => SyntaxKind::While,
            NodeData::For { .. } => SyntaxKind::For,
            NodeData::Binary { .. } => SyntaxKind::Binary,
            NodeData::Unary { .. } => SyntaxKind::Unary,
            NodeData::Assignment { .. } => SyntaxKind::Assignment,
            NodeData::Literal { .. } => SyntaxKind::Literal,
            NodeData::NameReference { .. } => SyntaxKind::NameReference,
            NodeData::FieldAccess { .. } => SyntaxKind::FieldAccess,
            NodeData::MethodInvocation { .. } => SyntaxKind::MethodInvocation,
            NodeData::ThisReference { .. } => SyntaxKind::ThisReference,
            NodeData::Instantiation { .. } => SyntaxKind::Instantiation,
            NodeData::AnonymousClass { .. } => SyntaxKind::AnonymousClass,
            NodeData::Cast { .. } => SyntaxKind::Cast,
        }
    }

    /// Child nodes in source order.
    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        match self {
            NodeData::SourceFile { types, .. } => out.extend(types),
            NodeData::ClassDef { members, .. } | NodeData::InterfaceDef { members, .. } => {
                out.extend(members);
            }
            NodeData::MethodDef { params, body, .. } => {
                out.extend(params);
                out.extend(body);
            }
            NodeData::ConstructorDef { params, body, .. } => {
                out.extend(params);
                out.push(*body);
            }
            NodeData::FormalParameter { .. }
            | NodeData::Literal { .. }
            | NodeData::NameReference { .. } => {}
            NodeData::VariableDeclaration { declarators, .. } => out.extend(declarators),
            NodeData::VariableDeclarator { initializer, .. } => out.extend(initializer),
            NodeData::Block { statements } => out.extend(statements),
            NodeData::InstanceInitializer { block } => out.push(*block),
            NodeData::TryCatch {
                try_block,
                catches,
                finally_block,
            } => {
                out.push(*try_block);
                out.extend(catches);
                out.extend(finally_block);
            }
            NodeData::CatchBlock { exception, block } => {
                out.push(*exception);
                out.push(*block);
            }
            NodeData::ExpressionStatement { expression } => out.push(*expression),
            NodeData::Return { value } => out.extend(value),
            NodeData::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(*condition);
                out.push(*then_branch);
                out.extend(else_branch);
            }
            NodeData::While { condition, body } => {
                out.push(*condition);
                out.push(*body);
            }
            NodeData::For {
                init,
                condition,
                update,
                body,
            } => {
                out.extend(init);
                out.extend(condition);
                out.extend(update);
                out.push(*body);
            }
            NodeData::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeData::Unary { operand, .. } => out.push(*operand),
            NodeData::Assignment { target, value, .. } => {
                out.push(*target);
                out.push(*value);
            }
            NodeData::FieldAccess { receiver, .. } => out.push(*receiver),
            NodeData::MethodInvocation {
                receiver,
                arguments,
                ..
            } => {
                out.extend(receiver);
                out.extend(arguments);
            }
            NodeData::ThisReference { qualifier } => out.extend(qualifier),
            NodeData::Instantiation {
                outer, arguments, ..
            } => {
                out.extend(outer);
                out.extend(arguments);
            }
            NodeData::AnonymousClass {
                outer,
                arguments,
                members,
                ..
            } => {
                out.extend(outer);
                out.extend(arguments);
                out.extend(members);
            }
            NodeData::Cast { expression, .. } => out.push(*expression),
        }
        out
    }
}

/// A syntax node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub pos: SourceInfo,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    pub const fn kind(&self) -> SyntaxKind {
        self.data.kind()
    }
}
