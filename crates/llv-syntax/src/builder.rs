//! Programmatic tree construction.
//!
//! Children are built before their parents, so every constructor takes
//! already-built child indices. Each node gets the next line number unless
//! a position was set with [`TreeBuilder::at`].

use crate::arena::{NodeArena, SyntaxTree};
use crate::node::{
    AssignOp, BinaryOp, ImportDecl, Literal, Modifier, NodeData, NodeIndex, UnaryOp,
};
use llv_common::SourceInfo;

pub struct TreeBuilder {
    file_name: String,
    arena: NodeArena,
    next_line: u32,
    pinned: Option<SourceInfo>,
}

impl TreeBuilder {
    pub fn new(file_name: impl Into<String>) -> Self {
        TreeBuilder {
            file_name: file_name.into(),
            arena: NodeArena::new(),
            next_line: 1,
            pinned: None,
        }
    }

    /// Use `line:column` as the position of the next node.
    pub fn at(&mut self, line: u32, column: u32) -> &mut Self {
        self.pinned = Some(SourceInfo::new(line, column));
        self
    }

    pub fn node(&mut self, data: NodeData) -> NodeIndex {
        let pos = self.pinned.take().unwrap_or_else(|| {
            let pos = SourceInfo::new(self.next_line, 1);
            self.next_line += 1;
            pos
        });
        self.arena.add(pos, data)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Finish the tree with `root` (normally a `SourceFile` node).
    pub fn finish(self, root: NodeIndex) -> SyntaxTree {
        SyntaxTree {
            file_name: self.file_name,
            arena: self.arena,
            root,
        }
    }

    // Declarations

    pub fn source_file(
        &mut self,
        package: Option<&str>,
        imports: &[&str],
        types: Vec<NodeIndex>,
    ) -> NodeIndex {
        let imports = imports
            .iter()
            .map(|name| match name.strip_suffix(".*") {
                Some(pkg) => ImportDecl {
                    name: pkg.to_string(),
                    on_demand: true,
                },
                None => ImportDecl {
                    name: name.to_string(),
                    on_demand: false,
                },
            })
            .collect();
        self.node(NodeData::SourceFile {
            package: package.map(str::to_string),
            imports,
            types,
        })
    }

    pub fn class_def(
        &mut self,
        modifiers: &[Modifier],
        name: &str,
        superclass: Option<&str>,
        interfaces: &[&str],
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::ClassDef {
            modifiers: modifiers.to_vec(),
            name: name.to_string(),
            type_params: Vec::new(),
            superclass: superclass.map(str::to_string),
            interfaces: strings(interfaces),
            members,
        })
    }

    pub fn interface_def(
        &mut self,
        modifiers: &[Modifier],
        name: &str,
        extends: &[&str],
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::InterfaceDef {
            modifiers: modifiers.to_vec(),
            name: name.to_string(),
            type_params: Vec::new(),
            extends: strings(extends),
            members,
        })
    }

    pub fn method_def(
        &mut self,
        modifiers: &[Modifier],
        return_type: &str,
        name: &str,
        params: Vec<NodeIndex>,
        throws: &[&str],
        body: Option<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::MethodDef {
            modifiers: modifiers.to_vec(),
            type_params: Vec::new(),
            return_type: return_type.to_string(),
            name: name.to_string(),
            params,
            throws: strings(throws),
            body,
        })
    }

    pub fn constructor_def(
        &mut self,
        modifiers: &[Modifier],
        name: &str,
        params: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.node(NodeData::ConstructorDef {
            modifiers: modifiers.to_vec(),
            name: name.to_string(),
            params,
            throws: Vec::new(),
            body,
        })
    }

    pub fn param(&mut self, ty: &str, name: &str) -> NodeIndex {
        self.node(NodeData::FormalParameter {
            is_final: false,
            ty: ty.to_string(),
            name: name.to_string(),
        })
    }

    pub fn declarator(&mut self, ty: &str, name: &str, initializer: Option<NodeIndex>) -> NodeIndex {
        self.node(NodeData::VariableDeclarator {
            ty: ty.to_string(),
            name: name.to_string(),
            initializer,
        })
    }

    pub fn var_decl(&mut self, modifiers: &[Modifier], declarators: Vec<NodeIndex>) -> NodeIndex {
        self.node(NodeData::VariableDeclaration {
            modifiers: modifiers.to_vec(),
            declarators,
        })
    }

    /// Single unmodified declaration `ty name;`.
    pub fn local(&mut self, ty: &str, name: &str) -> NodeIndex {
        let declarator = self.declarator(ty, name, None);
        self.var_decl(&[], vec![declarator])
    }

    // Statements

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.node(NodeData::Block { statements })
    }

    pub fn instance_initializer(&mut self, block: NodeIndex) -> NodeIndex {
        self.node(NodeData::InstanceInitializer { block })
    }

    pub fn try_catch(
        &mut self,
        try_block: NodeIndex,
        catches: Vec<NodeIndex>,
        finally_block: Option<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::TryCatch {
            try_block,
            catches,
            finally_block,
        })
    }

    pub fn catch_block(&mut self, exception: NodeIndex, block: NodeIndex) -> NodeIndex {
        self.node(NodeData::CatchBlock { exception, block })
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.node(NodeData::ExpressionStatement { expression })
    }

    pub fn return_stmt(&mut self, value: Option<NodeIndex>) -> NodeIndex {
        self.node(NodeData::Return { value })
    }

    pub fn if_stmt(
        &mut self,
        condition: NodeIndex,
        then_branch: NodeIndex,
        else_branch: Option<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    pub fn while_stmt(&mut self, condition: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.node(NodeData::While { condition, body })
    }

    pub fn for_stmt(
        &mut self,
        init: Vec<NodeIndex>,
        condition: Option<NodeIndex>,
        update: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.node(NodeData::For {
            init,
            condition,
            update,
            body,
        })
    }

    // Expressions

    pub fn binary(&mut self, op: BinaryOp, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.node(NodeData::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeIndex) -> NodeIndex {
        self.node(NodeData::Unary { op, operand })
    }

    pub fn assign(&mut self, op: AssignOp, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.node(NodeData::Assignment { op, target, value })
    }

    pub fn int(&mut self, value: i64) -> NodeIndex {
        self.node(NodeData::Literal {
            value: Literal::Int(value),
        })
    }

    pub fn string(&mut self, value: &str) -> NodeIndex {
        self.node(NodeData::Literal {
            value: Literal::String(value.to_string()),
        })
    }

    pub fn name(&mut self, name: &str) -> NodeIndex {
        self.node(NodeData::NameReference {
            name: name.to_string(),
        })
    }

    pub fn field_access(&mut self, receiver: NodeIndex, name: &str) -> NodeIndex {
        self.node(NodeData::FieldAccess {
            receiver,
            name: name.to_string(),
        })
    }

    pub fn call(
        &mut self,
        receiver: Option<NodeIndex>,
        name: &str,
        arguments: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::MethodInvocation {
            receiver,
            name: name.to_string(),
            arguments,
        })
    }

    pub fn this(&mut self) -> NodeIndex {
        self.node(NodeData::ThisReference { qualifier: None })
    }

    pub fn qualified_this(&mut self, qualifier: NodeIndex) -> NodeIndex {
        self.node(NodeData::ThisReference {
            qualifier: Some(qualifier),
        })
    }

    pub fn new_instance(&mut self, ty: &str, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.node(NodeData::Instantiation {
            outer: None,
            ty: ty.to_string(),
            arguments,
        })
    }

    pub fn anonymous_class(
        &mut self,
        ty: &str,
        arguments: Vec<NodeIndex>,
        members: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.node(NodeData::AnonymousClass {
            outer: None,
            ty: ty.to_string(),
            arguments,
            members,
        })
    }

    pub fn cast(&mut self, ty: &str, expression: NodeIndex) -> NodeIndex {
        self.node(NodeData::Cast {
            ty: ty.to_string(),
            expression,
        })
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
