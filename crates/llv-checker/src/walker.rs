//! Traversal engine.
//!
//! A [`LevelWalker`] is bound to one file, its level's [`PolicyChain`] and
//! the scope it walks. Each [`LevelWalker::visit`] runs four phases:
//!
//! 1. pre-check: the node is offered to the policy chain;
//! 2. pruning: a pruned node (by the chain now, or by an earlier error)
//!    stops here;
//! 3. children: scope-introducing nodes create their scope in the symbol
//!    table and continue in a child walker bound to it;
//! 4. post-check: classes are completed and waiting continuations resumed.

use crate::context::{CheckerContext, FileId, object_ref};
use crate::continuations::{Continuation, DeferredCheck};
use crate::policy::{Directive, PolicyChain, RuleCx, ScopeKind, Step};
use crate::resolve::{self, Resolution};
use llv_binder::{
    BodyId, MethodData, ScopeRef, SymbolId, TypeRef, VariableData, modifier_bits, modifier_flags,
};
use llv_common::limits::{STACK_GROW_SIZE, STACK_RED_ZONE};
use llv_common::{Diagnostic, SourceInfo, diagnostic_codes, diagnostic_messages, format_message};
use llv_syntax::{Modifier, Node, NodeData, NodeIndex, SyntaxTree};
use tracing::{debug, trace};

/// Result of visiting one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Children were visited but the node itself raised diagnostics.
    ContinueWithDiagnostic,
    /// Children were not visited.
    StopSubtree,
}

impl Outcome {
    pub fn is_stop(self) -> bool {
        self == Outcome::StopSubtree
    }
}

/// The scope a walker is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkScope {
    File,
    Class(SymbolId),
    Body(BodyId),
}

impl WalkScope {
    pub fn kind(self) -> ScopeKind {
        match self {
            WalkScope::File => ScopeKind::File,
            WalkScope::Class(_) => ScopeKind::ClassBody,
            WalkScope::Body(_) => ScopeKind::Body,
        }
    }

    pub fn scope_ref(self) -> Option<ScopeRef> {
        match self {
            WalkScope::File => None,
            WalkScope::Class(id) => Some(ScopeRef::Symbol(id)),
            WalkScope::Body(body) => Some(body.into()),
        }
    }
}

/// Fields shared by class and interface declarations.
struct TypeDecl<'t> {
    modifiers: &'t [Modifier],
    name: &'t str,
    type_params: &'t [String],
    is_interface: bool,
    superclass: Option<&'t str>,
    interfaces: &'t [String],
    members: &'t [NodeIndex],
}

/// Fields shared by method and constructor declarations.
struct MethodDecl<'t> {
    modifiers: &'t [Modifier],
    type_params: &'t [String],
    return_type: Option<&'t str>,
    name: &'t str,
    params: &'t [NodeIndex],
    throws: &'t [String],
    body: Option<NodeIndex>,
    is_constructor: bool,
}

/// A declared variable before it enters the symbol table.
struct PendingVar<'t> {
    ty: &'t str,
    name: &'t str,
    pos: SourceInfo,
}

pub struct LevelWalker<'c, 't> {
    cx: &'c mut CheckerContext,
    tree: &'t SyntaxTree,
    chain: &'t PolicyChain,
    file: FileId,
    scope: WalkScope,
    depth: u32,
    /// Set when the node being visited reported something itself.
    raised: bool,
}

impl<'c, 't> LevelWalker<'c, 't> {
    pub fn new(
        cx: &'c mut CheckerContext,
        tree: &'t SyntaxTree,
        chain: &'t PolicyChain,
        file: FileId,
    ) -> Self {
        LevelWalker {
            cx,
            tree,
            chain,
            file,
            scope: WalkScope::File,
            depth: 0,
            raised: false,
        }
    }

    pub fn scope(&self) -> WalkScope {
        self.scope
    }

    /// Walk the tree's root node.
    pub fn walk(&mut self) -> Outcome {
        let root = self.tree.root;
        self.visit(root)
    }

    /// A walker over the same file bound to `scope`, at the current depth.
    pub fn scoped(&mut self, scope: WalkScope) -> LevelWalker<'_, 't> {
        LevelWalker {
            cx: &mut *self.cx,
            tree: self.tree,
            chain: self.chain,
            file: self.file,
            scope,
            depth: self.depth,
            raised: false,
        }
    }

    fn diagnostic(&self, pos: SourceInfo, message: String, code: u32) -> Diagnostic {
        let file_name = self.cx.file(self.file).map_or("", |f| f.name.as_str());
        Diagnostic::error(file_name, pos, message, code)
    }

    /// Record an error and keep going.
    fn report(&mut self, pos: SourceInfo, message: String, code: u32) {
        let diagnostic = self.diagnostic(pos, message, code);
        self.cx.log.add_and_ignore_error(diagnostic);
        self.raised = true;
    }

    /// Record an error and skip `node`'s children.
    fn report_pruning(&mut self, node: NodeIndex, pos: SourceInfo, message: String, code: u32) {
        let diagnostic = self.diagnostic(pos, message, code);
        self.cx.log.add_error(self.file, node, diagnostic);
        self.raised = true;
    }

    fn in_constructor(&self) -> bool {
        match self.scope {
            WalkScope::Body(body) => self.cx.table.is_constructor(body),
            _ => false,
        }
    }

    /// Check `idx` against the level policy, then visit its children.
    pub fn visit(&mut self, idx: NodeIndex) -> Outcome {
        let tree = self.tree;
        let Some(node) = tree.arena.get(idx) else {
            return Outcome::Continue;
        };
        let outer_raised = std::mem::replace(&mut self.raised, false);
        let outcome = match self.enter(idx, node) {
            None => Outcome::StopSubtree,
            Some(directive) => {
                self.depth += 1;
                stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
                    self.visit_node(idx, node, directive)
                });
                self.depth -= 1;
                if self.cx.log.is_pruned(self.file, idx) {
                    Outcome::StopSubtree
                } else if self.raised {
                    Outcome::ContinueWithDiagnostic
                } else {
                    Outcome::Continue
                }
            }
        };
        self.raised = outer_raised;
        outcome
    }

    /// Pruning, depth and policy checks for `node`. `None` when its children
    /// must not be visited.
    fn enter(&mut self, idx: NodeIndex, node: &Node) -> Option<Directive> {
        if self.cx.log.is_pruned(self.file, idx) {
            return None;
        }
        let max_depth = self.cx.options.max_visit_depth;
        if self.depth >= max_depth {
            let message = format_message(
                diagnostic_messages::NESTING_TOO_DEEP,
                &[max_depth.to_string().as_str()],
            );
            self.report_pruning(idx, node.pos, message, diagnostic_codes::NESTING_TOO_DEEP);
            return None;
        }

        // Pre-check
        let level = self
            .cx
            .file(self.file)
            .map_or(self.chain.level(), |f| f.level);
        let mut rule_cx = RuleCx::new(node, self.scope.kind(), level, self.in_constructor());
        let step = self.chain.check(&mut rule_cx);
        let (directive, raised) = rule_cx.into_parts();

        // Pruning
        if step == Step::Prune {
            let mut raised = raised.into_iter();
            match raised.next() {
                Some(first) => self.report_pruning(idx, node.pos, first.message, first.code),
                None => trace!(node = idx.0, "pruned without diagnostic"),
            }
            for rest in raised {
                self.report(node.pos, rest.message, rest.code);
            }
            return None;
        }
        for r in raised {
            self.report(node.pos, r.message, r.code);
        }
        Some(directive)
    }

    fn visit_node(&mut self, idx: NodeIndex, node: &'t Node, directive: Directive) {
        let tree = self.tree;
        match &node.data {
            NodeData::SourceFile {
                package,
                imports,
                types,
            } => {
                if let Some(file) = self.cx.file_mut(self.file) {
                    file.record_header(package.as_deref(), imports);
                    for &ty in types {
                        match tree.arena.get(ty).map(|n| &n.data) {
                            Some(NodeData::ClassDef { name, .. })
                            | Some(NodeData::InterfaceDef { name, .. }) => file.declare_class(name),
                            _ => {}
                        }
                    }
                }
                for &ty in types {
                    self.visit(ty);
                }
            }
            NodeData::ClassDef {
                modifiers,
                name,
                type_params,
                superclass,
                interfaces,
                members,
            } => self.visit_type_decl(
                idx,
                node.pos,
                TypeDecl {
                    modifiers,
                    name,
                    type_params,
                    is_interface: false,
                    superclass: superclass.as_deref(),
                    interfaces,
                    members,
                },
            ),
            NodeData::InterfaceDef {
                modifiers,
                name,
                type_params,
                extends,
                members,
            } => self.visit_type_decl(
                idx,
                node.pos,
                TypeDecl {
                    modifiers,
                    name,
                    type_params,
                    is_interface: true,
                    superclass: None,
                    interfaces: extends,
                    members,
                },
            ),
            NodeData::MethodDef {
                modifiers,
                type_params,
                return_type,
                name,
                params,
                throws,
                body,
            } => self.visit_method(
                node.pos,
                MethodDecl {
                    modifiers,
                    type_params,
                    return_type: Some(return_type.as_str()),
                    name,
                    params,
                    throws,
                    body: *body,
                    is_constructor: false,
                },
            ),
            NodeData::ConstructorDef {
                modifiers,
                name,
                params,
                throws,
                body,
            } => self.visit_method(
                node.pos,
                MethodDecl {
                    modifiers,
                    type_params: &[],
                    return_type: None,
                    name,
                    params,
                    throws,
                    body: Some(*body),
                    is_constructor: true,
                },
            ),
            NodeData::VariableDeclaration {
                modifiers,
                declarators,
            } => self.visit_variable_declaration(modifiers, declarators, directive.force_final),
            NodeData::Block { statements } => self.visit_block(statements),
            NodeData::InstanceInitializer { block } => self.visit_initializer(*block),
            NodeData::CatchBlock { exception, block } => self.visit_catch(*exception, *block),
            NodeData::For { .. } => self.visit_for(&node.data),
            NodeData::Instantiation { ty, .. } => {
                self.link_type(ty, node.pos, DeferredCheck::InstantiatedType);
                self.visit_children(&node.data);
            }
            NodeData::Cast { ty, expression } => {
                self.link_type(ty, node.pos, DeferredCheck::InstantiatedType);
                self.visit(*expression);
            }
            NodeData::AnonymousClass {
                outer,
                ty,
                arguments,
                members,
            } => {
                if let Some(outer) = outer {
                    self.visit(*outer);
                }
                for &arg in arguments {
                    self.visit(arg);
                }
                self.visit_anonymous_class(idx, node.pos, ty, members);
            }
            NodeData::FormalParameter { .. } => {}
            _ => self.visit_children(&node.data),
        }
    }

    fn visit_children(&mut self, data: &NodeData) {
        for child in data.children() {
            self.visit(child);
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Qualified name for a class declared in the current scope.
    fn qualified_class_name(&mut self, simple: &str) -> String {
        match self.scope {
            WalkScope::File => self
                .cx
                .file(self.file)
                .map_or_else(|| simple.to_string(), |f| f.qualify(simple)),
            WalkScope::Class(outer) => format!("{}${}", self.cx.table.symbol(outer).name, simple),
            WalkScope::Body(body) => {
                let table = &mut self.cx.table;
                let owner = table.enclosing_symbol(body.into());
                let n = table.preincrement_local_class_num(owner);
                format!("{}${}{}", table.symbol(owner).name, n, simple)
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, decl), fields(name = decl.name))]
    fn visit_type_decl(&mut self, idx: NodeIndex, pos: SourceInfo, decl: TypeDecl<'t>) {
        let qualified = self.qualified_class_name(decl.name);
        let id = match self.cx.table.begin_definition(&qualified) {
            Ok(id) => id,
            Err(_) => {
                let message =
                    format_message(diagnostic_messages::DUPLICATE_CLASS, &[qualified.as_str()]);
                self.report_pruning(idx, pos, message, diagnostic_codes::DUPLICATE_CLASS);
                return;
            }
        };
        debug!(class = %qualified, "defining class");

        let outer = self.scope.scope_ref();
        {
            let symbol = self.cx.table.symbol_mut(id);
            symbol.modifiers = modifier_bits(decl.modifiers);
            symbol.is_interface = decl.is_interface;
            symbol.type_params = decl.type_params.to_vec();
            symbol.outer = outer;
        }
        if let Some(outer) = outer {
            let enclosing = self.cx.table.enclosing_symbol(outer);
            self.cx.table.symbol_mut(enclosing).inner_classes.push(id);
        }

        let mut members = self.scoped(WalkScope::Class(id));
        // Supertypes resolve inside the class so its type parameters are visible.
        match decl.superclass {
            Some(superclass) => {
                members.cx.table.symbol_mut(id).superclass = Some(TypeRef::unresolved(superclass));
                members.link_type(superclass, pos, DeferredCheck::Superclass { class: id });
            }
            None if !decl.is_interface && qualified != crate::context::OBJECT_CLASS => {
                let object = object_ref(&members.cx.table);
                members.cx.table.symbol_mut(id).superclass = Some(object);
            }
            None => {}
        }
        for (index, interface) in decl.interfaces.iter().enumerate() {
            members
                .cx
                .table
                .symbol_mut(id)
                .interfaces
                .push(TypeRef::unresolved(interface.as_str()));
            members.link_type(interface, pos, DeferredCheck::Interface { class: id, index });
        }
        let stopped = decl
            .members
            .iter()
            .filter(|&&member| members.visit(member).is_stop())
            .count();

        debug!(class = %qualified, stopped, "class complete");
        self.cx.define_complete(id);
    }

    fn visit_anonymous_class(&mut self, idx: NodeIndex, pos: SourceInfo, base: &str, members: &[NodeIndex]) {
        let Some(scope) = self.scope.scope_ref() else {
            return;
        };
        let owner = self.cx.table.enclosing_symbol(scope);
        let n = self.cx.table.preincrement_local_class_num(owner);
        let qualified = format!("{}${}", self.cx.table.symbol(owner).name, n);
        let id = match self.cx.table.begin_definition(&qualified) {
            Ok(id) => id,
            Err(_) => {
                let message =
                    format_message(diagnostic_messages::DUPLICATE_CLASS, &[qualified.as_str()]);
                self.report_pruning(idx, pos, message, diagnostic_codes::DUPLICATE_CLASS);
                return;
            }
        };
        debug!(class = %qualified, base, "defining anonymous class");
        self.cx.table.symbol_mut(id).outer = Some(scope);
        self.cx.table.symbol_mut(owner).inner_classes.push(id);
        self.link_type(base, pos, DeferredCheck::AnonymousBase { class: id });

        let mut walker = self.scoped(WalkScope::Class(id));
        for &member in members {
            walker.visit(member);
        }
        self.cx.define_complete(id);
    }

    fn visit_method(&mut self, pos: SourceInfo, decl: MethodDecl<'t>) {
        let WalkScope::Class(owner) = self.scope else {
            return;
        };
        let mut data = MethodData::new(decl.name, owner);
        data.modifiers = modifier_bits(decl.modifiers);
        data.type_params = decl.type_params.to_vec();
        data.return_type = decl.return_type.map(|t| TypeRef::unresolved(t));
        data.thrown = decl.throws.iter().map(|t| TypeRef::unresolved(t.as_str())).collect();
        data.is_constructor = decl.is_constructor;
        let method = self.cx.table.add_method(data);
        trace!(name = decl.name, constructor = decl.is_constructor, "method");

        if decl.is_constructor {
            let class_name = {
                let simple = self.cx.table.symbol(owner).simple_name();
                simple.rsplit('$').next().unwrap_or(simple).to_string()
            };
            if decl.name != class_name {
                let message = format_message(
                    diagnostic_messages::CONSTRUCTOR_NAME_MISMATCH,
                    &[decl.name, class_name.as_str()],
                );
                self.report(pos, message, diagnostic_codes::CONSTRUCTOR_NAME_MISMATCH);
            }
        }

        let tree = self.tree;
        let params: Vec<(PendingVar<'t>, bool)> = decl
            .params
            .iter()
            .filter_map(|&p| {
                let node = tree.arena.get(p)?;
                match &node.data {
                    NodeData::FormalParameter { is_final, ty, name } => Some((
                        PendingVar {
                            ty,
                            name,
                            pos: node.pos,
                        },
                        *is_final,
                    )),
                    _ => None,
                }
            })
            .collect();
        let scope = ScopeRef::Method(method);
        let vars = params
            .iter()
            .map(|(p, is_final)| {
                let modifiers = if *is_final {
                    modifier_flags::FINAL
                } else {
                    modifier_flags::NONE
                };
                VariableData::new(p.name, modifiers, TypeRef::unresolved(p.ty), true, scope)
            })
            .collect();
        let declared = self.cx.table.add_params(method, vars);
        for name in &declared.duplicates {
            let at = last_position(params.iter().map(|(p, _)| p), name).unwrap_or(pos);
            self.report(
                at,
                diagnostic_messages::DUPLICATE_PARAMETER.to_string(),
                diagnostic_codes::DUPLICATE_PARAMETER,
            );
        }

        let mut body = self.scoped(WalkScope::Body(BodyId::Method(method)));
        if let Some(return_type) = decl.return_type {
            body.link_type(return_type, pos, DeferredCheck::ReturnType { method });
        }
        for (index, thrown) in decl.throws.iter().enumerate() {
            body.link_type(thrown, pos, DeferredCheck::ThrownType { method, index });
        }
        for ((param, _), &variable) in params.iter().zip(&declared.ids) {
            body.link_type(param.ty, param.pos, DeferredCheck::VariableType { variable });
        }
        if let Some(block) = decl.body {
            body.visit_statements_of(block);
        }
    }

    fn visit_variable_declaration(
        &mut self,
        modifiers: &[Modifier],
        declarators: &[NodeIndex],
        force_final: bool,
    ) {
        let scope = self.scope;
        let Some(scope_ref) = scope.scope_ref() else {
            return;
        };
        let tree = self.tree;
        let mut pending = Vec::with_capacity(declarators.len());
        let mut initializers = Vec::new();
        for &d in declarators {
            let Some(node) = tree.arena.get(d) else {
                continue;
            };
            if let NodeData::VariableDeclarator {
                ty,
                name,
                initializer,
            } = &node.data
            {
                pending.push((
                    PendingVar {
                        ty,
                        name,
                        pos: node.pos,
                    },
                    initializer.is_some(),
                ));
                initializers.extend(*initializer);
            }
        }

        let bits = modifier_bits(modifiers);
        let vars = pending
            .iter()
            .map(|(v, has_initializer)| {
                let mut var = VariableData::new(
                    v.name,
                    bits,
                    TypeRef::unresolved(v.ty),
                    *has_initializer,
                    scope_ref,
                );
                if force_final {
                    var.set_final();
                }
                var
            })
            .collect();
        let declared = match scope {
            WalkScope::Class(symbol) => self.cx.table.add_fields(symbol, vars),
            WalkScope::Body(body) => {
                let policy = self.cx.options.duplicate_scope;
                self.cx.table.add_vars(body, vars, policy)
            }
            WalkScope::File => return,
        };
        for name in &declared.duplicates {
            let at = last_position(pending.iter().map(|(v, _)| v), name).unwrap_or_default();
            match scope {
                WalkScope::Class(_) => {
                    let message =
                        format_message(diagnostic_messages::DUPLICATE_FIELD, &[name.as_str()]);
                    self.report(at, message, diagnostic_codes::DUPLICATE_FIELD);
                }
                _ => self.report(
                    at,
                    diagnostic_messages::DUPLICATE_VARIABLE.to_string(),
                    diagnostic_codes::DUPLICATE_VARIABLE,
                ),
            }
        }
        for ((var, _), &variable) in pending.iter().zip(&declared.ids) {
            self.link_type(var.ty, var.pos, DeferredCheck::VariableType { variable });
        }
        for init in initializers {
            self.visit(init);
        }
    }

    // =========================================================================
    // Bodies and blocks
    // =========================================================================

    /// Visit a body block's statements in the current scope without opening
    /// a nested block.
    fn visit_statements_of(&mut self, block: NodeIndex) {
        let tree = self.tree;
        let Some(node) = tree.arena.get(block) else {
            return;
        };
        let NodeData::Block { statements } = &node.data else {
            self.visit(block);
            return;
        };
        let outer_raised = std::mem::replace(&mut self.raised, false);
        if self.enter(block, node).is_some() {
            self.depth += 1;
            for &stmt in statements {
                self.visit(stmt);
            }
            self.depth -= 1;
        }
        self.raised = outer_raised;
    }

    fn open_block(&mut self) -> Option<WalkScope> {
        let outer = self.scope.scope_ref()?;
        let block = self.cx.table.add_block(outer);
        Some(WalkScope::Body(BodyId::Block(block)))
    }

    fn visit_block(&mut self, statements: &[NodeIndex]) {
        let Some(scope) = self.open_block() else {
            return;
        };
        let mut walker = self.scoped(scope);
        for &stmt in statements {
            walker.visit(stmt);
        }
    }

    fn visit_initializer(&mut self, block: NodeIndex) {
        match self.scope {
            // Inside a body an initializer is an ordinary nested block.
            WalkScope::Body(_) => {
                self.visit(block);
            }
            WalkScope::Class(_) => {
                let Some(scope) = self.open_block() else {
                    return;
                };
                self.scoped(scope).visit_statements_of(block);
            }
            WalkScope::File => {}
        }
    }

    fn visit_catch(&mut self, exception: NodeIndex, block: NodeIndex) {
        let WalkScope::Body(_) = self.scope else {
            return;
        };
        let Some(WalkScope::Body(catch_body)) = self.open_block() else {
            return;
        };
        let tree = self.tree;
        let mut walker = self.scoped(WalkScope::Body(catch_body));
        if let Some(node) = tree.arena.get(exception) {
            if let NodeData::FormalParameter { is_final, ty, name } = &node.data {
                let modifiers = if *is_final {
                    modifier_flags::FINAL
                } else {
                    modifier_flags::NONE
                };
                let var = VariableData::new(
                    name.as_str(),
                    modifiers,
                    TypeRef::unresolved(ty.as_str()),
                    true,
                    catch_body.into(),
                );
                let policy = walker.cx.options.duplicate_scope;
                let declared = walker.cx.table.add_vars(catch_body, vec![var], policy);
                if !declared.all_fresh() {
                    walker.report(
                        node.pos,
                        diagnostic_messages::DUPLICATE_VARIABLE.to_string(),
                        diagnostic_codes::DUPLICATE_VARIABLE,
                    );
                }
                if let Some(&variable) = declared.ids.first() {
                    walker.link_type(ty, node.pos, DeferredCheck::VariableType { variable });
                }
            }
        }
        walker.visit_statements_of(block);
        let duplicate = walker.raised;
        self.raised |= duplicate;
    }

    fn visit_for(&mut self, data: &NodeData) {
        match self.open_block() {
            Some(scope @ WalkScope::Body(_)) => self.scoped(scope).visit_children(data),
            _ => self.visit_children(data),
        }
    }

    // =========================================================================
    // Type references
    // =========================================================================

    /// Resolve `written` now, or queue a continuation that runs `check` when
    /// the type is declared.
    fn link_type(&mut self, written: &str, pos: SourceInfo, check: DeferredCheck) {
        let base = resolve::base_type_name(written);
        let scope = self.scope.scope_ref();
        if base.is_empty() || resolve::is_type_param(&self.cx.table, scope, base) {
            return;
        }
        let enclosing = scope.map(|s| self.cx.table.enclosing_symbol(s));
        let Some(file) = self.cx.file(self.file) else {
            return;
        };
        match resolve::resolve_type(&self.cx.table, file, enclosing, base) {
            Resolution::Found(target) => self.cx.apply(self.file, pos, check, target),
            Resolution::Pending { key, alternatives } => {
                self.cx.table.get_or_add_placeholder(&key);
                let continuation =
                    Continuation::new(key, pos, self.file, check).with_alternatives(alternatives);
                self.cx.resolver.request_resolution(continuation);
            }
        }
    }
}

/// Position of the last declaration named `name`.
fn last_position<'a, 't: 'a>(
    vars: impl DoubleEndedIterator<Item = &'a PendingVar<'t>>,
    name: &str,
) -> Option<SourceInfo> {
    vars.rev().find(|v| v.name == name).map(|v| v.pos)
}
