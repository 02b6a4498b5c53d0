//! Level policy chain.
//!
//! Each language level owns one static [`RuleTable`] keyed by the kind of
//! scope a node appears in and the node's [`SyntaxKind`]. The chain for a
//! level holds that level's table followed by the tables of every more
//! permissive level, ending with Full Java. A node is offered to each table
//! in turn until a rule accepts or prunes it.

use crate::level::LanguageLevel;
use llv_common::{diagnostic_codes, diagnostic_messages, format_message};
use llv_syntax::{AssignOp, BinaryOp, Modifier, Node, NodeData, SyntaxKind, UnaryOp};
use smallvec::SmallVec;
use tracing::trace;

/// Where a node appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Top level of a source file.
    File,
    /// Directly inside a class or interface body.
    ClassBody,
    /// Inside a method, constructor or block body.
    Body,
    /// Matches any scope; consulted after the specific entries of a table.
    Any,
}

/// What a rule decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// No opinion: ask the next table in the chain.
    Forward,
    /// The node is legal; stop consulting the chain.
    Accept,
    /// The node is illegal; an error was raised and its children are skipped.
    Prune,
}

/// Obligations rules place on the generic handling of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directive {
    /// Mark every declared local variable final.
    pub force_final: bool,
}

/// A diagnostic raised by a rule, positioned later at the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raised {
    pub message: String,
    pub code: u32,
}

/// What a rule sees of the node being checked.
pub struct RuleCx<'a> {
    pub node: &'a Node,
    pub scope: ScopeKind,
    /// Level of the file being checked.
    pub level: LanguageLevel,
    /// The node is inside a constructor body.
    pub in_constructor: bool,
    pub directive: Directive,
    raised: SmallVec<[Raised; 1]>,
}

impl<'a> RuleCx<'a> {
    pub fn new(node: &'a Node, scope: ScopeKind, level: LanguageLevel, in_constructor: bool) -> Self {
        RuleCx {
            node,
            scope,
            level,
            in_constructor,
            directive: Directive::default(),
            raised: SmallVec::new(),
        }
    }

    pub fn raise(&mut self, message: String, code: u32) {
        self.raised.push(Raised { message, code });
    }

    pub fn raised(&self) -> &[Raised] {
        &self.raised
    }

    pub fn into_parts(self) -> (Directive, SmallVec<[Raised; 1]>) {
        (self.directive, self.raised)
    }
}

pub type Rule = fn(&mut RuleCx<'_>) -> Step;

pub struct RuleEntry {
    pub scope: ScopeKind,
    pub kind: SyntaxKind,
    pub rule: Rule,
}

impl RuleEntry {
    pub const fn new(scope: ScopeKind, kind: SyntaxKind, rule: Rule) -> Self {
        RuleEntry { scope, kind, rule }
    }
}

/// The rules one level adds.
pub struct RuleTable {
    pub level: LanguageLevel,
    pub entries: &'static [RuleEntry],
}

impl RuleTable {
    /// The rule for `kind` in `scope`; an entry for the exact scope wins
    /// over an `Any` entry.
    pub fn rule_for(&self, scope: ScopeKind, kind: SyntaxKind) -> Option<Rule> {
        let matching = |wanted: ScopeKind| {
            self.entries
                .iter()
                .find(|e| e.kind == kind && e.scope == wanted)
                .map(|e| e.rule)
        };
        matching(scope).or_else(|| matching(ScopeKind::Any))
    }

    pub fn for_level(level: LanguageLevel) -> &'static RuleTable {
        match level {
            LanguageLevel::Elementary => &ELEMENTARY_RULES,
            LanguageLevel::Intermediate => &INTERMEDIATE_RULES,
            LanguageLevel::Advanced => &ADVANCED_RULES,
            LanguageLevel::Full => &FULL_RULES,
        }
    }
}

/// Ordered rule tables for one level.
#[derive(Clone)]
pub struct PolicyChain {
    level: LanguageLevel,
    tables: SmallVec<[&'static RuleTable; 4]>,
}

impl PolicyChain {
    pub fn for_level(level: LanguageLevel) -> Self {
        let mut tables = SmallVec::new();
        let mut next = Some(level);
        while let Some(current) = next {
            tables.push(RuleTable::for_level(current));
            next = current.next_permissive();
        }
        PolicyChain { level, tables }
    }

    pub fn level(&self) -> LanguageLevel {
        self.level
    }

    /// Levels whose tables are consulted, in order.
    pub fn levels(&self) -> impl Iterator<Item = LanguageLevel> + '_ {
        self.tables.iter().map(|t| t.level)
    }

    /// Offer the node to each table until one accepts or prunes it.
    pub fn check(&self, cx: &mut RuleCx<'_>) -> Step {
        let kind = cx.node.kind();
        for table in &self.tables {
            let Some(rule) = table.rule_for(cx.scope, kind) else {
                continue;
            };
            match rule(cx) {
                Step::Forward => {}
                step => {
                    trace!(?kind, table = %table.level, ?step, "policy decided");
                    return step;
                }
            }
        }
        Step::Accept
    }
}

// =============================================================================
// Full Java
// =============================================================================

static FULL_RULES: RuleTable = RuleTable {
    level: LanguageLevel::Full,
    entries: &[RuleEntry::new(
        ScopeKind::Body,
        SyntaxKind::MethodDef,
        method_in_body,
    )],
};

fn method_in_body(cx: &mut RuleCx<'_>) -> Step {
    cx.raise(
        diagnostic_messages::METHOD_DEFINITION_IN_BODY.to_string(),
        diagnostic_codes::METHOD_DEFINITION_IN_BODY,
    );
    Step::Prune
}

// =============================================================================
// Advanced (shared by every restricted level)
// =============================================================================

static ADVANCED_RULES: RuleTable = RuleTable {
    level: LanguageLevel::Advanced,
    entries: &[
        RuleEntry::new(ScopeKind::Any, SyntaxKind::Binary, bitwise_binary),
        RuleEntry::new(ScopeKind::Any, SyntaxKind::Unary, bitwise_not),
        RuleEntry::new(ScopeKind::Any, SyntaxKind::Assignment, bitwise_assignment),
        RuleEntry::new(
            ScopeKind::Body,
            SyntaxKind::VariableDeclaration,
            only_final_on_locals,
        ),
        RuleEntry::new(
            ScopeKind::ClassBody,
            SyntaxKind::InstanceInitializer,
            initializer_at_class_scope,
        ),
    ],
};

fn bitwise_error(cx: &mut RuleCx<'_>, found: Option<(&'static str, u32)>) -> Step {
    match found {
        Some((message, code)) => {
            cx.raise(message.to_string(), code);
            Step::Prune
        }
        None => Step::Forward,
    }
}

fn bitwise_binary(cx: &mut RuleCx<'_>) -> Step {
    use diagnostic_codes as c;
    use diagnostic_messages as m;
    let NodeData::Binary { op, .. } = &cx.node.data else {
        return Step::Forward;
    };
    let found = match op {
        BinaryOp::BitOr => Some((m::BITWISE_OR, c::BITWISE_OR)),
        BinaryOp::BitAnd => Some((m::BITWISE_AND, c::BITWISE_AND)),
        BinaryOp::BitXor => Some((m::BITWISE_XOR, c::BITWISE_XOR)),
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight | BinaryOp::UnsignedShiftRight => {
            Some((m::BIT_SHIFT, c::BIT_SHIFT))
        }
        _ => None,
    };
    bitwise_error(cx, found)
}

fn bitwise_not(cx: &mut RuleCx<'_>) -> Step {
    let found = match &cx.node.data {
        NodeData::Unary {
            op: UnaryOp::BitNot,
            ..
        } => Some((
            diagnostic_messages::BITWISE_NOT,
            diagnostic_codes::BITWISE_NOT,
        )),
        _ => None,
    };
    bitwise_error(cx, found)
}

fn bitwise_assignment(cx: &mut RuleCx<'_>) -> Step {
    use diagnostic_codes as c;
    use diagnostic_messages as m;
    let NodeData::Assignment { op, .. } = &cx.node.data else {
        return Step::Forward;
    };
    let found = match op {
        AssignOp::BitOr => Some((m::BITWISE_OR, c::BITWISE_OR)),
        AssignOp::BitAnd => Some((m::BITWISE_AND, c::BITWISE_AND)),
        AssignOp::BitXor => Some((m::BITWISE_XOR, c::BITWISE_XOR)),
        AssignOp::ShiftLeft | AssignOp::ShiftRight | AssignOp::UnsignedShiftRight => {
            Some((m::BIT_SHIFT, c::BIT_SHIFT))
        }
        _ => None,
    };
    bitwise_error(cx, found)
}

/// `the keyword(s) "a" "b" ` as used by the local-modifier message.
fn keyword_list<'m>(modifiers: impl IntoIterator<Item = &'m Modifier>) -> String {
    let mut out = String::from("the keyword(s) ");
    for modifier in modifiers {
        out.push('"');
        out.push_str(modifier.as_str());
        out.push_str("\" ");
    }
    out
}

fn raise_local_modifiers<'m>(cx: &mut RuleCx<'_>, modifiers: impl IntoIterator<Item = &'m Modifier>) {
    let keywords = keyword_list(modifiers);
    let message = format_message(
        diagnostic_messages::LOCAL_VARIABLE_MODIFIERS,
        &[keywords.as_str(), cx.level.name()],
    );
    cx.raise(message, diagnostic_codes::LOCAL_VARIABLE_MODIFIERS);
}

fn only_final_on_locals(cx: &mut RuleCx<'_>) -> Step {
    let node = cx.node;
    let NodeData::VariableDeclaration { modifiers, .. } = &node.data else {
        return Step::Forward;
    };
    if modifiers.iter().any(|m| *m != Modifier::Final) {
        raise_local_modifiers(cx, modifiers.iter().filter(|m| **m != Modifier::Final));
    }
    Step::Forward
}

fn initializer_at_class_scope(cx: &mut RuleCx<'_>) -> Step {
    cx.raise(
        diagnostic_messages::INITIALIZER_AT_CLASS_SCOPE.to_string(),
        diagnostic_codes::INITIALIZER_AT_CLASS_SCOPE,
    );
    Step::Prune
}

// =============================================================================
// Intermediate
// =============================================================================

static INTERMEDIATE_RULES: RuleTable = RuleTable {
    level: LanguageLevel::Intermediate,
    entries: &[
        RuleEntry::new(
            ScopeKind::Body,
            SyntaxKind::VariableDeclaration,
            no_modifiers_on_locals,
        ),
        RuleEntry::new(ScopeKind::Body, SyntaxKind::ThisReference, this_in_constructor),
        RuleEntry::new(ScopeKind::Body, SyntaxKind::TryCatch, try_catch_in_body),
        RuleEntry::new(ScopeKind::Any, SyntaxKind::TryCatch, try_catch_outside_body),
    ],
};

fn no_modifiers_on_locals(cx: &mut RuleCx<'_>) -> Step {
    let node = cx.node;
    let NodeData::VariableDeclaration { modifiers, .. } = &node.data else {
        return Step::Forward;
    };
    if !modifiers.is_empty() {
        raise_local_modifiers(cx, modifiers.iter());
    }
    cx.directive.force_final = true;
    Step::Accept
}

fn this_in_constructor(cx: &mut RuleCx<'_>) -> Step {
    if cx.in_constructor {
        let message = format_message(diagnostic_messages::THIS_IN_CONSTRUCTOR, &[cx.level.name()]);
        cx.raise(message, diagnostic_codes::THIS_IN_CONSTRUCTOR);
    }
    Step::Forward
}

fn try_catch_in_body(_cx: &mut RuleCx<'_>) -> Step {
    Step::Accept
}

fn try_catch_outside_body(cx: &mut RuleCx<'_>) -> Step {
    cx.raise(
        diagnostic_messages::TRY_CATCH_OUTSIDE_BODY.to_string(),
        diagnostic_codes::TRY_CATCH_OUTSIDE_BODY,
    );
    Step::Prune
}

// =============================================================================
// Elementary
// =============================================================================

static ELEMENTARY_RULES: RuleTable = RuleTable {
    level: LanguageLevel::Elementary,
    entries: &[
        RuleEntry::new(ScopeKind::Any, SyntaxKind::InterfaceDef, no_interfaces),
        RuleEntry::new(ScopeKind::Any, SyntaxKind::TryCatch, no_try_catch),
        RuleEntry::new(ScopeKind::Any, SyntaxKind::AnonymousClass, no_anonymous_classes),
    ],
};

fn construct_not_at_level(cx: &mut RuleCx<'_>, construct: &str) -> Step {
    let message = format_message(
        diagnostic_messages::CONSTRUCT_NOT_AT_LEVEL,
        &[construct, cx.level.name()],
    );
    cx.raise(message, diagnostic_codes::CONSTRUCT_NOT_AT_LEVEL);
    Step::Prune
}

fn no_interfaces(cx: &mut RuleCx<'_>) -> Step {
    construct_not_at_level(cx, "Interfaces")
}

fn no_try_catch(cx: &mut RuleCx<'_>) -> Step {
    construct_not_at_level(cx, "Try-catch statements")
}

fn no_anonymous_classes(cx: &mut RuleCx<'_>) -> Step {
    construct_not_at_level(cx, "Anonymous inner classes")
}
