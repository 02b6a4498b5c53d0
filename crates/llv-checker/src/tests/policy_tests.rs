use super::*;
use crate::policy::{RuleCx, RuleTable};
use llv_common::{SourceInfo, diagnostic_codes};
use llv_syntax::{BinaryOp, Modifier, Node, NodeData, NodeIndex, SyntaxKind};

fn node(data: NodeData) -> Node {
    Node {
        pos: SourceInfo::new(1, 1),
        data,
    }
}

fn local_with(modifiers: &[Modifier]) -> Node {
    node(NodeData::VariableDeclaration {
        modifiers: modifiers.to_vec(),
        declarators: vec![NodeIndex(0)],
    })
}

fn try_catch() -> Node {
    node(NodeData::TryCatch {
        try_block: NodeIndex(0),
        catches: Vec::new(),
        finally_block: None,
    })
}

#[test]
fn test_chain_runs_from_level_to_full() {
    let levels: Vec<_> = PolicyChain::for_level(LanguageLevel::Elementary)
        .levels()
        .collect();
    assert_eq!(levels, LanguageLevel::ALL);
    let full: Vec<_> = PolicyChain::for_level(LanguageLevel::Full).levels().collect();
    assert_eq!(full, [LanguageLevel::Full]);
}

#[test]
fn test_specific_scope_entry_wins_over_any() {
    let table = RuleTable::for_level(LanguageLevel::Intermediate);
    let in_body = table
        .rule_for(ScopeKind::Body, SyntaxKind::TryCatch)
        .expect("body rule");
    let outside = table
        .rule_for(ScopeKind::ClassBody, SyntaxKind::TryCatch)
        .expect("any rule");

    let n = try_catch();
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Intermediate, false);
    assert_eq!(in_body(&mut cx), Step::Accept);
    assert!(cx.raised().is_empty());

    let mut cx = RuleCx::new(&n, ScopeKind::ClassBody, LanguageLevel::Intermediate, false);
    assert_eq!(outside(&mut cx), Step::Prune);
    assert_eq!(cx.raised()[0].code, diagnostic_codes::TRY_CATCH_OUTSIDE_BODY);
}

#[test]
fn test_intermediate_lists_every_local_modifier_and_forces_final() {
    let chain = PolicyChain::for_level(LanguageLevel::Intermediate);
    let n = local_with(&[Modifier::Static, Modifier::Final]);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Intermediate, false);
    assert_eq!(chain.check(&mut cx), Step::Accept);
    assert_eq!(cx.raised().len(), 1);
    assert_eq!(
        cx.raised()[0].message,
        "You cannot use the keyword(s) \"static\" \"final\" to declare a local variable at the Intermediate level"
    );
    assert!(cx.directive.force_final);
}

#[test]
fn test_intermediate_plain_local_is_still_forced_final() {
    let chain = PolicyChain::for_level(LanguageLevel::Intermediate);
    let n = local_with(&[]);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Intermediate, false);
    assert_eq!(chain.check(&mut cx), Step::Accept);
    assert!(cx.raised().is_empty());
    assert!(cx.directive.force_final);
}

#[test]
fn test_advanced_allows_only_final_on_locals() {
    let chain = PolicyChain::for_level(LanguageLevel::Advanced);
    let n = local_with(&[Modifier::Final]);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Advanced, false);
    assert_eq!(chain.check(&mut cx), Step::Accept);
    assert!(cx.raised().is_empty());

    let n = local_with(&[Modifier::Final, Modifier::Static]);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Advanced, false);
    assert_eq!(chain.check(&mut cx), Step::Accept);
    assert_eq!(
        cx.raised()[0].message,
        "You cannot use the keyword(s) \"static\" to declare a local variable at the Advanced level"
    );
    assert!(!cx.directive.force_final);
}

#[test]
fn test_bitwise_operators_pruned_below_full() {
    let n = node(NodeData::Binary {
        op: BinaryOp::BitOr,
        left: NodeIndex(0),
        right: NodeIndex(1),
    });
    let advanced = PolicyChain::for_level(LanguageLevel::Advanced);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Advanced, false);
    assert_eq!(advanced.check(&mut cx), Step::Prune);
    assert_eq!(cx.raised()[0].code, diagnostic_codes::BITWISE_OR);

    let full = PolicyChain::for_level(LanguageLevel::Full);
    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Full, false);
    assert_eq!(full.check(&mut cx), Step::Accept);

    let logical = node(NodeData::Binary {
        op: BinaryOp::Or,
        left: NodeIndex(0),
        right: NodeIndex(1),
    });
    let mut cx = RuleCx::new(&logical, ScopeKind::Body, LanguageLevel::Advanced, false);
    assert_eq!(advanced.check(&mut cx), Step::Accept);
}

#[test]
fn test_this_only_flagged_inside_constructors() {
    let chain = PolicyChain::for_level(LanguageLevel::Intermediate);
    let n = node(NodeData::ThisReference { qualifier: None });

    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Intermediate, true);
    assert_eq!(chain.check(&mut cx), Step::Accept);
    assert_eq!(
        cx.raised()[0].message,
        "You cannot reference the field 'this' inside a constructor at the Intermediate Level"
    );

    let mut cx = RuleCx::new(&n, ScopeKind::Body, LanguageLevel::Intermediate, false);
    chain.check(&mut cx);
    assert!(cx.raised().is_empty());
}

#[test]
fn test_method_in_body_pruned_at_every_level() {
    let n = node(NodeData::MethodDef {
        modifiers: Vec::new(),
        type_params: Vec::new(),
        return_type: "void".to_string(),
        name: "inner".to_string(),
        params: Vec::new(),
        throws: Vec::new(),
        body: None,
    });
    for level in LanguageLevel::ALL {
        let chain = PolicyChain::for_level(level);
        let mut cx = RuleCx::new(&n, ScopeKind::Body, level, false);
        assert_eq!(chain.check(&mut cx), Step::Prune, "{level}");
        assert_eq!(
            cx.raised()[0].message,
            "Methods definitions cannot appear within the body of another method or block."
        );
        let mut cx = RuleCx::new(&n, ScopeKind::ClassBody, level, false);
        assert_eq!(chain.check(&mut cx), Step::Accept, "{level}");
    }
}

#[test]
fn test_elementary_rejects_interfaces() {
    let n = node(NodeData::InterfaceDef {
        modifiers: Vec::new(),
        name: "I".to_string(),
        type_params: Vec::new(),
        extends: Vec::new(),
        members: Vec::new(),
    });
    let mut cx = RuleCx::new(&n, ScopeKind::File, LanguageLevel::Elementary, false);
    assert_eq!(
        PolicyChain::for_level(LanguageLevel::Elementary).check(&mut cx),
        Step::Prune
    );
    assert_eq!(
        cx.raised()[0].message,
        "Interfaces cannot be used at the Elementary level"
    );

    let mut cx = RuleCx::new(&n, ScopeKind::File, LanguageLevel::Intermediate, false);
    assert_eq!(
        PolicyChain::for_level(LanguageLevel::Intermediate).check(&mut cx),
        Step::Accept
    );
}
