use super::*;
use llv_common::SourceInfo;

#[test]
fn test_add_and_get() {
    let mut arena = NodeArena::new();
    let idx = arena.add(
        SourceInfo::new(4, 2),
        NodeData::NameReference {
            name: "x".to_string(),
        },
    );
    assert_eq!(idx, NodeIndex(0));
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.get(idx).map(Node::kind), Some(SyntaxKind::NameReference));
    assert_eq!(arena.pos(idx), SourceInfo::new(4, 2));
    assert!(arena.get(NodeIndex::NONE).is_none());
    assert_eq!(arena.pos(NodeIndex(7)), SourceInfo::NONE);
}

#[test]
fn test_descendants_are_pre_order() {
    let mut b = TreeBuilder::new("A.dj1");
    let one = b.int(1);
    let two = b.int(2);
    let sum = b.binary(BinaryOp::Add, one, two);
    let stmt = b.expr_stmt(sum);
    let block = b.block(vec![stmt]);
    let tree = b.finish(block);

    assert_eq!(tree.arena.descendants(tree.root), vec![block, stmt, sum, one, two]);
}

#[test]
fn test_tree_json_shape() {
    let json = r#"{
        "file_name": "A.dj1",
        "root": 2,
        "arena": [
            { "pos": { "line": 2, "column": 5 }, "kind": "variable_declarator", "ty": "int", "name": "x" },
            { "kind": "variable_declaration", "modifiers": ["final", "static"], "declarators": [0] },
            { "kind": "block", "statements": [1] }
        ]
    }"#;
    let tree = SyntaxTree::from_json(json).expect("valid tree");
    assert_eq!(tree.file_name, "A.dj1");
    assert_eq!(tree.root_node().map(Node::kind), Some(SyntaxKind::Block));
    match &tree.arena.get(NodeIndex(1)).expect("declaration").data {
        NodeData::VariableDeclaration { modifiers, .. } => {
            assert_eq!(modifiers, &vec![Modifier::Final, Modifier::Static]);
        }
        other => panic!("unexpected node {other:?}"),
    }
    assert_eq!(tree.arena.pos(NodeIndex(0)), SourceInfo::new(2, 5));
    assert_eq!(tree.arena.pos(NodeIndex(2)), SourceInfo::NONE);
}

#[test]
fn test_json_round_trip_preserves_literals() {
    let mut b = TreeBuilder::new("B.java");
    let s = b.string("hi");
    let stmt = b.return_stmt(Some(s));
    let tree = b.finish(stmt);
    let text = tree.to_json().expect("serializes");
    assert_eq!(SyntaxTree::from_json(&text).expect("parses"), tree);
}
