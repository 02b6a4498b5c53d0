use super::*;
use llv_binder::{BodyId, DuplicateScope, MethodId, ScopeRef, SymbolId};
use llv_common::diagnostic_codes;
use llv_common::limits::MAX_VISIT_DEPTH;
use llv_syntax::{AssignOp, BinaryOp, Modifier, NodeIndex, SyntaxTree, TreeBuilder};

fn run(tree: SyntaxTree) -> AnalysisResult {
    run_with(tree, CheckerOptions::default())
}

fn run_with(tree: SyntaxTree, options: CheckerOptions) -> AnalysisResult {
    Analyzer::analyze_batch(&[SourceUnit::new(tree)], options)
}

/// `class A { void m() { <statements> } }`
fn in_method(
    file: &str,
    statements: impl FnOnce(&mut TreeBuilder) -> Vec<NodeIndex>,
) -> SyntaxTree {
    let mut b = TreeBuilder::new(file);
    let statements = statements(&mut b);
    let body = b.block(statements);
    let m = b.method_def(&[], "void", "m", Vec::new(), &[], Some(body));
    let class = b.class_def(&[], "A", None, &[], vec![m]);
    let root = b.source_file(None, &[], vec![class]);
    b.finish(root)
}

fn class_a(result: &AnalysisResult) -> SymbolId {
    result.table.lookup("A").expect("class A")
}

fn method_m(result: &AnalysisResult) -> MethodId {
    result.table.symbol(class_a(result)).methods[0]
}

fn codes(result: &AnalysisResult) -> Vec<u32> {
    result.diagnostics.iter().map(|d| d.code).collect()
}

fn var_names(result: &AnalysisResult, body: BodyId) -> Vec<&str> {
    result
        .table
        .body_vars(body)
        .iter()
        .map(|&v| result.table.variable(v).name.as_str())
        .collect()
}

#[test]
fn test_clean_class_has_no_errors() {
    let tree = in_method("A.dj1", |b| {
        let one = b.int(1);
        let x = b.declarator("int", "x", Some(one));
        vec![b.var_decl(&[], vec![x])]
    });
    let result = run(tree);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let a = class_a(&result);
    assert!(!result.table.symbol(a).is_continuation());
}

#[test]
fn test_duplicate_locals_one_error_per_name_all_registered() {
    let tree = in_method("A.java", |b| {
        let declarators = vec![
            b.declarator("int", "x", None),
            b.declarator("int", "x", None),
            b.declarator("int", "y", None),
            b.declarator("int", "y", None),
            b.declarator("int", "y", None),
        ];
        vec![b.var_decl(&[], declarators)]
    });
    let result = run(tree);
    assert_eq!(
        codes(&result),
        [
            diagnostic_codes::DUPLICATE_VARIABLE,
            diagnostic_codes::DUPLICATE_VARIABLE
        ]
    );
    assert_eq!(
        result.diagnostics[0].message_text,
        "You cannot have two variables with the same name."
    );
    let body = BodyId::Method(method_m(&result));
    assert_eq!(var_names(&result, body), ["x", "x", "y", "y", "y"]);
}

#[test]
fn test_redeclaration_in_later_statement() {
    let tree = in_method("A.java", |b| vec![b.local("int", "x"), b.local("String", "x")]);
    let result = run(tree);
    assert_eq!(codes(&result), [diagnostic_codes::DUPLICATE_VARIABLE]);
    assert_eq!(result.diagnostics[0].line, 3);
}

#[test]
fn test_shadowing_in_nested_block_depends_on_duplicate_scope() {
    let build = || {
        in_method("A.java", |b| {
            let outer = b.local("int", "x");
            let inner = b.local("int", "x");
            let block = b.block(vec![inner]);
            vec![outer, block]
        })
    };
    assert!(run(build()).diagnostics.is_empty());

    let options = CheckerOptions {
        duplicate_scope: DuplicateScope::EnclosingBodies,
        ..CheckerOptions::default()
    };
    let result = run_with(build(), options);
    assert_eq!(codes(&result), [diagnostic_codes::DUPLICATE_VARIABLE]);
}

#[test]
fn test_local_modifiers_at_intermediate() {
    let tree = in_method("A.dj1", |b| {
        let x = b.declarator("int", "x", None);
        let y = b.declarator("int", "y", None);
        let with_modifiers = b.var_decl(&[Modifier::Static, Modifier::Final], vec![x]);
        let plain = b.var_decl(&[], vec![y]);
        vec![with_modifiers, plain]
    });
    let result = run(tree);
    assert_eq!(
        result.messages(),
        ["You cannot use the keyword(s) \"static\" \"final\" to declare a local variable at the Intermediate level"]
    );
    assert!(!result.diagnostics[0].prunes_subtree);

    let body = BodyId::Method(method_m(&result));
    let vars = result.table.body_vars(body);
    assert_eq!(vars.len(), 2);
    assert!(vars.iter().all(|&v| result.table.variable(v).is_final()));
}

#[test]
fn test_locals_not_forced_final_at_full() {
    let tree = in_method("A.java", |b| vec![b.local("int", "x")]);
    let result = run(tree);
    let body = BodyId::Method(method_m(&result));
    let x = result.table.body_vars(body)[0];
    assert!(!result.table.variable(x).is_final());
}

/// `class A { int x; A() { this.x = 1; } void m() { this.x = 2; } }`
fn this_assignments(file: &str) -> SyntaxTree {
    let mut b = TreeBuilder::new(file);
    let field = b.local("int", "x");

    let this = b.this();
    let target = b.field_access(this, "x");
    let one = b.int(1);
    let assign = b.assign(AssignOp::Assign, target, one);
    let stmt = b.expr_stmt(assign);
    let ctor_body = b.block(vec![stmt]);
    let ctor = b.constructor_def(&[], "A", Vec::new(), ctor_body);

    let this = b.this();
    let target = b.field_access(this, "x");
    let two = b.int(2);
    let assign = b.assign(AssignOp::Assign, target, two);
    let stmt = b.expr_stmt(assign);
    let m_body = b.block(vec![stmt]);
    let m = b.method_def(&[], "void", "m", Vec::new(), &[], Some(m_body));

    let class = b.class_def(&[], "A", None, &[], vec![field, ctor, m]);
    let root = b.source_file(None, &[], vec![class]);
    b.finish(root)
}

#[test]
fn test_this_in_constructor_at_intermediate() {
    let result = run(this_assignments("A.dj1"));
    assert_eq!(
        result.messages(),
        ["You cannot reference the field 'this' inside a constructor at the Intermediate Level"]
    );
    assert_eq!(result.diagnostics[0].line, 3);
}

#[test]
fn test_this_in_constructor_allowed_at_full() {
    assert!(run(this_assignments("A.java")).diagnostics.is_empty());
}

#[test]
fn test_nested_method_definition_is_pruned() {
    let tree = in_method("A.java", |b| {
        let z = b.local("int", "z");
        let inner_body = b.block(vec![z]);
        let q = b.param("int", "q");
        vec![b.method_def(&[], "void", "n", vec![q], &[], Some(inner_body))]
    });
    let result = run(tree);
    assert_eq!(
        result.messages(),
        ["Methods definitions cannot appear within the body of another method or block."]
    );
    assert!(result.diagnostics[0].prunes_subtree);

    let a = class_a(&result);
    assert_eq!(result.table.symbol(a).methods.len(), 1);
    let m = method_m(&result);
    assert!(result.table.method(m).vars.is_empty());
    assert!(result.table.method(m).blocks.is_empty());
}

/// `try { <t> } catch (Exception e) { <c1> } catch (RuntimeException e) { <c2> } finally { <f> }`
fn try_statement(
    b: &mut TreeBuilder,
    bodies: [Vec<NodeIndex>; 4],
) -> NodeIndex {
    let [t, c1, c2, f] = bodies;
    let try_block = b.block(t);
    let e = b.param("Exception", "e");
    let handler = b.block(c1);
    let first = b.catch_block(e, handler);
    let e = b.param("RuntimeException", "e");
    let handler = b.block(c2);
    let second = b.catch_block(e, handler);
    let finally = b.block(f);
    b.try_catch(try_block, vec![first, second], Some(finally))
}

#[test]
fn test_clean_try_catch_finally_at_intermediate() {
    let tree = in_method("A.dj1", |b| {
        let x = b.local("int", "x");
        vec![try_statement(b, [vec![x], Vec::new(), Vec::new(), Vec::new()])]
    });
    let result = run(tree);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let m = method_m(&result);
    let blocks = result.table.method(m).blocks.clone();
    assert_eq!(blocks.len(), 4);
    // Each catch variable lives in its own catch block.
    for &catch in &blocks[1..3] {
        assert_eq!(var_names(&result, BodyId::Block(catch)), ["e"]);
        let e = result.table.block(catch).vars[0];
        assert!(result.table.variable(e).ty.is_resolved());
    }
    assert!(result.table.lookup_var(ScopeRef::Method(m), "e").is_none());
    assert!(
        result
            .table
            .lookup_var(ScopeRef::Block(blocks[0]), "e")
            .is_none()
    );
    assert!(result.table.lookup_var(ScopeRef::Block(blocks[0]), "x").is_some());
}

/// `a <op> b;`
fn bitwise_statement(b: &mut TreeBuilder, op: BinaryOp) -> Vec<NodeIndex> {
    let l = b.name("a");
    let r = b.name("b");
    let e = b.binary(op, l, r);
    vec![b.expr_stmt(e)]
}

#[test]
fn test_errors_in_try_catch_follow_source_order() {
    let tree = in_method("A.dj2", |b| {
        let t = bitwise_statement(b, BinaryOp::BitOr);
        let c1 = bitwise_statement(b, BinaryOp::BitAnd);
        let c2 = bitwise_statement(b, BinaryOp::BitXor);
        let f = bitwise_statement(b, BinaryOp::ShiftLeft);
        vec![try_statement(b, [t, c1, c2, f])]
    });
    let result = run(tree);
    assert_eq!(
        codes(&result),
        [
            diagnostic_codes::BITWISE_OR,
            diagnostic_codes::BITWISE_AND,
            diagnostic_codes::BITWISE_XOR,
            diagnostic_codes::BIT_SHIFT,
        ]
    );
    assert!(result.diagnostics.iter().all(|d| d.prunes_subtree));
}

#[test]
fn test_try_catch_rejected_at_elementary() {
    let tree = in_method("A.dj0", |b| {
        let x = b.local("int", "x");
        vec![try_statement(b, [vec![x], Vec::new(), Vec::new(), Vec::new()])]
    });
    let result = run(tree);
    assert_eq!(
        result.messages(),
        ["Try-catch statements cannot be used at the Elementary level"]
    );
    let m = method_m(&result);
    assert!(result.table.method(m).blocks.is_empty());
}

#[test]
fn test_interface_rejected_at_elementary() {
    let mut b = TreeBuilder::new("I.dj0");
    let i = b.interface_def(&[], "I", &[], Vec::new());
    let root = b.source_file(None, &[], vec![i]);
    let result = run(b.finish(root));
    assert_eq!(
        result.messages(),
        ["Interfaces cannot be used at the Elementary level"]
    );
    assert!(result.table.lookup("I").is_none());
}

#[test]
fn test_compound_bitwise_assignment_at_advanced() {
    let tree = in_method("A.dj2", |b| {
        let x = b.local("int", "x");
        let target = b.name("x");
        let one = b.int(1);
        let assign = b.assign(AssignOp::BitOr, target, one);
        vec![x, b.expr_stmt(assign)]
    });
    assert_eq!(codes(&run(tree)), [diagnostic_codes::BITWISE_OR]);
}

#[test]
fn test_instance_initializer_at_class_scope() {
    let build = |file: &str| {
        let mut b = TreeBuilder::new(file);
        let x = b.local("int", "x");
        let block = b.block(vec![x]);
        let init = b.instance_initializer(block);
        let class = b.class_def(&[], "A", None, &[], vec![init]);
        let root = b.source_file(None, &[], vec![class]);
        b.finish(root)
    };

    let result = run(build("A.dj2"));
    assert_eq!(
        result.messages(),
        ["This open brace must mark the beginning of a method or class body"]
    );
    assert!(result.table.symbol(class_a(&result)).initializers.is_empty());

    let result = run(build("A.java"));
    assert!(result.diagnostics.is_empty());
    let initializers = &result.table.symbol(class_a(&result)).initializers;
    assert_eq!(initializers.len(), 1);
    assert_eq!(var_names(&result, BodyId::Block(initializers[0])), ["x"]);
}

#[test]
fn test_declaration_errors() {
    let mut b = TreeBuilder::new("A.java");
    let f1 = b.local("int", "size");
    let f2 = b.local("int", "size");
    let p1 = b.param("int", "a");
    let p2 = b.param("int", "a");
    let body = b.block(Vec::new());
    let m = b.method_def(&[], "void", "m", vec![p1, p2], &[], Some(body));
    let body = b.block(Vec::new());
    let ctor = b.constructor_def(&[], "B", Vec::new(), body);
    let class = b.class_def(&[], "A", None, &[], vec![f1, f2, m, ctor]);
    let again = b.class_def(&[], "A", None, &[], Vec::new());
    let root = b.source_file(None, &[], vec![class, again]);
    let result = run(b.finish(root));

    assert_eq!(
        result.messages(),
        [
            "You cannot have two fields with the same name: size",
            "You cannot have two method parameters with the same name",
            "The constructor name B must match the name of its class A",
            "The class or interface A has already been defined",
        ]
    );
    let a = class_a(&result);
    assert_eq!(result.table.symbol(a).fields.len(), 2);
    let m = result.table.symbol(a).methods[0];
    assert_eq!(result.table.method(m).params.len(), 2);
}

#[test]
fn test_class_extending_interface() {
    let mut b = TreeBuilder::new("A.java");
    let a = b.class_def(&[], "A", Some("I"), &[], Vec::new());
    let i = b.interface_def(&[], "I", &[], Vec::new());
    let c = b.class_def(&[], "C", None, &["A"], Vec::new());
    let root = b.source_file(None, &[], vec![a, i, c]);
    let result = run(b.finish(root));
    assert_eq!(
        result.messages(),
        [
            "I is an interface and cannot be extended by the class A",
            "A is a class and cannot appear in the interface list of C",
        ]
    );
    let a = class_a(&result);
    let i = result.table.lookup("I").expect("I");
    assert_eq!(
        result
            .table
            .symbol(a)
            .superclass
            .as_ref()
            .and_then(|s| s.resolved),
        Some(i)
    );
}

#[test]
fn test_unresolved_type_reported_after_settle() {
    let tree = in_method("A.java", |b| vec![b.local("Widget", "w")]);
    let result = run(tree);
    assert_eq!(result.messages(), ["Could not resolve symbol Widget"]);
    // Reported at the declarator, not the declaration statement.
    assert_eq!(result.diagnostics[0].line, 1);
}

#[test]
fn test_anonymous_and_local_classes_are_numbered() {
    let tree = in_method("A.java", |b| {
        let local = b.class_def(&[], "Helper", None, &[], Vec::new());
        let body = b.block(Vec::new());
        let run_method = b.method_def(&[], "void", "run", Vec::new(), &[], Some(body));
        let anon = b.anonymous_class("Runnable", Vec::new(), vec![run_method]);
        let r = b.declarator("Runnable", "r", Some(anon));
        vec![local, b.var_decl(&[], vec![r])]
    });
    let result = run(tree);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let helper = result.table.lookup("A$1Helper").expect("local class");
    let anon = result.table.lookup("A$2").expect("anonymous class");
    let runnable = result.table.lookup("java.lang.Runnable").expect("Runnable");
    assert_eq!(result.table.symbol(anon).interfaces[0].resolved, Some(runnable));
    assert_eq!(result.table.symbol(anon).methods.len(), 1);
    let a = class_a(&result);
    assert_eq!(result.table.symbol(a).inner_classes, vec![helper, anon]);
}

#[test]
fn test_anonymous_class_rejected_at_elementary() {
    let tree = in_method("A.dj0", |b| {
        let anon = b.anonymous_class("Object", Vec::new(), Vec::new());
        vec![b.expr_stmt(anon)]
    });
    let result = run(tree);
    assert_eq!(
        result.messages(),
        ["Anonymous inner classes cannot be used at the Elementary level"]
    );
    assert!(result.table.lookup("A$1").is_none());
}

#[test]
fn test_nesting_limit() {
    let tree = in_method("A.java", |b| {
        let mut inner = b.block(Vec::new());
        for _ in 0..6 {
            inner = b.block(vec![inner]);
        }
        vec![inner]
    });
    let options = CheckerOptions {
        max_visit_depth: 5,
        ..CheckerOptions::default()
    };
    let result = run_with(tree, options);
    assert_eq!(codes(&result), [diagnostic_codes::NESTING_TOO_DEEP]);
    assert_eq!(
        result.messages(),
        ["This construct is nested more than 5 levels deep"]
    );
}

/// `<depth>` blocks nested inside `m`'s body.
fn nested_blocks(depth: usize) -> SyntaxTree {
    in_method("A.java", |b| {
        let mut inner = b.block(Vec::new());
        for _ in 1..depth {
            inner = b.block(vec![inner]);
        }
        vec![inner]
    })
}

/// Run `f` on a thread with the default 2 MiB stack of spawned threads.
fn on_small_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .expect("spawn walker thread")
        .join()
        .expect("walker thread panicked")
}

#[test]
fn test_deep_nesting_under_default_limit() {
    let depth = MAX_VISIT_DEPTH as usize - 10;
    let found = on_small_stack(move || codes(&run(nested_blocks(depth))));
    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn test_nesting_past_default_limit_reports_once() {
    let depth = MAX_VISIT_DEPTH as usize + 200;
    let found = on_small_stack(move || codes(&run(nested_blocks(depth))));
    assert_eq!(found, [diagnostic_codes::NESTING_TOO_DEEP]);
}

#[test]
fn test_long_operator_chain() {
    let tree = in_method("A.java", |b| {
        let mut chain = b.int(0);
        for i in 1..900 {
            let operand = b.int(i);
            chain = b.binary(BinaryOp::Add, chain, operand);
        }
        vec![b.expr_stmt(chain)]
    });
    let found = on_small_stack(move || codes(&run(tree)));
    assert!(found.is_empty(), "{found:?}");
}

#[test]
fn test_catch_block_goes_through_depth_check() {
    let tree = in_method("A.java", |b| {
        let try_block = b.block(Vec::new());
        let e = b.param("Exception", "e");
        b.at(21, 9);
        let ret = b.return_stmt(None);
        b.at(20, 5);
        let handler = b.block(vec![ret]);
        let catch = b.catch_block(e, handler);
        vec![b.try_catch(try_block, vec![catch], None)]
    });
    let reported: Vec<i32> = (1..=12)
        .flat_map(|max_visit_depth| {
            let options = CheckerOptions {
                max_visit_depth,
                ..CheckerOptions::default()
            };
            run_with(tree.clone(), options)
                .diagnostics
                .into_iter()
                .filter(|d| d.code == diagnostic_codes::NESTING_TOO_DEEP)
                .map(|d| d.line)
        })
        .collect();
    assert!(reported.contains(&20), "{reported:?}");
}

#[test]
fn test_visit_outcomes() {
    let mut b = TreeBuilder::new("A.java");
    let clean = b.local("int", "x");
    let first = b.declarator("int", "y", None);
    let second = b.declarator("int", "y", None);
    let duplicate = b.var_decl(&[], vec![first, second]);
    let nested = b.method_def(&[], "void", "inner", Vec::new(), &[], None);
    let m = b.method_def(&[], "void", "m", Vec::new(), &[], None);
    let class = b.class_def(&[], "A", None, &[], vec![m]);
    let root = b.source_file(None, &[], vec![class]);
    let tree = b.finish(root);

    let mut cx = CheckerContext::new(CheckerOptions::default());
    let file = cx.add_file("A.java", LanguageLevel::Full);
    let chain = PolicyChain::for_level(LanguageLevel::Full);
    assert_eq!(
        LevelWalker::new(&mut cx, &tree, &chain, file).walk(),
        Outcome::Continue
    );
    let a = cx.table.lookup("A").expect("class A");
    let m = cx.table.symbol(a).methods[0];

    let mut walker = LevelWalker::new(&mut cx, &tree, &chain, file);
    let mut class_scope = walker.scoped(WalkScope::Class(a));
    assert_eq!(class_scope.visit(clean), Outcome::Continue);
    assert_eq!(class_scope.visit(duplicate), Outcome::ContinueWithDiagnostic);
    let mut body_scope = walker.scoped(WalkScope::Body(BodyId::Method(m)));
    assert_eq!(body_scope.visit(nested), Outcome::StopSubtree);

    let codes: Vec<u32> = cx.log.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        [
            diagnostic_codes::DUPLICATE_FIELD,
            diagnostic_codes::METHOD_DEFINITION_IN_BODY
        ]
    );
}

#[test]
fn test_walker_scopes() {
    let tree = in_method("A.java", |_| Vec::new());
    let mut cx = CheckerContext::new(CheckerOptions::default());
    let file = cx.add_file("A.java", LanguageLevel::Full);
    let chain = PolicyChain::for_level(LanguageLevel::Full);
    let mut walker = LevelWalker::new(&mut cx, &tree, &chain, file);
    assert_eq!(walker.scope(), WalkScope::File);
    assert_eq!(walker.walk(), Outcome::Continue);
    assert_eq!(WalkScope::File.kind(), ScopeKind::File);
    assert!(cx.table.lookup_complete("A").is_some());
}
