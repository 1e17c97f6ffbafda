//! Printer formatting, parenthesization, and error behavior.

use codegraft::{b, parse_expression, print, print_block, x, Error, Hole, ParseOptions, PrintOptions};

fn none() -> Vec<Hole> {
    Vec::new()
}

fn code_of(source: &str) -> String {
    let stmts = b(&[source], none()).unwrap();
    print_block(&stmts, &PrintOptions::default()).unwrap().code
}

fn expr_code(source: &str) -> String {
    let expr = x(&[source], none()).unwrap();
    print(&expr, &PrintOptions::default()).unwrap().code
}

// ==================== statements and layout ====================

#[test]
fn blocks_indent_with_tabs() {
    assert_eq!(
        code_of("if (a) { b(); } else { c(); }"),
        "if (a) {\n\tb();\n} else {\n\tc();\n}"
    );
}

#[test]
fn else_if_chains_stay_flat() {
    assert_eq!(
        code_of("if (a) { f(); } else if (b) { g(); }"),
        "if (a) {\n\tf();\n} else if (b) {\n\tg();\n}"
    );
}

#[test]
fn nested_blocks_nest_tabs() {
    assert_eq!(
        code_of("while (a) { if (b) { c(); } }"),
        "while (a) {\n\tif (b) {\n\t\tc();\n\t}\n}"
    );
}

#[test]
fn for_loop_head() {
    assert_eq!(
        code_of("for (let i = 0; i < 10; i++) f(i);"),
        "for (let i = 0; i < 10; i++) f(i);"
    );
}

#[test]
fn do_while_gets_terminal_semicolon() {
    assert_eq!(code_of("do { x--; } while (x);"), "do {\n\tx--;\n} while (x);");
}

#[test]
fn switch_layout() {
    assert_eq!(
        code_of("switch (a) { case 1: f(); break; default: g(); }"),
        "switch (a) {\n\tcase 1:\n\t\tf();\n\t\tbreak;\n\tdefault:\n\t\tg();\n}"
    );
}

#[test]
fn try_catch_finally() {
    assert_eq!(
        code_of("try { f(); } catch (e) { g(e); } finally { h(); }"),
        "try {\n\tf();\n} catch (e) {\n\tg(e);\n} finally {\n\th();\n}"
    );
}

#[test]
fn object_statement_gets_parens() {
    assert_eq!(code_of("({ a: 1 });"), "({ a: 1 });");
}

#[test]
fn class_layout() {
    assert_eq!(
        code_of("class A extends B { constructor() { super(); } static x = 1; }"),
        "class A extends B {\n\tconstructor() {\n\t\tsuper();\n\t}\n\tstatic x = 1;\n}"
    );
}

#[test]
fn labeled_continue() {
    assert_eq!(
        code_of("outer: for (const k in obj) { continue outer; }"),
        "outer: for (const k in obj) {\n\tcontinue outer;\n}"
    );
}

// ==================== precedence and parens ====================

#[test]
fn parens_only_where_precedence_demands() {
    assert_eq!(expr_code("a + b * c"), "a + b * c");
    assert_eq!(expr_code("(a + b) * c"), "(a + b) * c");
    assert_eq!(expr_code("a * b + c"), "a * b + c");
}

#[test]
fn subtraction_keeps_right_parens() {
    assert_eq!(expr_code("a - (b - c)"), "a - (b - c)");
    assert_eq!(expr_code("a - b - c"), "a - b - c");
}

#[test]
fn exponent_associativity() {
    assert_eq!(expr_code("a ** b ** c"), "a ** b ** c");
    assert_eq!(expr_code("(a ** b) ** c"), "(a ** b) ** c");
    assert_eq!(expr_code("(-a) ** b"), "(-a) ** b");
}

#[test]
fn conditional_test_parens() {
    assert_eq!(expr_code("(a ? b : c) ? d : e"), "(a ? b : c) ? d : e");
    assert_eq!(expr_code("a ? b : c ? d : e"), "a ? b : c ? d : e");
}

#[test]
fn nullish_mixing_is_parenthesized() {
    assert_eq!(expr_code("a ?? (b || c)"), "a ?? (b || c)");
    assert_eq!(expr_code("(a && b) ?? c"), "(a && b) ?? c");
}

#[test]
fn assignment_chains() {
    assert_eq!(expr_code("a = b = c"), "a = b = c");
}

#[test]
fn sequence_in_argument_position() {
    assert_eq!(expr_code("f((a, b))"), "f((a, b))");
}

#[test]
fn new_callee_with_call_is_parenthesized() {
    assert_eq!(expr_code("new (factory())()"), "new (factory())()");
    assert_eq!(expr_code("new Foo(1)"), "new Foo(1)");
}

#[test]
fn number_literal_member_object() {
    let number = codegraft::ast::Node::number(42.0);
    let expr = x(&["", ".toFixed(2)"], vec![Hole::from(number)]).unwrap();
    assert_eq!(
        print(&expr, &PrintOptions::default()).unwrap().code,
        "(42).toFixed(2)"
    );
}

#[test]
fn arrow_bodies() {
    assert_eq!(expr_code("(a) => a + 1"), "(a) => a + 1");
    assert_eq!(expr_code("() => ({ a: 1 })"), "() => ({ a: 1 })");
}

#[test]
fn unary_sign_spacing() {
    assert_eq!(expr_code("- -a"), "- -a");
    assert_eq!(expr_code("typeof a"), "typeof a");
    assert_eq!(expr_code("void 0"), "void 0");
}

#[test]
fn optional_chains() {
    assert_eq!(expr_code("a?.b?.()"), "a?.b?.()");
    assert_eq!(expr_code("a?.[b]"), "a?.[b]");
}

// ==================== literals and templates ====================

#[test]
fn raw_literals_are_verbatim() {
    assert_eq!(expr_code("0x10"), "0x10");
    assert_eq!(expr_code("\"double\""), "\"double\"");
}

#[test]
fn canonical_strings_are_single_quoted() {
    let s = codegraft::ast::Node::string("it's\n");
    assert_eq!(
        print(&s, &PrintOptions::default()).unwrap().code,
        "'it\\'s\\n'"
    );
}

#[test]
fn template_literals_round_trip() {
    assert_eq!(expr_code("`a${b}c${d}e`"), "`a${b}c${d}e`");
    assert_eq!(expr_code("tag`x${y}`"), "tag`x${y}`");
}

#[test]
fn array_holes_keep_length() {
    assert_eq!(expr_code("[1, , 2]"), "[1, , 2]");
}

// ==================== comments ====================

#[test]
fn leading_line_comments_print_above() {
    assert_eq!(code_of("// note\nf();"), "// note\nf();");
}

#[test]
fn leading_block_comments_print_inline() {
    assert_eq!(code_of("/* c */ f();"), "/* c */ f();");
}

#[test]
fn trailing_line_comments_stay_on_the_line() {
    assert_eq!(code_of("f(); // done\ng();"), "f(); // done\ng();");
}

// ==================== identifiers, sigils, get_name ====================

#[test]
fn sigil_identifiers_abort_printing() {
    let stmts = b(&["let foo = @bar;"], none()).unwrap();
    let err = print_block(&stmts, &PrintOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unhandled sigil @bar");
    assert!(matches!(err, Error::UnhandledSigil(_)));
}

#[test]
fn hash_sigils_abort_printing_too() {
    let expr = x(&["#secret()"], none()).unwrap();
    let err = print(&expr, &PrintOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unhandled sigil #secret");
}

#[test]
fn get_name_rewrites_references() {
    let expr = parse_expression("foo + bar", &ParseOptions { locations: false }).unwrap();
    let options = PrintOptions {
        get_name: Some(Box::new(|name: &str| format!("_{name}"))),
        ..Default::default()
    };
    assert_eq!(print(&expr, &options).unwrap().code, "_foo + _bar");
}

#[test]
fn get_name_skips_member_properties_and_keys() {
    let expr = parse_expression("obj.prop + { key: v }.key", &ParseOptions { locations: false })
        .unwrap();
    let options = PrintOptions {
        get_name: Some(Box::new(|name: &str| format!("_{name}"))),
        ..Default::default()
    };
    assert_eq!(
        print(&expr, &options).unwrap().code,
        "_obj.prop + { key: _v }.key"
    );
}

#[test]
fn get_name_expands_shorthand_properties() {
    let expr = parse_expression("{ a }", &ParseOptions { locations: false }).unwrap();
    let options = PrintOptions {
        get_name: Some(Box::new(|name: &str| format!("_{name}"))),
        ..Default::default()
    };
    assert_eq!(print(&expr, &options).unwrap().code, "{ a: _a }");
}

// ==================== modules ====================

#[test]
fn import_forms() {
    assert_eq!(code_of("import 'side-effect';"), "import 'side-effect';");
    assert_eq!(
        code_of("import a, { b as c, d } from 'm';"),
        "import a, { b as c, d } from 'm';"
    );
    assert_eq!(code_of("import * as ns from 'm';"), "import * as ns from 'm';");
}

#[test]
fn export_forms() {
    assert_eq!(code_of("export { a as b };"), "export { a as b };");
    assert_eq!(code_of("export const x = 1;"), "export const x = 1;");
    assert_eq!(
        code_of("export * as ns from 'm';"),
        "export * as ns from 'm';"
    );
    assert_eq!(code_of("export default f();"), "export default f();");
}

// ==================== round trips ====================

#[test]
fn expressions_round_trip_through_reparse() {
    let sources = [
        "a + b * c",
        "f(...args)",
        "new Foo(1)",
        "a?.b?.()",
        "x = y ?? z",
        "[1, , 2]",
        "{ a, b: 2, [c]: 3, ...rest }",
        "`t${x}`",
        "async () => await p",
        "u => u",
        "(a = 1, { b } = {}) => a + b",
    ];
    for source in sources {
        let first = expr_code(source);
        let reparsed = parse_expression(&first, &ParseOptions { locations: false }).unwrap();
        let second = print(&reparsed, &PrintOptions::default()).unwrap().code;
        assert_eq!(first, second, "round trip diverged for `{source}`");
    }
}

#[test]
fn statements_round_trip_through_reparse() {
    let sources = [
        "for (let i = 0; i < 10; i++) f(i);",
        "async function d() { for await (const v of s) f(v); }",
        "function* g() { yield* it; }",
        "const { a = 1, ...rest } = obj;",
        "let [x, , y] = arr;",
        "class C { static total = 0; get count() { return this._count; } set count(v) { this._count = v; } }",
        "import a, { b as c } from 'm';",
        "export default class extends Base {}",
    ];
    for source in sources {
        let first = code_of(source);
        let stmts = b(&[first.as_str()], Vec::new()).unwrap();
        let second = print_block(&stmts, &PrintOptions::default()).unwrap().code;
        assert_eq!(first, second, "round trip diverged for `{source}`");
    }
}

#[test]
fn unknown_constructs_name_their_type() {
    use codegraft::ast::{Node, NodeKind};
    // A switch case outside a switch has no expression or statement reading.
    let stray = Node::new(NodeKind::SwitchCase {
        test: None,
        consequent: Vec::new(),
    });
    let call = Node::new(NodeKind::CallExpression {
        callee: Box::new(stray),
        arguments: Vec::new(),
        optional: false,
    });
    let err = print(&call, &PrintOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unhandled type SwitchCase");
}
