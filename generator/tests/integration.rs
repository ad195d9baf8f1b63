use blockgraph::Program;
use blockgraph::block::Block;
use generator::names::{Category, NameDb, safe_name};
use generator::order::{Order, requires_parens};
use generator::{GenError, Generator};

fn program(blocks: Vec<Block>) -> Program {
    Program {
        blocks,
        variables: Vec::new(),
    }
}

fn generate(blocks: Vec<Block>) -> String {
    Generator::new()
        .workspace_to_code(&program(blocks))
        .expect("generation failed")
}

fn generate_one_based(blocks: Vec<Block>) -> String {
    let mut generator = Generator::new();
    generator.one_based_index = true;
    generator
        .workspace_to_code(&program(blocks))
        .expect("generation failed")
}

fn number(n: &str) -> Block {
    let mut block = Block::new("math_number");
    block.fields.insert("NUM".to_string(), n.to_string());
    block
}

fn boolean(value: bool) -> Block {
    let mut block = Block::new("logic_boolean");
    let field = if value { "TRUE" } else { "FALSE" };
    block.fields.insert("BOOL".to_string(), field.to_string());
    block
}

fn text_block(text: &str) -> Block {
    let mut block = Block::new("text");
    block.fields.insert("TEXT".to_string(), text.to_string());
    block
}

fn var_get(name: &str) -> Block {
    let mut block = Block::new("variables_get");
    block.fields.insert("VAR".to_string(), name.to_string());
    block
}

fn var_set(name: &str, value: Block) -> Block {
    let mut block = Block::new("variables_set");
    block.fields.insert("VAR".to_string(), name.to_string());
    block.values.insert("VALUE".to_string(), value);
    block
}

fn arithmetic(op: &str, a: Block, b: Block) -> Block {
    let mut block = Block::new("math_arithmetic");
    block.fields.insert("OP".to_string(), op.to_string());
    block.values.insert("A".to_string(), a);
    block.values.insert("B".to_string(), b);
    block
}

fn with_comment(mut block: Block, comment: &str) -> Block {
    block.comment = Some(comment.to_string());
    block
}

// --- Parenthesization ---

#[test]
fn addition_of_literals() {
    let block = arithmetic("ADD", number("5"), number("3"));
    assert_eq!(generate(vec![block]), "5 + 3;\n");
}

#[test]
fn addition_nested_in_addition_omits_parens() {
    let inner = arithmetic("ADD", number("5"), number("3"));
    let block = arithmetic("ADD", inner, number("3"));
    assert_eq!(generate(vec![block]), "5 + 3 + 3;\n");
}

#[test]
fn addition_override_holds_at_depth() {
    let block = arithmetic(
        "ADD",
        var_get("a"),
        arithmetic(
            "ADD",
            var_get("b"),
            arithmetic("ADD", var_get("c"), var_get("d")),
        ),
    );
    assert_eq!(
        generate(vec![block]),
        "var a, b, c, d;\n\n\na + b + c + d;\n"
    );
}

#[test]
fn addition_nested_in_multiplication_is_parenthesized() {
    let inner = arithmetic("ADD", number("1"), number("2"));
    let block = arithmetic("MULTIPLY", inner, number("3"));
    assert_eq!(generate(vec![block]), "(1 + 2) * 3;\n");
}

#[test]
fn subtraction_nested_right_of_subtraction_is_parenthesized() {
    let inner = arithmetic("MINUS", number("3"), number("1"));
    let block = arithmetic("MINUS", number("5"), inner);
    assert_eq!(generate(vec![block]), "5 - (3 - 1);\n");
}

#[test]
fn missing_operands_use_rule_defaults() {
    let mut block = Block::new("math_arithmetic");
    block.fields.insert("OP".to_string(), "ADD".to_string());
    assert_eq!(generate(vec![block]), "0 + 0;\n");
}

#[test]
fn requires_parens_matches_the_table() {
    // Tighter child in looser context: no parens.
    assert!(!requires_parens(Order::Addition, Order::Atomic));
    // Looser child in tighter context: parens.
    assert!(requires_parens(Order::Multiplication, Order::Addition));
    // Equal strengths default to parens...
    assert!(requires_parens(Order::Subtraction, Order::Subtraction));
    // ...unless overridden or at the extremes.
    assert!(!requires_parens(Order::Addition, Order::Addition));
    assert!(!requires_parens(Order::LogicalAnd, Order::LogicalAnd));
    assert!(!requires_parens(Order::Atomic, Order::Atomic));
    assert!(!requires_parens(Order::None, Order::None));
    // Overrides are one-directional pairs, not strength classes.
    assert!(requires_parens(Order::Addition, Order::Comma));
}

#[test]
fn order_weights_are_ordered() {
    let ascending = [
        Order::Atomic,
        Order::Member,
        Order::FunctionCall,
        Order::UnaryNegation,
        Order::Multiplication,
        Order::Addition,
        Order::Relational,
        Order::Equality,
        Order::LogicalAnd,
        Order::LogicalOr,
        Order::Conditional,
        Order::Assignment,
        Order::Comma,
        Order::None,
    ];
    for pair in ascending.windows(2) {
        assert!(pair[0].weight() < pair[1].weight());
    }
}

// --- Naked values and statements ---

#[test]
fn naked_value_gets_a_terminator() {
    assert_eq!(generate(vec![number("5")]), "5;\n");
}

#[test]
fn variable_set_declares_the_variable() {
    let block = var_set("score", number("42"));
    assert_eq!(generate(vec![block]), "var score;\n\n\nscore := 42\n");
}

#[test]
fn reserved_word_variables_are_renamed() {
    let block = var_set("for", arithmetic("ADD", var_get("for"), number("1")));
    assert_eq!(generate(vec![block]), "var for2;\n\n\nfor2 := for2 + 1\n");
}

#[test]
fn disabled_blocks_are_skipped_in_the_chain() {
    let mut first = var_set("a", number("1"));
    first.disabled = true;
    first.next = Some(Box::new(var_set("b", number("2"))));
    assert_eq!(generate(vec![first]), "var a, b;\n\n\nb := 2\n");
}

#[test]
fn unknown_block_kind_is_fatal() {
    let result = Generator::new().workspace_to_code(&program(vec![Block::new("bogus_block")]));
    match result {
        Err(GenError::UnknownBlockKind(kind)) => assert_eq!(kind, "bogus_block"),
        other => panic!("expected UnknownBlockKind, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unhandled_option_is_fatal() {
    let mut block = Block::new("text_charAt");
    block.fields.insert("WHERE".to_string(), "NOWHERE".to_string());
    let result = Generator::new().workspace_to_code(&program(vec![block]));
    assert!(matches!(result, Err(GenError::UnhandledOption { .. })));
}

// --- Logic ---

#[test]
fn if_else_renders_indented_branches() {
    let mut compare = Block::new("logic_compare");
    compare.fields.insert("OP".to_string(), "EQ".to_string());
    compare.values.insert("A".to_string(), var_get("a"));
    compare.values.insert("B".to_string(), number("0"));

    let mut block = Block::new("controls_if");
    block.values.insert("IF0".to_string(), compare);
    block
        .statements
        .insert("DO0".to_string(), var_set("b", number("1")));
    block
        .statements
        .insert("ELSE".to_string(), var_set("b", number("2")));
    assert_eq!(
        generate(vec![block]),
        "var a, b;\n\n\nif (a == 0) {\n  b := 1\n} else {\n  b := 2\n}\n"
    );
}

#[test]
fn logic_operation_defaults_are_neutral() {
    let mut both_missing = Block::new("logic_operation");
    both_missing.fields.insert("OP".to_string(), "AND".to_string());
    assert_eq!(generate(vec![both_missing]), "false && false;\n");

    let mut one_missing = Block::new("logic_operation");
    one_missing.fields.insert("OP".to_string(), "AND".to_string());
    one_missing.values.insert("A".to_string(), boolean(true));
    assert_eq!(generate(vec![one_missing]), "true && true;\n");

    let mut or_missing = Block::new("logic_operation");
    or_missing.fields.insert("OP".to_string(), "OR".to_string());
    or_missing.values.insert("B".to_string(), boolean(false));
    assert_eq!(generate(vec![or_missing]), "false || false;\n");
}

#[test]
fn ternary_defaults() {
    assert_eq!(
        generate(vec![Block::new("logic_ternary")]),
        "false ? null : null;\n"
    );
}

#[test]
fn negation_of_negation_omits_parens() {
    let mut inner = Block::new("logic_negate");
    inner.values.insert("BOOL".to_string(), boolean(true));
    let mut outer = Block::new("logic_negate");
    outer.values.insert("BOOL".to_string(), inner);
    assert_eq!(generate(vec![outer]), "!!true;\n");
}

// --- Loops ---

#[test]
fn repeat_with_literal_count() {
    let mut print = Block::new("text_print");
    print.values.insert("TEXT".to_string(), text_block("hi"));
    let mut block = Block::new("controls_repeat_ext");
    block.values.insert("TIMES".to_string(), number("4"));
    block.statements.insert("DO".to_string(), print);
    assert_eq!(
        generate(vec![block]),
        "for (var count = 0; count < 4; count++) {\n  window.alert('hi');\n}\n"
    );
}

#[test]
fn until_loop_negates_its_condition() {
    let mut block = Block::new("controls_whileUntil");
    block.fields.insert("MODE".to_string(), "UNTIL".to_string());
    block.values.insert("BOOL".to_string(), boolean(true));
    assert_eq!(generate(vec![block]), "while (!true) {\n}\n");
}

#[test]
fn for_loop_folds_constant_bounds() {
    let mut block = Block::new("controls_for");
    block.fields.insert("VAR".to_string(), "i".to_string());
    block.values.insert("FROM".to_string(), number("1"));
    block.values.insert("TO".to_string(), number("10"));
    block.values.insert("BY".to_string(), number("1"));
    let out = generate(vec![block]);
    assert!(out.contains("for (i = 1; i <= 10; i++) {\n}\n"), "{}", out);
}

#[test]
fn for_loop_caches_dynamic_bounds() {
    let mut block = Block::new("controls_for");
    block.fields.insert("VAR".to_string(), "i".to_string());
    block.values.insert(
        "FROM".to_string(),
        arithmetic("ADD", number("1"), number("2")),
    );
    block.values.insert("TO".to_string(), var_get("limit"));
    block.values.insert("BY".to_string(), number("2"));
    let out = generate(vec![block]);
    assert!(out.contains("var i_start = 1 + 2;\n"), "{}", out);
    assert!(out.contains("var i_inc = 2;\n"), "{}", out);
    assert!(
        out.contains("for (i = i_start; i_inc >= 0 ? i <= limit : i >= limit; i += i_inc)"),
        "{}",
        out
    );
}

// --- Hoisting ---

#[test]
fn hoisted_helper_is_deduplicated() {
    let mut first = Block::new("math_number_property");
    first.fields.insert("PROPERTY".to_string(), "PRIME".to_string());
    first
        .values
        .insert("NUMBER_TO_CHECK".to_string(), number("7"));
    let mut second = Block::new("math_number_property");
    second.fields.insert("PROPERTY".to_string(), "PRIME".to_string());
    second
        .values
        .insert("NUMBER_TO_CHECK".to_string(), number("9"));
    let out = generate(vec![first, second]);
    assert_eq!(out.matches("function mathIsPrime").count(), 1, "{}", out);
    assert!(out.contains("mathIsPrime(7);\n"), "{}", out);
    assert!(out.contains("mathIsPrime(9);\n"), "{}", out);
}

#[test]
fn hoisted_helper_dodges_user_procedure_names() {
    let mut def = Block::new("procedures_defnoreturn");
    def.fields
        .insert("NAME".to_string(), "mathRandomInt".to_string());
    let mut call = Block::new("math_random_int");
    call.values.insert("FROM".to_string(), number("1"));
    call.values.insert("TO".to_string(), number("2"));
    let set = var_set("r", call);
    let out = generate(vec![def, set]);
    assert!(out.contains("function mathRandomInt2(a, b) {"), "{}", out);
    assert!(out.contains("r := mathRandomInt2(1, 2)\n"), "{}", out);
    assert!(out.contains("mathRandomInt()\n{\n\tglobal\n}"), "{}", out);
}

#[test]
fn helpers_flush_in_first_registration_order() {
    let mut sort = Block::new("lists_sort");
    sort.fields.insert("DIRECTION".to_string(), "1".to_string());
    sort.values.insert("LIST".to_string(), var_get("l"));
    let mut rev = Block::new("lists_reverse");
    rev.values.insert("LIST".to_string(), var_get("l"));
    let out = generate(vec![var_set("a", sort), var_set("b", rev)]);
    let sort_at = out.find("Sort(array").expect("Sort definition missing");
    let reverse_at = out.find("Reverse(array").expect("Reverse definition missing");
    assert!(sort_at < reverse_at, "{}", out);
}

// --- Comments ---

#[test]
fn statement_comment_is_emitted_above_the_statement() {
    let block = with_comment(var_set("score", number("42")), "Reset the score");
    let out = generate(vec![block]);
    assert!(out.contains("// Reset the score\nscore := 42\n"), "{}", out);
}

#[test]
fn value_child_comments_bubble_up() {
    let block = var_set("score", with_comment(number("42"), "the answer"));
    let out = generate(vec![block]);
    assert!(out.contains("// the answer\nscore := 42\n"), "{}", out);
}

#[test]
fn statement_child_comments_are_not_duplicated() {
    let mut block = Block::new("controls_if");
    block.values.insert("IF0".to_string(), boolean(true));
    block.statements.insert(
        "DO0".to_string(),
        with_comment(var_set("b", number("1")), "inner"),
    );
    let out = generate(vec![block]);
    assert_eq!(out.matches("// inner").count(), 1, "{}", out);
    assert!(out.contains("  // inner\n  b := 1\n"), "{}", out);
}

#[test]
fn chained_statement_comments_stay_with_their_blocks() {
    let mut first = with_comment(var_set("a", number("1")), "first");
    first.next = Some(Box::new(with_comment(var_set("b", number("2")), "second")));
    let out = generate(vec![first]);
    assert!(
        out.contains("// first\na := 1\n// second\nb := 2\n"),
        "{}",
        out
    );
}

#[test]
fn long_comments_wrap() {
    let comment = "This comment is considerably longer than the wrap budget \
                   and therefore must be broken across multiple lines.";
    let out = generate(vec![with_comment(var_set("a", number("1")), comment)]);
    assert!(out.matches("// ").count() >= 2, "{}", out);
}

// --- Index adjustment, both bases ---

fn char_at_from_start(at: Block) -> Block {
    let mut block = Block::new("text_charAt");
    block
        .fields
        .insert("WHERE".to_string(), "FROM_START".to_string());
    block.values.insert("VALUE".to_string(), var_get("t"));
    block.values.insert("AT".to_string(), at);
    block
}

#[test]
fn literal_index_folds_zero_based() {
    let out = generate(vec![char_at_from_start(number("2"))]);
    assert_eq!(out, "var t;\n\n\nt.charAt(2);\n");
}

#[test]
fn literal_index_folds_one_based() {
    let out = generate_one_based(vec![char_at_from_start(number("2"))]);
    assert_eq!(out, "var t;\n\n\nt.charAt(1);\n");
}

#[test]
fn dynamic_index_is_untouched_zero_based() {
    let out = generate(vec![char_at_from_start(var_get("i"))]);
    assert_eq!(out, "var i, t;\n\n\nt.charAt(i);\n");
}

#[test]
fn dynamic_index_emits_arithmetic_one_based() {
    let out = generate_one_based(vec![char_at_from_start(var_get("i"))]);
    assert_eq!(out, "var i, t;\n\n\nt.charAt((i - 1));\n");
}

#[test]
fn from_end_index_folds_with_negation() {
    let mut block = Block::new("text_charAt");
    block
        .fields
        .insert("WHERE".to_string(), "FROM_END".to_string());
    block.values.insert("VALUE".to_string(), var_get("t"));
    block.values.insert("AT".to_string(), number("2"));
    assert_eq!(
        generate(vec![block]),
        "var t;\n\n\nt.slice(-3).charAt(0);\n"
    );
}

#[test]
fn negative_literal_index_never_double_negates() {
    let mut block = Block::new("lists_getIndex");
    block.fields.insert("MODE".to_string(), "GET".to_string());
    block
        .fields
        .insert("WHERE".to_string(), "FROM_END".to_string());
    block.values.insert("VALUE".to_string(), var_get("l"));
    block.values.insert("AT".to_string(), number("-2"));
    let out = generate(vec![block]);
    assert!(out.contains("FromEnd(l, 1);\n"), "{}", out);
    assert!(!out.contains("- -"), "{}", out);
}

#[test]
fn index_of_adjusts_only_in_zero_based_mode() {
    let build = || {
        let mut block = Block::new("lists_indexOf");
        block.fields.insert("END".to_string(), "FIRST".to_string());
        block.values.insert("FIND".to_string(), text_block("x"));
        block.values.insert("VALUE".to_string(), var_get("l"));
        block
    };
    let zero = generate(vec![build()]);
    assert!(zero.contains("IndexOf(l, 'x') - 1;\n"), "{}", zero);
    let one = generate_one_based(vec![build()]);
    assert!(one.contains("IndexOf(l, 'x');\n"), "{}", one);
}

// --- Text ---

#[test]
fn text_literal_is_quoted_and_escaped() {
    assert_eq!(generate(vec![text_block("it's")]), "'it\\'s';\n");
    assert_eq!(generate(vec![text_block("a\\b")]), "'a\\\\b';\n");
}

#[test]
fn multiline_quote_concatenates_lines() {
    let generator = Generator::new();
    assert_eq!(
        generator.multiline_quote("a\nb"),
        "'a' + '\\n' +\n'b'"
    );
}

#[test]
fn text_join_arities() {
    let mut join0 = Block::new("text_join");
    join0.mutation.items = 0;
    assert_eq!(generate(vec![join0]), "'';\n");

    let mut join2 = Block::new("text_join");
    join2.mutation.items = 2;
    join2.values.insert("ADD0".to_string(), text_block("a"));
    join2.values.insert("ADD1".to_string(), number("1"));
    assert_eq!(generate(vec![join2]), "'a' + String(1);\n");

    let mut join3 = Block::new("text_join");
    join3.mutation.items = 3;
    for (i, n) in ["1", "2", "3"].iter().enumerate() {
        join3.values.insert(format!("ADD{}", i), number(n));
    }
    assert_eq!(generate(vec![join3]), "[1,2,3].join('');\n");
}

#[test]
fn substring_simple_operand_slices_inline() {
    let mut block = Block::new("text_getSubstring");
    block
        .fields
        .insert("WHERE1".to_string(), "FROM_START".to_string());
    block
        .fields
        .insert("WHERE2".to_string(), "FROM_START".to_string());
    block.values.insert("STRING".to_string(), var_get("s"));
    block.values.insert("AT1".to_string(), number("1"));
    block.values.insert("AT2".to_string(), number("3"));
    assert_eq!(generate(vec![block]), "var s;\n\n\ns.slice(1, 4);\n");
}

#[test]
fn substring_from_end_hoists_a_helper() {
    let mut block = Block::new("text_getSubstring");
    block
        .fields
        .insert("WHERE1".to_string(), "FROM_END".to_string());
    block.fields.insert("WHERE2".to_string(), "LAST".to_string());
    block
        .values
        .insert("STRING".to_string(), text_block("hello world"));
    block.values.insert("AT1".to_string(), number("1"));
    let out = generate(vec![block]);
    assert!(
        out.contains("function subsequenceFromEndLast(sequence, at1) {"),
        "{}",
        out
    );
    assert!(out.contains("subsequenceFromEndLast('hello world', 1);\n"), "{}", out);
}

// --- Lists ---

#[test]
fn list_literals() {
    assert_eq!(generate(vec![Block::new("lists_create_empty")]), "[];\n");
    let mut create = Block::new("lists_create_with");
    create.mutation.items = 2;
    create.values.insert("ADD0".to_string(), number("1"));
    create.values.insert("ADD1".to_string(), number("2"));
    assert_eq!(generate(vec![create]), "[1, 2];\n");
}

#[test]
fn set_index_random_caches_the_list() {
    let mut create = Block::new("lists_create_with");
    create.mutation.items = 1;
    create.values.insert("ADD0".to_string(), number("1"));
    let mut block = Block::new("lists_setIndex");
    block.fields.insert("MODE".to_string(), "SET".to_string());
    block.fields.insert("WHERE".to_string(), "RANDOM".to_string());
    block.values.insert("LIST".to_string(), create);
    block.values.insert("TO".to_string(), number("9"));
    let out = generate(vec![block]);
    assert!(out.contains("tmpList := [1]\n"), "{}", out);
    assert!(
        out.contains("Random, Rand, tmpList.MinIndex(), tmpList.MaxIndex()\n"),
        "{}",
        out
    );
    assert!(out.contains("tmpList[Rand] := 9\n"), "{}", out);
}

#[test]
fn sort_passes_the_reverse_flag() {
    let mut block = Block::new("lists_sort");
    block.fields.insert("DIRECTION".to_string(), "-1".to_string());
    block.values.insert("LIST".to_string(), var_get("l"));
    let out = generate(vec![block]);
    assert!(out.contains("Sort(l, True);\n"), "{}", out);
    let mut forward = Block::new("lists_sort");
    forward.fields.insert("DIRECTION".to_string(), "1".to_string());
    forward.values.insert("LIST".to_string(), var_get("l"));
    let out = generate(vec![forward]);
    assert!(out.contains("Sort(l);\n"), "{}", out);
}

#[test]
fn remove_from_first_is_a_statement() {
    let mut block = Block::new("lists_getIndex");
    block.fields.insert("MODE".to_string(), "REMOVE".to_string());
    block.fields.insert("WHERE".to_string(), "FIRST".to_string());
    block.values.insert("VALUE".to_string(), var_get("l"));
    assert_eq!(generate(vec![block]), "var l;\n\n\nl.RemoveAt(1)\n");
}

// --- Procedures ---

#[test]
fn procedure_definition_lands_in_the_preamble() {
    let mut def = Block::new("procedures_defreturn");
    def.fields.insert("NAME".to_string(), "add up".to_string());
    def.mutation.args = vec!["x".to_string(), "y".to_string()];
    def.values.insert(
        "RETURN".to_string(),
        arithmetic("ADD", var_get("x"), var_get("y")),
    );

    let mut call = Block::new("procedures_callreturn");
    call.fields.insert("NAME".to_string(), "add up".to_string());
    call.mutation.args = vec!["x".to_string(), "y".to_string()];
    call.values.insert("ARG0".to_string(), number("1"));
    call.values.insert("ARG1".to_string(), number("2"));
    let set = var_set("result", call);

    let out = generate(vec![def, set]);
    assert!(
        out.contains("add_up(x, y)\n{\n\tglobal\n  return x + y\n}"),
        "{}",
        out
    );
    assert!(out.contains("result := add_up(1, 2)\n"), "{}", out);
    assert!(out.starts_with("var x, y, result;\n"), "{}", out);
}

#[test]
fn if_return_emits_both_shapes() {
    let mut with_value = Block::new("procedures_ifreturn");
    with_value.mutation.has_return = true;
    with_value.values.insert("CONDITION".to_string(), boolean(true));
    with_value.values.insert("VALUE".to_string(), number("1"));
    let out = generate(vec![with_value]);
    assert!(out.contains("if (true)\n{\n  return 1\n}\n"), "{}", out);

    let bare = Block::new("procedures_ifreturn");
    let out = generate(vec![bare]);
    assert!(out.contains("if (False)\n{\n  return\n}\n"), "{}", out);
}

// --- Instrumentation hooks ---

#[test]
fn statement_prefix_is_injected_with_the_block_id() {
    let mut block = Block::new("controls_if");
    block.id = "blk7".to_string();
    block.values.insert("IF0".to_string(), boolean(true));
    let mut generator = Generator::new();
    generator.statement_prefix = Some("trace(%1);\n".to_string());
    let out = generator
        .workspace_to_code(&program(vec![block]))
        .expect("generation failed");
    assert!(out.contains("trace('blk7');\nif (true) {\n"), "{}", out);
}

#[test]
fn infinite_loop_trap_guards_loop_bodies() {
    let mut block = Block::new("controls_whileUntil");
    block.id = "w1".to_string();
    block.values.insert("BOOL".to_string(), boolean(true));
    let mut generator = Generator::new();
    generator.infinite_loop_trap = Some("guard(%1);\n".to_string());
    let out = generator
        .workspace_to_code(&program(vec![block]))
        .expect("generation failed");
    assert!(out.contains("while (true) {\nguard('w1');\n}\n"), "{}", out);
}

// --- Identifier registry ---

#[test]
fn safe_name_mangles_illegal_characters() {
    assert_eq!(safe_name("my var"), "my_var");
    assert_eq!(safe_name("2nd"), "my_2nd");
    assert_eq!(safe_name(""), "unnamed");
    assert_eq!(safe_name("héllo"), "h_llo");
}

#[test]
fn name_db_is_stable_and_case_insensitive() {
    let mut db = NameDb::new(&["while"]);
    let first = db.get_name("Score", Category::Variable);
    let again = db.get_name("score", Category::Variable);
    assert_eq!(first, again);
    assert_eq!(db.get_name("while", Category::Variable), "while2");
    // Same name, different category: distinct identifiers.
    let as_proc = db.get_name("Score", Category::Procedure);
    assert_ne!(first, as_proc);
}

#[test]
fn distinct_names_never_repeat() {
    let mut db = NameDb::new(&[]);
    assert_eq!(db.get_distinct_name("tmp", Category::Variable), "tmp");
    assert_eq!(db.get_distinct_name("tmp", Category::Variable), "tmp2");
    assert_eq!(db.get_distinct_name("tmp", Category::Variable), "tmp3");
}

// --- Custom rule tables ---

fn the_answer(_block: &Block, _gen: &mut Generator) -> Result<generator::Code, GenError> {
    Ok(generator::Code::Expr("42".to_string(), Order::Atomic))
}

fn table_with_answer(kind: &str) -> Option<generator::rules::Rule> {
    match kind {
        "the_answer" => Some(the_answer),
        _ => generator::rules::rule_for(kind),
    }
}

#[test]
fn engine_dispatches_through_the_supplied_table() {
    let mut generator = Generator::with_rules(table_with_answer);
    let block = arithmetic("ADD", Block::new("the_answer"), number("1"));
    let out = generator
        .workspace_to_code(&program(vec![block]))
        .expect("generation failed");
    assert_eq!(out, "42 + 1;\n");
}

// --- Re-runs ---

#[test]
fn generator_state_resets_between_runs() {
    let build = || {
        let mut call = Block::new("math_random_int");
        call.values.insert("FROM".to_string(), number("1"));
        call.values.insert("TO".to_string(), number("2"));
        var_set("r", call)
    };
    let mut generator = Generator::new();
    let first = generator
        .workspace_to_code(&program(vec![build()]))
        .expect("generation failed");
    let second = generator
        .workspace_to_code(&program(vec![build()]))
        .expect("generation failed");
    assert_eq!(first, second);
    assert_eq!(second.matches("function mathRandomInt").count(), 1);
}
