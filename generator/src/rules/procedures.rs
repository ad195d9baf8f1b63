use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, Generator, INDENT, prefix_lines};
use crate::names::Category;
use crate::order::Order;

/// Define a procedure (with or without a return value). The definition is
/// filed in the preamble; the statement stream gets nothing.
pub fn def(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let name = block.field("NAME").ok_or(GenError::MissingField {
        kind: "procedures_defreturn",
        field: "NAME",
    })?;
    let func_name = gen.names.get_name(name, Category::Procedure);

    let mut xfix1 = String::new();
    if let Some(prefix) = gen.statement_prefix.clone() {
        xfix1.push_str(&gen.inject_id(&prefix, block));
    }
    if let Some(suffix) = gen.statement_suffix.clone() {
        xfix1.push_str(&gen.inject_id(&suffix, block));
    }
    if !xfix1.is_empty() {
        xfix1 = prefix_lines(&xfix1, INDENT);
    }
    let mut loop_trap = String::new();
    if let Some(trap) = gen.infinite_loop_trap.clone() {
        loop_trap = prefix_lines(&gen.inject_id(&trap, block), INDENT);
    }
    let branch = gen.statement_to_code(block, "STACK")?;
    let mut return_value = gen
        .value_to_code(block, "RETURN", Order::None)?
        .unwrap_or_default();
    let mut xfix2 = String::new();
    if !branch.is_empty() && !return_value.is_empty() {
        // After executing the function body, revisit this block for the
        // return.
        xfix2 = xfix1.clone();
    }
    if !return_value.is_empty() {
        return_value = format!("{}return {}\n", INDENT, return_value);
    }
    let args: Vec<String> = block
        .mutation
        .args
        .iter()
        .map(|arg| gen.names.get_name(arg, Category::Variable))
        .collect();
    let code = format!(
        "{}({})\n{{\n\tglobal\n{}{}{}{}{}}}",
        func_name,
        args.join(", "),
        xfix1,
        loop_trap,
        branch,
        xfix2,
        return_value
    );
    let code = gen.scrub(block, code, false)?;
    // The % prefix keeps user procedures out of the hoisted-helper keyspace.
    gen.define(&format!("%{}", func_name), code);
    Ok(Code::None)
}

/// Call a procedure with a return value.
pub fn call_return(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let name = block.field("NAME").ok_or(GenError::MissingField {
        kind: "procedures_callreturn",
        field: "NAME",
    })?;
    let func_name = gen.names.get_name(name, Category::Procedure);
    let mut args = Vec::with_capacity(block.mutation.args.len());
    for i in 0..block.mutation.args.len() {
        args.push(
            gen.value_to_code(block, &format!("ARG{}", i), Order::Comma)?
                .unwrap_or_else(|| "null".to_string()),
        );
    }
    let code = format!("{}({})", func_name, args.join(", "));
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Call a procedure with no return value. Same as the value form, with a
/// line ending.
pub fn call_no_return(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    match call_return(block, gen)? {
        Code::Expr(code, _) => Ok(Code::Stmt(format!("{}\n", code))),
        other => Ok(other),
    }
}

/// Conditionally return a value from a procedure.
pub fn if_return(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let condition = gen
        .value_to_code(block, "CONDITION", Order::None)?
        .unwrap_or_else(|| "False".to_string());
    let mut code = format!("if ({})\n{{\n", condition);
    if let Some(suffix) = gen.statement_suffix.clone() {
        // Inject the suffix here as well; the regular one at the end of the
        // procedure is skipped when this return triggers.
        code.push_str(&prefix_lines(&gen.inject_id(&suffix, block), INDENT));
    }
    if block.mutation.has_return {
        let value = gen
            .value_to_code(block, "VALUE", Order::None)?
            .unwrap_or_else(|| "null".to_string());
        code.push_str(&format!("{}return {}\n", INDENT, value));
    } else {
        code.push_str(&format!("{}return\n", INDENT));
    }
    code.push_str("}\n");
    Ok(Code::Stmt(code))
}

/// Return from within a function body.
pub fn function_return(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let return_value = gen
        .value_to_code(block, "RETURN_VALUE", Order::None)?
        .unwrap_or_default();
    Ok(Code::Stmt(format!("return {}\n", return_value)))
}

/// Call a function as a statement; arguments connect to sockets named
/// after the function's declared parameters.
pub fn function_call(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    match function_call_output(block, gen)? {
        Code::Expr(code, _) => Ok(Code::Stmt(format!("{}\n", code))),
        other => Ok(other),
    }
}

/// Call a function as a value.
pub fn function_call_output(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let name = block.field("NAME").ok_or(GenError::MissingField {
        kind: "function_call",
        field: "NAME",
    })?;
    let func_name = gen.names.get_name(name, Category::Procedure);
    let mut args = Vec::with_capacity(block.mutation.args.len());
    for arg in block.mutation.args.clone() {
        args.push(
            gen.value_to_code(block, &arg, Order::Comma)?
                .unwrap_or_default(),
        );
    }
    let code = format!("{}({})", func_name, args.join(", "));
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// A function parameter used as a value.
pub fn argument_reporter(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let value = block.field("VALUE").ok_or(GenError::MissingField {
        kind: "argument_reporter",
        field: "VALUE",
    })?;
    let name = gen.names.get_name(value, Category::Variable);
    Ok(Code::Expr(name, Order::Atomic))
}
