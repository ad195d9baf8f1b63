use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, Generator, INDENT, prefix_lines};
use crate::order::Order;

/// If/elseif/else condition.
pub fn controls_if(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let mut code = String::new();
    if let Some(prefix) = gen.statement_prefix.clone() {
        // Automatic prefix insertion is switched off for this block; add it
        // once up front so the whole cascade is traced as one statement.
        code.push_str(&gen.inject_id(&prefix, block));
    }
    let mut n = 0;
    loop {
        let condition = gen
            .value_to_code(block, &format!("IF{}", n), Order::None)?
            .unwrap_or_else(|| "false".to_string());
        let mut branch = gen.statement_to_code(block, &format!("DO{}", n))?;
        if let Some(suffix) = gen.statement_suffix.clone() {
            branch = format!(
                "{}{}",
                prefix_lines(&gen.inject_id(&suffix, block), INDENT),
                branch
            );
        }
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({}) {{\n{}}}", condition, branch));
        n += 1;
        if !block.has_value_input(&format!("IF{}", n)) {
            break;
        }
    }

    if block.has_statement_input("ELSE") || gen.statement_suffix.is_some() {
        let mut branch = gen.statement_to_code(block, "ELSE")?;
        if let Some(suffix) = gen.statement_suffix.clone() {
            branch = format!(
                "{}{}",
                prefix_lines(&gen.inject_id(&suffix, block), INDENT),
                branch
            );
        }
        code.push_str(&format!(" else {{\n{}}}", branch));
    }
    Ok(Code::Stmt(format!("{}\n", code)))
}

/// Comparison operator.
pub fn compare(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let operator = match block.field("OP") {
        Some("EQ") => "==",
        Some("NEQ") => "!=",
        Some("LT") => "<",
        Some("LTE") => "<=",
        Some("GT") => ">",
        Some("GTE") => ">=",
        other => {
            return Err(GenError::UnhandledOption {
                kind: "logic_compare",
                option: other.unwrap_or("").to_string(),
            });
        }
    };
    let order = if operator == "==" || operator == "!=" {
        Order::Equality
    } else {
        Order::Relational
    };
    let argument0 = gen
        .value_to_code(block, "A", order)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "B", order)?
        .unwrap_or_else(|| "0".to_string());
    let code = format!("{} {} {}", argument0, operator, argument1);
    Ok(Code::Expr(code, order))
}

/// Operations 'and', 'or'.
pub fn operation(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let and = block.field("OP") == Some("AND");
    let operator = if and { "&&" } else { "||" };
    let order = if and {
        Order::LogicalAnd
    } else {
        Order::LogicalOr
    };
    let mut argument0 = gen.value_to_code(block, "A", order)?;
    let mut argument1 = gen.value_to_code(block, "B", order)?;
    if argument0.is_none() && argument1.is_none() {
        // If there are no arguments, then the return value is false.
        argument0 = Some("false".to_string());
        argument1 = Some("false".to_string());
    } else {
        // Single missing arguments have no effect on the return value.
        let default_argument = if and { "true" } else { "false" };
        argument0 = argument0.or_else(|| Some(default_argument.to_string()));
        argument1 = argument1.or_else(|| Some(default_argument.to_string()));
    }
    let code = format!(
        "{} {} {}",
        argument0.unwrap_or_default(),
        operator,
        argument1.unwrap_or_default()
    );
    Ok(Code::Expr(code, order))
}

/// Negation.
pub fn negate(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let order = Order::LogicalNot;
    let argument0 = gen
        .value_to_code(block, "BOOL", order)?
        .unwrap_or_else(|| "true".to_string());
    Ok(Code::Expr(format!("!{}", argument0), order))
}

/// Boolean values true and false.
pub fn boolean(block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    let code = if block.field("BOOL") == Some("TRUE") {
        "true"
    } else {
        "false"
    };
    Ok(Code::Expr(code.to_string(), Order::Atomic))
}

/// Null data type.
pub fn null(_block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    Ok(Code::Expr("null".to_string(), Order::Atomic))
}

/// Ternary operator.
pub fn ternary(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let value_if = gen
        .value_to_code(block, "IF", Order::Conditional)?
        .unwrap_or_else(|| "false".to_string());
    let value_then = gen
        .value_to_code(block, "THEN", Order::Conditional)?
        .unwrap_or_else(|| "null".to_string());
    let value_else = gen
        .value_to_code(block, "ELSE", Order::Conditional)?
        .unwrap_or_else(|| "null".to_string());
    let code = format!("{} ? {} : {}", value_if, value_then, value_else);
    Ok(Code::Expr(code, Order::Conditional))
}
