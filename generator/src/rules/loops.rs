use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, Generator, INDENT, format_number, is_bare_word, is_number};
use crate::names::Category;
use crate::order::Order;

/// Repeat n times.
pub fn controls_repeat(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let repeats = match block.field("TIMES") {
        // Internal number (controls_repeat).
        Some(times) => format_number(times.trim().parse::<f64>().unwrap_or(f64::NAN)),
        // External number (controls_repeat_ext).
        None => gen
            .value_to_code(block, "TIMES", Order::Assignment)?
            .unwrap_or_else(|| "0".to_string()),
    };
    let branch = gen.statement_to_code(block, "DO")?;
    let branch = gen.add_loop_trap(branch, block);
    let mut code = String::new();
    let loop_var = gen.names.get_distinct_name("count", Category::Variable);
    let mut end_var = repeats.clone();
    if !is_bare_word(&repeats) && !is_number(&repeats) {
        // Evaluate the bound once, up front.
        end_var = gen.names.get_distinct_name("repeat_end", Category::Variable);
        code.push_str(&format!("var {} = {};\n", end_var, repeats));
    }
    code.push_str(&format!(
        "for (var {} = 0; {} < {}; {}++) {{\n{}}}\n",
        loop_var, loop_var, end_var, loop_var, branch
    ));
    Ok(Code::Stmt(code))
}

/// Do while/until loop.
pub fn controls_while_until(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let until = block.field("MODE") == Some("UNTIL");
    let condition_order = if until { Order::LogicalNot } else { Order::None };
    let mut argument0 = gen
        .value_to_code(block, "BOOL", condition_order)?
        .unwrap_or_else(|| "false".to_string());
    let branch = gen.statement_to_code(block, "DO")?;
    let branch = gen.add_loop_trap(branch, block);
    if until {
        argument0 = format!("!{}", argument0);
    }
    Ok(Code::Stmt(format!(
        "while ({}) {{\n{}}}\n",
        argument0, branch
    )))
}

/// For loop with a counting variable.
pub fn controls_for(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let variable0 = gen.names.get_name(
        block.field("VAR").ok_or(GenError::MissingField {
            kind: "controls_for",
            field: "VAR",
        })?,
        Category::Variable,
    );
    let argument0 = gen
        .value_to_code(block, "FROM", Order::Assignment)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "TO", Order::Assignment)?
        .unwrap_or_else(|| "0".to_string());
    let increment = gen
        .value_to_code(block, "BY", Order::Assignment)?
        .unwrap_or_else(|| "1".to_string());
    let branch = gen.statement_to_code(block, "DO")?;
    let branch = gen.add_loop_trap(branch, block);
    let mut code = String::new();
    if is_number(&argument0) && is_number(&argument1) && is_number(&increment) {
        // All arguments are simple numbers.
        let up = argument0.trim().parse::<f64>().unwrap_or(0.0)
            <= argument1.trim().parse::<f64>().unwrap_or(0.0);
        code.push_str(&format!(
            "for ({} = {}; {}{}{}; {}",
            variable0,
            argument0,
            variable0,
            if up { " <= " } else { " >= " },
            argument1,
            variable0
        ));
        let step = increment.trim().parse::<f64>().unwrap_or(1.0).abs();
        if step == 1.0 {
            code.push_str(if up { "++" } else { "--" });
        } else {
            code.push_str(&format!(
                "{}{}",
                if up { " += " } else { " -= " },
                format_number(step)
            ));
        }
        code.push_str(&format!(") {{\n{}}}\n", branch));
    } else {
        // Cache non-simple bounds so they evaluate only once, and determine
        // the loop direction at runtime.
        let mut start_var = argument0.clone();
        if !is_bare_word(&argument0) && !is_number(&argument0) {
            start_var = gen
                .names
                .get_distinct_name(&format!("{}_start", variable0), Category::Variable);
            code.push_str(&format!("var {} = {};\n", start_var, argument0));
        }
        let mut end_var = argument1.clone();
        if !is_bare_word(&argument1) && !is_number(&argument1) {
            end_var = gen
                .names
                .get_distinct_name(&format!("{}_end", variable0), Category::Variable);
            code.push_str(&format!("var {} = {};\n", end_var, argument1));
        }
        let inc_var = gen
            .names
            .get_distinct_name(&format!("{}_inc", variable0), Category::Variable);
        if is_number(&increment) {
            code.push_str(&format!(
                "var {} = {};\n",
                inc_var,
                format_number(increment.trim().parse::<f64>().unwrap_or(1.0).abs())
            ));
        } else {
            code.push_str(&format!("var {} = Math.abs({});\n", inc_var, increment));
        }
        code.push_str(&format!("if ({} > {}) {{\n", start_var, end_var));
        code.push_str(&format!("{}{} = -{};\n}}\n", INDENT, inc_var, inc_var));
        code.push_str(&format!(
            "for ({} = {}; {} >= 0 ? {} <= {} : {} >= {}; {} += {}) {{\n{}}}\n",
            variable0,
            start_var,
            inc_var,
            variable0,
            end_var,
            variable0,
            end_var,
            variable0,
            inc_var,
            branch
        ));
    }
    Ok(Code::Stmt(code))
}

/// For-each loop over a list.
pub fn controls_for_each(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let variable0 = gen.names.get_name(
        block.field("VAR").ok_or(GenError::MissingField {
            kind: "controls_forEach",
            field: "VAR",
        })?,
        Category::Variable,
    );
    let argument0 = gen
        .value_to_code(block, "LIST", Order::Assignment)?
        .unwrap_or_else(|| "[]".to_string());
    let branch = gen.statement_to_code(block, "DO")?;
    let branch = gen.add_loop_trap(branch, block);
    let mut code = String::new();
    let mut list_var = argument0.clone();
    if !is_bare_word(&argument0) {
        list_var = gen
            .names
            .get_distinct_name(&format!("{}_list", variable0), Category::Variable);
        code.push_str(&format!("var {} = {};\n", list_var, argument0));
    }
    let index_var = gen
        .names
        .get_distinct_name(&format!("{}_index", variable0), Category::Variable);
    let branch = format!(
        "{}{} = {}[{}];\n{}",
        INDENT, variable0, list_var, index_var, branch
    );
    code.push_str(&format!(
        "for (var {} in {}) {{\n{}}}\n",
        index_var, list_var, branch
    ));
    Ok(Code::Stmt(code))
}

/// Flow statements: continue, break.
pub fn flow_statements(block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    match block.field("FLOW") {
        Some("BREAK") => Ok(Code::Stmt("break;\n".to_string())),
        Some("CONTINUE") => Ok(Code::Stmt("continue;\n".to_string())),
        other => Err(GenError::UnhandledOption {
            kind: "controls_flow_statements",
            option: other.unwrap_or("").to_string(),
        }),
    }
}
