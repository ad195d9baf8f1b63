use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, Generator};
use crate::names::Category;
use crate::order::Order;

/// Variable getter.
pub fn get(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let name = block.field("VAR").ok_or(GenError::MissingField {
        kind: "variables_get",
        field: "VAR",
    })?;
    let code = gen.names.get_name(name, Category::Variable);
    Ok(Code::Expr(code, Order::Atomic))
}

/// Variable setter.
pub fn set(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "VALUE", Order::Assignment)?
        .unwrap_or_else(|| "\"\"".to_string());
    let name = block.field("VAR").ok_or(GenError::MissingField {
        kind: "variables_set",
        field: "VAR",
    })?;
    let var_name = gen.names.get_name(name, Category::Variable);
    Ok(Code::Stmt(format!("{} := {}\n", var_name, argument0)))
}
