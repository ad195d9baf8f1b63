use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, FUNCTION_NAME_PLACEHOLDER, Generator};
use crate::order::Order;

/// Colour picker.
pub fn picker(block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    let code = block
        .field("COLOUR")
        .unwrap_or("#000000")
        .replacen('#', "0x", 1);
    Ok(Code::Expr(code, Order::Atomic))
}

/// Generate a random colour.
pub fn random(_block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let function_name = gen.provide_function(
        "RandomColor",
        &[
            &format!("{}()", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tRandom, rand, 0x000000, 0xFFFFFF",
            "\treturn rand",
            "}",
        ],
    );
    Ok(Code::Expr(format!("{}()", function_name), Order::FunctionCall))
}

/// Compose a colour from RGB components expressed as percentages.
pub fn rgb(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let red = gen
        .value_to_code(block, "RED", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let green = gen
        .value_to_code(block, "GREEN", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let blue = gen
        .value_to_code(block, "BLUE", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let function_name = gen.provide_function(
        "ColorFromRGB",
        &[
            &format!("{}(r, g, b)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "  return Format(\"0x{:02x}{:02x}{:02x}\"",
            "    , Max(Min(r*2.55, 255), 0)",
            "    , Max(Min(g*2.55, 255), 0)",
            "    , Max(Min(b*2.55, 255), 0))",
            "}",
        ],
    );
    let code = format!("{}({}, {}, {})", function_name, red, green, blue);
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Blend two colours together.
pub fn blend(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let c1 = gen
        .value_to_code(block, "COLOUR1", Order::Comma)?
        .unwrap_or_else(|| "000000".to_string());
    let c2 = gen
        .value_to_code(block, "COLOUR2", Order::Comma)?
        .unwrap_or_else(|| "000000".to_string());
    let ratio = gen
        .value_to_code(block, "RATIO", Order::Comma)?
        .unwrap_or_else(|| "0.5".to_string());
    let function_name = gen.provide_function(
        "BlendColors",
        &[
            &format!("{}(c1, c2, ratio)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tratio := Max(Min(ratio, 1), 0)",
            "\tr1 := (c1>>16) & 0xFF, g1 := (c1>>8)&0xFF, b1 := c1&0xFF",
            "\tr2 := (c2>>16) & 0xFF, g2 := (c2>>8)&0xFF, b2 := c2&0xFF",
            "\tr := Round(r1 * (1 - ratio) + r2 * ratio)",
            "\tg := Round(g1 * (1 - ratio) + g2 * ratio)",
            "\tb := Round(b1 * (1 - ratio) + b2 * ratio)",
            "\treturn (r&0xFF)<<16 | (g&0xFF)<<8 | (b&0xFF)",
            "}",
        ],
    );
    let code = format!("{}({}, {}, {})", function_name, c1, c2, ratio);
    Ok(Code::Expr(code, Order::FunctionCall))
}
