use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, FUNCTION_NAME_PLACEHOLDER, Generator, format_number};
use crate::order::Order;

/// Numeric value.
pub fn number(block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    let raw = block.field("NUM").ok_or(GenError::MissingField {
        kind: "math_number",
        field: "NUM",
    })?;
    let value = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
    let order = if value >= 0.0 {
        Order::Atomic
    } else {
        Order::UnaryNegation
    };
    Ok(Code::Expr(format_number(value), order))
}

/// Basic arithmetic operators, and power.
pub fn arithmetic(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let (operator, order) = match block.field("OP") {
        Some("ADD") => (Some(" + "), Order::Addition),
        Some("MINUS") => (Some(" - "), Order::Subtraction),
        Some("MULTIPLY") => (Some(" * "), Order::Multiplication),
        Some("DIVIDE") => (Some(" / "), Order::Division),
        // Power has no operator; handled as a function call below.
        Some("POWER") => (None, Order::Comma),
        other => {
            return Err(GenError::UnknownOperator {
                kind: "math_arithmetic",
                operator: other.unwrap_or("").to_string(),
            });
        }
    };
    let argument0 = gen
        .value_to_code(block, "A", order)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "B", order)?
        .unwrap_or_else(|| "0".to_string());
    match operator {
        Some(op) => Ok(Code::Expr(
            format!("{}{}{}", argument0, op, argument1),
            order,
        )),
        None => Ok(Code::Expr(
            format!("Math.pow({}, {})", argument0, argument1),
            Order::FunctionCall,
        )),
    }
}

/// Math operators with a single operand.
pub fn single(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let operator = block.field("OP").unwrap_or("").to_string();
    if operator == "NEG" {
        // Negation is a special case given its different operator precedence.
        let mut arg = gen
            .value_to_code(block, "NUM", Order::UnaryNegation)?
            .unwrap_or_else(|| "0".to_string());
        if arg.starts_with('-') {
            // --3 is not legal.
            arg = format!(" {}", arg);
        }
        return Ok(Code::Expr(format!("-{}", arg), Order::UnaryNegation));
    }
    let arg = if matches!(operator.as_str(), "SIN" | "COS" | "TAN") {
        gen.value_to_code(block, "NUM", Order::Division)?
    } else {
        gen.value_to_code(block, "NUM", Order::None)?
    }
    .unwrap_or_else(|| "0".to_string());

    // First, cases whose generated value never needs wrapping parentheses.
    let code = match operator.as_str() {
        "ABS" => Some(format!("Math.abs({})", arg)),
        "ROOT" => Some(format!("Math.sqrt({})", arg)),
        "LN" => Some(format!("Math.log({})", arg)),
        "EXP" => Some(format!("Math.exp({})", arg)),
        "POW10" => Some(format!("Math.pow(10,{})", arg)),
        "ROUND" => Some(format!("Math.round({})", arg)),
        "ROUNDUP" => Some(format!("Math.ceil({})", arg)),
        "ROUNDDOWN" => Some(format!("Math.floor({})", arg)),
        "SIN" => Some(format!("Math.sin({} / 180 * Math.PI)", arg)),
        "COS" => Some(format!("Math.cos({} / 180 * Math.PI)", arg)),
        "TAN" => Some(format!("Math.tan({} / 180 * Math.PI)", arg)),
        _ => None,
    };
    if let Some(code) = code {
        return Ok(Code::Expr(code, Order::FunctionCall));
    }
    // Second, cases whose generated value may need wrapping parentheses.
    let code = match operator.as_str() {
        "LOG10" => format!("Math.log({}) / Math.log(10)", arg),
        "ASIN" => format!("Math.asin({}) / Math.PI * 180", arg),
        "ACOS" => format!("Math.acos({}) / Math.PI * 180", arg),
        "ATAN" => format!("Math.atan({}) / Math.PI * 180", arg),
        _ => {
            return Err(GenError::UnknownOperator {
                kind: "math_single",
                operator,
            });
        }
    };
    Ok(Code::Expr(code, Order::Division))
}

/// Constants: PI, E, the Golden Ratio, sqrt(2), 1/sqrt(2), INFINITY.
pub fn constant(block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    let (code, order) = match block.field("CONSTANT") {
        Some("PI") => ("Math.PI", Order::Member),
        Some("E") => ("Math.E", Order::Member),
        Some("GOLDEN_RATIO") => ("(1 + Math.sqrt(5)) / 2", Order::Division),
        Some("SQRT2") => ("Math.SQRT2", Order::Member),
        Some("SQRT1_2") => ("Math.SQRT1_2", Order::Member),
        Some("INFINITY") => ("Infinity", Order::Atomic),
        other => {
            return Err(GenError::UnhandledOption {
                kind: "math_constant",
                option: other.unwrap_or("").to_string(),
            });
        }
    };
    Ok(Code::Expr(code.to_string(), order))
}

/// Check if a number is even, odd, prime, whole, positive or negative,
/// or if it is divisible by a certain number. Returns true or false.
pub fn number_property(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let number_to_check = gen
        .value_to_code(block, "NUMBER_TO_CHECK", Order::Modulus)?
        .unwrap_or_else(|| "0".to_string());
    let property = block.field("PROPERTY").unwrap_or("").to_string();
    if property == "PRIME" {
        // Prime is a special case as it is not a one-liner test.
        let function_name = gen.provide_function(
            "mathIsPrime",
            &[
                &format!("function {}(n) {{", FUNCTION_NAME_PLACEHOLDER),
                "  // https://en.wikipedia.org/wiki/Primality_test#Naive_methods",
                "  if (n == 2 || n == 3) {",
                "    return true;",
                "  }",
                "  // False if n is NaN, negative, is 1, or not whole.",
                "  // And false if n is divisible by 2 or 3.",
                "  if (isNaN(n) || n <= 1 || n % 1 != 0 || n % 2 == 0 || n % 3 == 0) {",
                "    return false;",
                "  }",
                "  // Check all the numbers of form 6k +/- 1, up to sqrt(n).",
                "  for (var x = 6; x <= Math.sqrt(n) + 1; x += 6) {",
                "    if (n % (x - 1) == 0 || n % (x + 1) == 0) {",
                "      return false;",
                "    }",
                "  }",
                "  return true;",
                "}",
            ],
        );
        let code = format!("{}({})", function_name, number_to_check);
        return Ok(Code::Expr(code, Order::FunctionCall));
    }
    let code = match property.as_str() {
        "EVEN" => format!("{} % 2 == 0", number_to_check),
        "ODD" => format!("{} % 2 == 1", number_to_check),
        "WHOLE" => format!("{} % 1 == 0", number_to_check),
        "POSITIVE" => format!("{} > 0", number_to_check),
        "NEGATIVE" => format!("{} < 0", number_to_check),
        "DIVISIBLE_BY" => {
            let divisor = gen
                .value_to_code(block, "DIVISOR", Order::Modulus)?
                .unwrap_or_else(|| "0".to_string());
            format!("{} % {} == 0", number_to_check, divisor)
        }
        _ => {
            return Err(GenError::UnhandledOption {
                kind: "math_number_property",
                option: property,
            });
        }
    };
    Ok(Code::Expr(code, Order::Equality))
}

/// Add to a variable in place.
pub fn change(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "DELTA", Order::Addition)?
        .unwrap_or_else(|| "0".to_string());
    let var_name = gen.names.get_name(
        block.field("VAR").ok_or(GenError::MissingField {
            kind: "math_change",
            field: "VAR",
        })?,
        crate::names::Category::Variable,
    );
    Ok(Code::Stmt(format!(
        "{} = (typeof {} == 'number' ? {} : 0) + {};\n",
        var_name, var_name, var_name, argument0
    )))
}

/// Math functions applied to a list.
pub fn on_list(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let func = block.field("OP").unwrap_or("").to_string();
    let code = match func.as_str() {
        "SUM" => {
            let list = gen
                .value_to_code(block, "LIST", Order::Member)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}.reduce(function(x, y) {{return x + y;}})", list)
        }
        "MIN" => {
            let list = gen
                .value_to_code(block, "LIST", Order::Comma)?
                .unwrap_or_else(|| "[]".to_string());
            format!("Math.min.apply(null, {})", list)
        }
        "MAX" => {
            let list = gen
                .value_to_code(block, "LIST", Order::Comma)?
                .unwrap_or_else(|| "[]".to_string());
            format!("Math.max.apply(null, {})", list)
        }
        "AVERAGE" => {
            // mathMean([null,null,1,3]) == 2.0.
            let function_name = gen.provide_function(
                "mathMean",
                &[
                    &format!("function {}(myList) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  return myList.reduce(function(x, y) {return x + y;}) / myList.length;",
                    "}",
                ],
            );
            let list = gen
                .value_to_code(block, "LIST", Order::None)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}({})", function_name, list)
        }
        "MEDIAN" => {
            // mathMedian([null,null,1,3]) == 2.0.
            let function_name = gen.provide_function(
                "mathMedian",
                &[
                    &format!("function {}(myList) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  var localList = myList.filter(function (x) {return typeof x == 'number';});",
                    "  if (!localList.length) return null;",
                    "  localList.sort(function(a, b) {return b - a;});",
                    "  if (localList.length % 2 == 0) {",
                    "    return (localList[localList.length / 2 - 1] + localList[localList.length / 2]) / 2;",
                    "  } else {",
                    "    return localList[(localList.length - 1) / 2];",
                    "  }",
                    "}",
                ],
            );
            let list = gen
                .value_to_code(block, "LIST", Order::None)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}({})", function_name, list)
        }
        "MODE" => {
            // As a list of numbers can contain more than one mode,
            // the returned result is provided as an array.
            // Mode of [3, 'x', 'x', 1, 1, 2, '3'] -> ['x', 1].
            let function_name = gen.provide_function(
                "mathModes",
                &[
                    &format!("function {}(values) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  var modes = [];",
                    "  var counts = [];",
                    "  var maxCount = 0;",
                    "  for (var i = 0; i < values.length; i++) {",
                    "    var value = values[i];",
                    "    var found = false;",
                    "    var thisCount;",
                    "    for (var j = 0; j < counts.length; j++) {",
                    "      if (counts[j][0] === value) {",
                    "        thisCount = ++counts[j][1];",
                    "        found = true;",
                    "        break;",
                    "      }",
                    "    }",
                    "    if (!found) {",
                    "      counts.push([value, 1]);",
                    "      thisCount = 1;",
                    "    }",
                    "    maxCount = Math.max(thisCount, maxCount);",
                    "  }",
                    "  for (var j = 0; j < counts.length; j++) {",
                    "    if (counts[j][1] == maxCount) {",
                    "        modes.push(counts[j][0]);",
                    "    }",
                    "  }",
                    "  return modes;",
                    "}",
                ],
            );
            let list = gen
                .value_to_code(block, "LIST", Order::None)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}({})", function_name, list)
        }
        "STD_DEV" => {
            let function_name = gen.provide_function(
                "mathStandardDeviation",
                &[
                    &format!("function {}(numbers) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  var n = numbers.length;",
                    "  if (!n) return null;",
                    "  var mean = numbers.reduce(function(x, y) {return x + y;}) / n;",
                    "  var variance = 0;",
                    "  for (var j = 0; j < n; j++) {",
                    "    variance += Math.pow(numbers[j] - mean, 2);",
                    "  }",
                    "  variance = variance / n;",
                    "  return Math.sqrt(variance);",
                    "}",
                ],
            );
            let list = gen
                .value_to_code(block, "LIST", Order::None)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}({})", function_name, list)
        }
        "RANDOM" => {
            let function_name = gen.provide_function(
                "mathRandomList",
                &[
                    &format!("function {}(list) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  var x = Math.floor(Math.random() * list.length);",
                    "  return list[x];",
                    "}",
                ],
            );
            let list = gen
                .value_to_code(block, "LIST", Order::None)?
                .unwrap_or_else(|| "[]".to_string());
            format!("{}({})", function_name, list)
        }
        _ => {
            return Err(GenError::UnknownOperator {
                kind: "math_on_list",
                operator: func,
            });
        }
    };
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Remainder computation.
pub fn modulo(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "DIVIDEND", Order::Modulus)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "DIVISOR", Order::Modulus)?
        .unwrap_or_else(|| "0".to_string());
    let code = format!("{} % {}", argument0, argument1);
    Ok(Code::Expr(code, Order::Modulus))
}

/// Constrain a number between two limits.
pub fn constrain(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "VALUE", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "LOW", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let argument2 = gen
        .value_to_code(block, "HIGH", Order::Comma)?
        .unwrap_or_else(|| "Infinity".to_string());
    let code = format!(
        "Math.min(Math.max({}, {}), {})",
        argument0, argument1, argument2
    );
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Random integer between [X] and [Y].
pub fn random_int(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "FROM", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "TO", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let function_name = gen.provide_function(
        "mathRandomInt",
        &[
            &format!("function {}(a, b) {{", FUNCTION_NAME_PLACEHOLDER),
            "  if (a > b) {",
            "    // Swap a and b to ensure a is smaller.",
            "    var c = a;",
            "    a = b;",
            "    b = c;",
            "  }",
            "  return Math.floor(Math.random() * (b - a + 1) + a);",
            "}",
        ],
    );
    let code = format!("{}({}, {})", function_name, argument0, argument1);
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Random fraction between 0 and 1.
pub fn random_float(_block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    Ok(Code::Expr(
        "Math.random()".to_string(),
        Order::FunctionCall,
    ))
}

/// Arctangent of point (X, Y) in degrees from -180 to 180.
pub fn atan2(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let argument0 = gen
        .value_to_code(block, "X", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let argument1 = gen
        .value_to_code(block, "Y", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    Ok(Code::Expr(
        format!("Math.atan2({}, {}) / Math.PI * 180", argument1, argument0),
        Order::Division,
    ))
}
