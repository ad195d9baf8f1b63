use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, FUNCTION_NAME_PLACEHOLDER, Generator};
use crate::order::Order;

/// Text value.
pub fn literal(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let code = gen.quote(block.field("TEXT").unwrap_or(""));
    Ok(Code::Expr(code, Order::Atomic))
}

/// Enclose the provided value in 'String(...)'. Leave string literals alone.
fn force_string(value: &str) -> String {
    if is_string_literal(value) {
        value.to_string()
    } else {
        format!("String({})", value)
    }
}

/// Detect a single-quoted string literal (possibly padded with whitespace).
fn is_string_literal(value: &str) -> bool {
    let trimmed = value.trim();
    let Some(inner) = trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    if trimmed.len() < 2 {
        return false;
    }
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            return false;
        }
    }
    !escaped
}

/// Create a string made up of any number of elements of any type.
pub fn join(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    match block.mutation.items {
        0 => Ok(Code::Expr("''".to_string(), Order::Atomic)),
        1 => {
            let element = gen
                .value_to_code(block, "ADD0", Order::None)?
                .unwrap_or_else(|| "''".to_string());
            Ok(Code::Expr(force_string(&element), Order::FunctionCall))
        }
        2 => {
            let element0 = gen
                .value_to_code(block, "ADD0", Order::None)?
                .unwrap_or_else(|| "''".to_string());
            let element1 = gen
                .value_to_code(block, "ADD1", Order::None)?
                .unwrap_or_else(|| "''".to_string());
            let code = format!("{} + {}", force_string(&element0), force_string(&element1));
            Ok(Code::Expr(code, Order::Addition))
        }
        n => {
            let mut elements = Vec::with_capacity(n);
            for i in 0..n {
                elements.push(
                    gen.value_to_code(block, &format!("ADD{}", i), Order::Comma)?
                        .unwrap_or_else(|| "''".to_string()),
                );
            }
            let code = format!("[{}].join('')", elements.join(","));
            Ok(Code::Expr(code, Order::FunctionCall))
        }
    }
}

/// Append to a variable in place.
pub fn append(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let var_name = gen.names.get_name(
        block.field("VAR").ok_or(GenError::MissingField {
            kind: "text_append",
            field: "VAR",
        })?,
        crate::names::Category::Variable,
    );
    let value = gen
        .value_to_code(block, "TEXT", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    Ok(Code::Stmt(format!(
        "{} += {};\n",
        var_name,
        force_string(&value)
    )))
}

/// String length.
pub fn length(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "VALUE", Order::FunctionCall)?
        .unwrap_or_else(|| "''".to_string());
    Ok(Code::Expr(format!("{}.length", text), Order::Member))
}

/// Is the string empty?
pub fn is_empty(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "VALUE", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    Ok(Code::Expr(format!("!{}.length", text), Order::LogicalNot))
}

/// Search the text for a substring.
pub fn index_of(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let operator = if block.field("END") == Some("FIRST") {
        "indexOf"
    } else {
        "lastIndexOf"
    };
    let substring = gen
        .value_to_code(block, "FIND", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    let text = gen
        .value_to_code(block, "VALUE", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    let code = format!("{}.{}({})", text, operator, substring);
    // Adjust the index when using one-based indices.
    if gen.one_based_index {
        Ok(Code::Expr(format!("{} + 1", code), Order::Addition))
    } else {
        Ok(Code::Expr(code, Order::FunctionCall))
    }
}

/// Get letter at index.
pub fn char_at(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let where_ = block.field("WHERE").unwrap_or("FROM_START").to_string();
    let text_order = if where_ == "RANDOM" {
        Order::None
    } else {
        Order::Member
    };
    let text = gen
        .value_to_code(block, "VALUE", text_order)?
        .unwrap_or_else(|| "''".to_string());
    match where_.as_str() {
        "FIRST" => Ok(Code::Expr(
            format!("{}.charAt(0)", text),
            Order::FunctionCall,
        )),
        "LAST" => Ok(Code::Expr(
            format!("{}.slice(-1)", text),
            Order::FunctionCall,
        )),
        "FROM_START" => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Expr(
                format!("{}.charAt({})", text, at),
                Order::FunctionCall,
            ))
        }
        "FROM_END" => {
            let at = gen.get_adjusted(block, "AT", 1, true, None)?;
            Ok(Code::Expr(
                format!("{}.slice({}).charAt(0)", text, at),
                Order::FunctionCall,
            ))
        }
        "RANDOM" => {
            let function_name = gen.provide_function(
                "textRandomLetter",
                &[
                    &format!("function {}(text) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  var x = Math.floor(Math.random() * text.length);",
                    "  return text[x];",
                    "}",
                ],
            );
            Ok(Code::Expr(
                format!("{}({})", function_name, text),
                Order::FunctionCall,
            ))
        }
        _ => Err(GenError::UnhandledOption {
            kind: "text_charAt",
            option: where_,
        }),
    }
}

/// An expression calculating an index into a string, from the string's
/// name, the indexing method, and an optional offset.
fn get_index(string_name: &str, where_: &str, at: &str) -> String {
    match where_ {
        "FIRST" => "0".to_string(),
        "FROM_END" => format!("{}.length - 1 - {}", string_name, at),
        "LAST" => format!("{}.length - 1", string_name),
        _ => at.to_string(),
    }
}

/// Whether a fragment is a variable name or simple literal whose length can
/// be taken without evaluating it twice.
fn is_simple_operand(text: &str) -> bool {
    let inner = text.strip_prefix('\'').unwrap_or(text);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);
    !inner.is_empty()
        && inner
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn where_pascal_case(where_: &str, kind: &'static str) -> Result<&'static str, GenError> {
    match where_ {
        "FIRST" => Ok("First"),
        "LAST" => Ok("Last"),
        "FROM_START" => Ok("FromStart"),
        "FROM_END" => Ok("FromEnd"),
        other => Err(GenError::UnhandledOption {
            kind,
            option: other.to_string(),
        }),
    }
}

/// Get substring.
pub fn get_substring(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "STRING", Order::FunctionCall)?
        .unwrap_or_else(|| "''".to_string());
    let where1 = block.field("WHERE1").unwrap_or("").to_string();
    let where2 = block.field("WHERE2").unwrap_or("").to_string();
    let code;
    if where1 == "FIRST" && where2 == "LAST" {
        code = text;
    } else if is_simple_operand(&text)
        || (where1 != "FROM_END" && where1 != "LAST" && where2 != "FROM_END" && where2 != "LAST")
    {
        // The text is a variable or literal, or doesn't require a call for
        // its length: no helper function needed.
        let at1 = match where1.as_str() {
            "FROM_START" => gen.get_adjusted(block, "AT1", 0, false, None)?,
            "FROM_END" => {
                let at = gen.get_adjusted(block, "AT1", 1, false, Some(Order::Subtraction))?;
                format!("{}.length - {}", text, at)
            }
            "FIRST" => "0".to_string(),
            other => {
                return Err(GenError::UnhandledOption {
                    kind: "text_getSubstring",
                    option: other.to_string(),
                });
            }
        };
        let at2 = match where2.as_str() {
            "FROM_START" => gen.get_adjusted(block, "AT2", 1, false, None)?,
            "FROM_END" => {
                let at = gen.get_adjusted(block, "AT2", 0, false, Some(Order::Subtraction))?;
                format!("{}.length - {}", text, at)
            }
            "LAST" => format!("{}.length", text),
            other => {
                return Err(GenError::UnhandledOption {
                    kind: "text_getSubstring",
                    option: other.to_string(),
                });
            }
        };
        code = format!("{}.slice({}, {})", text, at1, at2);
    } else {
        let at1 = gen.get_adjusted(block, "AT1", 0, false, None)?;
        let at2 = gen.get_adjusted(block, "AT2", 0, false, None)?;
        // The values for FROM_END and FROM_START depend on `at`, so they
        // travel as parameters.
        let takes_at1 = where1 == "FROM_END" || where1 == "FROM_START";
        let takes_at2 = where2 == "FROM_END" || where2 == "FROM_START";
        let mut signature = String::from("sequence");
        if takes_at1 {
            signature.push_str(", at1");
        }
        if takes_at2 {
            signature.push_str(", at2");
        }
        let function_name = gen.provide_function(
            &format!(
                "subsequence{}{}",
                where_pascal_case(&where1, "text_getSubstring")?,
                where_pascal_case(&where2, "text_getSubstring")?
            ),
            &[
                &format!("function {}({}) {{", FUNCTION_NAME_PLACEHOLDER, signature),
                &format!("  var start = {};", get_index("sequence", &where1, "at1")),
                &format!("  var end = {} + 1;", get_index("sequence", &where2, "at2")),
                "  return sequence.slice(start, end);",
                "}",
            ],
        );
        let mut call_args = text;
        if takes_at1 {
            call_args.push_str(&format!(", {}", at1));
        }
        if takes_at2 {
            call_args.push_str(&format!(", {}", at2));
        }
        code = format!("{}({})", function_name, call_args);
    }
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Change capitalization.
pub fn change_case(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let operator = match block.field("CASE") {
        Some("UPPERCASE") => Some(".toUpperCase()"),
        Some("LOWERCASE") => Some(".toLowerCase()"),
        Some("TITLECASE") => None,
        other => {
            return Err(GenError::UnhandledOption {
                kind: "text_changeCase",
                option: other.unwrap_or("").to_string(),
            });
        }
    };
    let text_order = if operator.is_some() {
        Order::Member
    } else {
        Order::None
    };
    let text = gen
        .value_to_code(block, "TEXT", text_order)?
        .unwrap_or_else(|| "''".to_string());
    let code = match operator {
        // Upper and lower case are built in.
        Some(op) => format!("{}{}", text, op),
        None => {
            // Title case is not built in. Define a function.
            let function_name = gen.provide_function(
                "textToTitleCase",
                &[
                    &format!("function {}(str) {{", FUNCTION_NAME_PLACEHOLDER),
                    "  return str.replace(/\\S+/g,",
                    "      function(txt) {return txt[0].toUpperCase() + txt.substring(1).toLowerCase();});",
                    "}",
                ],
            );
            format!("{}({})", function_name, text)
        }
    };
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Trim spaces.
pub fn trim(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let operator = match block.field("MODE") {
        Some("LEFT") => ".replace(/^[\\s\\xa0]+/, '')",
        Some("RIGHT") => ".replace(/[\\s\\xa0]+$/, '')",
        Some("BOTH") => ".trim()",
        other => {
            return Err(GenError::UnhandledOption {
                kind: "text_trim",
                option: other.unwrap_or("").to_string(),
            });
        }
    };
    let text = gen
        .value_to_code(block, "TEXT", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    Ok(Code::Expr(format!("{}{}", text, operator), Order::FunctionCall))
}

/// Print statement.
pub fn print(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let msg = gen
        .value_to_code(block, "TEXT", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    Ok(Code::Stmt(format!("window.alert({});\n", msg)))
}

/// Prompt function.
pub fn prompt(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let msg = match block.field("TEXT") {
        // Internal message.
        Some(text) => gen.quote(text),
        // External message.
        None => gen
            .value_to_code(block, "TEXT", Order::None)?
            .unwrap_or_else(|| "''".to_string()),
    };
    let mut code = format!("window.prompt({})", msg);
    if block.field("TYPE") == Some("NUMBER") {
        code = format!("parseFloat({})", code);
    }
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Count occurrences of a substring.
pub fn count(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "TEXT", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    let sub = gen
        .value_to_code(block, "SUB", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    let function_name = gen.provide_function(
        "textCount",
        &[
            &format!("function {}(haystack, needle) {{", FUNCTION_NAME_PLACEHOLDER),
            "  if (needle.length === 0) {",
            "    return haystack.length + 1;",
            "  } else {",
            "    return haystack.split(needle).length - 1;",
            "  }",
            "}",
        ],
    );
    let code = format!("{}({}, {})", function_name, text, sub);
    Ok(Code::Expr(code, Order::Subtraction))
}

/// Replace every occurrence of a substring.
pub fn replace(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "TEXT", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    let from = gen
        .value_to_code(block, "FROM", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    let to = gen
        .value_to_code(block, "TO", Order::None)?
        .unwrap_or_else(|| "''".to_string());
    let function_name = gen.provide_function(
        "textReplace",
        &[
            &format!(
                "function {}(haystack, needle, replacement) {{",
                FUNCTION_NAME_PLACEHOLDER
            ),
            "  needle = needle.replace(/([-()\\[\\]{}+?*.$\\^|,:#<!\\\\])/g,\"\\\\$1\")",
            "                 .replace(/\\x08/g,\"\\\\x08\");",
            "  return haystack.replace(new RegExp(needle, 'g'), replacement);",
            "}",
        ],
    );
    let code = format!("{}({}, {}, {})", function_name, text, from, to);
    Ok(Code::Expr(code, Order::Member))
}

/// Reverse a string.
pub fn reverse(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let text = gen
        .value_to_code(block, "TEXT", Order::Member)?
        .unwrap_or_else(|| "''".to_string());
    let code = format!("{}.split('').reverse().join('')", text);
    Ok(Code::Expr(code, Order::Member))
}
