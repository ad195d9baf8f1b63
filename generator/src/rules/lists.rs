use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, FUNCTION_NAME_PLACEHOLDER, Generator, is_bare_word};
use crate::names::Category;
use crate::order::Order;

/// Create an empty list.
pub fn create_empty(_block: &Block, _gen: &mut Generator) -> Result<Code, GenError> {
    Ok(Code::Expr("[]".to_string(), Order::Atomic))
}

/// Create a list with any number of elements of any type.
pub fn create_with(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let mut elements = Vec::with_capacity(block.mutation.items);
    for i in 0..block.mutation.items {
        elements.push(
            gen.value_to_code(block, &format!("ADD{}", i), Order::Comma)?
                .unwrap_or_else(|| "\"\"".to_string()),
        );
    }
    let code = format!("[{}]", elements.join(", "));
    Ok(Code::Expr(code, Order::Atomic))
}

/// Create a list with one element repeated.
pub fn repeat(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let function_name = gen.provide_function(
        "ArrayRepeat",
        &[
            &format!("{}(value, n)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tarray := []",
            "\tloop, % n",
            "\t\tarray.Push(value)",
            "\treturn array",
            "}",
        ],
    );
    let element = gen
        .value_to_code(block, "ITEM", Order::Comma)?
        .unwrap_or_else(|| "\"\"".to_string());
    let repeat_count = gen
        .value_to_code(block, "NUM", Order::Comma)?
        .unwrap_or_else(|| "0".to_string());
    let code = format!("{}({}, {})", function_name, element, repeat_count);
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Array length.
pub fn length(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let list = gen
        .value_to_code(block, "VALUE", Order::Member)?
        .unwrap_or_else(|| "[]".to_string());
    Ok(Code::Expr(format!("{}.Length()", list), Order::Member))
}

/// Is the array empty?
pub fn is_empty(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let list = gen
        .value_to_code(block, "VALUE", Order::Member)?
        .unwrap_or_else(|| "[]".to_string());
    Ok(Code::Expr(format!("!{}.Length()", list), Order::LogicalNot))
}

/// Find an item in the list.
pub fn index_of(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let function_name = gen.provide_function(
        "IndexOf",
        &[
            &format!("{}(array, value, first:=True)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tfor k, v in array",
            "\t{",
            "\t\tif (v == value)",
            "\t\t{",
            "\t\t\tif first",
            "\t\t\t\treturn k",
            "\t\t\tfound := k",
            "\t\t}",
            "\t}",
            "\treturn found",
            "}",
        ],
    );
    let first = if block.field("END") == Some("FIRST") {
        ""
    } else {
        ", False"
    };
    let item = gen
        .value_to_code(block, "FIND", Order::None)?
        .unwrap_or_else(|| "\"\"".to_string());
    let list = gen
        .value_to_code(block, "VALUE", Order::Member)?
        .unwrap_or_else(|| "[]".to_string());
    let code = format!("{}({}, {}{})", function_name, list, item, first);
    // The helper finds one-based positions; shift for zero-based mode.
    if !gen.one_based_index {
        Ok(Code::Expr(format!("{} - 1", code), Order::Addition))
    } else {
        Ok(Code::Expr(code, Order::FunctionCall))
    }
}

/// Get element at index.
pub fn get_index(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let mode = block.field("MODE").unwrap_or("GET").to_string();
    let where_ = block.field("WHERE").unwrap_or("FROM_START").to_string();
    let list_order = if where_ == "RANDOM" {
        Order::Comma
    } else {
        Order::Member
    };
    let list = gen
        .value_to_code(block, "VALUE", list_order)?
        .unwrap_or_else(|| "[]".to_string());

    match (where_.as_str(), mode.as_str()) {
        ("FIRST", "GET") => Ok(Code::Expr(format!("{}[1]", list), Order::Member)),
        ("FIRST", "GET_REMOVE") => Ok(Code::Expr(format!("{}.RemoveAt(1)", list), Order::Member)),
        ("FIRST", "REMOVE") => Ok(Code::Stmt(format!("{}.RemoveAt(1)\n", list))),
        ("LAST", "GET") => {
            let function_name = gen.provide_function(
                "Peek",
                &[
                    &format!("{}(array)", FUNCTION_NAME_PLACEHOLDER),
                    "{",
                    "\treturn array[array.Length()]",
                    "}",
                ],
            );
            Ok(Code::Expr(
                format!("{}({})", function_name, list),
                Order::Member,
            ))
        }
        ("LAST", "GET_REMOVE") => Ok(Code::Expr(format!("{}.Pop()", list), Order::Member)),
        ("LAST", "REMOVE") => Ok(Code::Stmt(format!("{}.Pop()\n", list))),
        ("FROM_START", "GET") => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Expr(format!("{}[{}]", list, at), Order::Member))
        }
        ("FROM_START", "GET_REMOVE") => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Expr(
                format!("{}.RemoveAt({})", list, at),
                Order::FunctionCall,
            ))
        }
        ("FROM_START", "REMOVE") => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Stmt(format!("{}.RemoveAt({})\n", list, at)))
        }
        ("FROM_END", "GET") => {
            let at = gen.get_adjusted(block, "AT", 1, true, None)?;
            let function_name = gen.provide_function(
                "FromEnd",
                &[
                    &format!("{}(array, n)", FUNCTION_NAME_PLACEHOLDER),
                    "{",
                    "\treturn array[array.Length()-n]",
                    "}",
                ],
            );
            Ok(Code::Expr(
                format!("{}({}, {})", function_name, list, at),
                Order::FunctionCall,
            ))
        }
        ("FROM_END", "GET_REMOVE") | ("FROM_END", "REMOVE") => {
            let at = gen.get_adjusted(block, "AT", 1, true, None)?;
            let function_name = gen.provide_function(
                "RemoveFromEnd",
                &[
                    &format!("{}(array, n)", FUNCTION_NAME_PLACEHOLDER),
                    "{",
                    "\treturn array.RemoveAt(array.Length() - n)",
                    "}",
                ],
            );
            let code = format!("{}({}, {})", function_name, list, at);
            if mode == "GET_REMOVE" {
                Ok(Code::Expr(code, Order::FunctionCall))
            } else {
                Ok(Code::Stmt(format!("{}\n", code)))
            }
        }
        ("RANDOM", "GET") | ("RANDOM", "GET_REMOVE") | ("RANDOM", "REMOVE") => {
            let function_name = gen.provide_function(
                "RandomItem",
                &[
                    &format!("{}(array, remove:=False)", FUNCTION_NAME_PLACEHOLDER),
                    "{",
                    "\tRandom, i, array.MinIndex(), array.MaxIndex()",
                    "\treturn remove ? array.RemoveAt(i) : array[i]",
                    "}",
                ],
            );
            let remove = if mode == "GET" { "False" } else { "True" };
            let code = format!("{}({}, {})", function_name, list, remove);
            if mode == "REMOVE" {
                Ok(Code::Stmt(format!("{}\n", code)))
            } else {
                Ok(Code::Expr(code, Order::FunctionCall))
            }
        }
        _ => Err(GenError::UnhandledCombination {
            kind: "lists_getIndex",
            mode,
            position: where_,
        }),
    }
}

/// Cache a non-trivial list expression in a temporary to prevent repeated
/// evaluation; returns the caching statement.
fn cache_list(list: &mut String, gen: &mut Generator) -> String {
    if is_bare_word(list) {
        return String::new();
    }
    let list_var = gen.names.get_distinct_name("tmpList", Category::Variable);
    let code = format!("{} := {}\n", list_var, list);
    *list = list_var;
    code
}

/// Set element at index.
pub fn set_index(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let mut list = gen
        .value_to_code(block, "LIST", Order::Member)?
        .unwrap_or_else(|| "[]".to_string());
    let mode = block.field("MODE").unwrap_or("GET").to_string();
    let where_ = block.field("WHERE").unwrap_or("FROM_START").to_string();
    let value = gen
        .value_to_code(block, "TO", Order::Assignment)?
        .unwrap_or_else(|| "\"\"".to_string());

    match (where_.as_str(), mode.as_str()) {
        ("FIRST", "SET") => Ok(Code::Stmt(format!("{}[1] := {}\n", list, value))),
        ("FIRST", "INSERT") => Ok(Code::Stmt(format!("{}.InsertAt(1, {})\n", list, value))),
        ("LAST", "SET") => {
            let mut code = cache_list(&mut list, gen);
            code.push_str(&format!("{}[{}.Length()] := {}\n", list, list, value));
            Ok(Code::Stmt(code))
        }
        ("LAST", "INSERT") => Ok(Code::Stmt(format!("{}.Push({})\n", list, value))),
        ("FROM_START", "SET") => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Stmt(format!("{}[{}] := {}\n", list, at, value)))
        }
        ("FROM_START", "INSERT") => {
            let at = gen.get_adjusted(block, "AT", 0, false, None)?;
            Ok(Code::Stmt(format!(
                "{}.InsertAt({}, {})\n",
                list, at, value
            )))
        }
        ("FROM_END", "SET") | ("FROM_END", "INSERT") => {
            let at = gen.get_adjusted(block, "AT", 1, false, Some(Order::Subtraction))?;
            let mut code = cache_list(&mut list, gen);
            if mode == "SET" {
                code.push_str(&format!(
                    "{}[{}.Length() - {}] := {}\n",
                    list, list, at, value
                ));
            } else {
                code.push_str(&format!(
                    "{}.InsertAt({}.Length() - {}, {})\n",
                    list, list, at, value
                ));
            }
            Ok(Code::Stmt(code))
        }
        ("RANDOM", "SET") | ("RANDOM", "INSERT") => {
            let mut code = cache_list(&mut list, gen);
            let x_var = gen.names.get_distinct_name("Rand", Category::Variable);
            code.push_str(&format!(
                "Random, {}, {}.MinIndex(), {}.MaxIndex()\n",
                x_var, list, list
            ));
            if mode == "SET" {
                code.push_str(&format!("{}[{}] := {}\n", list, x_var, value));
            } else {
                code.push_str(&format!("{}.InsertAt({}, {})\n", list, x_var, value));
            }
            Ok(Code::Stmt(code))
        }
        _ => Err(GenError::UnhandledCombination {
            kind: "lists_setIndex",
            mode,
            position: where_,
        }),
    }
}

/// An expression calculating an index into a list, from the list's name,
/// the indexing method, and an optional offset.
fn get_index_expr(list_name: &str, where_: &str, at: &str) -> String {
    match where_ {
        "FIRST" => "1".to_string(),
        "FROM_END" => format!("{}.Length() - {}", list_name, at),
        "LAST" => format!("{}.Length()", list_name),
        _ => at.to_string(),
    }
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

fn provide_slice(gen: &mut Generator) -> String {
    gen.provide_function(
        "Slice",
        &[
            &format!("{}(array, start, end)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tresult := []",
            "\tloop, % end - start + 1",
            "\t\tresult[A_Index] := array[start + A_Index - 1]",
            "\treturn result",
            "}",
        ],
    )
}

/// Get sublist.
pub fn get_sublist(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let list = gen
        .value_to_code(block, "LIST", Order::Member)?
        .unwrap_or_else(|| "[]".to_string());
    let where1 = block.field("WHERE1").unwrap_or("").to_string();
    let where2 = block.field("WHERE2").unwrap_or("").to_string();
    if where1 == "FIRST" && where2 == "LAST" {
        return Ok(Code::Expr(format!("{}.Clone()", list), Order::FunctionCall));
    }
    let slice = provide_slice(gen);
    let code;
    if is_bare_word(&list) || (where1 != "FROM_END" && where2 == "FROM_START") {
        // The list is a variable or doesn't require a call for its length:
        // no dedicated helper needed.
        let at1 = match where1.as_str() {
            "FROM_START" => gen.get_adjusted(block, "AT1", 0, false, None)?,
            "FROM_END" => {
                let at = gen.get_adjusted(block, "AT1", 0, false, Some(Order::Subtraction))?;
                format!("{}.Length() - {}", list, at)
            }
            "FIRST" => "0".to_string(),
            other => {
                return Err(GenError::UnhandledOption {
                    kind: "lists_getSublist",
                    option: other.to_string(),
                });
            }
        };
        let at2 = match where2.as_str() {
            "FROM_START" => gen.get_adjusted(block, "AT2", 0, false, None)?,
            "FROM_END" => {
                let at = gen.get_adjusted(block, "AT2", 0, false, Some(Order::Subtraction))?;
                format!("{}.Length() - {}", list, at)
            }
            "LAST" => format!("{}.Length()", list),
            other => {
                return Err(GenError::UnhandledOption {
                    kind: "lists_getSublist",
                    option: other.to_string(),
                });
            }
        };
        code = format!("{}({}, {}, {})", slice, list, at1, at2);
    } else {
        let at1 = gen.get_adjusted(block, "AT1", 0, false, None)?;
        let at2 = gen.get_adjusted(block, "AT2", 0, false, None)?;
        // The values for FROM_END and FROM_START depend on `at`, so they
        // travel as parameters.
        let takes_at1 = where1 == "FROM_END" || where1 == "FROM_START";
        let takes_at2 = where2 == "FROM_END" || where2 == "FROM_START";
        let mut signature = String::from("array");
        if takes_at1 {
            signature.push_str(", at1");
        }
        if takes_at2 {
            signature.push_str(", at2");
        }
        let function_name = gen.provide_function(
            &format!(
                "SubArray{}To{}",
                where_pascal_case(&where1, "lists_getSublist")?,
                where_pascal_case(&where2, "lists_getSublist")?
            ),
            &[
                &format!("{}({})", FUNCTION_NAME_PLACEHOLDER, signature),
                "{",
                &format!("  start := {}", get_index_expr("array", &where1, "at1")),
                &format!("  end := {} + 1", get_index_expr("array", &where2, "at2")),
                &format!("  return {}(array, start, end)", slice),
                "}",
            ],
        );
        let mut call_args = list;
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

/// Sort a copy of a list.
pub fn sort(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let list = gen
        .value_to_code(block, "LIST", Order::FunctionCall)?
        .unwrap_or_else(|| "[]".to_string());
    let reverse = block.field("DIRECTION") == Some("-1");
    let function_name = gen.provide_function(
        "Sort",
        &[
            &format!("{}(array, reverse:=False)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tresult := array.Clone()",
            "\tn := result.Length()",
            "\tloop, % n - 1",
            "\t{",
            "\t\ti := A_Index",
            "\t\tloop, % n - i",
            "\t\t{",
            "\t\t\tj := A_Index",
            "\t\t\tswap := reverse ? (result[j] < result[j+1]) : (result[j] > result[j+1])",
            "\t\t\tif swap",
            "\t\t\t{",
            "\t\t\t\ttmp := result[j]",
            "\t\t\t\tresult[j] := result[j+1]",
            "\t\t\t\tresult[j+1] := tmp",
            "\t\t\t}",
            "\t\t}",
            "\t}",
            "\treturn result",
            "}",
        ],
    );
    let reverse_arg = if reverse { ", True" } else { "" };
    Ok(Code::Expr(
        format!("{}({}{})", function_name, list, reverse_arg),
        Order::FunctionCall,
    ))
}

/// Split text into a list, or join a list into text.
pub fn split(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let input = gen.value_to_code(block, "INPUT", Order::Member)?;
    let delimiter = gen
        .value_to_code(block, "DELIM", Order::None)?
        .unwrap_or_else(|| "\"\"".to_string());
    let code = match block.field("MODE") {
        Some("SPLIT") => {
            let input = input.unwrap_or_else(|| "\"\"".to_string());
            format!("StrSplit({}, {})", input, delimiter)
        }
        Some("JOIN") => {
            let function_name = gen.provide_function(
                "Join",
                &[
                    &format!("{}(array, delimiter:=\"\")", FUNCTION_NAME_PLACEHOLDER),
                    "{",
                    "\tfor k, v in array",
                    "\t\tresult .= delimiter . v",
                    "\treturn SubStr(result, 1 + StrLen(delimiter))",
                    "}",
                ],
            );
            let input = input.unwrap_or_else(|| "[]".to_string());
            format!("{}({}, {})", function_name, input, delimiter)
        }
        other => {
            return Err(GenError::UnknownOperator {
                kind: "lists_split",
                operator: other.unwrap_or("").to_string(),
            });
        }
    };
    Ok(Code::Expr(code, Order::FunctionCall))
}

/// Reverse a copy of a list.
pub fn reverse(block: &Block, gen: &mut Generator) -> Result<Code, GenError> {
    let list = gen
        .value_to_code(block, "LIST", Order::FunctionCall)?
        .unwrap_or_else(|| "[]".to_string());
    let function_name = gen.provide_function(
        "Reverse",
        &[
            &format!("{}(array)", FUNCTION_NAME_PLACEHOLDER),
            "{",
            "\tresult := []",
            "\tfor k, v in array",
            "\t\tresult.InsertAt(1, v)",
            "\treturn result",
            "}",
        ],
    );
    Ok(Code::Expr(
        format!("{}({})", function_name, list),
        Order::FunctionCall,
    ))
}
