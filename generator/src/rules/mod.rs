mod colour;
mod lists;
mod logic;
mod loops;
mod math;
mod procedures;
mod text;
mod variables;

use blockgraph::block::Block;

use crate::error::GenError;
use crate::generator::{Code, Generator};

/// A per-block rendering rule: pure over the block, with renderer callbacks
/// (and the hoisting registry) reached through the generation context.
pub type Rule = fn(&Block, &mut Generator) -> Result<Code, GenError>;

/// Rule lookup the engine dispatches through. The engine carries no
/// knowledge of the table's contents; `rule_for` is the stock table.
pub type RuleTable = fn(&str) -> Option<Rule>;

/// Rule lookup by block kind. The engine is generic over this table; kinds
/// it does not list are a fatal generation error at the call site.
pub fn rule_for(kind: &str) -> Option<Rule> {
    Some(match kind {
        // Logic.
        "controls_if" | "controls_ifelse" => logic::controls_if,
        "logic_compare" => logic::compare,
        "logic_operation" => logic::operation,
        "logic_negate" => logic::negate,
        "logic_boolean" => logic::boolean,
        "logic_null" => logic::null,
        "logic_ternary" => logic::ternary,

        // Loops.
        "controls_repeat_ext" | "controls_repeat" => loops::controls_repeat,
        "controls_whileUntil" => loops::controls_while_until,
        "controls_for" => loops::controls_for,
        "controls_forEach" => loops::controls_for_each,
        "controls_flow_statements" => loops::flow_statements,

        // Math.
        "math_number" => math::number,
        "math_arithmetic" => math::arithmetic,
        // Rounding and trigonometry blocks share the single-operand rule.
        "math_single" | "math_round" | "math_trig" => math::single,
        "math_constant" => math::constant,
        "math_number_property" => math::number_property,
        "math_change" => math::change,
        "math_on_list" => math::on_list,
        "math_modulo" => math::modulo,
        "math_constrain" => math::constrain,
        "math_random_int" => math::random_int,
        "math_random_float" => math::random_float,
        "math_atan2" => math::atan2,

        // Text.
        "text" => text::literal,
        "text_join" => text::join,
        "text_append" => text::append,
        "text_length" => text::length,
        "text_isEmpty" => text::is_empty,
        "text_indexOf" => text::index_of,
        "text_charAt" => text::char_at,
        "text_getSubstring" => text::get_substring,
        "text_changeCase" => text::change_case,
        "text_trim" => text::trim,
        "text_print" => text::print,
        "text_prompt_ext" | "text_prompt" => text::prompt,
        "text_count" => text::count,
        "text_replace" => text::replace,
        "text_reverse" => text::reverse,

        // Lists.
        "lists_create_empty" => lists::create_empty,
        "lists_create_with" => lists::create_with,
        "lists_repeat" => lists::repeat,
        "lists_length" => lists::length,
        "lists_isEmpty" => lists::is_empty,
        "lists_indexOf" => lists::index_of,
        "lists_getIndex" => lists::get_index,
        "lists_setIndex" => lists::set_index,
        "lists_getSublist" => lists::get_sublist,
        "lists_sort" => lists::sort,
        "lists_split" => lists::split,
        "lists_reverse" => lists::reverse,

        // Colour.
        "colour_picker" => colour::picker,
        "colour_random" => colour::random,
        "colour_rgb" => colour::rgb,
        "colour_blend" => colour::blend,

        // Variables.
        "variables_get" | "variables_get_reporter" | "variables_get_dynamic" => variables::get,
        "variables_set" | "variables_set_dynamic" => variables::set,

        // Procedures.
        "procedures_defreturn" | "procedures_defnoreturn" | "function_definition" => {
            procedures::def
        }
        "procedures_callreturn" => procedures::call_return,
        "procedures_callnoreturn" => procedures::call_no_return,
        "procedures_ifreturn" => procedures::if_return,
        "function_return" => procedures::function_return,
        "function_call" => procedures::function_call,
        "function_call_output" => procedures::function_call_output,
        "argument_reporter_custom" | "argument_reporter_boolean" | "argument_reporter_number"
        | "argument_reporter_string" => procedures::argument_reporter,

        _ => return None,
    })
}
