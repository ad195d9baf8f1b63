use std::collections::HashMap;

use blockgraph::Program;
use blockgraph::block::Block;

use crate::error::GenError;
use crate::names::{Category, NameDb};
use crate::order::{Order, requires_parens};
use crate::rules;

/// Indentation for statement-socket bodies.
pub const INDENT: &str = "  ";

/// Column budget for wrapped block comments.
pub const COMMENT_WRAP: usize = 60;

/// Placeholder spliced into hoisted helper bodies in place of the real
/// function name; substituted once the collision-free name is reserved.
pub const FUNCTION_NAME_PLACEHOLDER: &str = "{leCbGZPbZT3Y5JYCS9fmFZWKgA}";

/// Names the generated code may not use for variables or procedures:
/// the target language's keywords plus the runtime names the emitted
/// code itself references.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof",
    "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var", "void", "while",
    "with", "yield", "enum", "implements", "interface", "let", "package", "private", "protected",
    "public", "static", "await", "null", "true", "false", "arguments", "global",
    // Runtime names referenced by generated code and hoisted helpers.
    "Math", "String", "RegExp", "Infinity", "NaN", "isNaN", "parseFloat", "window", "Format",
    "Random", "Round", "Max", "Min", "StrSplit", "StrLen", "SubStr", "A_Index",
];

/// What a per-block rule produced.
pub enum Code {
    /// An expression fragment and the strength it binds at.
    Expr(String, Order),
    /// A terminated statement fragment (trailing newline included).
    Stmt(String),
    /// Nothing for the statement stream; the rule filed its output in the
    /// definitions map (procedure definitions do this).
    None,
}

/// A fragment after comment gathering and next-chain splicing.
#[derive(Debug, PartialEq)]
pub enum Rendered {
    Expr(String, Order),
    Stmt(String),
    Empty,
}

/// One generation run's context: identifier registry, hoisted-helper
/// registry, and preamble definitions. Create one per run, or reuse across
/// runs; `workspace_to_code` resets all per-run state up front.
pub struct Generator {
    pub names: NameDb,
    /// Rule lookup by block kind; the engine itself is generic over it.
    rules: rules::RuleTable,
    /// Preamble definitions in first-registration order.
    definitions: Vec<(String, String)>,
    /// Hoisted-helper registry: logical name -> emitted name.
    function_names: HashMap<String, String>,
    /// Index blocks count from 1 instead of 0.
    pub one_based_index: bool,
    /// Instrumentation template emitted before each traced statement;
    /// "%1" is replaced with the quoted block id.
    pub statement_prefix: Option<String>,
    /// Instrumentation template emitted after each traced statement body.
    pub statement_suffix: Option<String>,
    /// Instrumentation template emitted at the top of every loop body.
    pub infinite_loop_trap: Option<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Generator::with_rules(rules::rule_for)
    }

    /// A generator dispatching through a custom rule table.
    pub fn with_rules(rules: rules::RuleTable) -> Self {
        Generator {
            names: NameDb::new(RESERVED_WORDS),
            rules,
            definitions: Vec::new(),
            function_names: HashMap::new(),
            one_based_index: false,
            statement_prefix: None,
            statement_suffix: None,
            infinite_loop_trap: None,
        }
    }

    /// Generate the whole program: preamble definitions, hoisted helpers,
    /// then the rendered top-level chains.
    pub fn workspace_to_code(&mut self, program: &Program) -> Result<String, GenError> {
        self.init(program);
        let mut chunks: Vec<String> = Vec::new();
        for block in &program.blocks {
            match self.block_to_code(Some(block), false)? {
                Rendered::Expr(text, _) => {
                    // Naked top-level value: terminate it so the line is a
                    // legal statement.
                    if !text.is_empty() {
                        chunks.push(self.scrub_naked_value(&text));
                    }
                }
                Rendered::Stmt(text) => {
                    if !text.is_empty() {
                        chunks.push(text);
                    }
                }
                Rendered::Empty => {}
            }
        }
        let code = self.finish(&chunks.join("\n"));
        Ok(cleanup_whitespace(&code))
    }

    /// Reset per-run state and declare the program's variables.
    fn init(&mut self, program: &Program) {
        self.definitions.clear();
        self.function_names.clear();
        self.names.reset();

        let mut defvars: Vec<String> = Vec::new();
        for name in program
            .variables
            .iter()
            .map(|s| s.as_str())
            .chain(used_variables(program))
        {
            let resolved = self.names.get_name(name, Category::Variable);
            if !defvars.contains(&resolved) {
                defvars.push(resolved);
            }
        }
        if !defvars.is_empty() {
            self.define("variables", format!("var {};", defvars.join(", ")));
        }
    }

    /// Prepend the accumulated definitions to the generated body and flush
    /// the hoisting registry.
    fn finish(&mut self, code: &str) -> String {
        let definitions: Vec<String> = self.definitions.drain(..).map(|(_, text)| text).collect();
        self.function_names.clear();
        format!("{}\n\n\n{}", definitions.join("\n\n"), code)
    }

    /// Render one block (and, unless `this_only`, the rest of its chain).
    pub fn block_to_code(
        &mut self,
        block: Option<&Block>,
        this_only: bool,
    ) -> Result<Rendered, GenError> {
        let Some(block) = block else {
            return Ok(Rendered::Empty);
        };
        if block.disabled {
            return if this_only {
                Ok(Rendered::Empty)
            } else {
                self.block_to_code(block.next_block(), false)
            };
        }
        let rule = (self.rules)(&block.kind)
            .ok_or_else(|| GenError::UnknownBlockKind(block.kind.clone()))?;
        match rule(block, self)? {
            Code::Expr(text, order) => {
                let text = self.scrub(block, text, this_only)?;
                Ok(Rendered::Expr(text, order))
            }
            Code::Stmt(text) => {
                let text = self.scrub(block, text, this_only)?;
                Ok(Rendered::Stmt(text))
            }
            Code::None => Ok(Rendered::Empty),
        }
    }

    /// Render the expression connected to a value socket, parenthesized as
    /// the context strength requires. `None` when nothing (usable) is
    /// connected; the caller substitutes its rule-specific default.
    pub fn value_to_code(
        &mut self,
        block: &Block,
        name: &str,
        outer: Order,
    ) -> Result<Option<String>, GenError> {
        let Some(target) = block.value_input(name) else {
            return Ok(None);
        };
        if target.disabled {
            return Ok(None);
        }
        let rule = (self.rules)(&target.kind)
            .ok_or_else(|| GenError::UnknownBlockKind(target.kind.clone()))?;
        let (code, inner) = match rule(target, self)? {
            Code::Expr(code, order) => (code, order),
            _ => return Err(GenError::ExpectedExpression(target.kind.clone())),
        };
        if code.is_empty() {
            return Ok(None);
        }
        Ok(Some(if requires_parens(outer, inner) {
            format!("({})", code)
        } else {
            code
        }))
    }

    /// Render the chain connected to a statement socket, indented one level.
    pub fn statement_to_code(&mut self, block: &Block, name: &str) -> Result<String, GenError> {
        match self.block_to_code(block.statement_input(name), false)? {
            Rendered::Stmt(text) => Ok(prefix_lines(&text, INDENT)),
            Rendered::Empty => Ok(String::new()),
            Rendered::Expr(..) => Err(GenError::ExpectedStatement(
                block
                    .statement_input(name)
                    .map(|b| b.kind.clone())
                    .unwrap_or_default(),
            )),
        }
    }

    /// Common post-processing for a rendered block: emit its comment and
    /// the comments of its value-socket children, then splice in the
    /// rendering of the next statement in the chain.
    ///
    /// Statement-socket children are deliberately skipped here: their
    /// comments are emitted when their own chain renders.
    pub fn scrub(
        &mut self,
        block: &Block,
        code: String,
        this_only: bool,
    ) -> Result<String, GenError> {
        let mut comment_code = String::new();
        if let Some(comment) = block.comment_text() {
            let wrapped = wrap(comment, COMMENT_WRAP - 3);
            comment_code.push_str(&prefix_lines(&format!("{}\n", wrapped), "// "));
        }
        for child in block.values.values() {
            let nested = all_nested_comments(child);
            if !nested.is_empty() {
                comment_code.push_str(&prefix_lines(&nested, "// "));
            }
        }
        let next_code = if this_only {
            String::new()
        } else {
            match self.block_to_code(block.next_block(), false)? {
                Rendered::Stmt(text) => text,
                Rendered::Empty => String::new(),
                Rendered::Expr(..) => {
                    let kind = block.next_block().map(|b| b.kind.clone()).unwrap_or_default();
                    return Err(GenError::ExpectedStatement(kind));
                }
            }
        };
        Ok(format!("{}{}{}", comment_code, code, next_code))
    }

    /// A trailing terminator makes a naked top-level expression legal.
    pub fn scrub_naked_value(&self, line: &str) -> String {
        format!("{};\n", line)
    }

    /// Register a hoisted helper. The first call under a logical name
    /// stores the body (placeholder replaced with a collision-free emitted
    /// name); every call returns that emitted name.
    pub fn provide_function(&mut self, desired_name: &str, lines: &[&str]) -> String {
        if let Some(existing) = self.function_names.get(desired_name) {
            return existing.clone();
        }
        let emitted = self.names.get_distinct_name(desired_name, Category::Procedure);
        self.function_names
            .insert(desired_name.to_string(), emitted.clone());
        let body = lines.join("\n").replace(FUNCTION_NAME_PLACEHOLDER, &emitted);
        self.define(desired_name, body);
        emitted
    }

    /// File a preamble definition, replacing any previous one under the
    /// same key but keeping its position in first-registration order.
    pub fn define(&mut self, key: &str, text: String) {
        if let Some(entry) = self.definitions.iter_mut().find(|(k, _)| k == key) {
            entry.1 = text;
        } else {
            self.definitions.push((key.to_string(), text));
        }
    }

    /// Replace "%1" in an instrumentation template with the quoted block id.
    pub fn inject_id(&self, template: &str, block: &Block) -> String {
        template.replace("%1", &format!("'{}'", block.id))
    }

    /// Prepend the infinite-loop trap to a loop body, when configured.
    pub fn add_loop_trap(&mut self, branch: String, block: &Block) -> String {
        match &self.infinite_loop_trap {
            Some(trap) => format!("{}{}", self.inject_id(trap, block), branch),
            None => branch,
        }
    }

    /// Read an index socket and fold in the delta and indexing base.
    ///
    /// When the connected value is a numeric literal the adjustment is
    /// folded into the literal (including negation). Otherwise arithmetic
    /// is emitted around the dynamic expression, parenthesized only when
    /// the context strength would otherwise misparse it. One-based mode
    /// shifts the delta down by one and switches the fallback literal;
    /// there is no second code path.
    pub fn get_adjusted(
        &mut self,
        block: &Block,
        at_id: &str,
        opt_delta: i64,
        opt_negate: bool,
        opt_order: Option<Order>,
    ) -> Result<String, GenError> {
        let mut delta = opt_delta;
        let order = opt_order.unwrap_or(Order::None);
        if self.one_based_index {
            delta -= 1;
        }
        let default_at = if self.one_based_index { "1" } else { "0" };

        let at = if delta > 0 {
            self.value_to_code(block, at_id, Order::Addition)?
        } else if delta < 0 {
            self.value_to_code(block, at_id, Order::Subtraction)?
        } else if opt_negate {
            self.value_to_code(block, at_id, Order::UnaryNegation)?
        } else {
            self.value_to_code(block, at_id, order)?
        };
        let at = at.unwrap_or_else(|| default_at.to_string());

        if is_number(&at) {
            // Naked number: adjust right now.
            let mut n = at.trim().parse::<f64>().unwrap_or(f64::NAN) + delta as f64;
            if opt_negate {
                n = -n;
            }
            return Ok(format_number(n));
        }

        // Dynamic index: adjust in the generated code.
        let mut at = at;
        let mut inner_order: Option<Order> = None;
        if delta > 0 {
            at = format!("{} + {}", at, delta);
            inner_order = Some(Order::Addition);
        } else if delta < 0 {
            at = format!("{} - {}", at, -delta);
            inner_order = Some(Order::Subtraction);
        }
        if opt_negate {
            at = if delta != 0 {
                format!("-({})", at)
            } else {
                format!("-{}", at)
            };
            inner_order = Some(Order::UnaryNegation);
        }
        if let Some(inner) = inner_order {
            if order.weight().floor() >= inner.weight().floor() {
                at = format!("({})", at);
            }
        }
        Ok(at)
    }

    /// Encode a string as a quoted, escaped literal.
    pub fn quote(&self, text: &str) -> String {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('\n', "\\\n")
            .replace('\'', "\\'");
        format!("'{}'", escaped)
    }

    /// Encode a multi-line string as a concatenation of quoted lines.
    pub fn multiline_quote(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| self.quote(line))
            .collect::<Vec<_>>()
            .join(" + '\\n' +\n")
    }
}

/// Comments attached to a block or to any expression reachable through its
/// value sockets. Statement sockets are never descended into.
fn all_nested_comments(block: &Block) -> String {
    fn collect<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
        if let Some(comment) = block.comment_text() {
            out.push(comment);
        }
        for child in block.values.values() {
            collect(child, out);
        }
    }
    let mut comments = Vec::new();
    collect(block, &mut comments);
    if comments.is_empty() {
        String::new()
    } else {
        format!("{}\n", comments.join("\n"))
    }
}

/// Variable names used anywhere in the graph: VAR fields plus procedure
/// argument lists.
fn used_variables(program: &Program) -> Vec<&str> {
    fn walk<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
        if let Some(var) = block.field("VAR") {
            out.push(var);
        }
        for arg in &block.mutation.args {
            out.push(arg.as_str());
        }
        for child in block.values.values() {
            walk(child, out);
        }
        for child in block.statements.values() {
            walk(child, out);
        }
        if let Some(next) = block.next_block() {
            walk(next, out);
        }
    }
    let mut out = Vec::new();
    for block in &program.blocks {
        walk(block, &mut out);
    }
    out
}

/// Prefix every line of `text`, except a trailing empty one.
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    let (body, trailing) = match text.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (text, ""),
    };
    format!(
        "{}{}{}",
        prefix,
        body.replace('\n', &format!("\n{}", prefix)),
        trailing
    )
}

/// Greedy word wrap, one paragraph per input line.
pub fn wrap(text: &str, limit: usize) -> String {
    text.split('\n')
        .map(|paragraph| wrap_line(paragraph, limit))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, limit: usize) -> String {
    let mut out = String::new();
    let mut column = 0;
    for word in line.split_whitespace() {
        if column > 0 && column + 1 + word.len() > limit {
            out.push('\n');
            column = 0;
        } else if column > 0 {
            out.push(' ');
            column += 1;
        }
        out.push_str(word);
        column += word.len();
    }
    out
}

/// Whether a fragment is a bare numeric literal (optionally negative).
pub fn is_number(text: &str) -> bool {
    let t = text.trim();
    let t = t.strip_prefix('-').unwrap_or(t);
    if t.is_empty() {
        return false;
    }
    let mut parts = t.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match parts.next() {
        None => true,
        Some(frac) => !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// Whether a fragment is a single identifier-shaped word.
pub fn is_bare_word(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Render a number the way the target language writes literals: integers
/// without a fractional part, non-finite values by name.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Strip the cosmetic whitespace artifacts of chunk joining: leading blank
/// lines, trailing indentation, and trailing spaces on each line.
fn cleanup_whitespace(code: &str) -> String {
    let Some(first) = code.find(|c: char| !c.is_whitespace()) else {
        return String::new();
    };
    // Leading run of blank lines.
    let line_start = code[..first].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut out = code[line_start..].to_string();
    // Whitespace after the final newline.
    let trimmed_len = out.trim_end().len();
    if out[trimmed_len..].contains('\n') {
        out.truncate(trimmed_len);
        out.push('\n');
    }
    // Trailing spaces and tabs on each line.
    let mut cleaned = String::with_capacity(out.len());
    for (i, line) in out.split('\n').enumerate() {
        if i > 0 {
            cleaned.push('\n');
        }
        cleaned.push_str(line.trim_end_matches([' ', '\t']));
    }
    cleaned
}
