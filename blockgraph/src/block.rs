use std::collections::BTreeMap;

use serde::Deserialize;

/// One node of the block graph.
/// The generator only ever reads blocks; the graph is built by the editor
/// (or the JSON loader) and must be acyclic through both `next` links and
/// value sockets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    /// Kind tag, e.g. "math_arithmetic". Selects the rendering rule.
    pub kind: String,
    /// Editor-assigned block id, used by statement instrumentation hooks.
    #[serde(default)]
    pub id: String,
    /// Literal field values (dropdown selections, numbers, text), keyed by
    /// field name. All values are surfaced as strings.
    #[serde(default, deserialize_with = "crate::load::de_fields")]
    pub fields: BTreeMap<String, String>,
    /// Value sockets: each connects to a single expression block.
    #[serde(default, rename = "inputs")]
    pub values: BTreeMap<String, Block>,
    /// Statement sockets: each connects to the head of a statement chain.
    #[serde(default)]
    pub statements: BTreeMap<String, Block>,
    /// The next statement in this block's chain.
    #[serde(default)]
    pub next: Option<Box<Block>>,
    /// User comment attached to the block.
    #[serde(default)]
    pub comment: Option<String>,
    /// Disabled blocks generate no code; their chain continues past them.
    #[serde(default)]
    pub disabled: bool,
    /// Shape data for variadic and procedure blocks.
    #[serde(default)]
    pub mutation: Mutation,
}

/// Extra shape data carried by blocks whose socket list is not fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mutation {
    /// Item count for variadic blocks (text_join, lists_create_with).
    #[serde(default)]
    pub items: usize,
    /// Argument names for procedure definitions and calls.
    #[serde(default)]
    pub args: Vec<String>,
    /// Whether a procedures_ifreturn block carries a return value.
    #[serde(default)]
    pub has_return: bool,
}

impl Block {
    pub fn new(kind: impl Into<String>) -> Self {
        Block {
            kind: kind.into(),
            ..Block::default()
        }
    }

    /// Literal value of a field, if the field exists.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// The expression block connected to a value socket.
    pub fn value_input(&self, name: &str) -> Option<&Block> {
        self.values.get(name)
    }

    /// The head of the chain connected to a statement socket.
    pub fn statement_input(&self, name: &str) -> Option<&Block> {
        self.statements.get(name)
    }

    pub fn has_value_input(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn has_statement_input(&self, name: &str) -> bool {
        self.statements.contains_key(name)
    }

    /// The next statement linked after this one, if any.
    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_deref()
    }

    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}
