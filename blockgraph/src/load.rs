use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::Program;
use crate::block::Block;

/// A workspace file that failed to parse, with the offending location.
#[derive(Debug)]
pub struct LoadError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
}

impl LoadError {
    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(Severity::Error)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LoadError {}

#[derive(Deserialize)]
struct Workspace {
    #[serde(default)]
    variables: Vec<String>,
    #[serde(default)]
    blocks: Vec<Block>,
}

/// Parse a workspace from its JSON serialization.
pub fn parse(source: &str) -> Result<Program, LoadError> {
    let workspace: Workspace = serde_json::from_str(source).map_err(|e| {
        let offset = byte_offset(source, e.line(), e.column());
        LoadError {
            message: format!("invalid workspace file: {}", e),
            span: offset..offset.saturating_add(1).min(source.len()),
            file_id: 0,
        }
    })?;
    Ok(Program {
        blocks: workspace.blocks,
        variables: workspace.variables,
    })
}

/// Translate serde_json's 1-based line/column into a byte offset.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1).min(text.len());
        }
        offset += text.len() + 1;
    }
    source.len()
}

/// Field values may be written as JSON strings, numbers, or booleans;
/// the generator consumes them all as strings.
pub fn de_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "field '{}' must be a scalar, got {}",
                        name, other
                    )));
                }
            };
            Ok((name, text))
        })
        .collect()
}
