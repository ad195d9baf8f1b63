use std::fmt;

/// Errors raised while generating code from a block graph.
/// Generation either completes with whole, consistent output or fails with
/// one of these; no partial program is ever emitted.
#[derive(Debug)]
pub enum GenError {
    /// No rule exists for this block kind.
    UnknownBlockKind(String),
    /// A dropdown field carried an operator the rule has no branch for.
    UnknownOperator { kind: &'static str, operator: String },
    /// An enumerated field value has no corresponding rule branch.
    UnhandledOption { kind: &'static str, option: String },
    /// A mode x position combination has no corresponding rule branch.
    UnhandledCombination {
        kind: &'static str,
        mode: String,
        position: String,
    },
    /// A rule needed a field the block does not carry.
    MissingField { kind: &'static str, field: &'static str },
    /// A statement-producing block was connected to a value socket.
    ExpectedExpression(String),
    /// An expression-producing block was connected to a statement socket.
    ExpectedStatement(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::UnknownBlockKind(kind) => {
                write!(f, "no rule to generate code for block kind '{}'", kind)
            }
            GenError::UnknownOperator { kind, operator } => {
                write!(f, "unknown operator '{}' ({})", operator, kind)
            }
            GenError::UnhandledOption { kind, option } => {
                write!(f, "unhandled option '{}' ({})", option, kind)
            }
            GenError::UnhandledCombination { kind, mode, position } => {
                write!(f, "unhandled combination {} x {} ({})", mode, position, kind)
            }
            GenError::MissingField { kind, field } => {
                write!(f, "block '{}' is missing field '{}'", kind, field)
            }
            GenError::ExpectedExpression(kind) => {
                write!(f, "block kind '{}' does not produce a value", kind)
            }
            GenError::ExpectedStatement(kind) => {
                write!(f, "block kind '{}' does not produce a statement", kind)
            }
        }
    }
}

impl std::error::Error for GenError {}
