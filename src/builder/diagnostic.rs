use crate::ast::NodeKind;
use crate::stack::StackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

/// Recoverable construction problem. The offending action was a no-op.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum Diagnostic {
    #[error("{action}: no enclosing {expected} found ({payload})")]
    MissingContext {
        action: &'static str,
        expected: NodeKind,
        payload: String,
    },
    #[error("{action}: expected an open {expected} on top, found {}", describe(.found))]
    UnexpectedTop {
        action: &'static str,
        expected: NodeKind,
        found: Option<NodeKind>,
    },
    #[error("set-name: {} carries no name ({name})", describe(.found))]
    NotNamed {
        found: Option<NodeKind>,
        name: String,
    },
    #[error("attach: {child} fits no free field of {}", describe(.parent))]
    CannotAttach {
        parent: Option<NodeKind>,
        child: NodeKind,
    },
    #[error("end-expression: {0} cannot be spliced into an expression")]
    NotAnExpressionPart(NodeKind),
    #[error("{0}: no open node")]
    NothingOpen(&'static str),
    #[error("begin-switch-case: default marker inside an unfinished case")]
    DefaultInsideCase,
}

fn describe(kind: &Option<NodeKind>) -> String {
    kind.map_or_else(|| "nothing".to_owned(), |k| k.to_string())
}

/// Failure that ends the current compilation unit.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BuildError {
    #[error("construction aborted: {0}")]
    Underflow(#[from] StackError),
    #[error("construction was aborted by an earlier fatal error")]
    Aborted,
    #[error("construction unfinished: {open} nodes still open")]
    Unfinished { open: usize },
    #[error("root node is a {0}, not a program")]
    NotAProgram(NodeKind),
    #[error("nothing was built")]
    Empty,
}
