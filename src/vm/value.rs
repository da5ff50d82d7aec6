use super::{Result, VmError};
use crate::codegen::{BinaryOp, UnaryOp};
use std::fmt;

/// Runtime value. Comparisons and logic produce `Number(1.0)` or
/// `Number(0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

fn truth(condition: bool) -> Value {
    Value::Number(if condition { 1.0 } else { 0.0 })
}

impl Value {
    /// Reads a literal operand: a quoted string or a number.
    pub fn parse_literal(text: &str) -> Option<Self> {
        let quoted = text.len() >= 2
            && ((text.starts_with('"') && text.ends_with('"'))
                || (text.starts_with('\'') && text.ends_with('\'')));
        if quoted {
            return Some(Self::Str(text[1..text.len() - 1].to_owned()));
        }
        text.parse().ok().map(Self::Number)
    }

    /// Reads one line of user input: a number when it parses as one, the
    /// raw text otherwise.
    pub fn from_input(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        line.trim()
            .parse()
            .map_or_else(|_| Self::Str(line.to_owned()), Self::Number)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    fn mismatch(op: impl fmt::Display, operands: &[&Value]) -> VmError {
        let operands = operands
            .iter()
            .map(|v| format!("{v:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        VmError::TypeMismatch {
            op: op.to_string(),
            operands,
        }
    }

    pub fn unary(op: UnaryOp, value: &Self) -> Result<Self> {
        match (op, value) {
            (UnaryOp::Not, v) => Ok(truth(!v.is_truthy())),
            (UnaryOp::Neg, Self::Number(n)) => Ok(Self::Number(-n)),
            (UnaryOp::Neg, v) => Err(Self::mismatch(op, &[v])),
        }
    }

    /// `left op right`, where `right` was on top of the stack.
    pub fn binary(op: BinaryOp, left: &Self, right: &Self) -> Result<Self> {
        use BinaryOp as B;
        use Value::{Number as N, Str as S};

        let value = match (op, left, right) {
            (B::Add, N(a), N(b)) => N(a + b),
            (B::Add, a, b) => S(format!("{a}{b}")),
            (B::Sub, N(a), N(b)) => N(a - b),
            (B::Mul, N(a), N(b)) => N(a * b),
            (B::Div, N(a), N(b)) => N(a / b),
            (B::Mod, N(a), N(b)) => N(a % b),
            (B::And, a, b) => truth(a.is_truthy() && b.is_truthy()),
            (B::Or, a, b) => truth(a.is_truthy() || b.is_truthy()),
            (B::Eq, N(a), N(b)) => truth((a - b).abs() < f64::EPSILON),
            (B::Neq, N(a), N(b)) => truth((a - b).abs() >= f64::EPSILON),
            (B::Eq, S(a), S(b)) => truth(a == b),
            (B::Neq, S(a), S(b)) => truth(a != b),
            (B::Less, N(a), N(b)) => truth(a < b),
            (B::LessEq, N(a), N(b)) => truth(a <= b),
            (B::Greater, N(a), N(b)) => truth(a > b),
            (B::GreaterEq, N(a), N(b)) => truth(a >= b),
            (B::Less, S(a), S(b)) => truth(a < b),
            (B::LessEq, S(a), S(b)) => truth(a <= b),
            (B::Greater, S(a), S(b)) => truth(a > b),
            (B::GreaterEq, S(a), S(b)) => truth(a >= b),
            (op, a, b) => return Err(Self::mismatch(op, &[a, b])),
        };
        Ok(value)
    }
}
