use super::{Call, Constant, Identifier, NodeId, Session};
use std::fmt;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
    Not,
    Negate,
    /// Text that names no known operator. Kept so the lowering can flag it.
    Other(String),
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            ">" => Self::Greater,
            "<" => Self::Less,
            ">=" => Self::GreaterOrEqual,
            "<=" => Self::LessOrEqual,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "^" => Self::Power,
            "%" => Self::Modulo,
            "!" => Self::Not,
            "neg" => Self::Negate,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Binding strength, higher binds tighter. Level 3 is unused.
    pub fn priority(&self) -> u32 {
        match self {
            Self::Equal
            | Self::NotEqual
            | Self::Greater
            | Self::Less
            | Self::GreaterOrEqual
            | Self::LessOrEqual => 1,
            Self::Add | Self::Subtract => 2,
            Self::Multiply | Self::Divide => 4,
            Self::Power | Self::Modulo | Self::Not => 5,
            Self::Negate => 6,
            Self::Other(_) => u32::MAX,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Self::Not | Self::Negate)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::Modulo => "%",
            Self::Not => "!",
            Self::Negate => "neg",
            Self::Other(s) => s,
        };
        write!(f, "{symbol}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(Identifier),
    Constant(Constant),
    Call(Call),
    Operator(Operator),
    OpenParen,
    CloseParen,
}

impl Token {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Identifier(_) | Self::Constant(_) | Self::Call(_))
    }
}

/// Infix token buffer, appended to in source order while the expression is
/// open and linearized into postfix order on lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub tokens: Vec<Token>,
}

impl Expression {
    pub fn new(session: &mut Session) -> Self {
        Self {
            id: session.next_id(),
            tokens: Vec::new(),
        }
    }

    pub fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Appends an operator or parenthesis given by its source text. In unary
    /// context `-` becomes negation; nothing else is disambiguated.
    pub fn add_operator(&mut self, symbol: &str, unary: bool) {
        let token = match symbol {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            "-" if unary => Token::Operator(Operator::Negate),
            _ => Token::Operator(Operator::from_symbol(symbol)),
        };
        self.tokens.push(token);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Operator-precedence conversion to postfix. Only leaves and operators
    /// appear in the output; parentheses are consumed. Operators of equal
    /// priority associate to the left.
    pub fn linearize(&self) -> Vec<&Token> {
        let mut stack: Vec<&Token> = Vec::new();
        let mut output = Vec::with_capacity(self.tokens.len());

        for token in &self.tokens {
            match token {
                Token::Identifier(_) | Token::Constant(_) | Token::Call(_) => output.push(token),
                // prefix operators have no left operand to reduce
                Token::Operator(op) if op.is_unary() => stack.push(token),
                Token::Operator(op) => {
                    let priority = op.priority();
                    while stack
                        .last()
                        .is_some_and(|t| matches!(t, Token::Operator(top) if top.priority() >= priority))
                    {
                        output.extend(stack.pop());
                    }
                    stack.push(token);
                }
                Token::OpenParen => stack.push(token),
                Token::CloseParen => {
                    while let Some(top) = stack.pop() {
                        if matches!(top, Token::OpenParen) {
                            break;
                        }
                        output.push(top);
                    }
                }
            }
        }

        while let Some(top) = stack.pop() {
            if matches!(top, Token::OpenParen) {
                log::warn!("unbalanced '(' in expression {}", self.id);
                continue;
            }
            output.push(top);
        }

        output
    }
}
