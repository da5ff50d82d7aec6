use crate::ast::{Label, Name, Operator};

#[derive(Debug, Clone, PartialEq)]
pub struct AsmProgram {
    pub instructions: AsmInstructions,
}

pub type AsmInstructions = Vec<AsmInstruction>;

#[derive(Debug, Clone, PartialEq)]
pub enum AsmInstruction {
    Comment(String),
    Label(Label),
    Mov(Target, Operand),
    Unary(UnaryOp, Operand, Target),
    Binary(BinaryOp, Operand, Operand, Target),
    Jmp(Label),
    JmpFalse(Label, Operand),
    Call(Label),
    Out,
    /// Prints the given number of popped arguments.
    Print(usize),
    /// Discards the given number of popped arguments, then pushes one line
    /// of input.
    Read(usize),
    /// Operator with no instruction; consumes `arity` values and pushes one.
    Unknown { arity: usize },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Neq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Push,
    Slot(Name),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Pop,
    Slot(Name),
    /// Decoded constant text: a number or a quoted string.
    Literal(String),
}

impl AsmInstruction {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

impl AsmProgram {
    /// Whether lowering had to fall back to the `UNKNOWN` sentinel.
    pub fn has_unknown(&self) -> bool {
        self.instructions.iter().any(AsmInstruction::is_unknown)
    }
}

impl TryFrom<&Operator> for UnaryOp {
    type Error = ();

    fn try_from(value: &Operator) -> Result<Self, Self::Error> {
        match value {
            Operator::Not => Ok(Self::Not),
            Operator::Negate => Ok(Self::Neg),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Operator> for BinaryOp {
    type Error = ();

    fn try_from(value: &Operator) -> Result<Self, Self::Error> {
        match value {
            Operator::Add => Ok(Self::Add),
            Operator::Subtract => Ok(Self::Sub),
            Operator::Multiply => Ok(Self::Mul),
            Operator::Divide => Ok(Self::Div),
            Operator::Modulo => Ok(Self::Mod),
            Operator::Equal => Ok(Self::Eq),
            Operator::NotEqual => Ok(Self::Neq),
            Operator::Less => Ok(Self::Less),
            Operator::LessOrEqual => Ok(Self::LessEq),
            Operator::Greater => Ok(Self::Greater),
            Operator::GreaterOrEqual => Ok(Self::GreaterEq),
            _ => Err(()),
        }
    }
}
