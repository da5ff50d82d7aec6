use crate::ast::{Label, Name, Operator};

#[derive(Debug, Clone, PartialEq)]
pub struct RpnProgram {
    pub lines: Vec<RpnLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RpnLine {
    Code(Vec<RpnToken>),
    Comment(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RpnToken {
    /// Variable name or constant literal, kept verbatim.
    Operand(String),
    Operator(Operator),
    Call(Name),
    Assign,
    Or,
    /// Label definition.
    Define(Label),
    /// Label used as a jump operand.
    Ref(Label),
    Jump,
    JumpElse,
    StepIn,
    StepOut,
    Return,
}

impl RpnProgram {
    /// All tokens in emission order, ignoring line structure.
    pub fn tokens(&self) -> impl Iterator<Item = &RpnToken> {
        self.lines.iter().flat_map(|line| match line {
            RpnLine::Code(tokens) => tokens.as_slice(),
            RpnLine::Comment(_) | RpnLine::Blank => &[],
        })
    }
}
