//! Text emission using [Display]
//!
//! Implements [Display] for [`RpnProgram`](crate::rpn::RpnProgram) and
//! [`AsmProgram`](crate::codegen::AsmProgram), so both artifacts can be
//! rendered with `to_string` or used directly as formatting arguments.
//!
//! Assembly text is one instruction per line, operands separated by single
//! spaces and `//` comment lines. The `vm` module parses exactly this form.
//!
//! [Display]: https://doc.rust-lang.org/std/fmt/trait.Display.html

use crate::codegen::*;
use crate::rpn::*;

use std::fmt;

#[cfg(test)]
mod emission_tests;

impl fmt::Display for RpnToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Operand(text) => write!(f, "{text}"),
            Self::Operator(op) => write!(f, "{op}"),
            Self::Call(name) => write!(f, "call({name})"),
            Self::Assign => write!(f, "="),
            Self::Or => write!(f, "||"),
            Self::Define(label) => write!(f, "{label}:"),
            Self::Ref(label) => write!(f, "{label}"),
            Self::Jump => write!(f, "jump"),
            Self::JumpElse => write!(f, "jumpElse"),
            Self::StepIn => write!(f, "stepInto"),
            Self::StepOut => write!(f, "stepOut"),
            Self::Return => write!(f, "return"),
        }
    }
}

impl fmt::Display for RpnLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Code(tokens) => {
                let mut tokens = tokens.iter();
                if let Some(first) = tokens.next() {
                    write!(f, "{first}")?;
                }
                tokens.try_for_each(|token| write!(f, " {token}"))
            }
            Self::Comment(text) => write!(f, "// {text}"),
            Self::Blank => Ok(()),
        }
    }
}

impl fmt::Display for RpnProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.lines.iter().try_for_each(|line| writeln!(f, "{line}"))
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Neg => write!(f, "neg"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        };
        write!(f, "{symbol}")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Slot(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Pop => write!(f, "pop"),
            Self::Slot(name) => write!(f, "{name}"),
            Self::Literal(text) => write!(f, "{text}"),
        }
    }
}

fn write_pops(f: &mut fmt::Formatter, count: usize) -> fmt::Result {
    (0..count).try_for_each(|_| write!(f, " pop"))
}

impl fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "// {text}"),
            Self::Label(label) => write!(f, "lbl {label}"),
            Self::Mov(dst, src) => write!(f, "mov {dst} {src}"),
            Self::Unary(op, src, dst) => write!(f, "{op} {src} {dst}"),
            Self::Binary(op, src1, src2, dst) => write!(f, "{op} {src1} {src2} {dst}"),
            Self::Jmp(label) => write!(f, "jmp {label}"),
            Self::JmpFalse(label, src) => write!(f, "jf {label} {src}"),
            Self::Call(label) => write!(f, "call {label}"),
            Self::Out => write!(f, "out"),
            Self::Print(argc) => {
                write!(f, "prn")?;
                write_pops(f, *argc)
            }
            Self::Read(argc) => {
                write!(f, "read")?;
                write_pops(f, *argc)
            }
            Self::Unknown { arity } => {
                write!(f, "UNKNOWN")?;
                write_pops(f, *arity)?;
                write!(f, " push")
            }
        }
    }
}

impl fmt::Display for AsmProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}
