use crate::ast::Label;
use crate::codegen::*;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ParseAsmError {
    pub line: usize,
    pub kind: ParseAsmErrorKind,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseAsmErrorKind {
    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),
    #[error("`{mnemonic}` takes {expected} operands, found {found}")]
    Arity {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid label `{0}`")]
    Label(String),
    #[error("expected `pop`, found `{0}`")]
    ExpectedPop(String),
    #[error("unterminated string")]
    UnterminatedString,
}

type Result<T> = std::result::Result<T, ParseAsmErrorKind>;

/// Splits a line at whitespace, keeping quoted strings whole.
fn words(line: &str) -> Result<Vec<&str>> {
    let mut words = Vec::new();
    let mut start = None;
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, start) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => (),
            (None, _) if c == '"' || c == '\'' => {
                quote = Some(c);
                if start.is_none() {
                    start = Some(i);
                }
            }
            (None, Some(s)) if c.is_whitespace() => {
                words.push(&line[s..i]);
                start = None;
            }
            (None, None) if !c.is_whitespace() => start = Some(i),
            (None, _) => (),
        }
    }
    if quote.is_some() {
        return Err(ParseAsmErrorKind::UnterminatedString);
    }
    if let Some(s) = start {
        words.push(&line[s..]);
    }
    Ok(words)
}

fn label(text: &str) -> Result<Label> {
    text.parse()
        .map_err(|_| ParseAsmErrorKind::Label(text.to_owned()))
}

fn operand(text: &str) -> Operand {
    match text {
        "pop" => Operand::Pop,
        _ if text.starts_with(['"', '\'']) || text.parse::<f64>().is_ok() => {
            Operand::Literal(text.to_owned())
        }
        _ => Operand::Slot(text.to_owned()),
    }
}

fn target(text: &str) -> Target {
    match text {
        "push" => Target::Push,
        _ => Target::Slot(text.to_owned()),
    }
}

fn unary_op(mnemonic: &str) -> Option<UnaryOp> {
    match mnemonic {
        "!" => Some(UnaryOp::Not),
        "neg" => Some(UnaryOp::Neg),
        _ => None,
    }
}

fn binary_op(mnemonic: &str) -> Option<BinaryOp> {
    let op = match mnemonic {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "&" => BinaryOp::And,
        "|" => BinaryOp::Or,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::Neq,
        "<" => BinaryOp::Less,
        "<=" => BinaryOp::LessEq,
        ">" => BinaryOp::Greater,
        ">=" => BinaryOp::GreaterEq,
        _ => return None,
    };
    Some(op)
}

/// Counts the trailing `pop` operands of `prn`, `read` and `UNKNOWN`.
fn pops(args: &[&str]) -> Result<usize> {
    match args.iter().find(|a| **a != "pop") {
        Some(other) => Err(ParseAsmErrorKind::ExpectedPop((*other).to_owned())),
        None => Ok(args.len()),
    }
}

fn instruction(words: &[&str]) -> Result<AsmInstruction> {
    let Some((&mnemonic, args)) = words.split_first() else {
        return Err(ParseAsmErrorKind::UnknownInstruction(String::new()));
    };
    let arity = |expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ParseAsmErrorKind::Arity {
                mnemonic: mnemonic.to_owned(),
                expected,
                found: args.len(),
            })
        }
    };

    let instruction = match mnemonic {
        "mov" => {
            arity(2)?;
            AsmInstruction::Mov(target(args[0]), operand(args[1]))
        }
        "lbl" => {
            arity(1)?;
            AsmInstruction::Label(label(args[0])?)
        }
        "jmp" => {
            arity(1)?;
            AsmInstruction::Jmp(label(args[0])?)
        }
        "jf" => {
            arity(2)?;
            AsmInstruction::JmpFalse(label(args[0])?, operand(args[1]))
        }
        "call" => {
            arity(1)?;
            AsmInstruction::Call(label(args[0])?)
        }
        "out" => {
            arity(0)?;
            AsmInstruction::Out
        }
        "prn" => AsmInstruction::Print(pops(args)?),
        "read" => AsmInstruction::Read(pops(args)?),
        "UNKNOWN" => {
            let Some((&"push", consumed)) = args.split_last() else {
                return Err(ParseAsmErrorKind::Arity {
                    mnemonic: mnemonic.to_owned(),
                    expected: 1,
                    found: 0,
                });
            };
            AsmInstruction::Unknown {
                arity: pops(consumed)?,
            }
        }
        _ => {
            if let Some(op) = unary_op(mnemonic) {
                arity(2)?;
                AsmInstruction::Unary(op, operand(args[0]), target(args[1]))
            } else if let Some(op) = binary_op(mnemonic) {
                arity(3)?;
                AsmInstruction::Binary(op, operand(args[0]), operand(args[1]), target(args[2]))
            } else {
                return Err(ParseAsmErrorKind::UnknownInstruction(mnemonic.to_owned()));
            }
        }
    };
    Ok(instruction)
}

impl FromStr for AsmInstruction {
    type Err = ParseAsmErrorKind;

    fn from_str(s: &str) -> Result<Self> {
        instruction(&words(s)?)
    }
}

/// Parses assembly text. Blank lines and `//` comment lines are skipped, so
/// comments do not survive a round trip.
impl FromStr for AsmProgram {
    type Err = ParseAsmError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let instructions = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
            .map(|(line, text)| {
                text.parse::<AsmInstruction>()
                    .map_err(|kind| ParseAsmError { line, kind })
            })
            .collect::<std::result::Result<_, _>>()?;

        Ok(AsmProgram { instructions })
    }
}
