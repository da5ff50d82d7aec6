//! Stack machine for the generated assembly.
//!
//! Execution starts right after the label of `_main_` (or `main`). Every
//! `call` opens a frame with its own variables and a return address; `out`
//! closes it again. `out` in the entry frame stops the machine and yields the
//! value on top of the stack.

mod parse;
mod value;

#[cfg(test)]
mod vm_tests;

pub use parse::{ParseAsmError, ParseAsmErrorKind};
pub use value::Value;

use crate::ast::{Label, Name};
use crate::codegen::{AsmInstruction, AsmProgram, Operand, Target};
use crate::stack::{Stack, StackError};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

const ENTRY_POINTS: [&str; 2] = ["_main_", "main"];

#[derive(Debug, Error)]
pub enum VmError {
    #[error("no entry point, expected a function named `_main_` or `main`")]
    MissingEntry,
    #[error("jump to unknown label {0}")]
    UnknownLabel(Label),
    #[error("pop from an empty value stack")]
    EmptyStack,
    #[error("value stack: {0}")]
    Underflow(#[from] StackError),
    #[error("unknown variable `{0}`")]
    UnknownVariable(Name),
    #[error("`{0}` is neither a number nor a string")]
    BadLiteral(String),
    #[error("`{op}` cannot be applied to {operands}")]
    TypeMismatch { op: String, operands: String },
    #[error("instruction {at} is an UNKNOWN operator")]
    Unknown { at: usize },
    #[error("no active call frame")]
    NoFrame,
    #[error("ran past the last instruction")]
    RanOffEnd,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

enum Step {
    Next,
    Jump(usize),
    Done(Value),
}

#[derive(Debug, Default)]
struct Frame {
    return_to: Option<usize>,
    slots: HashMap<Name, Value>,
}

impl Frame {
    fn new(return_to: Option<usize>) -> Self {
        Self {
            return_to,
            slots: HashMap::new(),
        }
    }
}

type Labels = HashMap<Label, usize>;

fn index_labels(program: &AsmProgram) -> Labels {
    let mut labels = Labels::new();
    for (i, instruction) in program.instructions.iter().enumerate() {
        if let AsmInstruction::Label(label) = instruction {
            labels.entry(label.clone()).or_insert(i);
        }
    }
    labels
}

fn jump(labels: &Labels, label: &Label) -> Result<Step> {
    labels
        .get(label)
        .map(|&at| Step::Jump(at))
        .ok_or_else(|| VmError::UnknownLabel(label.clone()))
}

pub struct Vm<R, W> {
    input: R,
    output: W,
    values: Stack<Value>,
    frames: Vec<Frame>,
}

impl<R: BufRead, W: Write> Vm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            values: Stack::new(),
            frames: Vec::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self, program: &AsmProgram) -> Result<Value> {
        let labels = index_labels(program);
        let entry = ENTRY_POINTS
            .iter()
            .find_map(|name| labels.get(&Label::function(name)))
            .copied()
            .ok_or(VmError::MissingEntry)?;

        self.values = Stack::new();
        self.frames = vec![Frame::new(None)];
        let mut pc = entry + 1;
        loop {
            let instruction = program.instructions.get(pc).ok_or(VmError::RanOffEnd)?;
            log::debug!("{pc}: {instruction}");
            pc = match self.step(instruction, pc, &labels)? {
                Step::Next => pc + 1,
                Step::Jump(at) => at,
                Step::Done(value) => return Ok(value),
            };
        }
    }

    fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or(VmError::EmptyStack)
    }

    fn frame(&mut self) -> Result<&mut Frame> {
        self.frames.last_mut().ok_or(VmError::NoFrame)
    }

    fn load(&mut self, operand: &Operand) -> Result<Value> {
        match operand {
            Operand::Pop => self.pop(),
            Operand::Slot(name) => self
                .frame()?
                .slots
                .get(name)
                .cloned()
                .ok_or_else(|| VmError::UnknownVariable(name.clone())),
            Operand::Literal(text) => {
                Value::parse_literal(text).ok_or_else(|| VmError::BadLiteral(text.clone()))
            }
        }
    }

    fn store(&mut self, target: &Target, value: Value) -> Result<()> {
        match target {
            Target::Push => self.values.push(value),
            Target::Slot(name) => {
                self.frame()?.slots.insert(name.clone(), value);
            }
        }
        Ok(())
    }

    fn step(&mut self, instruction: &AsmInstruction, pc: usize, labels: &Labels) -> Result<Step> {
        match instruction {
            AsmInstruction::Comment(_) | AsmInstruction::Label(_) => (),
            AsmInstruction::Mov(target, operand) => {
                let value = self.load(operand)?;
                self.store(target, value)?;
            }
            AsmInstruction::Unary(op, operand, target) => {
                let value = self.load(operand)?;
                self.store(target, Value::unary(*op, &value)?)?;
            }
            AsmInstruction::Binary(op, first, second, target) => {
                let right = self.load(first)?;
                let left = self.load(second)?;
                self.store(target, Value::binary(*op, &left, &right)?)?;
            }
            AsmInstruction::Jmp(label) => return jump(labels, label),
            AsmInstruction::JmpFalse(label, operand) => {
                if !self.load(operand)?.is_truthy() {
                    return jump(labels, label);
                }
            }
            AsmInstruction::Call(label) => {
                let callee = jump(labels, label)?;
                self.frames.push(Frame::new(Some(pc + 1)));
                return Ok(callee);
            }
            AsmInstruction::Out => {
                let Some(Frame {
                    return_to: Some(at),
                    ..
                }) = self.frames.pop()
                else {
                    return Ok(Step::Done(self.pop()?));
                };
                return Ok(Step::Jump(at));
            }
            AsmInstruction::Print(argc) => {
                let args = self.values.pop_many(*argc)?;
                let line = args
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(self.output, "{line}")?;
            }
            AsmInstruction::Read(argc) => {
                self.values.pop_many(*argc)?;
                self.output.flush()?;
                let mut line = String::new();
                self.input.read_line(&mut line)?;
                self.values.push(Value::from_input(&line));
            }
            AsmInstruction::Unknown { .. } => return Err(VmError::Unknown { at: pc }),
        }
        Ok(Step::Next)
    }
}

/// Runs `program` with the process's stdin and stdout.
pub fn run_stdio(program: &AsmProgram) -> Result<Value> {
    let stdin = io::stdin();
    let mut vm = Vm::new(stdin.lock(), io::stdout());
    vm.run(program)
}
