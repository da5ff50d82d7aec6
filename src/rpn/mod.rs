//! Reverse-Polish lowering.
//!
//! Expressions come out in postfix order. Control flow is written with label
//! definitions and `jump` / `jumpElse` pseudo-ops, and loop and switch bodies
//! are additionally framed by `stepInto` / `stepOut` scope markers.

pub mod rpn_ast;
mod gen;

#[cfg(test)]
mod rpn_tests;

pub use rpn_ast::*;

use crate::ast::Program;
use gen::gen_function;

pub fn rpn(program: &Program) -> RpnProgram {
    let mut lines = Vec::new();
    for function in &program.functions {
        gen_function(function, &mut lines);
    }
    log::debug!("rpn: {} lines", lines.len());

    RpnProgram { lines }
}
