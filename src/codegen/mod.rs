pub mod asm_ast;
mod gen;


use crate::ast::Program;

pub use asm_ast::*;
pub use gen::decode_constant;

use gen::gen_function;

pub fn codegen(program: &Program) -> AsmProgram {
    let mut instructions = AsmInstructions::new();
    for function in &program.functions {
        gen_function(function, &mut instructions);
    }
    log::debug!("codegen: {} instructions", instructions.len());

    AsmProgram { instructions }
}
