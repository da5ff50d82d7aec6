mod args;
mod driver_error;

use args::Args;
use clap::Parser;
use driver_error::DriverError;
use rpnc::builder::script::replay;
use rpnc::*;

use std::fs;
use std::path::Path;

fn read_input(path: &Path) -> Result<String, DriverError> {
    if !fs::exists(path)? {
        let filename = path.to_string_lossy().to_string();
        return Err(DriverError::InputFileDoesNotExist(filename));
    }
    Ok(fs::read_to_string(path)?)
}

fn build(path: &Path) -> Result<ast::Program, DriverError> {
    let source = read_input(path)?;
    let build = replay(&source)?;
    for diagnostic in &build.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    Ok(build.program)
}

fn emit(program: &ast::Program, args: &Args) -> Result<codegen::AsmProgram, DriverError> {
    let both = args.print_both();

    if args.rpn || both {
        if both {
            println!("// RPN");
        }
        print!("{}", rpn::rpn(program));
    }

    let asm = codegen::codegen(program);
    if asm.has_unknown() {
        eprintln!("warning: assembly contains UNKNOWN operators");
    }
    match &args.output {
        Some(path) => fs::write(path, asm.to_string())?,
        None if args.asm || both => {
            if both {
                println!("// ASM");
            }
            print!("{asm}");
        }
        None => (),
    }
    Ok(asm)
}

#[cfg(feature = "vm")]
fn execute(asm: &codegen::AsmProgram) -> Result<(), DriverError> {
    let value = vm::run_stdio(asm)?;
    println!("Result: {value}");
    Ok(())
}

#[cfg(feature = "vm")]
fn exec_file(path: &Path) -> Result<(), DriverError> {
    let text = read_input(path)?;
    let asm: codegen::AsmProgram = text.parse()?;
    execute(&asm)
}

pub fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    #[cfg(feature = "vm")]
    if let Some(path) = &args.exec {
        exec_file(path)?;
        return Ok(());
    }

    let script = args.script.as_deref().ok_or(DriverError::NoInput)?;
    let program = build(script)?;
    #[allow(unused_variables)]
    let asm = emit(&program, &args)?;

    #[cfg(feature = "vm")]
    if args.run {
        execute(&asm)?;
    }

    Ok(())
}
