#![cfg(feature = "vm")]

use rpnc::builder::script::replay;
use rpnc::codegen::{codegen, AsmProgram};
use rpnc::rpn::rpn;
use rpnc::vm::{Value, Vm, VmError};
use std::io::Cursor;

fn main_function(body: &str) -> String {
    format!("begin-program\nbegin-function\nname _main_\nbegin-block\n{body}\nattach\nattach\n")
}

fn compile(script: &str) -> AsmProgram {
    let build = replay(script).unwrap();
    assert!(build.diagnostics.is_empty(), "{:?}", build.diagnostics);
    codegen(&build.program).to_string().parse().unwrap()
}

fn execute(script: &str, input: &str) -> (Result<Value, VmError>, String) {
    let program = compile(script);
    let mut vm = Vm::new(Cursor::new(input.to_owned()), Vec::new());
    let result = vm.run(&program);
    (result, String::from_utf8(vm.into_output()).unwrap())
}

fn result(script: &str) -> Value {
    execute(script, "").0.unwrap()
}

const FACTORIAL: &str = "
begin-assignment
name _f_
expr 1
attach
attach
begin-loop
name _i_
expr 1
attach
expr 5
attach
begin-block
begin-assignment
name _f_
expr _f_ * _i_
attach
attach
attach
attach
begin-return
expr _f_
attach
attach
";

#[test]
fn test_factorial_loop() {
    assert_eq!(Value::Number(120.0), result(&main_function(FACTORIAL)));
}

#[test]
fn test_loop_with_step_and_exit() {
    let script = main_function(
        "
begin-loop
name _i_
expr 0
attach
expr 100
attach
expr 3
attach
begin-block
begin-conditional
expr _i_ > 10
attach
begin-block
begin-loop-exit
attach
attach
attach
attach
attach
begin-return
expr _i_
attach
attach
",
    );
    assert_eq!(Value::Number(12.0), result(&script));
}

fn switch_on(x: &str) -> String {
    main_function(&format!(
        "
begin-assignment
name _x_
expr {x}
attach
attach
begin-switch
expr _x_
attach
case 1
begin-switch-block
begin-assignment
name _y_
expr 10
attach
attach
end-case
case 2
case 3
begin-switch-block
begin-assignment
name _y_
expr 20
attach
attach
begin-break
attach
begin-assignment
name _y_
expr 99
attach
attach
end-case
case
begin-switch-block
begin-assignment
name _y_
expr 0
attach
attach
end-case
attach
begin-return
expr _y_
attach
attach
"
    ))
}

#[test]
fn test_switch() {
    assert_eq!(Value::Number(10.0), result(&switch_on("1")));
    assert_eq!(Value::Number(20.0), result(&switch_on("2")));
    assert_eq!(Value::Number(20.0), result(&switch_on("3")));
    assert_eq!(Value::Number(0.0), result(&switch_on("7")));
}

#[test]
fn test_conditional() {
    let script = |x: &str| {
        main_function(&format!(
            "
begin-conditional
expr {x} >= 3
attach
begin-block
begin-return
expr \"big\"
attach
attach
attach
begin-block
begin-return
expr \"small\"
attach
attach
attach
attach
"
        ))
    };
    assert_eq!(Value::Str("big".into()), result(&script("5")));
    assert_eq!(Value::Str("small".into()), result(&script("0x2")));
}

#[test]
fn test_function_call() {
    let script = "
begin-program
begin-function
name _sub_
param _a_
param _b_
begin-block
begin-return
expr _a_ - _b_
attach
attach
attach
attach
begin-function
name _main_
begin-block
begin-return
begin-expression
begin-identifier
name _sub_
identifier-to-call
expr 10
attach
expr 4
attach
call
operator *
literal 2
end-expression
attach
attach
attach
attach
";
    assert_eq!(Value::Number(12.0), result(script));
}

#[test]
fn test_print_and_read() {
    let script = main_function(
        "
begin-assignment
name _n_
begin-expression
begin-identifier
name _read_
identifier-to-call
call
end-expression
attach
attach
begin-identifier
name _print_
identifier-to-call
expr \"twice\"
attach
expr _n_ * 2
attach
attach
begin-return
expr _n_
attach
attach
",
    );
    let (value, output) = execute(&script, "21\n");
    assert_eq!(Value::Number(21.0), value.unwrap());
    assert_eq!("twice 42\n", output);
}

#[test]
fn test_unknown_operator_stops_the_machine() {
    let script = main_function(
        "
begin-return
expr 2 ^ 3
attach
attach
",
    );
    let (value, _) = execute(&script, "");
    assert!(matches!(value, Err(VmError::Unknown { .. })));
}

#[test]
fn test_rpn_listing() {
    let build = replay(&main_function(FACTORIAL)).unwrap();
    let text = rpn(&build.program).to_string();
    assert!(text.starts_with("// function _main_ ()\n"));
    assert!(text.contains("_f_ 1 =\n"));
    assert!(text.contains("_f_ _f_ _i_ * =\n"));
    assert!(text.contains("stepInto"));
    assert!(text.contains("stepOut"));
    assert!(text.contains("_f_ return\n"));
}

#[test]
fn test_demo_scripts() {
    let grade = include_str!("../demos/grade.script");
    assert_eq!(Value::Str("pass".into()), result(grade));

    let factorial = include_str!("../demos/factorial.script");
    let (value, output) = execute(factorial, "5\n");
    assert_eq!(Value::Number(120.0), value.unwrap());
    assert_eq!("5 -> 120\n", output);
}
