use super::*;
use crate::builder::script::replay;

fn lower(body: &str) -> RpnProgram {
    let script = format!(
        "begin-program\nbegin-function\nname _main_\nbegin-block\n{body}\nattach\nattach\n"
    );
    let build = replay(&script).unwrap();
    assert!(build.diagnostics.is_empty(), "{:?}", build.diagnostics);
    rpn(&build.program)
}

fn code_lines(program: &RpnProgram) -> Vec<String> {
    program
        .lines
        .iter()
        .filter(|line| matches!(line, RpnLine::Code(_)))
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_assignment() {
    let program = lower(
        "
begin-assignment
name _x_
expr ( _a_ + 1 ) * 2
attach
attach
",
    );
    assert_eq!(vec!["_x_ _a_ 1 + 2 * ="], code_lines(&program));
}

#[test]
fn test_function_frame() {
    let program = lower("");
    let text = program.to_string();
    assert!(text.starts_with("// function _main_ ()\n"));
    assert!(text.contains("// end function _main_\n"));
}

#[test]
fn test_call_tokens() {
    let program = lower(
        "
begin-identifier
name _print_
identifier-to-call
expr _x_
attach
expr \"done\"
attach
attach
",
    );
    assert_eq!(vec!["_x_ \"done\" call(_print_)"], code_lines(&program));
}

#[test]
fn test_conditional() {
    let program = lower(
        "
begin-conditional
expr _x_ > 0
attach
begin-block
begin-assignment
name _y_
expr 1
attach
attach
attach
begin-block
attach
attach
",
    );
    let lines = code_lines(&program);
    let id = "3";
    assert_eq!(
        vec![
            format!("_x_ 0 > $$Else_Conditional_{id}$$ jumpElse"),
            "_y_ 1 =".to_owned(),
            format!("$$Exit_Conditional_{id}$$ jump"),
            format!("$$Else_Conditional_{id}$$:"),
            format!("$$Exit_Conditional_{id}$$:"),
        ],
        lines
    );
}

#[test]
fn test_loop_is_scoped() {
    let program = lower(
        "
begin-loop
name _i_
expr 1
attach
expr 5
attach
begin-block
attach
attach
",
    );
    let tokens: Vec<_> = program.tokens().collect();
    assert_eq!(Some(&&RpnToken::StepIn), tokens.first());
    assert_eq!(Some(&&RpnToken::StepOut), tokens.last());

    let lines = code_lines(&program);
    assert_eq!("_i_ 1 =", lines[1]);
    assert!(lines[2].ends_with("_i_ 5 <="));
    assert_eq!("_i_ _i_ 1 + =", lines[4]);
}

#[test]
fn test_switch_cases_jump_to_exit() {
    let program = lower(
        "
begin-switch
expr _x_
attach
case 1
case 2
begin-switch-block
end-case
case 3
begin-switch-block
end-case
attach
",
    );
    let lines = code_lines(&program);
    assert_eq!("stepInto", lines[0]);
    assert_eq!("_x_ 1 == _x_ 2 == ||", lines[1]);
    assert_eq!("_x_ 3 ==", lines[5]);

    let exits = lines
        .iter()
        .filter(|l| l.starts_with("$$Exit_Switch_") && l.ends_with(" jump"))
        .count();
    assert_eq!(2, exits);
    assert!(lines.last().unwrap().ends_with(": stepOut"));
}

#[test]
fn test_return_and_unary() {
    let program = lower(
        "
begin-return
begin-expression
operator - unary
literal _x_
end-expression
attach
attach
",
    );
    assert_eq!(vec!["_x_ neg return"], code_lines(&program));
}
