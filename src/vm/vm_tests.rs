use super::*;
use std::io::Cursor;

fn parse(text: &str) -> AsmProgram {
    text.parse().unwrap()
}

fn run_with_input(text: &str, input: &str) -> (Result<Value>, String) {
    let program = parse(text);
    let mut vm = Vm::new(Cursor::new(input.to_owned()), Vec::new());
    let result = vm.run(&program);
    let output = String::from_utf8(vm.into_output()).unwrap();
    (result, output)
}

fn run(text: &str) -> Result<Value> {
    run_with_input(text, "").0
}

#[test]
fn test_parse_instructions() {
    let program = parse(
        "
// function _main_ ()
lbl $$Function__main_$$
mov push 'a b'
mov _x_ pop
- _x_ 2 push
neg pop push
jf $$Exit_Loop_3$$ pop
prn pop pop
read
UNKNOWN pop push
out
",
    );
    let exit: Label = "$$Exit_Loop_3$$".parse().unwrap();
    assert_eq!(
        vec![
            AsmInstruction::Label(Label::function("_main_")),
            AsmInstruction::Mov(Target::Push, Operand::Literal("'a b'".into())),
            AsmInstruction::Mov(Target::Slot("_x_".into()), Operand::Pop),
            AsmInstruction::Binary(
                crate::codegen::BinaryOp::Sub,
                Operand::Slot("_x_".into()),
                Operand::Literal("2".into()),
                Target::Push
            ),
            AsmInstruction::Unary(crate::codegen::UnaryOp::Neg, Operand::Pop, Target::Push),
            AsmInstruction::JmpFalse(exit, Operand::Pop),
            AsmInstruction::Print(2),
            AsmInstruction::Read(0),
            AsmInstruction::Unknown { arity: 1 },
            AsmInstruction::Out,
        ],
        program.instructions
    );
}

#[test]
fn test_parse_errors() {
    let cases = [
        ("lbl $$Function_f$$\nfrob x", 2, ParseAsmErrorKind::UnknownInstruction("frob".into())),
        (
            "mov push",
            1,
            ParseAsmErrorKind::Arity {
                mnemonic: "mov".into(),
                expected: 2,
                found: 1,
            },
        ),
        ("\n\njmp nowhere", 3, ParseAsmErrorKind::Label("nowhere".into())),
        ("prn pop _x_", 1, ParseAsmErrorKind::ExpectedPop("_x_".into())),
        ("mov push \"open", 1, ParseAsmErrorKind::UnterminatedString),
    ];
    for (text, line, kind) in cases {
        let err = text.parse::<AsmProgram>().unwrap_err();
        assert_eq!(ParseAsmError { line, kind }, err);
    }
}

#[test]
fn test_emitted_text_parses_back() {
    let text = "\
lbl $$Function__main_$$
mov push 1
mov push 'x'
+ pop pop push
jmp $$Exit_Switch_4$$
lbl $$Exit_Switch_4$$
prn pop
UNKNOWN pop pop push
out
";
    assert_eq!(text, parse(text).to_string());
}

#[test]
fn test_operand_order() {
    let value = run("
lbl $$Function__main_$$
mov push 10
mov push 4
- pop pop push
out
");
    assert_eq!(Value::Number(6.0), value.unwrap());

    let value = run("
lbl $$Function__main_$$
mov push 3
mov push 2
< pop pop push
out
");
    assert_eq!(Value::Number(0.0), value.unwrap());
}

#[test]
fn test_string_values() {
    let value = run("
lbl $$Function__main_$$
mov push 'n = '
mov push 4
+ pop pop push
out
");
    assert_eq!(Value::Str("n = 4".into()), value.unwrap());

    let value = run("
lbl $$Function__main_$$
mov push \"abc\"
mov push \"abd\"
< pop pop push
out
");
    assert_eq!(Value::Number(1.0), value.unwrap());
}

#[test]
fn test_sum_loop() {
    // for _i_ = 1 to 4: _s_ = _s_ + _i_
    let value = run("
lbl $$Function__main_$$
mov push 0
mov _s_ pop
mov push 1
mov _i_ pop
lbl $$Cond_Loop_1$$
mov push _i_
mov push 4
<= pop pop push
jf $$Exit_Loop_1$$ pop
mov push _s_
mov push _i_
+ pop pop push
mov _s_ pop
mov push 1
+ _i_ pop _i_
jmp $$Cond_Loop_1$$
lbl $$Exit_Loop_1$$
mov push _s_
out
");
    assert_eq!(Value::Number(10.0), value.unwrap());
}

#[test]
fn test_call_has_own_scope() {
    let value = run("
lbl $$Function__twice_$$
mov _x_ pop
mov push _x_
mov push 2
* pop pop push
out
lbl $$Function__main_$$
mov push 5
mov _x_ pop
mov push 21
call $$Function__twice_$$
mov push _x_
+ pop pop push
out
");
    assert_eq!(Value::Number(47.0), value.unwrap());
}

#[test]
fn test_main_fallback_entry() {
    let value = run("
lbl $$Function_main$$
mov push 'ok'
out
");
    assert_eq!(Value::Str("ok".into()), value.unwrap());
}

#[test]
fn test_print_and_read() {
    let (value, output) = run_with_input(
        "
lbl $$Function__main_$$
mov push 'name?'
read pop
mov _name_ pop
mov push 'hi'
mov push _name_
prn pop pop
mov push 1
out
",
        "bob\n",
    );
    assert_eq!(Value::Number(1.0), value.unwrap());
    assert_eq!("hi bob\n", output);

    let (value, _) = run_with_input(
        "
lbl $$Function__main_$$
read
mov push 1
+ pop pop push
out
",
        " 41 \n",
    );
    assert_eq!(Value::Number(42.0), value.unwrap());
}

#[test]
fn test_runtime_errors() {
    assert!(matches!(run("out"), Err(VmError::MissingEntry)));
    assert!(matches!(
        run("lbl $$Function__main_$$\nout"),
        Err(VmError::EmptyStack)
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\nmov push _y_\nout"),
        Err(VmError::UnknownVariable(name)) if name == "_y_"
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\njmp $$Exit_Loop_9$$"),
        Err(VmError::UnknownLabel(_))
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\nmov push 1"),
        Err(VmError::RanOffEnd)
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\nmov push 1\nmov push 2\nUNKNOWN pop pop push\nout"),
        Err(VmError::Unknown { at: 3 })
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\nmov push 'a'\nmov push 1\n< pop pop push\nout"),
        Err(VmError::TypeMismatch { .. })
    ));
    assert!(matches!(
        run("lbl $$Function__main_$$\nmov push 1\nprn pop pop\nout"),
        Err(VmError::Underflow(_))
    ));
}

#[test]
fn test_value_semantics() {
    assert!(Value::Number(0.5).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Str(String::new()).is_truthy());
    assert_eq!(Some(Value::Str("a".into())), Value::parse_literal("\"a\""));
    assert_eq!(Some(Value::Number(-2.5)), Value::parse_literal("-2.5"));
    assert_eq!(None, Value::parse_literal("_x_"));

    let eq = Value::binary(
        crate::codegen::BinaryOp::Eq,
        &Value::Number(0.1 + 0.2),
        &Value::Number(0.3),
    );
    assert_eq!(Value::Number(1.0), eq.unwrap());
    assert!(Value::unary(crate::codegen::UnaryOp::Neg, &Value::Str("x".into())).is_err());
}
