use super::*;
use crate::ast::{Label, NodeKind, Operator};

#[test]
fn test_asm_instruction_text() {
    let exit = Label::new("Exit", NodeKind::Loop, None);
    let cases = [
        (AsmInstruction::Mov(Target::Push, Operand::Literal("5".into())), "mov push 5"),
        (AsmInstruction::Mov(Target::Slot("_x_".into()), Operand::Pop), "mov _x_ pop"),
        (
            AsmInstruction::Binary(BinaryOp::LessEq, Operand::Pop, Operand::Pop, Target::Push),
            "<= pop pop push",
        ),
        (AsmInstruction::Unary(UnaryOp::Neg, Operand::Pop, Target::Push), "neg pop push"),
        (AsmInstruction::JmpFalse(exit.clone(), Operand::Pop), "jf $$Exit_Loop$$ pop"),
        (AsmInstruction::Jmp(exit.clone()), "jmp $$Exit_Loop$$"),
        (AsmInstruction::Label(exit), "lbl $$Exit_Loop$$"),
        (AsmInstruction::Print(2), "prn pop pop"),
        (AsmInstruction::Read(0), "read"),
        (AsmInstruction::Unknown { arity: 2 }, "UNKNOWN pop pop push"),
        (AsmInstruction::Out, "out"),
        (AsmInstruction::Comment("if".into()), "// if"),
    ];
    for (instruction, text) in cases {
        assert_eq!(text, instruction.to_string());
    }
}

#[test]
fn test_rpn_line_text() {
    let label = Label::function("f");
    let line = RpnLine::Code(vec![
        RpnToken::Define(label.clone()),
        RpnToken::Operand("_a_".into()),
        RpnToken::Operator(Operator::Negate),
        RpnToken::Call("_f_".into()),
        RpnToken::Ref(label),
        RpnToken::JumpElse,
    ]);
    assert_eq!(
        "$$Function_f$$: _a_ neg call(_f_) $$Function_f$$ jumpElse",
        line.to_string()
    );
    assert_eq!("", RpnLine::Code(Vec::new()).to_string());
}

#[test]
fn test_program_text_is_line_per_item() {
    let program = RpnProgram {
        lines: vec![
            RpnLine::Comment("function f ()".into()),
            RpnLine::Code(vec![RpnToken::StepIn]),
            RpnLine::Blank,
        ],
    };
    assert_eq!("// function f ()\nstepInto\n\n", program.to_string());
}
