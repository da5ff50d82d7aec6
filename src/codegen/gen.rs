use crate::ast::*;
use crate::codegen::asm_ast::*;

/// Digits in `radix`, accumulated as a float so long literals lose
/// precision instead of overflowing.
fn radix_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |value: f64, c| {
        c.to_digit(radix)
            .map(|d| value * f64::from(radix) + f64::from(d))
    })
}

/// Assembly text of a constant literal. Quoted strings pass through,
/// booleans become `1` / `0`, `0x` and `0q` prefixes select base 16 and
/// base 4, anything else is read as a decimal float. Undecodable text,
/// including spelled out `inf` / `nan`, yields `NaN`.
pub fn decode_constant(literal: &str) -> String {
    const NAN: &str = "NaN";

    if literal.starts_with(['"', '\'']) {
        return literal.to_owned();
    }
    let value = match literal {
        "true" => Some(1.0),
        "false" => Some(0.0),
        _ => {
            if let Some(digits) = literal.strip_prefix("0x") {
                radix_value(digits, 16)
            } else if let Some(digits) = literal.strip_prefix("0q") {
                radix_value(digits, 4)
            } else if literal
                .trim_start_matches(['+', '-'])
                .starts_with(|c: char| c.is_ascii_alphabetic())
            {
                None
            } else {
                literal.parse::<f64>().ok()
            }
        }
    };
    value.map_or_else(|| NAN.to_owned(), |v| v.to_string())
}

fn push_pop_binary(op: BinaryOp) -> AsmInstruction {
    AsmInstruction::Binary(op, Operand::Pop, Operand::Pop, Target::Push)
}

fn gen_operator(op: &Operator, instructions: &mut AsmInstructions) {
    let instruction = if op.is_unary() {
        UnaryOp::try_from(op).map_or(AsmInstruction::Unknown { arity: 1 }, |op| {
            AsmInstruction::Unary(op, Operand::Pop, Target::Push)
        })
    } else {
        BinaryOp::try_from(op).map_or(AsmInstruction::Unknown { arity: 2 }, push_pop_binary)
    };
    if instruction.is_unknown() {
        log::warn!("operator `{op}` has no instruction");
    }
    instructions.push(instruction);
}

fn gen_expression(expression: Option<&Expression>, instructions: &mut AsmInstructions) {
    let Some(expression) = expression else {
        return;
    };
    for token in expression.linearize() {
        match token {
            Token::Constant(c) => {
                let value = Operand::Literal(decode_constant(&c.literal));
                instructions.push(AsmInstruction::Mov(Target::Push, value));
            }
            Token::Identifier(id) => {
                let slot = Operand::Slot(id.name.clone());
                instructions.push(AsmInstruction::Mov(Target::Push, slot));
            }
            Token::Call(call) => gen_call(call, instructions),
            Token::Operator(op) => gen_operator(op, instructions),
            Token::OpenParen | Token::CloseParen => (),
        }
    }
}

fn gen_call(call: &Call, instructions: &mut AsmInstructions) {
    let argc = call.args.len();
    instructions.push(AsmInstruction::Comment(format!(
        "call {} with {argc} args",
        call.name
    )));
    for arg in &call.args {
        gen_expression(Some(arg), instructions);
    }
    let instruction = match call.builtin() {
        Some(Builtin::Print) => AsmInstruction::Print(argc),
        Some(Builtin::Read) => AsmInstruction::Read(argc),
        None => AsmInstruction::Call(Label::function(&call.name)),
    };
    instructions.push(instruction);
}

fn gen_assignment(assignment: &Assignment, instructions: &mut AsmInstructions) {
    gen_expression(assignment.value.as_ref(), instructions);
    let target = Target::Slot(assignment.target.clone());
    instructions.push(AsmInstruction::Mov(target, Operand::Pop));
}

fn gen_block(block: Option<&Block>, instructions: &mut AsmInstructions) {
    if let Some(block) = block {
        for statement in &block.statements {
            gen_statement(statement, instructions);
        }
    }
}

fn gen_conditional(conditional: &Conditional, instructions: &mut AsmInstructions) {
    let else_label = conditional.else_label();
    let exit_label = conditional.exit_label();

    instructions.push(AsmInstruction::Comment("if".into()));
    gen_expression(conditional.condition.as_ref(), instructions);
    instructions.push(AsmInstruction::JmpFalse(else_label.clone(), Operand::Pop));
    gen_block(conditional.then.as_ref(), instructions);
    instructions.push(AsmInstruction::Jmp(exit_label.clone()));
    instructions.push(AsmInstruction::Label(else_label));
    gen_block(conditional.els.as_ref(), instructions);
    instructions.push(AsmInstruction::Label(exit_label));
}

fn gen_loop(looped: &Loop, instructions: &mut AsmInstructions) {
    let condition_label = looped.condition_label();
    let exit_label = looped.exit_label();
    let var = &looped.var;

    instructions.push(AsmInstruction::Comment(format!("for {var}")));
    gen_expression(looped.from.as_ref(), instructions);
    instructions.push(AsmInstruction::Mov(Target::Slot(var.clone()), Operand::Pop));
    instructions.push(AsmInstruction::Label(condition_label.clone()));

    instructions.push(AsmInstruction::Mov(Target::Push, Operand::Slot(var.clone())));
    gen_expression(looped.to.as_ref(), instructions);
    instructions.push(push_pop_binary(BinaryOp::LessEq));
    instructions.push(AsmInstruction::JmpFalse(exit_label.clone(), Operand::Pop));

    gen_block(looped.body.as_ref(), instructions);

    match &looped.step {
        Some(step) => gen_expression(Some(step), instructions),
        None => {
            let one = Operand::Literal("1".into());
            instructions.push(AsmInstruction::Mov(Target::Push, one));
        }
    }
    instructions.push(AsmInstruction::Binary(
        BinaryOp::Add,
        Operand::Slot(var.clone()),
        Operand::Pop,
        Target::Slot(var.clone()),
    ));
    instructions.push(AsmInstruction::Jmp(condition_label));
    instructions.push(AsmInstruction::Label(exit_label));
}

fn gen_switch(switch: &Switch, instructions: &mut AsmInstructions) {
    let exit_label = switch.exit_label();
    instructions.push(AsmInstruction::Comment("switch".into()));

    for case in &switch.cases {
        let skip_label = case.skip_label();
        for value in &case.values {
            gen_expression(switch.scrutinee.as_ref(), instructions);
            gen_expression(Some(value), instructions);
            instructions.push(push_pop_binary(BinaryOp::Eq));
        }
        for _ in 1..case.values.len() {
            instructions.push(push_pop_binary(BinaryOp::Or));
        }
        instructions.push(AsmInstruction::JmpFalse(skip_label.clone(), Operand::Pop));
        gen_block(case.body.as_ref(), instructions);
        instructions.push(AsmInstruction::Jmp(exit_label.clone()));
        instructions.push(AsmInstruction::Label(skip_label));
    }

    gen_block(switch.default.as_ref(), instructions);
    instructions.push(AsmInstruction::Label(exit_label));
}

fn gen_return(ret: &Return, instructions: &mut AsmInstructions) {
    gen_expression(ret.value.as_ref(), instructions);
    instructions.push(AsmInstruction::Out);
}

fn gen_statement(statement: &Statement, instructions: &mut AsmInstructions) {
    match statement {
        Statement::Assignment(a) => gen_assignment(a, instructions),
        Statement::Block(b) => gen_block(Some(b), instructions),
        Statement::Conditional(c) => gen_conditional(c, instructions),
        Statement::Loop(l) => gen_loop(l, instructions),
        Statement::Switch(s) => gen_switch(s, instructions),
        Statement::Break(b) => instructions.push(AsmInstruction::Jmp(b.target_label())),
        Statement::LoopExit(e) => instructions.push(AsmInstruction::Jmp(e.target_label())),
        Statement::Return(r) => gen_return(r, instructions),
        Statement::Call(call) => gen_call(call, instructions),
    }
}

/// Function label, then the parameters popped in reverse order, then the
/// body.
pub fn gen_function(function: &FunctionDeclaration, instructions: &mut AsmInstructions) {
    let FunctionDeclaration {
        name, params, body, ..
    } = function;
    instructions.push(AsmInstruction::Comment(format!(
        "function {name} ({})",
        params.join(", ")
    )));
    instructions.push(AsmInstruction::Label(function.label()));
    for param in params.iter().rev() {
        instructions.push(AsmInstruction::Mov(Target::Slot(param.clone()), Operand::Pop));
    }
    gen_block(body.as_ref(), instructions);
    instructions.push(AsmInstruction::Comment(format!("end function {name}")));
}
