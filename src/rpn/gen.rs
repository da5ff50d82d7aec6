use super::rpn_ast::*;
use crate::ast::*;

type Lines = Vec<RpnLine>;

fn gen_expression(expression: Option<&Expression>, tokens: &mut Vec<RpnToken>) {
    let Some(expression) = expression else {
        return;
    };
    for token in expression.linearize() {
        match token {
            Token::Identifier(id) => tokens.push(RpnToken::Operand(id.name.clone())),
            Token::Constant(c) => tokens.push(RpnToken::Operand(c.literal.clone())),
            Token::Call(call) => gen_call(call, tokens),
            Token::Operator(op) => tokens.push(RpnToken::Operator(op.clone())),
            Token::OpenParen | Token::CloseParen => (),
        }
    }
}

fn gen_call(call: &Call, tokens: &mut Vec<RpnToken>) {
    for arg in &call.args {
        gen_expression(Some(arg), tokens);
    }
    tokens.push(RpnToken::Call(call.name.clone()));
}

fn gen_assignment(assignment: &Assignment, lines: &mut Lines) {
    let mut tokens = vec![RpnToken::Operand(assignment.target.clone())];
    gen_expression(assignment.value.as_ref(), &mut tokens);
    tokens.push(RpnToken::Assign);
    lines.push(RpnLine::Code(tokens));
}

fn gen_block(block: Option<&Block>, lines: &mut Lines) {
    for statement in block.iter().flat_map(|b| &b.statements) {
        gen_statement(statement, lines);
    }
}

fn gen_conditional(conditional: &Conditional, lines: &mut Lines) {
    let else_label = conditional.else_label();
    let exit_label = conditional.exit_label();

    let mut test = Vec::new();
    gen_expression(conditional.condition.as_ref(), &mut test);
    test.extend([RpnToken::Ref(else_label.clone()), RpnToken::JumpElse]);
    lines.push(RpnLine::Code(test));

    gen_block(conditional.then.as_ref(), lines);
    lines.push(RpnLine::Code(vec![
        RpnToken::Ref(exit_label.clone()),
        RpnToken::Jump,
    ]));
    lines.push(RpnLine::Code(vec![RpnToken::Define(else_label)]));
    gen_block(conditional.els.as_ref(), lines);
    lines.push(RpnLine::Code(vec![RpnToken::Define(exit_label)]));
}

fn gen_loop(looped: &Loop, lines: &mut Lines) {
    let condition_label = looped.condition_label();
    let exit_label = looped.exit_label();
    let var = || RpnToken::Operand(looped.var.clone());

    lines.push(RpnLine::Code(vec![RpnToken::StepIn]));

    let mut init = vec![var()];
    gen_expression(looped.from.as_ref(), &mut init);
    init.push(RpnToken::Assign);
    lines.push(RpnLine::Code(init));

    let mut test = vec![RpnToken::Define(condition_label.clone()), var()];
    gen_expression(looped.to.as_ref(), &mut test);
    test.push(RpnToken::Operator(Operator::LessOrEqual));
    lines.push(RpnLine::Code(test));
    lines.push(RpnLine::Code(vec![
        RpnToken::Ref(exit_label.clone()),
        RpnToken::JumpElse,
    ]));

    gen_block(looped.body.as_ref(), lines);

    let mut step = vec![var(), var()];
    match &looped.step {
        Some(expression) => gen_expression(Some(expression), &mut step),
        None => step.push(RpnToken::Operand("1".into())),
    }
    step.extend([RpnToken::Operator(Operator::Add), RpnToken::Assign]);
    lines.push(RpnLine::Code(step));

    lines.push(RpnLine::Code(vec![
        RpnToken::Ref(condition_label),
        RpnToken::Jump,
    ]));
    lines.push(RpnLine::Code(vec![
        RpnToken::Define(exit_label),
        RpnToken::StepOut,
    ]));
}

fn gen_switch(switch: &Switch, lines: &mut Lines) {
    let exit_label = switch.exit_label();
    lines.push(RpnLine::Code(vec![RpnToken::StepIn]));

    for case in &switch.cases {
        let skip_label = case.skip_label();
        let mut test = Vec::new();
        for (i, value) in case.values.iter().enumerate() {
            gen_expression(switch.scrutinee.as_ref(), &mut test);
            gen_expression(Some(value), &mut test);
            test.push(RpnToken::Operator(Operator::Equal));
            if i != 0 {
                test.push(RpnToken::Or);
            }
        }
        lines.push(RpnLine::Code(test));
        lines.push(RpnLine::Code(vec![
            RpnToken::Ref(skip_label.clone()),
            RpnToken::JumpElse,
        ]));
        gen_block(case.body.as_ref(), lines);
        lines.push(RpnLine::Code(vec![
            RpnToken::Ref(exit_label.clone()),
            RpnToken::Jump,
        ]));
        lines.push(RpnLine::Code(vec![RpnToken::Define(skip_label)]));
    }

    gen_block(switch.default.as_ref(), lines);
    lines.push(RpnLine::Code(vec![
        RpnToken::Define(exit_label),
        RpnToken::StepOut,
    ]));
}

fn gen_jump(target: Label, lines: &mut Lines) {
    lines.push(RpnLine::Code(vec![RpnToken::Ref(target), RpnToken::Jump]));
}

fn gen_return(ret: &Return, lines: &mut Lines) {
    let mut tokens = Vec::new();
    gen_expression(ret.value.as_ref(), &mut tokens);
    tokens.push(RpnToken::Return);
    lines.push(RpnLine::Code(tokens));
}

fn gen_statement(statement: &Statement, lines: &mut Lines) {
    match statement {
        Statement::Assignment(a) => gen_assignment(a, lines),
        Statement::Block(b) => gen_block(Some(b), lines),
        Statement::Conditional(c) => gen_conditional(c, lines),
        Statement::Loop(l) => gen_loop(l, lines),
        Statement::Switch(s) => gen_switch(s, lines),
        Statement::Break(b) => gen_jump(b.target_label(), lines),
        Statement::LoopExit(e) => gen_jump(e.target_label(), lines),
        Statement::Return(r) => gen_return(r, lines),
        Statement::Call(call) => {
            let mut tokens = Vec::new();
            gen_call(call, &mut tokens);
            lines.push(RpnLine::Code(tokens));
        }
    }
}

pub(super) fn gen_function(function: &FunctionDeclaration, lines: &mut Lines) {
    let FunctionDeclaration {
        name, params, body, ..
    } = function;
    lines.push(RpnLine::Comment(format!(
        "function {name} ({})",
        params.join(", ")
    )));
    gen_block(body.as_ref(), lines);
    lines.push(RpnLine::Comment(format!("end function {name}")));
    lines.push(RpnLine::Blank);
}
